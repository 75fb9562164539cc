//! # Mediator Core
//!
//! The signal/dispatch engine of the Mediator library.
//!
//! Views and routers never call application logic directly. They emit
//! *signals* described by a [`HandlerDef`], and a [`Mediator`] broadcasts
//! each signal to every registered [`Director`] exposing the matching
//! handler name.
//!
//! This crate provides:
//! - [`HandlerDef`] and [`normalize`]: what to call and with which [`Args`]
//! - [`Director`]: named handlers acting on application state
//! - [`Mediator`]: the director registry and the [`signal`](Mediator::signal) entry point
//!
//! ```text
//! trigger ──▶ signal ──▶ normalize ──┬──▶ bypass callable
//!                                    └──▶ broadcast ──▶ Director "default"
//!                                                   ──▶ Director "audit"
//! ```

pub mod args;
pub mod definition;
pub mod director;
pub mod error;
pub mod handler;
pub mod mediator;
pub mod options;

pub use args::{Args, Event};
pub use definition::{ArgsFn, BypassFn, HandlerDef, Resolution, normalize};
pub use director::{Director, DirectorState, ErasedDirector};
pub use error::{ArgumentError, SignalError, SignalResult};
pub use handler::{BoxedHandler, ErasedHandler, Handler, HandlerFn, into_handler, into_raw_handler};
pub use mediator::{DEFAULT_KEY, Mediator, Outcome, SharedDirector};
pub use options::{EventArgs, SignalOptions, UnmatchedPolicy};

//! # Mediator Framework
//!
//! Glue between a host view/router layer and the [`Mediator`](mediator_core::Mediator).
//!
//! This layer provides:
//! - [`Mediated`] / [`MediatedView`]: trigger key → handler definition tables for views
//! - [`MediatedRoutes`] / [`MediatedRouter`]: route → handler name tables for routers
//!
//! Event binding and route matching stay with the host. These tables only
//! turn an already-fired trigger or an already-matched route into a signal.

pub mod mediated;
pub mod routing;

pub use mediated::{Mediated, MediatedView};
pub use routing::{MediatedRouter, MediatedRoutes};

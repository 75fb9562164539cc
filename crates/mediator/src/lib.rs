//! # Mediator
//!
//! A signal/dispatch mediator that keeps views and routers away from
//! application logic.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────┐     ┌─────────────────────────────┐
//! │ View/Router │────▶│ Mediator │────▶│ Director "default" (state)  │
//! │  (trigger)  │     │ (signal) │────▶│ Director "audit"   (state)  │
//! └─────────────┘     └──────────┘     └─────────────────────────────┘
//! ```
//!
//! - **Handler definitions**: what a trigger calls, and with which arguments
//! - **Mediator**: resolves a definition and broadcasts it to directors
//! - **Directors**: named handlers acting on application state
//! - **Runtime**: configuration and logging bootstrap
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mediator::prelude::*;
//!
//! #[derive(Default)]
//! struct Documents { saved: Vec<i64> }
//! impl DirectorState for Documents {}
//!
//! let runtime = MediatorRuntime::new();
//! runtime.mediator().register_default(Arc::new(
//!     Director::new(Documents::default())
//!         .handler("save", |d: &Director<Documents>, id: i64| d.state().saved.push(id)),
//! ));
//!
//! let view = Mediated::new().on("click", HandlerDef::with_args("save", serde_json::json!(42)));
//! view.trigger(runtime.mediator(), "click", &(), None)?;
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use mediator_core as core;
pub use mediator_framework as framework;
pub use mediator_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use mediator::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use mediator_runtime::MediatorRuntime;

    // Signal engine
    pub use mediator_core::{
        Args, Director, DirectorState, Event, HandlerDef, Mediator, Outcome, SignalError,
        SignalOptions, SignalResult,
    };

    // View and router glue
    pub use mediator_framework::{Mediated, MediatedRouter, MediatedRoutes, MediatedView};
}

//! Mediator Runtime - Configuration and logging bootstrap for the Mediator library.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `MediatorConfig`)
//! - Logging configuration (`LoggingBuilder`, `SpanEvents`)
//! - A configured entry point (`MediatorRuntime`)
//!
//! # Configuration Sources
//!
//! Sources are merged in order, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `mediator.{profile}.{toml,yaml}` then `mediator.{toml,yaml}`, searched in the
//!    current directory and the user config directory
//! 3. `MEDIATOR_`-prefixed environment variables, nested with `__`
//!    (e.g. `MEDIATOR_SIGNAL__UNMATCHED=strict`)
//! 4. Programmatic overrides
//!
//! File formats are gated behind the `toml-config` and `yaml-config` features.
//!
//! ```ignore
//! use std::sync::Arc;
//! use mediator_runtime::prelude::*;
//!
//! let runtime = MediatorRuntime::new();
//! runtime.mediator().register_default(Arc::new(director));
//! runtime.mediator().signal_with(&HandlerDef::name("save"), &view, Some(&event))?;
//! ```

pub mod config;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, LoggingConfig, MediatorConfig, load_config,
    load_config_from_file,
};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{MediatorRuntime, RuntimeBuilder};

pub use tracing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{MediatorConfig, load_config};
    pub use crate::logging::{LoggingBuilder, SpanEvents};
    pub use crate::runtime::MediatorRuntime;
    pub use mediator_core::{Director, HandlerDef, Mediator};
}

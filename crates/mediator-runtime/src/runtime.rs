//! Configured entry point bundling a [`Mediator`] with its configuration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mediator_runtime::MediatorRuntime;
//!
//! // Auto-loads config from the default locations, defaults otherwise
//! let runtime = MediatorRuntime::new();
//!
//! // Custom configuration path
//! let runtime = MediatorRuntime::builder()
//!     .config_file("config/mediator.toml")
//!     .profile("production")
//!     .build()?;
//!
//! runtime.mediator().register_default(Arc::new(director));
//! ```

use std::path::Path;
use std::sync::Arc;

use mediator_core::Mediator;
use tracing::info;

use crate::config::{ConfigLoader, ConfigResult, MediatorConfig, validate_config};
use crate::logging;

/// A [`Mediator`] built from a [`MediatorConfig`], with logging installed.
#[derive(Debug)]
pub struct MediatorRuntime {
    config: MediatorConfig,
    mediator: Arc<Mediator>,
}

impl MediatorRuntime {
    /// Creates a runtime with automatic configuration loading.
    ///
    /// Falls back to the default configuration if loading fails.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                MediatorConfig::default()
            });

        Self::build_unchecked(config)
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// The configuration is validated before logging is initialized.
    pub fn from_config(config: MediatorConfig) -> ConfigResult<Self> {
        validate_config(&config)?;
        Ok(Self::build_unchecked(config))
    }

    fn build_unchecked(config: MediatorConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            unmatched = ?config.signal.unmatched,
            event_args = ?config.signal.event_args,
            "Mediator runtime initialized"
        );

        let mediator = Arc::new(Mediator::with_options(config.signal));
        Self { config, mediator }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MediatorConfig {
        &self.config
    }

    /// Returns the mediator.
    pub fn mediator(&self) -> &Arc<Mediator> {
        &self.mediator
    }

    /// Tears down every registered director.
    pub fn shutdown(&self) {
        let count = self.mediator.len();
        self.mediator.clear();
        info!(directors = count, "Mediator runtime shut down");
    }
}

impl Default for MediatorRuntime {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`MediatorRuntime`] with custom configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables loading environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: MediatorConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> ConfigResult<MediatorRuntime> {
        let config = self.config_loader.load()?;
        Ok(MediatorRuntime::build_unchecked(config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

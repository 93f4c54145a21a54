//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration (file or built-in defaults)
//! - Build the route table exactly once
//! - Hand the shared resolver to whoever needs it
//!
//! # Design Decisions
//! - Fail fast: any invalid route definition is fatal at startup, never at
//!   navigation time
//! - No global router instance: callers own what `bootstrap` returns

use std::path::Path;
use std::sync::Arc;

use crate::config::{read_config, validate_settings, AppConfig, ConfigError};
use crate::history::Addressing;
use crate::routing::{Resolver, RouteTable};

/// Everything a command needs after startup.
#[derive(Debug, Clone)]
pub struct Startup {
    pub config: AppConfig,
    pub resolver: Arc<Resolver>,
}

impl Startup {
    pub fn addressing(&self) -> Addressing {
        Addressing::new(self.config.router.history, &self.config.router.base)
    }
}

/// Load configuration and build the resolver.
pub fn bootstrap(config_path: Option<&Path>) -> Result<Startup, ConfigError> {
    from_config(load(config_path)?)
}

/// Read configuration, falling back to the built-in table.
///
/// Only syntax is checked here; `from_config` validates.
pub fn load(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match config_path {
        Some(path) => read_config(path),
        None => Ok(AppConfig::default()),
    }
}

/// Validate configuration and build the route table, once.
///
/// Setting and route errors are reported together.
pub fn from_config(config: AppConfig) -> Result<Startup, ConfigError> {
    let mut errors = validate_settings(&config);
    let table = match RouteTable::build(&config.router, &config.routes) {
        Ok(table) if errors.is_empty() => table,
        Ok(_) => return Err(ConfigError::Validation(errors)),
        Err(route_errors) => {
            errors.extend(route_errors);
            return Err(ConfigError::Validation(errors));
        }
    };

    tracing::info!(
        routes = table.routes().len(),
        history = ?config.router.history,
        base = %config.router.base,
        fallback = table.fallback().is_some(),
        "Route table loaded"
    );

    Ok(Startup {
        config,
        resolver: Arc::new(Resolver::new(table)),
    })
}

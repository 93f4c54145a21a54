//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, route table invariants)
//!     → AppConfig (validated, immutable)
//!     → route table built once, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime route registration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, ConfigError};
pub use schema::{
    default_routes, AppConfig, FallbackConfig, LogFormat, ObservabilityConfig, RouteConfig,
    RouterConfig, ServerConfig,
};
pub use validation::{validate_config, validate_settings, RouteField, ValidationError};

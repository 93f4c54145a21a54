//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::history::HistoryMode;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP front settings.
    pub server: ServerConfig,

    /// Matching and history behaviour.
    pub router: RouterConfig,

    /// Route table. Omitted means the built-in table.
    pub routes: Vec<RouteConfig>,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            router: RouterConfig::default(),
            routes: default_routes(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// HTTP front configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// App shell served for client routes.
    pub index_file: Option<PathBuf>,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            index_file: None,
            request_timeout_secs: 30,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

/// Router behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Address-bar encoding.
    pub history: HistoryMode,

    /// Base path the app is mounted under.
    pub base: String,

    /// Case-sensitive literal matching.
    pub sensitive: bool,

    /// Trailing slash is significant.
    pub strict: bool,

    /// View mounted when no route matches.
    pub fallback: Option<FallbackConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            history: HistoryMode::Path,
            base: "/".to_string(),
            sensitive: false,
            strict: false,
            fallback: None,
        }
    }
}

/// Not-found fallback.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackConfig {
    pub name: String,
    pub view: String,
}

/// A route table entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern, e.g. `/node/:id`.
    pub path: String,

    /// Symbolic name for programmatic navigation.
    #[serde(default)]
    pub name: Option<String>,

    /// View to mount.
    #[serde(default)]
    pub view: Option<String>,

    /// Location to redirect to instead of mounting a view.
    #[serde(default)]
    pub redirect: Option<String>,
}

impl RouteConfig {
    pub fn view(path: &str, name: &str, view: &str) -> Self {
        Self {
            path: path.to_string(),
            name: Some(name.to_string()),
            view: Some(view.to_string()),
            redirect: None,
        }
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            view: None,
            redirect: Some(to.to_string()),
        }
    }
}

/// The client's navigation table.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::redirect("/", "/home"),
        RouteConfig::view("/map", "Map", "Map"),
        RouteConfig::view("/sdkg", "SDKG", "SDKG"),
        RouteConfig::view("/node/:id", "NodeDoc", "NodeDoc"),
        RouteConfig::view("/home", "Home", "Home"),
        RouteConfig::view("/settings", "Settings", "Settings"),
    ]
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

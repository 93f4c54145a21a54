//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route table invariants: unique names and paths, well-formed patterns,
//!   one target per entry, redirects that land on a view
//! - Validate addresses and the base path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, RouteConfig, RouterConfig};
use crate::routing::location::Location;
use crate::routing::matcher::{PathPattern, PatternError};
use crate::routing::route::{Route, Target, ViewId};
use crate::routing::table::RouteTable;

/// Route attribute that must be unique across the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteField {
    Name,
    Path,
}

impl fmt::Display for RouteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteField::Name => f.write_str("name"),
            RouteField::Path => f.write_str("path"),
        }
    }
}

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate route {field} `{value}`")]
    DuplicateRouteDefinition { field: RouteField, value: String },

    #[error("route #{index}: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: PatternError,
    },

    #[error("route `{path}` has neither a view nor a redirect")]
    MissingTarget { path: String },

    #[error("route `{path}` has both a view and a redirect")]
    ConflictingTarget { path: String },

    #[error("view route `{path}` has no name")]
    UnnamedView { path: String },

    #[error("route `{path}` redirects to `{target}`, which is not a valid location")]
    InvalidRedirect { path: String, target: String },

    #[error("route `{path}` redirects to `{target}`, which matches no view")]
    DanglingRedirect { path: String, target: String },

    #[error("redirects starting at `{path}` form a cycle")]
    RedirectCycle { path: String },

    #[error("fallback name `{name}` is already used by a route")]
    FallbackNameClash { name: String },

    #[error("invalid {field} `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("base path `{0}` must start with `/`")]
    InvalidBase(String),
}

/// Validate a complete configuration, including the route table.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_settings(config);
    if let Err(route_errors) = RouteTable::build(&config.router, &config.routes) {
        errors.extend(route_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Everything except the route table: addresses and the base path.
pub fn validate_settings(config: &AppConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if !config.router.base.is_empty() && !config.router.base.starts_with('/') {
        errors.push(ValidationError::InvalidBase(config.router.base.clone()));
    }

    errors
}

/// Compile route entries, checking per-entry and uniqueness invariants.
pub(crate) fn compile_routes(
    router: &RouterConfig,
    routes: &[RouteConfig],
) -> Result<Vec<Route>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut compiled = Vec::with_capacity(routes.len());
    let mut names: HashSet<&str> = HashSet::new();
    let mut paths: HashSet<String> = HashSet::new();

    for (index, entry) in routes.iter().enumerate() {
        let pattern = match PathPattern::parse(&entry.path) {
            Ok(pattern) => pattern,
            Err(source) => {
                errors.push(ValidationError::InvalidPattern { index, source });
                continue;
            }
        };

        if !paths.insert(pattern.key(router.sensitive)) {
            errors.push(ValidationError::DuplicateRouteDefinition {
                field: RouteField::Path,
                value: entry.path.clone(),
            });
        }

        if let Some(name) = &entry.name {
            if !names.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateRouteDefinition {
                    field: RouteField::Name,
                    value: name.clone(),
                });
            }
        }

        let target = match (&entry.view, &entry.redirect) {
            (Some(view), None) => {
                if entry.name.is_none() {
                    errors.push(ValidationError::UnnamedView {
                        path: entry.path.clone(),
                    });
                }
                Target::View(ViewId::new(view.clone()))
            }
            (None, Some(to)) => Target::Redirect(to.clone()),
            (Some(_), Some(_)) => {
                errors.push(ValidationError::ConflictingTarget {
                    path: entry.path.clone(),
                });
                continue;
            }
            (None, None) => {
                errors.push(ValidationError::MissingTarget {
                    path: entry.path.clone(),
                });
                continue;
            }
        };

        compiled.push(Route {
            name: entry.name.clone(),
            pattern,
            target,
        });
    }

    if let Some(fallback) = &router.fallback {
        if names.contains(fallback.name.as_str()) {
            errors.push(ValidationError::FallbackNameClash {
                name: fallback.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(compiled)
    } else {
        Err(errors)
    }
}

/// Follow every redirect entry until it lands on a view.
///
/// The fallback view does not count as a landing point.
pub(crate) fn check_redirects(table: &RouteTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for route in table.routes() {
        let Target::Redirect(first) = &route.target else {
            continue;
        };

        let start = route.pattern.as_str();
        let mut visited: Vec<&str> = vec![start];
        let mut target: &str = first;

        loop {
            let Ok(location) = Location::parse(target) else {
                errors.push(ValidationError::InvalidRedirect {
                    path: start.to_string(),
                    target: target.to_string(),
                });
                break;
            };
            let Some(found) = table.lookup(&location.path) else {
                errors.push(ValidationError::DanglingRedirect {
                    path: start.to_string(),
                    target: target.to_string(),
                });
                break;
            };
            match &found.route.target {
                Target::View(_) => break,
                Target::Redirect(next) => {
                    let at = found.route.pattern.as_str();
                    if visited.contains(&at) {
                        errors.push(ValidationError::RedirectCycle {
                            path: start.to_string(),
                        });
                        break;
                    }
                    visited.push(at);
                    target = next.as_str();
                }
            }
        }
    }

    errors
}

//! Navigation target resolution.
//!
//! # Responsibilities
//! - Turn a navigation target into the view to mount and its parameters
//! - Follow redirect entries, bounded by `MAX_REDIRECTS`
//! - Produce a deterministic outcome for unmatched paths
//! - Build paths for named routes
//!
//! # Design Decisions
//! - Pure over an immutable table: same target, same resolution
//! - Explicit `RouteNotFound` rather than a silent default, unless a
//!   fallback view is configured

use serde::Serialize;
use thiserror::Error;

use crate::observability::metrics;
use crate::routing::location::Location;
use crate::routing::matcher::{Params, PatternError};
use crate::routing::route::{Target, ViewId};
use crate::routing::table::RouteTable;

/// Redirect hops allowed before giving up.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no route matches `{path}`")]
    RouteNotFound { path: String },

    #[error("redirect loop at `{path}` after {hops} hops")]
    RedirectLoop { path: String, hops: usize },

    #[error("invalid navigation target `{target}`: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("navigation target `{target}` is outside the application")]
    ExternalTarget { target: String },

    #[error("no route named `{0}`")]
    UnknownRouteName(String),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Name of the activated route.
    pub name: String,
    pub view: ViewId,
    pub params: Params,
    /// Final location, after redirects.
    pub location: Location,
    /// Path that triggered the first redirect, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
    /// Set when the not-found fallback view was activated.
    pub fallback: bool,
}

/// Resolves navigation targets against a route table.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: RouteTable,
}

impl Resolver {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve a target such as `/node/42?tab=meta`.
    pub fn resolve(&self, target: &str) -> Result<Resolution, ResolveError> {
        let mut location = Location::parse(target)?;
        let mut redirected_from: Option<String> = None;

        for _ in 0..=MAX_REDIRECTS {
            let Some(found) = self.table.lookup(&location.path) else {
                return self.not_found(location, redirected_from);
            };

            match &found.route.target {
                Target::View(view) => {
                    tracing::debug!(
                        target_path = %location.path,
                        route = found.route.label(),
                        view = %view,
                        "Route resolved"
                    );
                    metrics::record_resolution("matched");
                    return Ok(Resolution {
                        name: found.route.label().to_string(),
                        view: view.clone(),
                        params: found.params,
                        location,
                        redirected_from,
                        fallback: false,
                    });
                }
                Target::Redirect(to) => {
                    tracing::debug!(from = %location.path, to = %to, "Following redirect");
                    redirected_from.get_or_insert_with(|| location.path.clone());

                    let mut next = Location::parse(to)?;
                    if next.query.is_none() && next.fragment.is_none() {
                        next.query = location.query.take();
                        next.fragment = location.fragment.take();
                    }
                    location = next;
                }
            }
        }

        tracing::warn!(path = %location.path, hops = MAX_REDIRECTS, "Redirect loop");
        metrics::record_resolution("redirect_loop");
        Err(ResolveError::RedirectLoop {
            path: location.path,
            hops: MAX_REDIRECTS,
        })
    }

    /// Path for a named route with the given parameters.
    pub fn href_for(&self, name: &str, params: &Params) -> Result<String, ResolveError> {
        let route = self
            .table
            .by_name(name)
            .ok_or_else(|| ResolveError::UnknownRouteName(name.to_string()))?;
        Ok(route.pattern.render(params)?)
    }

    fn not_found(
        &self,
        location: Location,
        redirected_from: Option<String>,
    ) -> Result<Resolution, ResolveError> {
        match self.table.fallback() {
            Some(fallback) => {
                tracing::debug!(path = %location.path, view = %fallback.view, "No route matched, using fallback");
                metrics::record_resolution("fallback");
                Ok(Resolution {
                    name: fallback.name.clone(),
                    view: fallback.view.clone(),
                    params: Params::new(),
                    location,
                    redirected_from,
                    fallback: true,
                })
            }
            None => {
                tracing::debug!(path = %location.path, "No route matched");
                metrics::record_resolution("not_found");
                Err(ResolveError::RouteNotFound {
                    path: location.decoded_path(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{default_routes, FallbackConfig, RouteConfig, RouterConfig};

    fn default_resolver() -> Resolver {
        Resolver::new(RouteTable::build(&RouterConfig::default(), &default_routes()).unwrap())
    }

    #[test]
    fn test_resolve_static() {
        let res = default_resolver().resolve("/settings").unwrap();
        assert_eq!(res.name, "Settings");
        assert_eq!(res.view, ViewId::new("Settings"));
        assert!(res.params.is_empty());
        assert!(res.redirected_from.is_none());
        assert!(!res.fallback);
    }

    #[test]
    fn test_redirect_keeps_query_and_fragment() {
        let res = default_resolver().resolve("/?from=mail#intro").unwrap();
        assert_eq!(res.name, "Home");
        assert_eq!(res.location.to_string(), "/home?from=mail#intro");
        assert_eq!(res.redirected_from.as_deref(), Some("/"));
    }

    #[test]
    fn test_not_found_without_fallback() {
        let err = default_resolver().resolve("/does-not-exist").unwrap_err();
        assert!(matches!(err, ResolveError::RouteNotFound { path } if path == "/does-not-exist"));
    }

    #[test]
    fn test_not_found_with_fallback() {
        let router = RouterConfig {
            fallback: Some(FallbackConfig {
                name: "NotFound".into(),
                view: "NotFound".into(),
            }),
            ..RouterConfig::default()
        };
        let resolver = Resolver::new(RouteTable::build(&router, &default_routes()).unwrap());
        let res = resolver.resolve("/does-not-exist").unwrap();
        assert!(res.fallback);
        assert_eq!(res.view, ViewId::new("NotFound"));
        assert_eq!(res.location.path, "/does-not-exist");
    }

    #[test]
    fn test_encoded_and_non_ascii_literals() {
        let routes = vec![
            RouteConfig::view("/über", "Uber", "Uber"),
            RouteConfig::view("/a b", "Spaced", "Spaced"),
        ];
        let resolver = Resolver::new(RouteTable::build(&RouterConfig::default(), &routes).unwrap());
        assert_eq!(resolver.resolve("/über").unwrap().name, "Uber");
        assert_eq!(resolver.resolve("/%C3%BCber").unwrap().name, "Uber");
        assert_eq!(resolver.resolve("/a b").unwrap().name, "Spaced");
        assert_eq!(resolver.resolve("/a%20b").unwrap().name, "Spaced");

        assert_eq!(default_resolver().resolve("/ma%70").unwrap().name, "Map");

        let err = resolver.resolve("/ünknown").unwrap_err();
        assert!(matches!(err, ResolveError::RouteNotFound { path } if path == "/ünknown"));
    }

    #[test]
    fn test_redirect_chain_bound() {
        // Acyclic chains pass validation but still stop after MAX_REDIRECTS hops.
        let mut routes: Vec<RouteConfig> = (0..=MAX_REDIRECTS)
            .map(|i| RouteConfig {
                path: format!("/r{}", i),
                name: None,
                view: None,
                redirect: Some(format!("/r{}", i + 1)),
            })
            .collect();
        routes.push(RouteConfig {
            path: format!("/r{}", MAX_REDIRECTS + 1),
            name: Some("End".into()),
            view: Some("End".into()),
            redirect: None,
        });
        let resolver = Resolver::new(RouteTable::build(&RouterConfig::default(), &routes).unwrap());

        let err = resolver.resolve("/r0").unwrap_err();
        assert!(matches!(err, ResolveError::RedirectLoop { hops, .. } if hops == MAX_REDIRECTS));

        let res = resolver.resolve("/r1").unwrap();
        assert_eq!(res.name, "End");
        assert_eq!(res.redirected_from.as_deref(), Some("/r1"));
    }

    #[test]
    fn test_href_for() {
        let resolver = default_resolver();
        let params: Params = [("id", "42")].into_iter().collect();
        assert_eq!(resolver.href_for("NodeDoc", &params).unwrap(), "/node/42");
        assert_eq!(resolver.href_for("Map", &Params::new()).unwrap(), "/map");
        assert!(matches!(
            resolver.href_for("Nope", &Params::new()),
            Err(ResolveError::UnknownRouteName(_))
        ));
        assert!(matches!(
            resolver.href_for("NodeDoc", &Params::new()),
            Err(ResolveError::Pattern(PatternError::MissingParam { .. }))
        ));
    }
}

//! The immutable route table.
//!
//! # Responsibilities
//! - Compile route configuration into patterns and targets
//! - Reject invalid tables at construction (all errors reported together)
//! - Look up the entry matching a path
//!
//! # Design Decisions
//! - Immutable after construction; shared via `Arc` without locks
//! - Static entries are tried before parameterised ones, table order within each
//! - Lookup does not follow redirects; that is the resolver's job

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::config::validation::{check_redirects, compile_routes, ValidationError};
use crate::routing::matcher::{split_path, Params};
use crate::routing::route::{Route, ViewId};

/// Matching behaviour shared by every entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare literal segments case-sensitively.
    pub sensitive: bool,
    /// Treat a trailing slash as significant.
    pub strict: bool,
}

/// View mounted when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub name: String,
    pub view: ViewId,
}

/// A route together with the parameters captured from a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Option<Fallback>,
    options: MatchOptions,
}

impl RouteTable {
    /// Build and validate a table.
    pub fn build(router: &RouterConfig, routes: &[RouteConfig]) -> Result<Self, Vec<ValidationError>> {
        let compiled = compile_routes(router, routes)?;

        let table = Self {
            routes: compiled,
            fallback: router.fallback.as_ref().map(|fb| Fallback {
                name: fb.name.clone(),
                view: ViewId::new(fb.view.clone()),
            }),
            options: MatchOptions {
                sensitive: router.sensitive,
                strict: router.strict,
            },
        };

        let errors = check_redirects(&table);
        if !errors.is_empty() {
            return Err(errors);
        }

        tracing::debug!(
            routes = table.routes.len(),
            sensitive = table.options.sensitive,
            strict = table.options.strict,
            fallback = table.fallback.is_some(),
            "Route table built"
        );
        Ok(table)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn fallback(&self) -> Option<&Fallback> {
        self.fallback.as_ref()
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name.as_deref() == Some(name))
    }

    /// Find the entry for a path (no query or fragment).
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        let parts = split_path(path, self.options.strict);
        let statics = self.routes.iter().filter(|r| r.pattern.is_static());
        let dynamics = self.routes.iter().filter(|r| !r.pattern.is_static());

        statics.chain(dynamics).find_map(|route| {
            route
                .pattern
                .matches(&parts, self.options.sensitive)
                .map(|params| RouteMatch { route, params })
        })
    }
}

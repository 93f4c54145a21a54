//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation target ("/node/42?tab=meta")
//!     → location.rs (parse, normalise, split path/query/fragment)
//!     → table.rs (lookup: static entries first, then captures)
//!     → matcher.rs (segment matching, capture extraction)
//!     → resolver.rs (follow redirects, apply fallback)
//!     → Return: Resolution (view + params) or ResolveError
//!
//! Table Compilation (at startup):
//!     RouteConfig[]
//!     → Parse patterns
//!     → Check names/paths/targets/redirects
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table compiled at startup, immutable at runtime
//! - Deterministic: same target always resolves the same way
//! - Views are opaque identities; nothing here renders anything

pub mod location;
pub mod matcher;
pub mod resolver;
pub mod route;
pub mod table;

pub use location::Location;
pub use matcher::{Params, PathPattern, PatternError};
pub use resolver::{Resolution, ResolveError, Resolver, MAX_REDIRECTS};
pub use route::{Route, Target, ViewId};
pub use table::{Fallback, MatchOptions, RouteMatch, RouteTable};

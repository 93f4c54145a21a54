//! Route table resolver for the CLEAR client
//!
//! Maps navigation targets to view components, drives an in-process
//! history, and fronts the single-page app over HTTP.

pub mod config;
pub mod history;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use history::{Addressing, History, HistoryMode, MemoryHistory, Navigator};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Resolution, ResolveError, Resolver, RouteTable};

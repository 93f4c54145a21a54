//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, CORS)
//! - Answer deep links with the app shell, using the client route table
//! - Expose the resolver as a small JSON API
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, ServerConfig};
use crate::history::{Addressing, HistoryMode};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::{Location, ResolveError, Resolver, Route, Target};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub addressing: Arc<Addressing>,
    /// Contents of the configured index file.
    pub shell: Option<Bytes>,
}

/// HTTP front for the single-page app.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server. Reads the index file, if configured.
    pub fn new(config: AppConfig, resolver: Arc<Resolver>) -> Result<Self, std::io::Error> {
        let shell = match &config.server.index_file {
            Some(path) => {
                let bytes = std::fs::read(path)?;
                tracing::info!(path = %path.display(), bytes = bytes.len(), "App shell loaded");
                Some(Bytes::from(bytes))
            }
            None => None,
        };

        let state = AppState {
            resolver,
            addressing: Arc::new(Addressing::new(config.router.history, &config.router.base)),
            shell,
        };

        let router = Self::build_router(&config.server, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/routes", get(list_routes))
            .route("/api/resolve", get(resolve_target))
            .fallback(app_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(middleware::from_fn(track_requests))
            .layer(cors_layer(&config.cors_origins))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = request_id(request.headers()),
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::HEAD])
        .expose_headers([HeaderName::from_static(X_REQUEST_ID)])
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// A route table entry as exposed by `/api/routes`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        let (view, redirect) = match &route.target {
            Target::View(view) => (Some(view.to_string()), None),
            Target::Redirect(to) => (None, Some(to.clone())),
        };
        Self {
            path: route.pattern.to_string(),
            name: route.name.clone(),
            view,
            redirect,
        }
    }
}

async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    Json(
        state
            .resolver
            .table()
            .routes()
            .iter()
            .map(RouteSummary::from)
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

async fn resolve_target(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Response {
    match state.resolver.resolve(&query.path) {
        Ok(resolution) => Json(resolution).into_response(),
        Err(err) => error_response(&err),
    }
}

/// HTTP status for a resolution failure.
pub fn status_for(err: &ResolveError) -> StatusCode {
    match err {
        ResolveError::RouteNotFound { .. } | ResolveError::UnknownRouteName(_) => {
            StatusCode::NOT_FOUND
        }
        ResolveError::RedirectLoop { .. } => StatusCode::LOOP_DETECTED,
        ResolveError::InvalidTarget { .. }
        | ResolveError::ExternalTarget { .. }
        | ResolveError::Pattern(_) => StatusCode::BAD_REQUEST,
    }
}

fn error_response(err: &ResolveError) -> Response {
    (
        status_for(err),
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Count every request, API and client routes alike.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

/// Everything outside the API: client routes.
async fn app_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method();
    if method == Method::GET || method == Method::HEAD {
        serve_client_route(&state, &request)
    } else {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}

fn serve_client_route(state: &AppState, request: &Request<Body>) -> Response {
    let uri = request.uri();
    let request_id = request_id(request.headers());

    let Some(path) = state.addressing.strip_base(uri.path()) else {
        tracing::debug!(request_id, path = uri.path(), "Outside base path");
        return not_found(state, uri.path());
    };

    // In hash mode client routes live in the fragment; only the document is served.
    if state.addressing.mode() == HistoryMode::Hash {
        return if path == "/" {
            serve_shell(state, path)
        } else {
            not_found(state, path)
        };
    }

    let Some(found) = state.resolver.table().lookup(path) else {
        tracing::debug!(request_id, path, "No client route matched");
        return not_found(state, path);
    };

    match &found.route.target {
        Target::Redirect(to) => redirect_to(state, to, uri.query()),
        Target::View(view) => {
            tracing::debug!(
                request_id,
                route = found.route.label(),
                view = %view,
                "Serving client route"
            );
            let target = match uri.query() {
                Some(query) => format!("{}?{}", path, query),
                None => path.to_string(),
            };
            serve_shell(state, &target)
        }
    }
}

/// The app shell, or the resolution as JSON when no shell is configured.
fn serve_shell(state: &AppState, target: &str) -> Response {
    if let Some(shell) = &state.shell {
        return Html(shell.clone()).into_response();
    }
    match state.resolver.resolve(target) {
        Ok(resolution) => Json(resolution).into_response(),
        Err(err) => error_response(&err),
    }
}

fn redirect_to(state: &AppState, to: &str, query: Option<&str>) -> Response {
    match Location::parse(to) {
        Ok(mut location) => {
            if location.query.is_none() {
                location.query = query.map(str::to_string);
            }
            location.fragment = None;
            let href = state.addressing.href(&location);
            Redirect::temporary(&href).into_response()
        }
        Err(err) => error_response(&err),
    }
}

fn not_found(state: &AppState, path: &str) -> Response {
    match state.resolver.resolve(path) {
        Ok(resolution) if resolution.fallback => match &state.shell {
            Some(shell) => (StatusCode::NOT_FOUND, Html(shell.clone())).into_response(),
            None => (StatusCode::NOT_FOUND, Json(resolution)).into_response(),
        },
        _ => (StatusCode::NOT_FOUND, "route not found").into_response(),
    }
}

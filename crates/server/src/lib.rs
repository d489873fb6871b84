//! HTTP API for the escape room: level listing and solution checking.

#![forbid(unsafe_code)]

mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use services::{LevelService, SolutionService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ServerError;
pub use routes::LanguagesResponse;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub levels: LevelService,
    pub solutions: SolutionService,
}

impl AppState {
    #[must_use]
    pub fn new(levels: LevelService, solutions: SolutionService) -> Self {
        Self { levels, solutions }
    }
}

/// Build the router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::level_routes())
        .merge(routes::solution_routes())
        .with_state(Arc::new(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until the process stops.
///
/// # Errors
///
/// Returns `ServerError::Bind` if the address cannot be bound, or
/// `ServerError::Serve` if the server stops with an I/O error.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve_on(listener, state).await
}

/// Serve on an already bound listener.
///
/// # Errors
///
/// Returns `ServerError::Serve` if the server stops with an I/O error.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "escape room server listening");
    }
    axum::serve(listener, router(state))
        .await
        .map_err(ServerError::Serve)
}

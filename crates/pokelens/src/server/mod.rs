//! HTTP surface.
//!
//! - `POST /identify_pokemon`: multipart `file`, optional `?lang=` (default `en`)
//! - `GET  /healthz`: liveness

mod error;
mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use pokelens_core::Pokedex;
use tower_http::trace::TraceLayer;

/// Shared, read-only per-process state.
#[derive(Clone)]
pub struct AppState {
    pub pokedex: Pokedex,
}

impl AppState {
    pub fn new(pokedex: Pokedex) -> Self {
        Self { pokedex }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/identify_pokemon", post(handlers::identify_pokemon))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{FilmStore, SubtitleStore},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{Aggregator, Translator},
};

pub mod films;
pub mod subtitles;
pub mod translate;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub store: Arc<dyn FilmStore>,
    pub subtitles: Arc<dyn SubtitleStore>,
    pub translator: Arc<Translator>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/films", get(films::list))
        .route("/films/popular", get(films::popular))
        .route("/films/lastadded", get(films::last_added))
        .route("/films/random", get(films::random))
        .route("/films/search", get(films::search))
        .route("/films/:film_id", get(films::get_film))
        .route("/subtitles", get(subtitles::find))
        .route("/subtitles/:imdb_code", put(subtitles::save))
        .route("/translate", post(translate::translate))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

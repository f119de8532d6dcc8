use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Film,
    routes::AppState,
    services::{catalog, AggregateRequest, AggregatedResult, SearchMode},
};

/// Query string of the discovery endpoints
///
/// Kept as raw strings: a malformed page falls back to 1 instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct DiscoverQuery {
    page: Option<String>,
    name: Option<String>,
}

async fn discover(
    state: &AppState,
    request_id: RequestId,
    mode: SearchMode,
    params: DiscoverQuery,
) -> AppResult<Json<AggregatedResult>> {
    let request = AggregateRequest::new(mode, params.page.as_deref(), params.name.as_deref())?;

    tracing::info!(
        request_id = %request_id,
        mode = %mode,
        page = request.page(),
        "Processing film discovery request"
    );

    let result = state.aggregator.aggregate(&request).await;
    let summary = catalog::persist_results(state.store.as_ref(), &result).await?;

    tracing::info!(
        request_id = %request_id,
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Film discovery completed"
    );

    Ok(Json(result))
}

/// Trending films
pub async fn popular(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<DiscoverQuery>,
) -> AppResult<Json<AggregatedResult>> {
    discover(&state, request_id, SearchMode::Popular, params).await
}

/// Most recently added films
pub async fn last_added(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<DiscoverQuery>,
) -> AppResult<Json<AggregatedResult>> {
    discover(&state, request_id, SearchMode::LastAdded, params).await
}

/// One random film plus suggestions
pub async fn random(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<AggregatedResult>> {
    discover(&state, request_id, SearchMode::Random, DiscoverQuery::default()).await
}

/// Keyword search; `name` is required
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<DiscoverQuery>,
) -> AppResult<Json<AggregatedResult>> {
    discover(&state, request_id, SearchMode::Search, params).await
}

/// All stored films, newest first
pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.store.list().await?))
}

/// A stored film by id
pub async fn get_film(
    State(state): State<Arc<AppState>>,
    Path(film_id): Path<String>,
) -> AppResult<Json<Film>> {
    let not_found = || AppError::NotFound("Film not found".to_string());

    let id = Uuid::parse_str(&film_id).map_err(|_| not_found())?;
    let film = state.store.get(id).await?.ok_or_else(not_found)?;

    Ok(Json(film))
}

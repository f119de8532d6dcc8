use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub lang_from: String,
    pub lang_to: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub text: String,
}

/// Handler for comment translation
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslateRequest>,
) -> AppResult<Json<TranslateResponse>> {
    if request.lang_from.trim().is_empty() || request.lang_to.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "lang_from and lang_to are required".to_string(),
        ));
    }

    let text = state
        .translator
        .translate(&request.text, &request.lang_from, &request.lang_to)
        .await;

    Ok(Json(TranslateResponse { text }))
}

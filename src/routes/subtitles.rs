use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Subtitle, SubtitleFile},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SubtitleQuery {
    imdb: Option<String>,
    lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSubtitlesRequest {
    pub files: Vec<SubtitleFile>,
}

/// Subtitle files of a film; `lang` narrows the answer to one language
pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubtitleQuery>,
) -> AppResult<Json<Subtitle>> {
    let imdb_code = params
        .imdb
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::InvalidInput("imdb is required".to_string()))?;

    let subtitle = state
        .subtitles
        .find_by_imdb(imdb_code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No subtitles for {}", imdb_code)))?;

    let Some(lang) = params.lang.as_deref().filter(|lang| !lang.is_empty()) else {
        return Ok(Json(subtitle));
    };

    let file = subtitle.file_for(lang).cloned().ok_or_else(|| {
        AppError::NotFound(format!("No {} subtitles for {}", lang, imdb_code))
    })?;

    Ok(Json(Subtitle {
        imdb_code: subtitle.imdb_code,
        files: vec![file],
    }))
}

/// Records the subtitle files available for a film
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path(imdb_code): Path<String>,
    Json(request): Json<SaveSubtitlesRequest>,
) -> AppResult<Json<Subtitle>> {
    let imdb_code = imdb_code.trim();
    if imdb_code.is_empty() {
        return Err(AppError::InvalidInput("imdb code is required".to_string()));
    }
    if request
        .files
        .iter()
        .any(|file| file.path.trim().is_empty() || file.lang.trim().is_empty())
    {
        return Err(AppError::InvalidInput(
            "Every subtitle file needs a path and a lang".to_string(),
        ));
    }

    let subtitle = Subtitle {
        imdb_code: imdb_code.to_string(),
        files: request.files,
    };
    state.subtitles.save(&subtitle).await?;

    tracing::info!(
        imdb_code = %subtitle.imdb_code,
        files = subtitle.files.len(),
        "Subtitles saved"
    );

    Ok(Json(subtitle))
}

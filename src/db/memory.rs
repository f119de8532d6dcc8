use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FilmStore, SubtitleStore};
use crate::{
    error::AppResult,
    models::{Film, Subtitle},
};

/// Film store kept in process memory
///
/// Used when no database is configured, and by tests.
#[derive(Clone, Default)]
pub struct MemoryFilmStore {
    films: Arc<RwLock<HashMap<Uuid, Film>>>,
}

impl MemoryFilmStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FilmStore for MemoryFilmStore {
    async fn find_by_title(&self, title: &str) -> AppResult<Option<Film>> {
        let needle = title.to_lowercase();
        let films = self.films.read().await;
        Ok(films
            .values()
            .find(|film| film.title.to_lowercase().contains(&needle))
            .cloned())
    }

    async fn insert(&self, film: &Film) -> AppResult<()> {
        let mut films = self.films.write().await;
        if films.values().any(|stored| stored.title == film.title) {
            return Ok(());
        }
        films.insert(film.id, film.clone());
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Film>> {
        let films = self.films.read().await;
        let mut all: Vec<Film> = films.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Film>> {
        Ok(self.films.read().await.get(&id).cloned())
    }
}

/// Subtitle store kept in process memory
#[derive(Clone, Default)]
pub struct MemorySubtitleStore {
    subtitles: Arc<RwLock<HashMap<String, Subtitle>>>,
}

impl MemorySubtitleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubtitleStore for MemorySubtitleStore {
    async fn find_by_imdb(&self, imdb_code: &str) -> AppResult<Option<Subtitle>> {
        Ok(self.subtitles.read().await.get(imdb_code).cloned())
    }

    async fn save(&self, subtitle: &Subtitle) -> AppResult<()> {
        self.subtitles
            .write()
            .await
            .insert(subtitle.imdb_code.clone(), subtitle.clone());
        Ok(())
    }
}

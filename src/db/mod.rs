pub mod memory;
pub mod postgres;

pub use memory::{MemoryFilmStore, MemorySubtitleStore};
pub use postgres::{create_pool, PgFilmStore, PgSubtitleStore};

use uuid::Uuid;

use crate::{error::AppResult, models::{Film, Subtitle}};

/// Persistence for films discovered through the movie providers
#[async_trait::async_trait]
pub trait FilmStore: Send + Sync {
    /// First stored film whose title contains `title`, ignoring case
    async fn find_by_title(&self, title: &str) -> AppResult<Option<Film>>;

    /// Stores a film. A film with an already stored title is left untouched.
    async fn insert(&self, film: &Film) -> AppResult<()>;

    /// All stored films, newest first
    async fn list(&self) -> AppResult<Vec<Film>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Film>>;
}

/// Persistence for subtitle files, one entry per IMDb code
#[async_trait::async_trait]
pub trait SubtitleStore: Send + Sync {
    async fn find_by_imdb(&self, imdb_code: &str) -> AppResult<Option<Subtitle>>;

    /// Stores the files of a film, replacing any previously stored for it
    async fn save(&self, subtitle: &Subtitle) -> AppResult<()>;
}

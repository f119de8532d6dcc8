use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{FilmStore, SubtitleStore};
use crate::{
    error::{AppError, AppResult},
    models::{Film, Subtitle, SubtitleFile, TorrentRecord},
};

const CREATE_FILMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS films (
        id UUID PRIMARY KEY,
        imdb_code TEXT,
        title TEXT NOT NULL UNIQUE,
        genres TEXT[] NOT NULL DEFAULT '{}',
        year INTEGER,
        rating_imdb REAL,
        description TEXT NOT NULL DEFAULT '',
        photo TEXT,
        torrents JSONB NOT NULL DEFAULT '[]',
        source TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_SUBTITLES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS subtitles (
        imdb_code TEXT NOT NULL UNIQUE,
        files JSONB NOT NULL DEFAULT '[]'
    )
"#;

const FILM_COLUMNS: &str = "id, imdb_code, title, genres, year, rating_imdb, description, \
                            photo, torrents, source, created_at";

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Escapes LIKE wildcards so user text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, FromRow)]
struct FilmRow {
    id: Uuid,
    imdb_code: Option<String>,
    title: String,
    genres: Vec<String>,
    year: Option<i32>,
    rating_imdb: Option<f32>,
    description: String,
    photo: Option<String>,
    torrents: Json<Vec<TorrentRecord>>,
    source: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<FilmRow> for Film {
    type Error = AppError;

    fn try_from(row: FilmRow) -> Result<Self, Self::Error> {
        let source = row.source.parse().map_err(AppError::Internal)?;

        Ok(Film {
            id: row.id,
            imdb_code: row.imdb_code,
            title: row.title,
            genres: row.genres,
            year: row.year,
            rating_imdb: row.rating_imdb,
            description: row.description,
            photo: row.photo,
            torrents: row.torrents.0,
            source,
            created_at: row.created_at,
        })
    }
}

/// Film store backed by PostgreSQL
#[derive(Clone)]
pub struct PgFilmStore {
    pool: PgPool,
}

impl PgFilmStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the films table when missing
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(CREATE_FILMS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FilmStore for PgFilmStore {
    async fn find_by_title(&self, title: &str) -> AppResult<Option<Film>> {
        let sql = format!(
            "SELECT {} FROM films WHERE title ILIKE '%' || $1 || '%' ORDER BY created_at LIMIT 1",
            FILM_COLUMNS
        );
        let row: Option<FilmRow> = sqlx::query_as(&sql)
            .bind(escape_like(title))
            .fetch_optional(&self.pool)
            .await?;

        row.map(Film::try_from).transpose()
    }

    async fn insert(&self, film: &Film) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO films (id, imdb_code, title, genres, year, rating_imdb, description,
                               photo, torrents, source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (title) DO NOTHING
            "#,
        )
        .bind(film.id)
        .bind(&film.imdb_code)
        .bind(&film.title)
        .bind(&film.genres)
        .bind(film.year)
        .bind(film.rating_imdb)
        .bind(&film.description)
        .bind(&film.photo)
        .bind(Json(&film.torrents))
        .bind(film.source.as_str())
        .bind(film.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Film>> {
        let sql = format!("SELECT {} FROM films ORDER BY created_at DESC", FILM_COLUMNS);
        let rows: Vec<FilmRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(Film::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Film>> {
        let sql = format!("SELECT {} FROM films WHERE id = $1", FILM_COLUMNS);
        let row: Option<FilmRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Film::try_from).transpose()
    }
}

#[derive(Debug, FromRow)]
struct SubtitleRow {
    imdb_code: String,
    files: Json<Vec<SubtitleFile>>,
}

impl From<SubtitleRow> for Subtitle {
    fn from(row: SubtitleRow) -> Self {
        Subtitle {
            imdb_code: row.imdb_code,
            files: row.files.0,
        }
    }
}

/// Subtitle store backed by PostgreSQL
#[derive(Clone)]
pub struct PgSubtitleStore {
    pool: PgPool,
}

impl PgSubtitleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the subtitles table when missing
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(CREATE_SUBTITLES_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SubtitleStore for PgSubtitleStore {
    async fn find_by_imdb(&self, imdb_code: &str) -> AppResult<Option<Subtitle>> {
        let row: Option<SubtitleRow> =
            sqlx::query_as("SELECT imdb_code, files FROM subtitles WHERE imdb_code = $1")
                .bind(imdb_code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Subtitle::from))
    }

    async fn save(&self, subtitle: &Subtitle) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subtitles (imdb_code, files)
            VALUES ($1, $2)
            ON CONFLICT (imdb_code) DO UPDATE SET files = EXCLUDED.files
            "#,
        )
        .bind(&subtitle.imdb_code)
        .bind(Json(&subtitle.files))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

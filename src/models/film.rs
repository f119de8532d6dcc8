use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MovieRecord, ProviderKind, TorrentRecord};

/// A film as kept in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    /// Unique identifier for the film
    pub id: Uuid,
    pub imdb_code: Option<String>,
    /// Title, unique across the catalog
    pub title: String,
    pub genres: Vec<String>,
    pub year: Option<i32>,
    pub rating_imdb: Option<f32>,
    pub description: String,
    pub photo: Option<String>,
    pub torrents: Vec<TorrentRecord>,
    /// Provider the film was first seen on
    pub source: ProviderKind,
    pub created_at: DateTime<Utc>,
}

impl Film {
    /// Maps a normalized provider record onto the stored shape
    pub fn from_record(record: &MovieRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            imdb_code: record.imdb_code.clone(),
            title: record.title.trim().to_string(),
            genres: record.genres.clone(),
            year: record.year,
            rating_imdb: record.rating,
            description: record.synopsis.clone().unwrap_or_default(),
            photo: record.poster.clone(),
            torrents: record.torrents.clone(),
            source: record.source,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MovieRecord {
        MovieRecord {
            source: ProviderKind::Yts,
            imdb_code: Some("tt0133093".to_string()),
            title: " The Matrix ".to_string(),
            year: Some(1999),
            synopsis: None,
            poster: Some("https://img.yts.lt/matrix.jpg".to_string()),
            genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
            rating: Some(8.7),
            torrents: vec![TorrentRecord {
                url: Some("https://yts.lt/torrent/download/ABC".to_string()),
                magnet: Some("magnet:?xt=urn:btih:ABC".to_string()),
                quality: "1080p".to_string(),
                language: Some("en".to_string()),
                seeds: 100,
                peers: 12,
                size: Some("1.6 GB".to_string()),
                hash: Some("ABC".to_string()),
            }],
        }
    }

    #[test]
    fn test_from_record_maps_fields() {
        let film = Film::from_record(&record());
        assert_eq!(film.title, "The Matrix");
        assert_eq!(film.imdb_code.as_deref(), Some("tt0133093"));
        assert_eq!(film.year, Some(1999));
        assert_eq!(film.rating_imdb, Some(8.7));
        assert_eq!(film.photo.as_deref(), Some("https://img.yts.lt/matrix.jpg"));
        assert_eq!(film.genres.len(), 2);
        assert_eq!(film.torrents.len(), 1);
        assert_eq!(film.source, ProviderKind::Yts);
    }

    #[test]
    fn test_from_record_missing_synopsis_gives_empty_description() {
        let film = Film::from_record(&record());
        assert_eq!(film.description, "");
    }
}

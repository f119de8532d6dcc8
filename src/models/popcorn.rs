// ============================================================================
// Popcorn Time API Types
// ============================================================================

use serde::Deserialize;
use std::collections::BTreeMap;

use super::{MovieRecord, ProviderKind, TorrentRecord};

/// Movie entry from `/movies/{page}` and `/random/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct PopcornMovie {
    #[serde(default)]
    pub imdb_id: Option<String>,
    pub title: String,
    /// Sent as a string by most mirrors, as a number by some
    #[serde(default)]
    pub year: Option<PopcornYear>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Option<PopcornImages>,
    #[serde(default)]
    pub rating: Option<PopcornRating>,
    /// language -> quality -> torrent
    #[serde(default)]
    pub torrents: BTreeMap<String, BTreeMap<String, PopcornTorrent>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PopcornYear {
    Number(i32),
    Text(String),
}

impl PopcornYear {
    fn value(&self) -> Option<i32> {
        match self {
            PopcornYear::Number(year) => Some(*year),
            PopcornYear::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopcornImages {
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub fanart: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopcornRating {
    /// 0-100
    #[serde(default)]
    pub percentage: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopcornTorrent {
    /// Magnet link
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub peer: Option<u32>,
    #[serde(default)]
    pub filesize: Option<String>,
}

/// Pulls the info hash out of a `magnet:?xt=urn:btih:<hash>` link
fn magnet_hash(magnet: &str) -> Option<String> {
    let start = magnet.find("urn:btih:")? + "urn:btih:".len();
    let hash: String = magnet[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    (!hash.is_empty()).then_some(hash)
}

impl From<PopcornMovie> for MovieRecord {
    fn from(movie: PopcornMovie) -> Self {
        let mut torrents = Vec::new();
        for (language, by_quality) in movie.torrents {
            for (quality, torrent) in by_quality {
                let hash = torrent.url.as_deref().and_then(magnet_hash);
                torrents.push(TorrentRecord {
                    url: None,
                    magnet: torrent.url,
                    quality,
                    language: Some(language.clone()),
                    seeds: torrent.seed.unwrap_or(0),
                    peers: torrent.peer.unwrap_or(0),
                    size: torrent.filesize,
                    hash,
                });
            }
        }

        let poster = movie
            .images
            .and_then(|images| images.poster.or(images.fanart));

        MovieRecord {
            source: ProviderKind::Popcorn,
            imdb_code: movie.imdb_id,
            title: movie.title,
            year: movie.year.as_ref().and_then(PopcornYear::value),
            synopsis: movie.synopsis,
            poster,
            genres: movie.genres,
            rating: movie
                .rating
                .and_then(|rating| rating.percentage)
                .map(|percentage| percentage / 10.0),
            torrents,
        }
    }
}

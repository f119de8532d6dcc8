use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// The two upstream movie directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Popcorn Time API, a general movie directory
    Popcorn,
    /// YTS API, a torrent-indexed movie directory
    Yts,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Popcorn => "popcorn",
            ProviderKind::Yts => "yts",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popcorn" => Ok(ProviderKind::Popcorn),
            "yts" => Ok(ProviderKind::Yts),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Provider-agnostic movie metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub source: ProviderKind,
    pub imdb_code: Option<String>,
    pub title: String,
    pub year: Option<i32>,
    pub synopsis: Option<String>,
    pub poster: Option<String>,
    pub genres: Vec<String>,
    /// Rating on a 0-10 scale
    pub rating: Option<f32>,
    pub torrents: Vec<TorrentRecord>,
}

/// One downloadable file of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentRecord {
    pub url: Option<String>,
    pub magnet: Option<String>,
    pub quality: String,
    pub language: Option<String>,
    pub seeds: u32,
    pub peers: u32,
    pub size: Option<String>,
    pub hash: Option<String>,
}

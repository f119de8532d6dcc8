// ============================================================================
// YTS API Types
// ============================================================================

use serde::Deserialize;

use super::{MovieRecord, ProviderKind, TorrentRecord};

const TRACKERS: [&str; 8] = [
    "udp://open.demonii.com:1337/announce",
    "udp://tracker.openbittorrent.com:80",
    "udp://tracker.coppersurfer.tk:6969",
    "udp://glotorrents.pw:6969/announce",
    "udp://tracker.opentrackr.org:1337/announce",
    "udp://torrent.gresille.org:80/announce",
    "udp://p4p.arenabg.com:1337",
    "udp://tracker.leechers-paradise.org:6969",
];

/// Envelope shared by `list_movies.json` and `movie_suggestions.json`
#[derive(Debug, Deserialize)]
pub struct YtsResponse {
    pub status: String,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub data: Option<YtsData>,
}

#[derive(Debug, Deserialize)]
pub struct YtsData {
    #[serde(default)]
    pub movies: Option<Vec<YtsMovie>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtsMovie {
    #[serde(default)]
    pub imdb_code: Option<String>,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub description_full: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub medium_cover_image: Option<String>,
    #[serde(default)]
    pub large_cover_image: Option<String>,
    #[serde(default)]
    pub torrents: Option<Vec<YtsTorrent>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YtsTorrent {
    #[serde(default)]
    pub url: Option<String>,
    pub hash: String,
    pub quality: String,
    #[serde(default)]
    pub seeds: Option<u32>,
    #[serde(default)]
    pub peers: Option<u32>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Builds a magnet link for a YTS torrent hash
pub fn magnet_link(hash: &str, title: &str, quality: &str) -> String {
    let display_name = urlencoding::encode(&format!("{} [{}]", title, quality)).into_owned();
    let trackers: String = TRACKERS
        .iter()
        .map(|tracker| format!("&tr={}", tracker))
        .collect();
    format!("magnet:?xt=urn:btih:{}&dn={}{}", hash, display_name, trackers)
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl From<YtsMovie> for MovieRecord {
    fn from(movie: YtsMovie) -> Self {
        let torrents = movie
            .torrents
            .unwrap_or_default()
            .into_iter()
            .map(|torrent| TorrentRecord {
                magnet: Some(magnet_link(&torrent.hash, &movie.title, &torrent.quality)),
                url: torrent.url,
                quality: torrent.quality,
                language: movie.language.clone(),
                seeds: torrent.seeds.unwrap_or(0),
                peers: torrent.peers.unwrap_or(0),
                size: torrent.size,
                hash: Some(torrent.hash),
            })
            .collect();

        let synopsis = non_empty(movie.description_full)
            .or_else(|| non_empty(movie.synopsis))
            .or_else(|| non_empty(movie.summary));

        MovieRecord {
            source: ProviderKind::Yts,
            imdb_code: movie.imdb_code,
            title: movie.title,
            year: movie.year,
            synopsis,
            poster: movie.large_cover_image.or(movie.medium_cover_image),
            genres: movie.genres.unwrap_or_default(),
            rating: movie.rating,
            torrents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_JSON: &str = r#"{
        "status": "ok",
        "status_message": "Query was successful",
        "data": {
            "movie_count": 1,
            "limit": 50,
            "page_number": 1,
            "movies": [{
                "id": 10,
                "imdb_code": "tt0133093",
                "title": "The Matrix",
                "year": 1999,
                "rating": 8.7,
                "genres": ["Action", "Sci-Fi"],
                "summary": "",
                "synopsis": "Short synopsis",
                "description_full": "",
                "language": "en",
                "medium_cover_image": "https://yts.lt/medium.jpg",
                "large_cover_image": "https://yts.lt/large.jpg",
                "torrents": [{
                    "url": "https://yts.lt/torrent/download/ABCDEF",
                    "hash": "ABCDEF",
                    "quality": "1080p",
                    "type": "bluray",
                    "seeds": 1500,
                    "peers": 120,
                    "size": "1.60 GB",
                    "size_bytes": 1717986918
                }]
            }]
        }
    }"#;

    #[test]
    fn test_yts_movie_to_record() {
        let response: YtsResponse = serde_json::from_str(LIST_JSON).unwrap();
        let movie = response.data.unwrap().movies.unwrap().remove(0);
        let record: MovieRecord = movie.into();

        assert_eq!(record.source, ProviderKind::Yts);
        assert_eq!(record.title, "The Matrix");
        assert_eq!(record.year, Some(1999));
        assert_eq!(record.synopsis.as_deref(), Some("Short synopsis"));
        assert_eq!(record.poster.as_deref(), Some("https://yts.lt/large.jpg"));
        assert_eq!(record.genres, vec!["Action", "Sci-Fi"]);

        let torrent = &record.torrents[0];
        assert_eq!(torrent.hash.as_deref(), Some("ABCDEF"));
        assert_eq!(torrent.language.as_deref(), Some("en"));
        assert_eq!(torrent.seeds, 1500);
        assert!(torrent
            .magnet
            .as_deref()
            .unwrap()
            .starts_with("magnet:?xt=urn:btih:ABCDEF&dn=The%20Matrix%20%5B1080p%5D"));
    }

    #[test]
    fn test_missing_movies_deserializes() {
        let response: YtsResponse =
            serde_json::from_str(r#"{"status": "ok", "data": {"movie_count": 0}}"#).unwrap();
        assert!(response.data.unwrap().movies.is_none());
    }

    #[test]
    fn test_magnet_link_lists_trackers() {
        let magnet = magnet_link("HASH", "Heat", "720p");
        assert_eq!(magnet.matches("&tr=").count(), TRACKERS.len());
    }
}

use rand::Rng;
use std::fmt::Display;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ProviderKind,
};

/// Exclusive upper bound of the YTS suggestion seed id
pub const RANDOM_SEED_UPPER: u32 = 10_000;

const YTS_PAGE_LIMIT: &str = "50";
const YTS_QUALITY: &str = "720p,1080p";

/// Query intent requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    Popular,
    LastAdded,
    Random,
    Search,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Popular => "popular",
            SearchMode::LastAdded => "lastadded",
            SearchMode::Random => "random",
            SearchMode::Search => "search",
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input of one aggregation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRequest {
    mode: SearchMode,
    page: u64,
    search_term: Option<String>,
}

impl AggregateRequest {
    /// Validates raw caller input.
    ///
    /// `page` falls back to 1 when absent, zero, or not a number that fits a
    /// `u64`. `Search` mode
    /// requires a non-blank search term; other modes ignore it.
    pub fn new(mode: SearchMode, page: Option<&str>, search_term: Option<&str>) -> AppResult<Self> {
        let page = page
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        let search_term = match mode {
            SearchMode::Search => {
                let term = search_term.map(str::trim).unwrap_or_default();
                if term.is_empty() {
                    return Err(AppError::InvalidInput(
                        "Search term cannot be empty".to_string(),
                    ));
                }
                Some(term.to_string())
            }
            _ => None,
        };

        Ok(Self {
            mode,
            page,
            search_term,
        })
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }
}

/// Fully-formed request against one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    provider: ProviderKind,
    mode: SearchMode,
    url: String,
    params: Vec<(&'static str, String)>,
}

impl ProviderQuery {
    fn new(provider: ProviderKind, mode: SearchMode, url: String) -> Self {
        Self {
            provider,
            mode,
            url,
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Value of the first query parameter named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The two queries of one aggregation call
#[derive(Debug, Clone)]
pub struct QueryPair {
    pub popcorn: ProviderQuery,
    pub yts: ProviderQuery,
}

/// Builds provider queries from a mode, page and search term
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    popcorn_url: String,
    yts_url: String,
}

impl QueryBuilder {
    pub fn new(popcorn_url: impl Into<String>, yts_url: impl Into<String>) -> Self {
        Self {
            popcorn_url: popcorn_url.into().trim_end_matches('/').to_string(),
            yts_url: yts_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.popcorn_api_url.clone(), config.yts_api_url.clone())
    }

    /// Builds both queries. Only `Random` mode draws from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, request: &AggregateRequest, rng: &mut R) -> QueryPair {
        let mode = request.mode();
        let page = request.page().to_string();
        let popcorn = |path: String| {
            ProviderQuery::new(
                ProviderKind::Popcorn,
                mode,
                format!("{}{}", self.popcorn_url, path),
            )
        };
        let yts = |path: &str| {
            ProviderQuery::new(ProviderKind::Yts, mode, format!("{}{}", self.yts_url, path))
        };

        match mode {
            SearchMode::Popular => QueryPair {
                popcorn: popcorn(format!("/movies/{}", page))
                    .param("sort", "trending")
                    .param("order", "-1"),
                yts: yts("/list_movies.json")
                    .param("limit", YTS_PAGE_LIMIT)
                    .param("page", page.as_str())
                    .param("quality", YTS_QUALITY)
                    .param("sort_by", "download_count"),
            },
            SearchMode::LastAdded => QueryPair {
                popcorn: popcorn(format!("/movies/{}", page))
                    .param("sort", "last added")
                    .param("order", "-1"),
                yts: yts("/list_movies.json")
                    .param("limit", YTS_PAGE_LIMIT)
                    .param("page", page.as_str())
                    .param("quality", YTS_QUALITY),
            },
            SearchMode::Random => {
                let seed = rng.gen_range(0..RANDOM_SEED_UPPER);
                QueryPair {
                    popcorn: popcorn("/random/movie".to_string()),
                    yts: yts("/movie_suggestions.json").param("movie_id", seed.to_string()),
                }
            }
            SearchMode::Search => {
                let term = request.search_term().unwrap_or_default();
                QueryPair {
                    popcorn: popcorn("/movies/1".to_string())
                        .param("sort", "last added")
                        .param("order", "-1")
                        .param("keywords", term),
                    yts: yts("/list_movies.json")
                        .param("query_term", term)
                        .param("quality", YTS_QUALITY),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn builder() -> QueryBuilder {
        QueryBuilder::new("http://popcorn.test/", "http://yts.test/api/v2")
    }

    fn build(mode: SearchMode, page: Option<&str>, term: Option<&str>) -> QueryPair {
        let request = AggregateRequest::new(mode, page, term).unwrap();
        builder().build(&request, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_large_page_is_kept() {
        let pair = build(SearchMode::Popular, Some("4294967296"), None);

        assert_eq!(pair.popcorn.url(), "http://popcorn.test/movies/4294967296");
        assert_eq!(pair.yts.get("page"), Some("4294967296"));
    }

    #[test]
    fn test_page_defaults_to_one() {
        for raw in [None, Some("abc"), Some("0"), Some("-3"), Some("")] {
            let request = AggregateRequest::new(SearchMode::Popular, raw, None).unwrap();
            assert_eq!(request.page(), 1, "page input {:?}", raw);
        }
    }

    #[test]
    fn test_search_requires_term() {
        assert!(AggregateRequest::new(SearchMode::Search, None, None).is_err());
        assert!(AggregateRequest::new(SearchMode::Search, None, Some("   ")).is_err());
    }

    #[test]
    fn test_search_term_ignored_outside_search_mode() {
        let request = AggregateRequest::new(SearchMode::Popular, None, Some("matrix")).unwrap();
        assert_eq!(request.search_term(), None);
    }

    #[test]
    fn test_popular_page_two() {
        let pair = build(SearchMode::Popular, Some("2"), None);

        assert_eq!(pair.popcorn.provider(), ProviderKind::Popcorn);
        assert_eq!(pair.popcorn.url(), "http://popcorn.test/movies/2");
        assert_eq!(pair.popcorn.get("sort"), Some("trending"));
        assert_eq!(pair.popcorn.get("order"), Some("-1"));

        assert_eq!(pair.yts.provider(), ProviderKind::Yts);
        assert_eq!(pair.yts.url(), "http://yts.test/api/v2/list_movies.json");
        assert_eq!(pair.yts.get("page"), Some("2"));
        assert_eq!(pair.yts.get("quality"), Some("720p,1080p"));
        assert_eq!(pair.yts.get("sort_by"), Some("download_count"));
        assert_eq!(pair.yts.get("limit"), Some("50"));
    }

    #[test]
    fn test_last_added_has_no_sort_override_on_yts() {
        let pair = build(SearchMode::LastAdded, Some("4"), None);

        assert_eq!(pair.popcorn.url(), "http://popcorn.test/movies/4");
        assert_eq!(pair.popcorn.get("sort"), Some("last added"));
        assert_eq!(pair.yts.get("page"), Some("4"));
        assert_eq!(pair.yts.get("quality"), Some("720p,1080p"));
        assert_eq!(pair.yts.get("sort_by"), None);
    }

    #[test]
    fn test_page_propagates_for_paged_modes() {
        for mode in [SearchMode::Popular, SearchMode::LastAdded] {
            for page in [1u64, 3, 17, 250] {
                let raw = page.to_string();
                let pair = build(mode, Some(raw.as_str()), None);
                assert!(pair.popcorn.url().ends_with(&format!("/movies/{}", page)));
                assert_eq!(pair.yts.get("page"), Some(page.to_string().as_str()));
            }
        }
    }

    #[test]
    fn test_search_pins_popcorn_to_page_one() {
        let pair = build(SearchMode::Search, Some("5"), Some(" matrix "));

        assert_eq!(pair.popcorn.url(), "http://popcorn.test/movies/1");
        assert_eq!(pair.popcorn.get("keywords"), Some("matrix"));
        assert_eq!(pair.popcorn.get("sort"), Some("last added"));
        assert_eq!(pair.yts.get("query_term"), Some("matrix"));
        assert_eq!(pair.yts.get("quality"), Some("720p,1080p"));
        assert_eq!(pair.yts.get("page"), None);
    }

    #[test]
    fn test_random_uses_suggestion_endpoint() {
        let pair = build(SearchMode::Random, Some("9"), None);

        assert_eq!(pair.popcorn.url(), "http://popcorn.test/random/movie");
        assert!(pair.popcorn.params().is_empty());
        assert_eq!(pair.yts.url(), "http://yts.test/api/v2/movie_suggestions.json");

        let seed: u32 = pair.yts.get("movie_id").unwrap().parse().unwrap();
        assert!(seed < RANDOM_SEED_UPPER);
    }

    #[test]
    fn test_random_seeds_spread_over_range() {
        let request = AggregateRequest::new(SearchMode::Random, None, None).unwrap();
        let builder = builder();
        let mut rng = rand::thread_rng();

        let seeds: Vec<u32> = (0..2000)
            .map(|_| {
                let pair = builder.build(&request, &mut rng);
                pair.yts.get("movie_id").unwrap().parse().unwrap()
            })
            .collect();

        assert!(seeds.iter().all(|seed| *seed < RANDOM_SEED_UPPER));

        let distinct: HashSet<u32> = seeds.iter().copied().collect();
        assert!(distinct.len() > 1000);

        let min = *seeds.iter().min().unwrap();
        let max = *seeds.iter().max().unwrap();
        assert!(max - min > RANDOM_SEED_UPPER / 2);
    }
}

/// Popcorn Time API provider
///
/// `/movies/{page}` answers with an array of movies, `/random/movie` with a
/// single movie object.
use crate::{
    models::{popcorn::PopcornMovie, MovieRecord, ProviderKind},
    services::{
        providers::{fetch_json, MovieProvider, ProviderError},
        query_builder::{ProviderQuery, SearchMode},
    },
};
use reqwest::Client as HttpClient;
use tracing::instrument;

#[derive(Clone)]
pub struct PopcornProvider {
    http_client: HttpClient,
}

impl PopcornProvider {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait::async_trait]
impl MovieProvider for PopcornProvider {
    #[instrument(skip_all, fields(provider = "popcorn", mode = %query.mode()))]
    async fn fetch_movies(&self, query: &ProviderQuery) -> Result<Vec<MovieRecord>, ProviderError> {
        let records: Vec<MovieRecord> = if query.mode() == SearchMode::Random {
            let movie: PopcornMovie = fetch_json(&self.http_client, query).await?;
            vec![movie.into()]
        } else {
            let movies: Vec<PopcornMovie> = fetch_json(&self.http_client, query).await?;
            movies.into_iter().map(MovieRecord::from).collect()
        };

        tracing::debug!(results = records.len(), "Popcorn query completed");

        Ok(records)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Popcorn
    }
}

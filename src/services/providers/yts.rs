/// YTS API provider
///
/// Both `list_movies.json` and `movie_suggestions.json` wrap their movies in a
/// `{status, data: {movies}}` envelope. An empty result page omits `movies`.
use crate::{
    models::{yts::YtsResponse, MovieRecord, ProviderKind},
    services::{
        providers::{fetch_json, MovieProvider, ProviderError},
        query_builder::ProviderQuery,
    },
};
use reqwest::Client as HttpClient;
use tracing::instrument;

#[derive(Clone)]
pub struct YtsProvider {
    http_client: HttpClient,
}

impl YtsProvider {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    fn convert_response(response: YtsResponse) -> Result<Vec<MovieRecord>, ProviderError> {
        if response.status != "ok" {
            return Err(ProviderError::Malformed(format!(
                "YTS status '{}': {}",
                response.status,
                response.status_message.unwrap_or_default()
            )));
        }

        Ok(response
            .data
            .and_then(|data| data.movies)
            .unwrap_or_default()
            .into_iter()
            .map(MovieRecord::from)
            .collect())
    }
}

#[async_trait::async_trait]
impl MovieProvider for YtsProvider {
    #[instrument(skip_all, fields(provider = "yts", mode = %query.mode()))]
    async fn fetch_movies(&self, query: &ProviderQuery) -> Result<Vec<MovieRecord>, ProviderError> {
        let response: YtsResponse = fetch_json(&self.http_client, query).await?;
        let records = Self::convert_response(response)?;

        tracing::debug!(results = records.len(), "YTS query completed");

        Ok(records)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Yts
    }
}

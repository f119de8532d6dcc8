use serde::{ser::SerializeSeq, Serialize, Serializer};
use std::sync::Arc;

use crate::{
    config::Config,
    models::MovieRecord,
    services::{
        providers::{
            invoke, InvokePolicy, MovieProvider, PopcornProvider, ProviderFailure,
            ProviderOutcome, YtsProvider,
        },
        query_builder::{AggregateRequest, QueryBuilder, SearchMode},
    },
};

/// Records gathered from both providers for one call
///
/// A provider that failed contributes `None`. When both failed the result is
/// empty and serializes as `[]`; otherwise it serializes as the pair
/// `[popcorn, yts]`, with `null` for the failed side.
#[derive(Debug, Default)]
pub struct AggregatedResult {
    popcorn: Option<Vec<MovieRecord>>,
    yts: Option<Vec<MovieRecord>>,
    failures: Vec<ProviderFailure>,
}

impl AggregatedResult {
    pub fn popcorn(&self) -> Option<&[MovieRecord]> {
        self.popcorn.as_deref()
    }

    pub fn yts(&self) -> Option<&[MovieRecord]> {
        self.yts.as_deref()
    }

    /// Provider failures absorbed during the call
    pub fn failures(&self) -> &[ProviderFailure] {
        &self.failures
    }

    /// True only when both providers failed
    pub fn is_empty(&self) -> bool {
        self.popcorn.is_none() && self.yts.is_none()
    }

    /// All records, Popcorn first
    pub fn records(&self) -> impl Iterator<Item = &MovieRecord> {
        self.popcorn
            .iter()
            .chain(self.yts.iter())
            .flat_map(|records| records.iter())
    }
}

impl Serialize for AggregatedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_empty() {
            return serializer.serialize_seq(Some(0))?.end();
        }
        (&self.popcorn, &self.yts).serialize(serializer)
    }
}

/// Reduces the two provider outcomes of one call.
///
/// In `Random` mode Popcorn answers with a single film, so its list never
/// holds more than one record.
pub fn reduce(mode: SearchMode, popcorn: ProviderOutcome, yts: ProviderOutcome) -> AggregatedResult {
    let mut failures = Vec::new();

    let popcorn = match popcorn {
        ProviderOutcome::Records(mut records) => {
            if mode == SearchMode::Random {
                records.truncate(1);
            }
            Some(records)
        }
        ProviderOutcome::Failed(failure) => {
            failures.push(failure);
            None
        }
    };

    let yts = match yts {
        ProviderOutcome::Records(records) => Some(records),
        ProviderOutcome::Failed(failure) => {
            failures.push(failure);
            None
        }
    };

    AggregatedResult {
        popcorn,
        yts,
        failures,
    }
}

/// Queries both movie directories concurrently and merges their outcomes
#[derive(Clone)]
pub struct Aggregator {
    builder: QueryBuilder,
    popcorn: Arc<dyn MovieProvider>,
    yts: Arc<dyn MovieProvider>,
    policy: InvokePolicy,
}

impl Aggregator {
    pub fn new(
        builder: QueryBuilder,
        popcorn: Arc<dyn MovieProvider>,
        yts: Arc<dyn MovieProvider>,
        policy: InvokePolicy,
    ) -> Self {
        Self {
            builder,
            popcorn,
            yts,
            policy,
        }
    }

    /// Creates an aggregator backed by the real Popcorn and YTS APIs
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Self {
        Self::new(
            QueryBuilder::from_config(config),
            Arc::new(PopcornProvider::new(http_client.clone())),
            Arc::new(YtsProvider::new(http_client)),
            InvokePolicy::from_config(config),
        )
    }

    /// Runs one aggregation call.
    ///
    /// Both providers are in flight at the same time; dropping the returned
    /// future cancels both. Provider failures never surface as errors.
    pub async fn aggregate(&self, request: &AggregateRequest) -> AggregatedResult {
        let queries = self.builder.build(request, &mut rand::thread_rng());

        let (popcorn, yts) = tokio::join!(
            invoke(self.popcorn.as_ref(), &queries.popcorn, &self.policy),
            invoke(self.yts.as_ref(), &queries.yts, &self.policy),
        );

        let result = reduce(request.mode(), popcorn, yts);

        if result.is_empty() {
            tracing::debug!(
                mode = %request.mode(),
                page = request.page(),
                "Both providers failed, returning empty result"
            );
        }

        tracing::info!(
            mode = %request.mode(),
            page = request.page(),
            popcorn = result.popcorn().map(<[MovieRecord]>::len),
            yts = result.yts().map(<[MovieRecord]>::len),
            "Aggregation completed"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::ProviderKind,
        services::providers::{MockMovieProvider, ProviderError},
    };
    use std::time::{Duration, Instant};

    const ALL_MODES: [SearchMode; 4] = [
        SearchMode::Popular,
        SearchMode::LastAdded,
        SearchMode::Random,
        SearchMode::Search,
    ];

    fn record(source: ProviderKind, title: &str) -> MovieRecord {
        MovieRecord {
            source,
            imdb_code: None,
            title: title.to_string(),
            year: Some(2001),
            synopsis: None,
            poster: None,
            genres: vec![],
            rating: None,
            torrents: vec![],
        }
    }

    fn failed(provider: ProviderKind) -> ProviderOutcome {
        ProviderOutcome::Failed(ProviderFailure {
            provider,
            error: ProviderError::Status(503),
        })
    }

    fn request(mode: SearchMode) -> AggregateRequest {
        AggregateRequest::new(mode, Some("1"), Some("matrix")).unwrap()
    }

    fn mock_ok(titles: &'static [&'static str], source: ProviderKind) -> Arc<dyn MovieProvider> {
        let mut provider = MockMovieProvider::new();
        provider.expect_kind().return_const(source);
        provider.expect_fetch_movies().returning(move |_| {
            Ok(titles.iter().map(|t| record(source, t)).collect())
        });
        Arc::new(provider)
    }

    fn mock_err(kind: ProviderKind) -> Arc<dyn MovieProvider> {
        let mut provider = MockMovieProvider::new();
        provider.expect_kind().return_const(kind);
        provider
            .expect_fetch_movies()
            .returning(|_| Err(ProviderError::Malformed("<html>".to_string())));
        Arc::new(provider)
    }

    fn aggregator(popcorn: Arc<dyn MovieProvider>, yts: Arc<dyn MovieProvider>) -> Aggregator {
        Aggregator::new(
            QueryBuilder::new("http://popcorn.test", "http://yts.test"),
            popcorn,
            yts,
            InvokePolicy::new(Duration::from_secs(1), 0),
        )
    }

    #[test]
    fn test_reduce_both_failed_is_empty() {
        let result = reduce(
            SearchMode::Popular,
            failed(ProviderKind::Popcorn),
            failed(ProviderKind::Yts),
        );

        assert!(result.is_empty());
        assert_eq!(result.failures().len(), 2);
        assert_eq!(serde_json::to_string(&result).unwrap(), "[]");
    }

    #[test]
    fn test_reduce_only_yts_failed() {
        let result = reduce(
            SearchMode::LastAdded,
            ProviderOutcome::Records(vec![record(ProviderKind::Popcorn, "Heat")]),
            failed(ProviderKind::Yts),
        );

        assert_eq!(result.popcorn().unwrap().len(), 1);
        assert!(result.yts().is_none());
        assert_eq!(result.failures()[0].provider, ProviderKind::Yts);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json[0][0]["title"], "Heat");
        assert!(json[1].is_null());
    }

    #[test]
    fn test_reduce_only_popcorn_failed() {
        let result = reduce(
            SearchMode::Search,
            failed(ProviderKind::Popcorn),
            ProviderOutcome::Records(vec![record(ProviderKind::Yts, "Alien")]),
        );

        assert!(result.popcorn().is_none());
        assert_eq!(result.yts().unwrap()[0].title, "Alien");

        let json = serde_json::to_value(&result).unwrap();
        assert!(json[0].is_null());
        assert_eq!(json[1][0]["title"], "Alien");
    }

    #[test]
    fn test_reduce_random_keeps_single_popcorn_record() {
        let result = reduce(
            SearchMode::Random,
            ProviderOutcome::Records(vec![
                record(ProviderKind::Popcorn, "Heat"),
                record(ProviderKind::Popcorn, "Ronin"),
            ]),
            ProviderOutcome::Records(vec![
                record(ProviderKind::Yts, "Alien"),
                record(ProviderKind::Yts, "Aliens"),
            ]),
        );

        assert_eq!(result.popcorn().unwrap().len(), 1);
        assert_eq!(result.yts().unwrap().len(), 2);
        assert_eq!(result.records().count(), 3);
    }

    #[test]
    fn test_reduce_empty_lists_are_not_failures() {
        let result = reduce(
            SearchMode::Search,
            ProviderOutcome::Records(vec![]),
            ProviderOutcome::Records(vec![]),
        );

        assert!(!result.is_empty());
        assert_eq!(serde_json::to_string(&result).unwrap(), "[[],[]]");
    }

    #[tokio::test]
    async fn test_popcorn_failure_yields_yts_only_for_all_modes() {
        let aggregator = aggregator(
            mock_err(ProviderKind::Popcorn),
            mock_ok(&["Alien"], ProviderKind::Yts),
        );

        for mode in ALL_MODES {
            let result = aggregator.aggregate(&request(mode)).await;
            assert!(result.popcorn().is_none(), "mode {}", mode);
            assert_eq!(result.yts().unwrap()[0].title, "Alien", "mode {}", mode);
        }
    }

    #[tokio::test]
    async fn test_both_failing_yields_empty_for_all_modes() {
        let aggregator = aggregator(mock_err(ProviderKind::Popcorn), mock_err(ProviderKind::Yts));

        for mode in ALL_MODES {
            let result = aggregator.aggregate(&request(mode)).await;
            assert!(result.is_empty(), "mode {}", mode);
        }
    }

    #[tokio::test]
    async fn test_random_mode_popcorn_list_has_one_element() {
        let aggregator = aggregator(
            mock_ok(&["Heat"], ProviderKind::Popcorn),
            mock_ok(&["Alien", "Aliens", "Prometheus"], ProviderKind::Yts),
        );

        let result = aggregator.aggregate(&request(SearchMode::Random)).await;
        assert_eq!(result.popcorn().unwrap().len(), 1);
        assert_eq!(result.yts().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_providers_receive_their_own_query() {
        let mut popcorn = MockMovieProvider::new();
        popcorn.expect_kind().return_const(ProviderKind::Popcorn);
        popcorn
            .expect_fetch_movies()
            .withf(|q| q.provider() == ProviderKind::Popcorn && q.get("keywords") == Some("matrix"))
            .times(1)
            .returning(|_| Ok(vec![]));
        let mut yts = MockMovieProvider::new();
        yts.expect_kind().return_const(ProviderKind::Yts);
        yts.expect_fetch_movies()
            .withf(|q| q.provider() == ProviderKind::Yts && q.get("query_term") == Some("matrix"))
            .times(1)
            .returning(|_| Ok(vec![]));

        let aggregator = aggregator(Arc::new(popcorn), Arc::new(yts));
        let result = aggregator.aggregate(&request(SearchMode::Search)).await;
        assert!(result.failures().is_empty());
    }

    struct SlowProvider {
        delay: Duration,
        kind: ProviderKind,
    }

    #[async_trait::async_trait]
    impl MovieProvider for SlowProvider {
        async fn fetch_movies(
            &self,
            _query: &crate::services::query_builder::ProviderQuery,
        ) -> Result<Vec<MovieRecord>, ProviderError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![record(self.kind, "Slow")])
        }

        fn kind(&self) -> ProviderKind {
            self.kind
        }
    }

    #[tokio::test]
    async fn test_providers_run_concurrently() {
        let delay = Duration::from_millis(200);
        let aggregator = aggregator(
            Arc::new(SlowProvider {
                delay,
                kind: ProviderKind::Popcorn,
            }),
            Arc::new(SlowProvider {
                delay,
                kind: ProviderKind::Yts,
            }),
        );

        let start = Instant::now();
        let result = aggregator.aggregate(&request(SearchMode::Popular)).await;
        let elapsed = start.elapsed();

        assert_eq!(result.records().count(), 2);
        assert!(
            elapsed < delay.mul_f32(1.5),
            "aggregation took {:?}, expected concurrent execution",
            elapsed
        );
    }
}

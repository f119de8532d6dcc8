pub mod aggregator;
pub mod catalog;
pub mod providers;
pub mod query_builder;
pub mod translate;

pub use aggregator::{AggregatedResult, Aggregator};
pub use query_builder::{AggregateRequest, QueryBuilder, SearchMode};
pub use translate::Translator;

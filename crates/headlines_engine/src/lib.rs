//! Headlines engine: query bridging, debouncing and the async search pipeline.
mod bridge;
mod debounce;
mod pipeline;
mod scheduler;
mod search;
mod types;

pub use bridge::{QueryBridge, QueryStream, SearchHost, SearchResultProvider};
pub use debounce::{debounce, Debounce};
pub use pipeline::SearchPresenter;
pub use scheduler::Schedulers;
pub use search::{BatchSink, FeedlySearchService, SearchService, ServiceSettings};
pub use types::{SearchError, SearchFailureKind};

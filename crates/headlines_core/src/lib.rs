//! Headlines core: presenter lifecycle, subscription tracking and the search
//! result model. Nothing in this crate depends on an async runtime.
mod model;
mod normalize;
mod operation;
mod presenter;
mod query;
mod registry;
mod settings;
mod view;

pub use model::{CardKind, FeedItem, SearchResponse, SearchResultItem};
pub use normalize::{
    feed_url, format_timestamp, normalize_feed_item, normalize_response, stable_id,
    FEED_RESOURCE_ID_PREFIX,
};
pub use operation::{Operation, OperationId, OperationState};
pub use presenter::{Presenter, PresenterError};
pub use query::accepts_query;
pub use registry::SubscriptionRegistry;
pub use settings::SearchSettings;
pub use view::SearchView;

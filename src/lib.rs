//! In-memory cache of code lists and their versioned code values.
//!
//! Readers always see one complete snapshot. Refreshes are staged and
//! published atomically, and a lookup that misses reloads the list once.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{CodeListSource, SourceCodeList, SourceItem};
pub use application::services::{
    CodeListQueryService, CodeListService, CodeValueSearch, PropertyFilter,
};
pub use domain::{
    CodeListId, CodeListKey, CodeListMeta, CodeValue, CodeValueIndex, CodeValueProperty,
    DateRange, MatchMode, PropertyValue, StatusCode,
};
pub use infrastructure::{CodeListStore, JsonFileSource, RefreshController, Snapshot};
pub use shared::{AppError, CacheConfig};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when it is set.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

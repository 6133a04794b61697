pub mod cache;
pub mod source;

pub use cache::{CacheEntry, CodeListStore, RefreshController, Snapshot};
pub use source::JsonFileSource;

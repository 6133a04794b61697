pub mod code_list_store;
pub mod refresh_controller;
pub mod snapshot;

pub use code_list_store::CodeListStore;
pub use refresh_controller::RefreshController;
pub use snapshot::{CacheEntry, Snapshot};

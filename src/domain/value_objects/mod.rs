pub mod code_list_id;
pub mod match_mode;
pub mod property;
pub mod status_code;
pub mod validity;

pub use code_list_id::CodeListId;
pub use match_mode::MatchMode;
pub use property::{CodeValueProperty, PropertyValue};
pub use status_code::StatusCode;
pub use validity::DateRange;

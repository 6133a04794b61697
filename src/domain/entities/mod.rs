pub mod code_list;
pub mod code_value;
pub mod code_value_index;

pub use code_list::{CodeListKey, CodeListMeta};
pub use code_value::CodeValue;
pub use code_value_index::{CodeValueIndex, VersionGroup, active_value};

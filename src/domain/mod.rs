pub mod entities;
pub mod value_objects;

pub use entities::{CodeListKey, CodeListMeta, CodeValue, CodeValueIndex, VersionGroup};
pub use value_objects::{
    CodeListId, CodeValueProperty, DateRange, MatchMode, PropertyValue, StatusCode,
};

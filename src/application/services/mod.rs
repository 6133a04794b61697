pub mod code_list_query_service;
pub mod code_list_service;

pub use code_list_query_service::{
    CodeListQueryService, extract_property, has_property_value, sort_by,
};
pub use code_list_service::{CodeListService, CodeValueSearch, PropertyFilter};

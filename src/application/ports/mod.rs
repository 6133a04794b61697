pub mod code_list_source;

pub use code_list_source::{CodeListSource, SourceCodeList, SourceItem};

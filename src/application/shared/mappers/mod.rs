pub(crate) mod code_lists;

pub(crate) use code_lists::{extend_index, map_code_list_id, map_code_list_meta};

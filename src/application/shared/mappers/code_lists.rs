use crate::application::ports::{SourceCodeList, SourceItem};
use crate::domain::entities::{CodeListMeta, CodeValue, CodeValueIndex};
use crate::domain::value_objects::{CodeListId, StatusCode};

/// Resolves the cache id of a source list; `None` for a missing or unsupported number.
pub(crate) fn map_code_list_id(list: &SourceCodeList) -> Option<CodeListId> {
    list.id.and_then(|id| CodeListId::try_from(id).ok())
}

pub(crate) fn map_code_list_meta(list: &SourceCodeList) -> CodeListMeta {
    CodeListMeta {
        description: list.description.clone(),
        extra1: list.extra1.clone(),
        extra2: list.extra2.clone(),
        extra3: list.extra3.clone(),
        master_code_list: list.master_code_list.clone(),
        comment: list.comment.clone(),
        display_type: list.display_type.clone(),
    }
}

pub(crate) fn map_source_item(list_id: CodeListId, item: &SourceItem) -> CodeValue {
    CodeValue {
        list_id,
        value_code: item.value.clone(),
        description: item.description.clone(),
        extra1: item.extra1.clone(),
        extra2: item.extra2.clone(),
        extra3: item.extra3.clone(),
        comment: item.comment.clone(),
        master_value: item.master_value.clone(),
        status_code: item.status_code.as_deref().map(map_status_code),
        valid_from: item.valid_from,
        valid_to: item.valid_to,
    }
}

/// Appends every item of `list` to `index`, preserving source order.
pub(crate) fn extend_index(index: &mut CodeValueIndex, list_id: CodeListId, list: &SourceCodeList) {
    for item in &list.items {
        index.push(map_source_item(list_id, item));
    }
}

// Only the exact `INACTIVE` code disables a value; anything else stays active.
fn map_status_code(raw: &str) -> StatusCode {
    if raw == StatusCode::Inactive.as_str() {
        StatusCode::Inactive
    } else {
        StatusCode::Active
    }
}

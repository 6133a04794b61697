use crate::domain::value_objects::CodeListId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

/// Metadata of a code list, copied from the source when the list is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeListMeta {
    pub description: Option<String>,
    pub extra1: Option<String>,
    pub extra2: Option<String>,
    pub extra3: Option<String>,
    pub master_code_list: Option<String>,
    pub comment: Option<String>,
    pub display_type: Option<String>,
}

/// Cache slot identity of a code list.
///
/// Equality and hashing only look at `list_id`; two keys with different
/// metadata for the same id address the same slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeListKey {
    pub list_id: CodeListId,
    pub meta: CodeListMeta,
}

impl CodeListKey {
    pub fn new(list_id: CodeListId, meta: CodeListMeta) -> Self {
        Self { list_id, meta }
    }

    pub fn bare(list_id: CodeListId) -> Self {
        Self::new(list_id, CodeListMeta::default())
    }
}

impl PartialEq for CodeListKey {
    fn eq(&self, other: &Self) -> bool {
        self.list_id == other.list_id
    }
}

impl Eq for CodeListKey {}

impl Hash for CodeListKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.list_id.hash(state);
    }
}

// Lets maps keyed by `CodeListKey` be queried with a plain id.
impl Borrow<CodeListId> for CodeListKey {
    fn borrow(&self) -> &CodeListId {
        &self.list_id
    }
}

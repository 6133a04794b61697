use crate::domain::entities::{CodeListKey, CodeValueIndex};
use crate::domain::value_objects::CodeListId;
use std::collections::HashMap;
use std::sync::Arc;

/// One code list as served by the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CodeListKey,
    pub values: Arc<CodeValueIndex>,
}

/// `CodeListKey -> CodeValueIndex` mapping that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: HashMap<CodeListKey, Arc<CodeValueIndex>>,
    order: Vec<CodeListId>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or overwrites a list.
    ///
    /// An overwritten list keeps its position but takes the new key, so the
    /// newer metadata wins.
    pub fn insert(&mut self, key: CodeListKey, values: impl Into<Arc<CodeValueIndex>>) {
        if self.entries.remove(&key.list_id).is_none() {
            self.order.push(key.list_id);
        }
        self.entries.insert(key, values.into());
    }

    pub fn get(&self, list_id: CodeListId) -> Option<CacheEntry> {
        self.entries
            .get_key_value(&list_id)
            .map(|(key, values)| CacheEntry {
                key: key.clone(),
                values: Arc::clone(values),
            })
    }

    pub fn contains(&self, list_id: CodeListId) -> bool {
        self.entries.contains_key(&list_id)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &CodeListKey> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get_key_value(id).map(|(key, _)| key))
    }

    pub fn ids(&self) -> impl Iterator<Item = CodeListId> + '_ {
        self.order.iter().copied()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = CacheEntry> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Overwrites every list present in `other`; lists absent from it are left alone.
    pub fn merge(&mut self, other: Snapshot) {
        let Snapshot { mut entries, order } = other;
        for id in order {
            if let Some((key, values)) = entries.remove_entry(&id) {
                self.insert(key, values);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CodeListMeta, CodeValue};

    fn index(codes: &[&str]) -> CodeValueIndex {
        codes
            .iter()
            .map(|code| CodeValue {
                value_code: code.to_string(),
                ..CodeValue::default()
            })
            .collect()
    }

    fn key(id: i32, description: &str) -> CodeListKey {
        CodeListKey::new(
            CodeListId::new(id),
            CodeListMeta {
                description: Some(description.to_string()),
                ..CodeListMeta::default()
            },
        )
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(key(3, "c"), index(&["A"]));
        snapshot.insert(key(1, "a"), index(&["B"]));
        snapshot.insert(key(2, "b"), index(&["C"]));

        let ids: Vec<i32> = snapshot.keys().map(|k| k.list_id.value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn overwrite_keeps_position_and_takes_new_metadata() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(key(1, "old"), index(&["A"]));
        snapshot.insert(key(2, "other"), index(&["B"]));
        snapshot.insert(key(1, "new"), index(&["A", "Z"]));

        let ids: Vec<i32> = snapshot.ids().map(CodeListId::value).collect();
        assert_eq!(ids, vec![1, 2]);
        let entry = snapshot.get(CodeListId::new(1)).unwrap();
        assert_eq!(entry.key.meta.description.as_deref(), Some("new"));
        assert_eq!(entry.values.len(), 2);
    }

    #[test]
    fn merge_preserves_untouched_lists() {
        let mut live = Snapshot::new();
        live.insert(key(1, "one"), index(&["A"]));
        live.insert(key(2, "two"), index(&["B"]));
        let untouched = live.get(CodeListId::new(2)).unwrap();

        let mut partial = Snapshot::new();
        partial.insert(key(1, "one'"), index(&["A", "C"]));
        partial.insert(key(5, "five"), index(&["E"]));
        live.merge(partial);

        assert_eq!(live.len(), 3);
        let two = live.get(CodeListId::new(2)).unwrap();
        assert!(Arc::ptr_eq(&two.values, &untouched.values));
        assert_eq!(live.get(CodeListId::new(1)).unwrap().values.len(), 2);
        let ids: Vec<i32> = live.ids().map(CodeListId::value).collect();
        assert_eq!(ids, vec![1, 2, 5]);
    }
}

use super::CodeValue;
use std::collections::HashMap;

/// All versions of one code, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGroup {
    pub code: String,
    pub versions: Vec<CodeValue>,
}

impl VersionGroup {
    pub fn active(&self) -> Option<&CodeValue> {
        active_value(&self.versions)
    }
}

/// Code value index of one list: `value_code -> versions`, groups kept in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeValueIndex {
    groups: Vec<VersionGroup>,
    positions: HashMap<String, usize>,
}

impl CodeValueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            groups: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Appends a version to its code's group, creating the group on first sight.
    pub fn push(&mut self, value: CodeValue) {
        match self.positions.get(&value.value_code) {
            Some(&position) => self.groups[position].versions.push(value),
            None => {
                self.positions
                    .insert(value.value_code.clone(), self.groups.len());
                self.groups.push(VersionGroup {
                    code: value.value_code.clone(),
                    versions: vec![value],
                });
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&[CodeValue]> {
        self.positions
            .get(code)
            .map(|&position| self.groups[position].versions.as_slice())
    }

    pub fn groups(&self) -> impl Iterator<Item = &VersionGroup> {
        self.groups.iter()
    }

    /// Every version of every code, groups in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &CodeValue> {
        self.groups.iter().flat_map(|group| group.versions.iter())
    }

    pub fn active_values(&self) -> impl Iterator<Item = &CodeValue> {
        self.groups.iter().filter_map(VersionGroup::active)
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn value_count(&self) -> usize {
        self.groups.iter().map(|group| group.versions.len()).sum()
    }
}

impl FromIterator<CodeValue> for CodeValueIndex {
    fn from_iter<I: IntoIterator<Item = CodeValue>>(iter: I) -> Self {
        let mut index = CodeValueIndex::new();
        for value in iter {
            index.push(value);
        }
        index
    }
}

/// First version in order whose status is not inactive.
pub fn active_value(versions: &[CodeValue]) -> Option<&CodeValue> {
    versions.iter().find(|value| value.is_active())
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CodeListId(i32);

impl CodeListId {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CodeListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for CodeListId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<CodeListId> for i64 {
    fn from(id: CodeListId) -> Self {
        i64::from(id.0)
    }
}

impl TryFrom<i64> for CodeListId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i32::try_from(value)
            .map(Self)
            .map_err(|_| format!("Unsupported code list number: {value}"))
    }
}

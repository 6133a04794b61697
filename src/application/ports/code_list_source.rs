use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Code list as delivered by the administration source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceCodeList {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub extra1: Option<String>,
    pub extra2: Option<String>,
    pub extra3: Option<String>,
    pub master_code_list: Option<String>,
    pub comment: Option<String>,
    pub display_type: Option<String>,
    pub items: Vec<SourceItem>,
}

/// One code value record of a [`SourceCodeList`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceItem {
    pub value: String,
    pub description: Option<String>,
    pub extra1: Option<String>,
    pub extra2: Option<String>,
    pub extra3: Option<String>,
    pub comment: Option<String>,
    pub master_value: Option<String>,
    pub status_code: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub code_list_number: Option<i64>,
}

/// 外部のコードリスト管理サービスへのポート
///
/// Failures are returned as [`AppError::Source`] and passed through the cache
/// untouched.
#[async_trait]
pub trait CodeListSource: Send + Sync {
    async fn fetch_all_code_lists(&self) -> Result<Vec<SourceCodeList>, AppError>;

    /// An unknown id yields an empty vector, not an error.
    async fn fetch_code_list_by_id(&self, id: i64) -> Result<Vec<SourceCodeList>, AppError>;
}

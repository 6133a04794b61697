use crate::application::ports::{CodeListSource, SourceCodeList};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serves code lists from a JSON file holding an array of lists.
///
/// The file is read on every fetch, so edits show up on the next reload.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_lists(&self) -> Result<Vec<SourceCodeList>, AppError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Source(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        let lists: Vec<SourceCodeList> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Source(format!("Failed to parse {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), lists = lists.len(), "Read code list file");
        Ok(lists)
    }
}

#[async_trait]
impl CodeListSource for JsonFileSource {
    async fn fetch_all_code_lists(&self) -> Result<Vec<SourceCodeList>, AppError> {
        self.read_lists().await
    }

    async fn fetch_code_list_by_id(&self, id: i64) -> Result<Vec<SourceCodeList>, AppError> {
        let lists = self.read_lists().await?;
        Ok(lists
            .into_iter()
            .filter(|list| list.id == Some(id))
            .collect())
    }
}

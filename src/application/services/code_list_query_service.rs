use crate::application::ports::CodeListSource;
use crate::domain::entities::{CodeListKey, CodeValue, CodeValueIndex, active_value};
use crate::domain::value_objects::{CodeListId, CodeValueProperty, MatchMode};
use crate::infrastructure::cache::{CacheEntry, CodeListStore, RefreshController};
use crate::shared::config::CacheConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

/// Read side of the code list cache.
///
/// Lookups go to the live snapshot; a list that is missing or empty is
/// reloaded from the source once and read again.
pub struct CodeListQueryService {
    store: Arc<CodeListStore>,
    refresher: Arc<RefreshController>,
    lazy_init: bool,
}

impl CodeListQueryService {
    pub fn new(source: Arc<dyn CodeListSource>, config: &CacheConfig) -> Self {
        let store = Arc::new(CodeListStore::new());
        let refresher = Arc::new(RefreshController::new(
            source,
            Arc::clone(&store),
            config.refresh.clone(),
        ));
        Self::with_refresher(refresher, config.refresh.lazy_init)
    }

    pub fn with_refresher(refresher: Arc<RefreshController>, lazy_init: bool) -> Self {
        Self {
            store: Arc::clone(refresher.store()),
            refresher,
            lazy_init,
        }
    }

    pub fn store(&self) -> &Arc<CodeListStore> {
        &self.store
    }

    pub fn refresher(&self) -> &Arc<RefreshController> {
        &self.refresher
    }

    /// Loads every list up front unless lazy initialization is configured.
    pub async fn initialize(&self) -> Result<(), AppError> {
        if self.lazy_init {
            info!("Lazy code list initialization, lists load on first use");
            return Ok(());
        }
        self.refresher.full_reload().await
    }

    pub async fn full_reload(&self) -> Result<(), AppError> {
        self.refresher.full_reload().await
    }

    pub async fn partial_reload(&self, ids: &[CodeListId]) -> Result<(), AppError> {
        self.refresher.partial_reload(ids).await
    }

    pub async fn commit(&self) -> bool {
        self.refresher.commit().await
    }

    /// Code value index of a list, empty when the source does not know the id.
    pub async fn get_entry(
        &self,
        list_id: impl Into<CodeListId>,
    ) -> Result<Arc<CodeValueIndex>, AppError> {
        Ok(self
            .load_entry(list_id.into())
            .await?
            .map(|entry| entry.values)
            .unwrap_or_default())
    }

    /// Metadata of a list, reloading it on a miss like `get_entry`.
    pub async fn get_code_list(
        &self,
        list_id: impl Into<CodeListId>,
    ) -> Result<Option<CodeListKey>, AppError> {
        Ok(self.load_entry(list_id.into()).await?.map(|entry| entry.key))
    }

    /// Metadata of every cached list in load order. Never triggers a reload.
    pub async fn get_all_code_lists(&self) -> Vec<CodeListKey> {
        self.store.get_all_keys().await
    }

    /// Values of the requested codes: the active version of each code, or
    /// every version when `active_only` is false.
    pub async fn get_values<I, S>(
        &self,
        list_id: impl Into<CodeListId>,
        codes: I,
        active_only: bool,
    ) -> Result<Vec<CodeValue>, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = self.get_entry(list_id).await?;
        let mut result = Vec::new();
        for code in codes {
            let Some(versions) = index.get(code.as_ref()) else {
                continue;
            };
            if active_only {
                result.extend(active_value(versions).cloned());
            } else {
                result.extend_from_slice(versions);
            }
        }
        Ok(result)
    }

    pub async fn get_value(
        &self,
        list_id: impl Into<CodeListId>,
        code: &str,
        active_only: bool,
    ) -> Result<Vec<CodeValue>, AppError> {
        self.get_values(list_id, [code], active_only).await
    }

    pub async fn get_all_values(
        &self,
        list_id: impl Into<CodeListId>,
        active_only: bool,
    ) -> Result<Vec<CodeValue>, AppError> {
        let index = self.get_entry(list_id).await?;
        let values: Vec<CodeValue> = if active_only {
            index.active_values().cloned().collect()
        } else {
            index.values().cloned().collect()
        };
        Ok(values)
    }

    /// String form of one property of the active version of `code`.
    pub async fn get_value_property(
        &self,
        list_id: impl Into<CodeListId>,
        code: &str,
        property: CodeValueProperty,
    ) -> Result<Option<String>, AppError> {
        let index = self.get_entry(list_id).await?;
        Ok(index
            .get(code)
            .and_then(active_value)
            .and_then(|value| property.get_string(value)))
    }

    /// Linear scan comparing `property` of each candidate with `match_value`.
    pub async fn find_by_property(
        &self,
        list_id: impl Into<CodeListId>,
        property: CodeValueProperty,
        match_value: Option<&str>,
        match_mode: MatchMode,
        active_only: bool,
    ) -> Result<Vec<CodeValue>, AppError> {
        let index = self.get_entry(list_id).await?;
        let matches =
            |value: &&CodeValue| has_property_value(value, property, match_value, match_mode);
        let result: Vec<CodeValue> = if active_only {
            index.active_values().filter(matches).cloned().collect()
        } else {
            index.values().filter(matches).cloned().collect()
        };
        Ok(result)
    }

    /// Active values whose description contains `substring`.
    pub async fn find_by_description_contains(
        &self,
        list_id: impl Into<CodeListId>,
        substring: &str,
    ) -> Result<Vec<CodeValue>, AppError> {
        self.find_by_property(
            list_id,
            CodeValueProperty::Description,
            Some(substring),
            MatchMode::Anywhere,
            true,
        )
        .await
    }

    /// Active values whose second extra field contains `substring`.
    pub async fn find_by_extra2_contains(
        &self,
        list_id: impl Into<CodeListId>,
        substring: &str,
    ) -> Result<Vec<CodeValue>, AppError> {
        self.find_by_property(
            list_id,
            CodeValueProperty::Extra2,
            Some(substring),
            MatchMode::Anywhere,
            true,
        )
        .await
    }

    async fn load_entry(&self, list_id: CodeListId) -> Result<Option<CacheEntry>, AppError> {
        if let Some(entry) = self.store.get(list_id).await {
            if !entry.values.is_empty() {
                return Ok(Some(entry));
            }
        }

        debug!(list_id = %list_id, "Code list cache miss, reloading");
        self.refresher.reload(&[list_id]).await?;
        Ok(self.store.get(list_id).await)
    }
}

/// Whether `property` of `value` matches `match_value` under `match_mode`.
pub fn has_property_value(
    value: &CodeValue,
    property: CodeValueProperty,
    match_value: Option<&str>,
    match_mode: MatchMode,
) -> bool {
    let candidate = property.get_string(value);
    match_mode.matches_optional(candidate.as_deref(), match_value)
}

/// Stable sort by `property`; values without it always end up last.
pub fn sort_by(items: &mut [CodeValue], property: CodeValueProperty, ascending: bool) {
    items.sort_by(|a, b| property.compare(a, b, ascending));
}

/// String forms of `property` over `values`, absent ones skipped.
pub fn extract_property(values: &[CodeValue], property: CodeValueProperty) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| property.get_string(value))
        .collect()
}

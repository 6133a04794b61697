use super::code_list_query_service::{
    CodeListQueryService, extract_property, has_property_value, sort_by,
};
use crate::domain::entities::CodeValue;
use crate::domain::value_objects::{
    CodeListId, CodeValueProperty, DateRange, MatchMode, validity,
};
use crate::shared::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Condition on one property used by [`CodeListService::search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub property: CodeValueProperty,
    pub values: Vec<String>,
    /// `None` compares for exact membership in `values`.
    pub match_mode: Option<MatchMode>,
    /// Keep matching values when `true`, drop them when `false`.
    pub include: bool,
    /// One matching entry of `values` is enough when `true`; otherwise all must match.
    pub any: bool,
}

impl PropertyFilter {
    pub fn including(
        property: CodeValueProperty,
        values: Vec<String>,
        match_mode: MatchMode,
    ) -> Self {
        Self {
            property,
            values,
            match_mode: Some(match_mode),
            include: true,
            any: true,
        }
    }

    pub fn accepts(&self, value: &CodeValue) -> bool {
        if self.values.is_empty() {
            return true;
        }

        let hit = match self.match_mode {
            Some(mode) => {
                let is_hit = |pattern: &String| {
                    has_property_value(value, self.property, Some(pattern.as_str()), mode)
                };
                if self.any {
                    self.values.iter().any(is_hit)
                } else {
                    self.values.iter().all(is_hit)
                }
            }
            None => self
                .property
                .get_string(value)
                .is_some_and(|current| self.values.contains(&current)),
        };

        hit == self.include
    }
}

/// Criteria for a search across several lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeValueSearch {
    pub list_ids: Vec<CodeListId>,
    /// Only search lists whose master list equals this one.
    pub master_list: Option<String>,
    pub filters: Vec<PropertyFilter>,
    pub validity: DateRange,
    pub order_by: Option<CodeValueProperty>,
    pub ascending: bool,
}

/// Date-aware lookups over the code list cache.
pub struct CodeListService {
    queries: Arc<CodeListQueryService>,
}

impl CodeListService {
    pub fn new(queries: Arc<CodeListQueryService>) -> Self {
        Self { queries }
    }

    pub fn queries(&self) -> &Arc<CodeListQueryService> {
        &self.queries
    }

    /// Every version valid on `date` (today when `None`).
    pub async fn values_as_of(
        &self,
        list_id: impl Into<CodeListId>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<CodeValue>, AppError> {
        let date = date.unwrap_or_else(validity::today);
        let values = self.queries.get_all_values(list_id, false).await?;
        Ok(values.into_iter().filter(|v| v.is_valid_on(date)).collect())
    }

    pub async fn values_in_range(
        &self,
        list_id: impl Into<CodeListId>,
        range: DateRange,
    ) -> Result<Vec<CodeValue>, AppError> {
        let values = self.queries.get_all_values(list_id, false).await?;
        Ok(values.into_iter().filter(|v| v.is_valid_in(&range)).collect())
    }

    /// First version of `code` valid on `date` (today when `None`).
    pub async fn value_as_of(
        &self,
        list_id: impl Into<CodeListId>,
        code: &str,
        date: Option<NaiveDate>,
    ) -> Result<Option<CodeValue>, AppError> {
        let date = date.unwrap_or_else(validity::today);
        let versions = self.queries.get_value(list_id, code, false).await?;
        Ok(versions.into_iter().find(|v| v.is_valid_on(date)))
    }

    pub async fn is_valid_code(
        &self,
        list_id: impl Into<CodeListId>,
        code: &str,
        date: Option<NaiveDate>,
    ) -> Result<bool, AppError> {
        if code.is_empty() {
            return Ok(false);
        }
        let found = self.value_as_of(list_id, code, date).await?;
        Ok(found.is_some_and(|value| value.value_code == code))
    }

    /// Codes from `codes` that have no version valid today.
    pub async fn filter_invalid_codes(
        &self,
        list_id: impl Into<CodeListId>,
        codes: &HashSet<String>,
    ) -> Result<HashSet<String>, AppError> {
        let mut invalid = codes.clone();
        if codes.is_empty() {
            return Ok(invalid);
        }
        let today = validity::today();
        let values = self.queries.get_values(list_id, codes, false).await?;
        for value in values.iter().filter(|v| v.is_valid_on(today)) {
            invalid.remove(&value.value_code);
        }
        Ok(invalid)
    }

    /// Active versions of the given codes.
    pub async fn filter_active_codes(
        &self,
        list_id: impl Into<CodeListId>,
        codes: &[String],
    ) -> Result<Vec<CodeValue>, AppError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        self.queries.get_values(list_id, codes, true).await
    }

    /// `code -> description` for versions valid on `date`, in list order.
    pub async fn code_description_mapping(
        &self,
        list_id: impl Into<CodeListId>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<(String, Option<String>)>, AppError> {
        let values = self.values_as_of(list_id, date).await?;
        let mut seen = HashSet::new();
        Ok(values
            .into_iter()
            .filter(|v| seen.insert(v.value_code.clone()))
            .map(|v| (v.value_code, v.description))
            .collect())
    }

    /// Code of the first version, active or not, whose `property` contains `needle`.
    pub async fn find_code_by_property(
        &self,
        list_id: impl Into<CodeListId>,
        property: CodeValueProperty,
        needle: &str,
    ) -> Result<Option<String>, AppError> {
        let needle = escape(needle);
        let found = self
            .queries
            .find_by_property(list_id, property, Some(&needle), MatchMode::Anywhere, false)
            .await?;
        Ok(found.into_iter().next().map(|value| value.value_code))
    }

    /// First version of `code` valid somewhere in `range`.
    pub async fn value_in_range(
        &self,
        list_id: impl Into<CodeListId>,
        code: &str,
        range: DateRange,
    ) -> Result<Option<CodeValue>, AppError> {
        let versions = self.queries.get_value(list_id, code, false).await?;
        Ok(versions.into_iter().find(|v| v.is_valid_in(&range)))
    }

    /// First active value pointing at `master_value` in its master list.
    pub async fn master_value(
        &self,
        list_id: impl Into<CodeListId>,
        master_value: &str,
    ) -> Result<Option<CodeValue>, AppError> {
        let found = self
            .queries
            .find_by_property(
                list_id,
                CodeValueProperty::MasterValue,
                Some(master_value),
                MatchMode::Exact,
                true,
            )
            .await?;
        Ok(found.into_iter().next())
    }

    pub async fn item_description(
        &self,
        list_id: impl Into<CodeListId>,
        code: &str,
    ) -> Result<Option<String>, AppError> {
        self.queries
            .get_value_property(list_id, code, CodeValueProperty::Description)
            .await
    }

    /// `extra1` of the version of `code` valid on `date`, or of the list
    /// itself when no code is given.
    pub async fn extra(
        &self,
        list_id: impl Into<CodeListId>,
        code: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<Option<String>, AppError> {
        let list_id = list_id.into();
        match code {
            Some(code) => Ok(self
                .value_as_of(list_id, code, date)
                .await?
                .and_then(|value| value.extra1)),
            None => self.list_extra(list_id).await,
        }
    }

    pub async fn extra_in_range(
        &self,
        list_id: impl Into<CodeListId>,
        code: Option<&str>,
        range: DateRange,
    ) -> Result<Option<String>, AppError> {
        let list_id = list_id.into();
        match code {
            Some(code) => Ok(self
                .value_in_range(list_id, code, range)
                .await?
                .and_then(|value| value.extra1)),
            None => self.list_extra(list_id).await,
        }
    }

    /// Distinct codes with a version valid on `date`, in list order.
    pub async fn codes_as_of(
        &self,
        list_id: impl Into<CodeListId>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<String>, AppError> {
        Ok(distinct_codes(self.values_as_of(list_id, date).await?))
    }

    pub async fn codes_in_range(
        &self,
        list_id: impl Into<CodeListId>,
        range: DateRange,
    ) -> Result<Vec<String>, AppError> {
        Ok(distinct_codes(self.values_in_range(list_id, range).await?))
    }

    /// Codes of active values whose `extra2` contains `needle`.
    pub async fn codes_with_extra2_containing(
        &self,
        list_id: impl Into<CodeListId>,
        needle: &str,
    ) -> Result<Vec<String>, AppError> {
        let found = self.queries.find_by_extra2_contains(list_id, needle).await?;
        Ok(extract_property(&found, CodeValueProperty::Value))
    }

    /// `code -> extra2 tokens` for active values, `extra2` split on commas
    /// and whitespace. Values without `extra2` are left out.
    pub async fn value_extra2_mapping(
        &self,
        list_id: impl Into<CodeListId>,
    ) -> Result<Vec<(String, HashSet<String>)>, AppError> {
        let values = self.queries.get_all_values(list_id, true).await?;
        Ok(values
            .into_iter()
            .filter_map(|value| {
                let extra2 = value.extra2.filter(|extra2| !extra2.is_empty())?;
                let tokens: HashSet<String> = extra2
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect();
                Some((value.value_code, tokens))
            })
            .collect())
    }

    pub async fn search(&self, criteria: &CodeValueSearch) -> Result<Vec<CodeValue>, AppError> {
        let mut candidates = Vec::new();
        for &list_id in &criteria.list_ids {
            if let Some(master) = &criteria.master_list {
                let key = self.queries.get_code_list(list_id).await?;
                let matches_master = key
                    .as_ref()
                    .and_then(|k| k.meta.master_code_list.as_ref())
                    .is_some_and(|m| m == master);
                if !matches_master {
                    continue;
                }
            }
            candidates.extend(self.queries.get_all_values(list_id, false).await?);
        }

        let mut result: Vec<CodeValue> = candidates
            .into_iter()
            .filter(|value| criteria.filters.iter().all(|f| f.accepts(value)))
            .filter(|value| value.is_valid_in(&criteria.validity))
            .collect();

        if let Some(property) = criteria.order_by {
            sort_by(&mut result, property, criteria.ascending);
        }
        debug!(
            lists = criteria.list_ids.len(),
            hits = result.len(),
            "Code value search finished"
        );
        Ok(result)
    }

    async fn list_extra(&self, list_id: CodeListId) -> Result<Option<String>, AppError> {
        Ok(self
            .queries
            .get_code_list(list_id)
            .await?
            .and_then(|key| key.meta.extra1))
    }
}

fn distinct_codes(values: Vec<CodeValue>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|value| value.value_code)
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

// Wildcard characters of the source's query language are not meaningful here.
fn escape(value: &str) -> String {
    value.replace(['%', ';'], "")
}

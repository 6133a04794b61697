use crate::domain::value_objects::{CodeListId, DateRange, StatusCode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One version of one code within a code list.
///
/// Built once while ingesting source data and never mutated afterwards; the
/// cache only hands out clones or shared references.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeValue {
    pub list_id: CodeListId,
    pub value_code: String,
    pub description: Option<String>,
    pub extra1: Option<String>,
    pub extra2: Option<String>,
    pub extra3: Option<String>,
    pub comment: Option<String>,
    pub master_value: Option<String>,
    pub status_code: Option<StatusCode>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
}

impl CodeValue {
    /// Anything not explicitly inactive counts as active, including a missing status.
    pub fn is_active(&self) -> bool {
        self.status_code != Some(StatusCode::Inactive)
    }

    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.is_valid_between(date, date)
    }

    pub fn is_valid_in(&self, range: &DateRange) -> bool {
        self.is_valid_between(range.start(), range.end())
    }

    /// Day-granularity overlap check between the value's validity window and `[from, to]`.
    pub fn is_valid_between(&self, from: NaiveDate, to: NaiveDate) -> bool {
        let valid_from = self.valid_from.map(|ts| ts.date_naive());
        let valid_to = self.valid_to.map(|ts| ts.date_naive());
        match (valid_from, valid_to) {
            (None, None) => true,
            (None, Some(end)) => to <= end,
            (Some(start), None) => start <= to,
            (Some(start), Some(end)) => {
                (start <= from && from < end)
                    || (start <= to && to < end)
                    || (from <= start && end < to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 30, 0).unwrap()
    }

    fn windowed(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> CodeValue {
        CodeValue {
            value_code: "X".to_string(),
            valid_from: from,
            valid_to: to,
            ..CodeValue::default()
        }
    }

    #[test]
    fn missing_status_is_active() {
        let mut value = CodeValue::default();
        assert!(value.is_active());
        value.status_code = Some(StatusCode::Active);
        assert!(value.is_active());
        value.status_code = Some(StatusCode::Inactive);
        assert!(!value.is_active());
    }

    #[test]
    fn unbounded_value_is_always_valid() {
        assert!(windowed(None, None).is_valid_on(date(1950, 1, 1)));
    }

    #[test]
    fn open_start_window() {
        let value = windowed(None, Some(ts(2024, 6, 30)));
        assert!(value.is_valid_on(date(2024, 6, 30)));
        assert!(!value.is_valid_on(date(2024, 7, 1)));
    }

    #[test]
    fn open_end_window() {
        let value = windowed(Some(ts(2024, 1, 1)), None);
        assert!(value.is_valid_on(date(2024, 1, 1)));
        assert!(!value.is_valid_on(date(2023, 12, 31)));
    }

    #[test]
    fn closed_window_excludes_its_last_day() {
        let value = windowed(Some(ts(2024, 1, 1)), Some(ts(2024, 12, 31)));
        assert!(value.is_valid_on(date(2024, 1, 1)));
        assert!(value.is_valid_on(date(2024, 12, 30)));
        assert!(!value.is_valid_on(date(2024, 12, 31)));
    }

    #[test]
    fn closed_window_inside_requested_range() {
        let value = windowed(Some(ts(2024, 3, 1)), Some(ts(2024, 4, 1)));
        assert!(value.is_valid_between(date(2024, 1, 1), date(2024, 12, 31)));
        assert!(!value.is_valid_between(date(2025, 1, 1), date(2025, 12, 31)));
    }
}

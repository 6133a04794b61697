use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Open-ended date range used when filtering code values by validity.
///
/// A missing start means 1900-01-01 and a missing end means 2100-12-31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            from: Some(date),
            to: Some(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.from.unwrap_or_else(range_start)
    }

    pub fn end(&self) -> NaiveDate {
        self.to.unwrap_or_else(range_end)
    }

    /// An unbounded range is treated as a wide interval, never as a single day.
    pub fn is_single_day(&self) -> bool {
        match (self.from, self.to) {
            (None, None) => false,
            _ => self.start() == self.end(),
        }
    }
}

pub fn range_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn range_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

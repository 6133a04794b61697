use crate::domain::entities::CodeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A code value property that can be read generically for filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeValueProperty {
    ListId,
    Value,
    Description,
    Extra1,
    Extra2,
    Extra3,
    Comment,
    MasterValue,
    StatusCode,
    ValidFrom,
    ValidTo,
}

/// Comparable form of a property value.
///
/// Values read from the same property always share a variant, so the derived
/// ordering is the natural ordering of the underlying type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyValue {
    Number(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl CodeValueProperty {
    pub const ALL: [CodeValueProperty; 11] = [
        CodeValueProperty::ListId,
        CodeValueProperty::Value,
        CodeValueProperty::Description,
        CodeValueProperty::Extra1,
        CodeValueProperty::Extra2,
        CodeValueProperty::Extra3,
        CodeValueProperty::Comment,
        CodeValueProperty::MasterValue,
        CodeValueProperty::StatusCode,
        CodeValueProperty::ValidFrom,
        CodeValueProperty::ValidTo,
    ];

    pub fn get(self, value: &CodeValue) -> Option<PropertyValue> {
        let text = |field: &Option<String>| field.clone().map(PropertyValue::Text);
        match self {
            CodeValueProperty::ListId => Some(PropertyValue::Number(value.list_id.into())),
            CodeValueProperty::Value => Some(PropertyValue::Text(value.value_code.clone())),
            CodeValueProperty::Description => text(&value.description),
            CodeValueProperty::Extra1 => text(&value.extra1),
            CodeValueProperty::Extra2 => text(&value.extra2),
            CodeValueProperty::Extra3 => text(&value.extra3),
            CodeValueProperty::Comment => text(&value.comment),
            CodeValueProperty::MasterValue => text(&value.master_value),
            CodeValueProperty::StatusCode => value
                .status_code
                .map(|status| PropertyValue::Text(status.as_str().to_string())),
            CodeValueProperty::ValidFrom => value.valid_from.map(PropertyValue::Timestamp),
            CodeValueProperty::ValidTo => value.valid_to.map(PropertyValue::Timestamp),
        }
    }

    /// String form used by match modes; absent stays absent.
    pub fn get_string(self, value: &CodeValue) -> Option<String> {
        self.get(value).map(|v| v.to_plain_string())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeValueProperty::ListId => "LIST_ID",
            CodeValueProperty::Value => "VALUE",
            CodeValueProperty::Description => "DESCRIPTION",
            CodeValueProperty::Extra1 => "EXTRA1",
            CodeValueProperty::Extra2 => "EXTRA2",
            CodeValueProperty::Extra3 => "EXTRA3",
            CodeValueProperty::Comment => "COMMENT",
            CodeValueProperty::MasterValue => "MASTER_VALUE",
            CodeValueProperty::StatusCode => "STATUS_CODE",
            CodeValueProperty::ValidFrom => "VALID_FROM",
            CodeValueProperty::ValidTo => "VALID_TO",
        }
    }

    /// Comparator that keeps records without the property after all others,
    /// whichever direction is requested.
    pub fn compare(self, a: &CodeValue, b: &CodeValue, ascending: bool) -> Ordering {
        match (self.get(a), self.get(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) if ascending => left.cmp(&right),
            (Some(left), Some(right)) => right.cmp(&left),
        }
    }
}

impl fmt::Display for CodeValueProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeValueProperty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        CodeValueProperty::ALL
            .into_iter()
            .find(|property| property.as_str() == normalized)
            .ok_or_else(|| format!("Unknown code value property: {s}"))
    }
}

impl PropertyValue {
    /// Canonical string form: plain decimal digits for numbers, RFC 3339 for timestamps.
    pub fn to_plain_string(&self) -> String {
        match self {
            PropertyValue::Number(n) => n.to_string(),
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CodeListId, StatusCode};
    use chrono::TimeZone;

    fn value(code: &str, description: Option<&str>) -> CodeValue {
        CodeValue {
            list_id: CodeListId::new(12),
            value_code: code.to_string(),
            description: description.map(str::to_string),
            status_code: Some(StatusCode::Active),
            ..CodeValue::default()
        }
    }

    #[test]
    fn reads_text_and_numeric_properties() {
        let v = value("BG", Some("Bulgaria"));
        assert_eq!(
            CodeValueProperty::Description.get(&v),
            Some(PropertyValue::Text("Bulgaria".to_string()))
        );
        assert_eq!(CodeValueProperty::ListId.get_string(&v), Some("12".to_string()));
        assert_eq!(CodeValueProperty::Extra1.get(&v), None);
        assert_eq!(CodeValueProperty::StatusCode.get_string(&v), Some("ACTIVE".to_string()));
    }

    #[test]
    fn timestamps_render_without_fraction() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(
            PropertyValue::Timestamp(ts).to_plain_string(),
            "2024-03-01T00:00:00Z"
        );
    }

    #[test]
    fn compare_keeps_absent_values_last() {
        let with = value("A", Some("x"));
        let without = value("B", None);
        for ascending in [true, false] {
            assert_eq!(
                CodeValueProperty::Description.compare(&without, &with, ascending),
                Ordering::Greater
            );
            assert_eq!(
                CodeValueProperty::Description.compare(&with, &without, ascending),
                Ordering::Less
            );
        }
    }

    #[test]
    fn compare_inverts_for_descending() {
        let a = value("A", None);
        let b = value("B", None);
        assert_eq!(CodeValueProperty::Value.compare(&a, &b, true), Ordering::Less);
        assert_eq!(CodeValueProperty::Value.compare(&a, &b, false), Ordering::Greater);
    }

    #[test]
    fn parses_property_names() {
        assert_eq!("master_value".parse(), Ok(CodeValueProperty::MasterValue));
        assert_eq!("Extra2".parse(), Ok(CodeValueProperty::Extra2));
        assert!("colour".parse::<CodeValueProperty>().is_err());
    }
}

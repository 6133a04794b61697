use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a property's string form is compared against a search value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMode {
    #[default]
    Exact,
    Anywhere,
    MatchExactWord,
    Start,
    StartAnyWord,
    End,
}

impl MatchMode {
    /// Compares two present values.
    ///
    /// `StartAnyWord` is two tests OR-ed together: a prefix match, or the
    /// pattern appearing right after a space anywhere in the candidate.
    pub fn matches(self, candidate: &str, pattern: &str) -> bool {
        match self {
            MatchMode::Exact => candidate == pattern,
            MatchMode::Anywhere | MatchMode::MatchExactWord => candidate.contains(pattern),
            MatchMode::Start => candidate.starts_with(pattern),
            MatchMode::StartAnyWord => {
                MatchMode::Start.matches(candidate, pattern)
                    || MatchMode::Anywhere.matches(candidate, &format!(" {pattern}"))
            }
            MatchMode::End => candidate.ends_with(pattern),
        }
    }

    /// Compares two possibly absent values: both absent match, one absent never does.
    pub fn matches_optional(self, candidate: Option<&str>, pattern: Option<&str>) -> bool {
        match (candidate, pattern) {
            (None, None) => true,
            (Some(candidate), Some(pattern)) => self.matches(candidate, pattern),
            _ => false,
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    /// Unknown names fall back to `End`, the catch-all comparison.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" => MatchMode::Exact,
            "ANYWHERE" => MatchMode::Anywhere,
            "MATCH_EXACT_WORD" => MatchMode::MatchExactWord,
            "START" => MatchMode::Start,
            "START_ANY_WORD" => MatchMode::StartAnyWord,
            "" => return Err("Match mode cannot be empty".to_string()),
            _ => MatchMode::End,
        };
        Ok(mode)
    }
}

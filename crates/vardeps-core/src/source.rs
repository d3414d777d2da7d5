//! Data-collection sources
//!
//! Each source is one schema version of the clinical dataset. A variable can
//! have a different direct dependency under each source.
//! The string identifiers are the keys used in `parent_dependency` cells and
//! must not change.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Source schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    /// MEDIAXTEND export (`mxd` column)
    #[serde(rename = "MEDIAXTEND")]
    Mediaxtend,

    /// First Traumabase schema (`v1` column)
    #[serde(rename = "TRAUMABASE-V1")]
    TraumabaseV1,

    /// Second Traumabase schema (`v2` column)
    #[serde(rename = "TRAUMABASE-V2")]
    TraumabaseV2,
}

impl Source {
    /// All sources, in the order they are offered for selection
    pub const ALL: [Source; 3] = [Self::Mediaxtend, Self::TraumabaseV1, Self::TraumabaseV2];

    /// Get the source as the key used in dependency mappings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mediaxtend => "MEDIAXTEND",
            Self::TraumabaseV1 => "TRAUMABASE-V1",
            Self::TraumabaseV2 => "TRAUMABASE-V2",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Source {
    type Err = SourceParseError;

    /// Parse a source key; matching is case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SourceParseError(trimmed.to_string()))
    }
}

/// Unknown source identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown source '{0}'. Expected one of: MEDIAXTEND, TRAUMABASE-V1, TRAUMABASE-V2")]
pub struct SourceParseError(pub String);

//! Domain types shared by the metadata, partitioning and report layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Per-document metadata fields, passed through verbatim to reports.
pub type Meta = HashMap<String, String>;

/// Column naming the document (and its text file) in the metadata table.
pub const FILENAME_FIELD: &str = "filename";
/// Column holding the free-text publication date.
pub const DATE_FIELD: &str = "date";

/// Why a document was dropped during date validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InvalidDate,
    BeforeRange,
    AfterRange,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidDate => "has invalid date",
            Self::BeforeRange => "is before date range",
            Self::AfterRange => "is after date range",
        };
        f.write_str(text)
    }
}

/// A document removed from the store, with the reason it was removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationFailure {
    pub filename: String,
    pub reason: FailureReason,
}

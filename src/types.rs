//! Core record types shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Regex for ATT&CK technique identifiers: `T####` or `T####.###`
/// (e.g. `T1059`, `T1059.001`).
#[allow(clippy::unwrap_used)] // Static regex pattern is hardcoded and valid
fn technique_id_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"^T\d{4}(\.\d{3})?$").unwrap())
}

/// Validated ATT&CK technique identifier.
///
/// Ordered lexicographically, which for this format matches the natural
/// ATT&CK ordering (`T1055` < `T1059` < `T1059.001`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechniqueId(String);

impl TechniqueId {
    /// Parse a raw cell value into a technique ID.
    ///
    /// Surrounding whitespace is ignored and a lowercase `t` prefix is
    /// accepted; anything else that doesn't match the ID format is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = raw.trim().to_uppercase();
        if technique_id_pattern().is_match(&candidate) {
            Some(Self(candidate))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TechniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the coverage sheet. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueRecord {
    pub technique: TechniqueId,
    /// The technique's underlying data is being collected.
    pub data_source: bool,
    /// A detection rule or query is in place for the technique.
    pub detection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Non-fatal problem with a single spreadsheet row. The row is skipped and
/// processing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    /// 1-based worksheet row number.
    pub row: u32,
    pub message: String,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

//! Coverage scoring.
//!
//! Pure mapping from a row's two indicator flags to a coverage level.
//! A working detection is a stronger visibility signal than merely
//! collecting the raw data, so detection dominates the data-source flag.

use serde::{Deserialize, Serialize};

/// Amber: the technique's data is collected but nothing alerts on it.
pub const COLOR_DATA_SOURCE: &str = "#ffd466";
/// Green: a detection is in place.
pub const COLOR_DETECTION: &str = "#06c452";

/// Coverage level for one technique, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    None,
    DataSource,
    Detection,
}

impl Coverage {
    /// Derive the coverage level from a record's indicator flags.
    pub fn from_flags(data_source: bool, detection: bool) -> Self {
        if detection {
            Self::Detection
        } else if data_source {
            Self::DataSource
        } else {
            Self::None
        }
    }

    /// Numeric score carried in the layer's `score` field.
    pub fn score(self) -> u8 {
        match self {
            Self::None => 0,
            Self::DataSource => 1,
            Self::Detection => 2,
        }
    }

    /// Inverse of [`Coverage::score`], for reading entries back.
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            0 => Some(Self::None),
            1 => Some(Self::DataSource),
            2 => Some(Self::Detection),
            _ => None,
        }
    }

    /// Display color for the layer entry. Zero coverage carries no color so
    /// the Navigator leaves the cell unshaded.
    pub fn color(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::DataSource => Some(COLOR_DATA_SOURCE),
            Self::Detection => Some(COLOR_DETECTION),
        }
    }

    /// Human-readable label used in the legend and the run summary.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "no coverage",
            Self::DataSource => "data source only",
            Self::Detection => "detection in place",
        }
    }
}

/// Per-level technique counts for the run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoverageCounts {
    pub none: usize,
    pub data_source: usize,
    pub detection: usize,
}

impl CoverageCounts {
    pub fn tally<I: IntoIterator<Item = Coverage>>(levels: I) -> Self {
        let mut counts = Self::default();
        for level in levels {
            match level {
                Coverage::None => counts.none += 1,
                Coverage::DataSource => counts.data_source += 1,
                Coverage::Detection => counts.detection += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.none + self.data_source + self.detection
    }
}

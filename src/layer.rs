//! ATT&CK Navigator layer assembly.
//!
//! The structs here mirror the subset of the Navigator layer schema (format
//! 4.x) this tool emits; serialized field names follow the schema's
//! camelCase spelling. [`build_layer`] turns loaded records into the final
//! document: duplicates resolve first-wins and entries are sorted ascending
//! by technique ID so repeated runs diff cleanly.

use crate::score::{Coverage, CoverageCounts};
use crate::types::{TechniqueId, TechniqueRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Navigator layer format version.
pub const LAYER_FORMAT: &str = "4.5";
/// Navigator application version the layer targets.
pub const NAVIGATOR_VERSION: &str = "5.1.0";
/// ATT&CK content version the technique IDs refer to.
pub const ATTACK_VERSION: &str = "16";
/// The enterprise matrix; this tool does not map mobile or ICS coverage.
pub const DOMAIN: &str = "enterprise-attack";

/// Layer metadata supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    pub name: String,
    pub description: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            name: "Data source and detection coverage".to_string(),
            description: String::new(),
        }
    }
}

impl LayerConfig {
    /// Filename the layer is written to when no output path is given: the
    /// layer name lowercased with spaces replaced by dashes.
    pub fn default_filename(&self) -> String {
        let stem = self.name.trim().to_lowercase().replace(' ', "-");
        if stem.is_empty() {
            "layer.json".to_string()
        } else {
            format!("{stem}.json")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versions {
    pub attack: String,
    pub navigator: String,
    pub layer: String,
}

impl Default for Versions {
    fn default() -> Self {
        Self {
            attack: ATTACK_VERSION.to_string(),
            navigator: NAVIGATOR_VERSION.to_string(),
            layer: LAYER_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filters {
    pub platforms: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            platforms: ["Windows", "Linux", "macOS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gradient {
    pub colors: Vec<String>,
    #[serde(rename = "minValue")]
    pub min_value: i64,
    #[serde(rename = "maxValue")]
    pub max_value: i64,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            colors: ["#ff6666", "#ffe766", "#8ec843"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_value: 0,
            max_value: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

/// One technique entry in the layer's `techniques` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueEntry {
    #[serde(rename = "techniqueID")]
    pub technique_id: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub enabled: bool,
}

/// The layer document written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub versions: Versions,
    pub domain: String,
    pub description: String,
    pub filters: Filters,
    pub sorting: u8,
    #[serde(rename = "hideDisabled")]
    pub hide_disabled: bool,
    pub techniques: Vec<TechniqueEntry>,
    pub gradient: Gradient,
    #[serde(rename = "legendItems")]
    pub legend_items: Vec<LegendItem>,
}

impl Layer {
    /// Per-level counts over the emitted entries.
    pub fn coverage_counts(&self) -> CoverageCounts {
        CoverageCounts::tally(
            self.techniques
                .iter()
                .filter_map(|entry| Coverage::from_score(entry.score)),
        )
    }
}

/// Assemble the layer document from loaded records.
///
/// A technique appearing more than once keeps its first occurrence; later
/// duplicates are dropped with a warning.
pub fn build_layer(config: &LayerConfig, records: &[TechniqueRecord]) -> Layer {
    let mut by_id: BTreeMap<TechniqueId, TechniqueEntry> = BTreeMap::new();

    for record in records {
        if by_id.contains_key(&record.technique) {
            warn!(
                "duplicate technique {} ignored (first occurrence wins)",
                record.technique
            );
            continue;
        }
        let coverage = Coverage::from_flags(record.data_source, record.detection);
        by_id.insert(
            record.technique.clone(),
            TechniqueEntry {
                technique_id: record.technique.to_string(),
                score: coverage.score(),
                color: coverage.color().map(str::to_string),
                comment: record.comment.clone(),
                enabled: true,
            },
        );
    }

    Layer {
        name: config.name.clone(),
        versions: Versions::default(),
        domain: DOMAIN.to_string(),
        description: config.description.clone(),
        filters: Filters::default(),
        sorting: 0,
        hide_disabled: false,
        // BTreeMap iteration gives ascending technique ID order
        techniques: by_id.into_values().collect(),
        gradient: Gradient::default(),
        legend_items: legend(),
    }
}

fn legend() -> Vec<LegendItem> {
    [Coverage::None, Coverage::DataSource, Coverage::Detection]
        .iter()
        .map(|level| LegendItem {
            label: level.label().to_string(),
            color: level.color().unwrap_or("#ffffff").to_string(),
        })
        .collect()
}

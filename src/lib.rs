//! MITRENIZE - map your organisation's data sources and detections to the
//! MITRE ATT&CK framework and generate layer files for the ATT&CK Navigator.
//!
//! The pipeline is a single pass: load the coverage sheet from a mapping
//! workbook, score each technique (detection beats data source beats
//! nothing), assemble the Navigator layer document, and write it atomically.
//!
//! # Example
//!
//! ```no_run
//! use mitrenize::{generate_layer_file, GenerateOptions};
//!
//! let report = generate_layer_file(&GenerateOptions::new("mitre-mapping.xlsx")).unwrap();
//! eprintln!("{} techniques mapped to {}", report.techniques, report.layer_path.display());
//! ```

pub mod cli;
pub mod error;
pub mod layer;
pub mod output;
pub mod score;
pub mod types;
pub mod workbook;

// Re-export commonly used types at crate root
pub use error::{MitrenizeError, Result};
pub use layer::{build_layer, Layer, LayerConfig, TechniqueEntry};
pub use score::{Coverage, CoverageCounts};
pub use types::{RowWarning, TechniqueId, TechniqueRecord};

use std::path::PathBuf;

/// Options for one conversion run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Mapping workbook path.
    pub input: PathBuf,
    /// Worksheet holding the coverage table.
    pub sheet: String,
    /// Layer metadata.
    pub layer: LayerConfig,
    /// Output path; derived from the layer name when absent.
    pub output: Option<PathBuf>,
}

impl GenerateOptions {
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self {
            input: input.into(),
            sheet: workbook::DEFAULT_SHEET.to_string(),
            layer: LayerConfig::default(),
            output: None,
        }
    }
}

/// What a completed run produced, for reporting.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the layer file landed.
    pub layer_path: PathBuf,
    /// Number of technique entries in the layer.
    pub techniques: usize,
    pub counts: CoverageCounts,
    /// Rows that could not be interpreted and were skipped.
    pub skipped: Vec<RowWarning>,
}

/// Run the whole pipeline: load the coverage sheet, build the layer
/// document, and write it out.
///
/// This is the entry point used by the binary; it is also callable
/// programmatically.
pub fn generate_layer_file(options: &GenerateOptions) -> Result<RunReport> {
    let loaded = workbook::load_coverage_sheet(&options.input, &options.sheet)?;
    let layer = build_layer(&options.layer, &loaded.records);

    let layer_path = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(options.layer.default_filename()));
    output::write_layer(&layer, &layer_path)?;

    Ok(RunReport {
        layer_path,
        techniques: layer.techniques.len(),
        counts: layer.coverage_counts(),
        skipped: loaded.skipped,
    })
}

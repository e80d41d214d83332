//! Layer serialization and the run summary.
//!
//! The layer file is written atomically: the JSON is staged in a temporary
//! file inside the destination directory and renamed into place, so the
//! output path never holds a partial document.

use crate::error::{MitrenizeError, Result};
use crate::layer::Layer;
use crate::RunReport;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Serialize `layer` as pretty JSON and write it to `path`.
pub fn write_layer(layer: &Layer, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(layer)
        .map_err(|e| MitrenizeError::output_write(path, std::io::Error::other(e)))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| MitrenizeError::output_write(path, e))?;
    staged
        .write_all(json.as_bytes())
        .and_then(|()| staged.write_all(b"\n"))
        .map_err(|e| MitrenizeError::output_write(path, e))?;
    staged
        .persist(path)
        .map_err(|e| MitrenizeError::output_write(path, e.error))?;

    Ok(())
}

/// Format the run summary shown on stderr after a successful run.
pub fn format_summary(report: &RunReport) -> String {
    let counts = &report.counts;
    let mut out = String::new();

    out.push_str(&format!(
        "Layer written to: {}\n",
        report.layer_path.display().to_string().bright_white()
    ));
    out.push_str(&format!("  {} techniques mapped\n", report.techniques));
    out.push_str(&format!(
        "  {} detection in place\n",
        counts.detection.to_string().bright_green()
    ));
    out.push_str(&format!(
        "  {} data source only\n",
        counts.data_source.to_string().bright_yellow()
    ));
    out.push_str(&format!("  {} no coverage\n", counts.none));

    if !report.skipped.is_empty() {
        out.push_str(&format!(
            "  {} rows skipped (re-run with -v for details)\n",
            report.skipped.len().to_string().bright_red()
        ));
    }

    out
}

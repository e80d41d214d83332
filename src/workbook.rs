//! Workbook loading.
//!
//! Reads the coverage sheet from an `.xlsx` mapping workbook and produces
//! [`TechniqueRecord`]s. Structural problems (missing file, worksheet, or
//! column) abort the run; individual rows that cannot be interpreted are
//! skipped with a warning and processing continues.
//!
//! Expected sheet layout: a header row naming a technique-ID column and the
//! two coverage indicator columns, one technique per row below it. Indicator
//! cells take whatever the spreadsheet author typed: an `x` mark, yes/no
//! text, a 0/1 number, or a real boolean.

use crate::error::{MitrenizeError, Result};
use crate::types::{RowWarning, TechniqueId, TechniqueRecord};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;
use tracing::{debug, warn};

/// Worksheet holding the coverage table unless overridden.
pub const DEFAULT_SHEET: &str = "Coverage";

// Accepted header spellings, lowercased. The first entry of each set is the
// canonical name used in error messages.
const TECHNIQUE_HEADERS: &[&str] =
    &["technique", "technique id", "techniqueid", "technique_id", "id"];
const DATA_SOURCE_HEADERS: &[&str] =
    &["data source", "datasource", "data_source", "data sources"];
const DETECTION_HEADERS: &[&str] = &["detection", "detections", "detected"];
const COMMENT_HEADERS: &[&str] = &["comment", "comments", "notes"];

/// Result of loading the coverage sheet.
#[derive(Debug)]
pub struct LoadedSheet {
    pub records: Vec<TechniqueRecord>,
    /// Rows that were skipped, in sheet order.
    pub skipped: Vec<RowWarning>,
}

/// Column indices resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    technique: usize,
    data_source: usize,
    detection: usize,
    comment: Option<usize>,
}

/// Load all technique records from `sheet` in the workbook at `path`.
pub fn load_coverage_sheet(path: &Path, sheet: &str) -> Result<LoadedSheet> {
    if !path.is_file() {
        return Err(MitrenizeError::input_not_found(path));
    }

    let mut workbook: Xlsx<std::io::BufReader<std::fs::File>> =
        open_workbook(path).map_err(|e: calamine::XlsxError| MitrenizeError::workbook(path, e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet) {
        return Err(MitrenizeError::missing_sheet(sheet, &sheet_names));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| MitrenizeError::workbook(path, e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| MitrenizeError::EmptySheet { sheet: sheet.to_string() })?;
    let columns = resolve_columns(sheet, header)?;
    debug!(
        "resolved columns in \"{sheet}\": technique={}, data_source={}, detection={}, comment={:?}",
        columns.technique, columns.data_source, columns.detection, columns.comment
    );

    // Absolute 1-based row number of the header, so warnings point at the
    // row the user sees in their spreadsheet application.
    let header_row = range.start().map_or(1, |(row, _)| row + 1);

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (offset, row) in rows.enumerate() {
        if row.iter().all(is_empty_cell) {
            continue;
        }
        match parse_row(columns, row) {
            Ok(record) => records.push(record),
            Err(message) => {
                let warning = RowWarning { row: header_row + offset as u32 + 1, message };
                warn!("skipping {warning}");
                skipped.push(warning);
            }
        }
    }

    debug!("loaded {} records, skipped {} rows", records.len(), skipped.len());
    Ok(LoadedSheet { records, skipped })
}

fn resolve_columns(sheet: &str, header: &[Data]) -> Result<ColumnMap> {
    let find = |aliases: &[&str]| {
        header.iter().position(|cell| {
            cell_text(Some(cell))
                .map(|text| aliases.contains(&text.to_lowercase().as_str()))
                .unwrap_or(false)
        })
    };

    let technique = find(TECHNIQUE_HEADERS)
        .ok_or_else(|| MitrenizeError::missing_column(sheet, TECHNIQUE_HEADERS[0]))?;
    let data_source = find(DATA_SOURCE_HEADERS)
        .ok_or_else(|| MitrenizeError::missing_column(sheet, DATA_SOURCE_HEADERS[0]))?;
    let detection = find(DETECTION_HEADERS)
        .ok_or_else(|| MitrenizeError::missing_column(sheet, DETECTION_HEADERS[0]))?;
    let comment = find(COMMENT_HEADERS);

    Ok(ColumnMap { technique, data_source, detection, comment })
}

fn parse_row(columns: ColumnMap, row: &[Data]) -> std::result::Result<TechniqueRecord, String> {
    let technique = match cell_text(row.get(columns.technique)) {
        Some(raw) => TechniqueId::parse(&raw).ok_or_else(|| {
            format!("\"{raw}\" is not a technique ID (expected T#### or T####.###)")
        })?,
        None => return Err("technique ID is missing".to_string()),
    };

    let data_source = indicator(row, columns.data_source, "data source")?;
    let detection = indicator(row, columns.detection, "detection")?;
    let comment = columns.comment.and_then(|index| cell_text(row.get(index)));

    Ok(TechniqueRecord { technique, data_source, detection, comment })
}

fn indicator(row: &[Data], index: usize, column: &str) -> std::result::Result<bool, String> {
    // A row shorter than the header counts as empty cells, not an error
    let cell = row.get(index).unwrap_or(&Data::Empty);
    normalize_indicator(cell).map_err(|value| {
        format!("ambiguous {column} indicator \"{value}\" (expected x/yes/no, true/false, or 0/1)")
    })
}

/// Map a spreadsheet cell onto a strict boolean.
///
/// Cells arrive as whatever representation the author used; anything not in
/// the accepted vocabulary is ambiguous and fails the row. The `x` mark is
/// the common convention in coverage worksheets.
fn normalize_indicator(cell: &Data) -> std::result::Result<bool, String> {
    match cell {
        Data::Empty => Ok(false),
        Data::Bool(value) => Ok(*value),
        Data::Int(1) => Ok(true),
        Data::Int(0) => Ok(false),
        Data::Float(value) if *value == 1.0 => Ok(true),
        Data::Float(value) if *value == 0.0 => Ok(false),
        Data::String(value) => match value.trim().to_lowercase().as_str() {
            "x" | "yes" | "y" | "true" | "1" => Ok(true),
            "" | "no" | "n" | "false" | "0" | "-" => Ok(false),
            _ => Err(value.trim().to_string()),
        },
        other => Err(other.to_string()),
    }
}

/// Cell content as trimmed text, `None` if effectively empty.
fn cell_text(cell: Option<&Data>) -> Option<String> {
    let text = match cell? {
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 => format!("{}", *value as i64),
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn is_empty_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(value) => value.trim().is_empty(),
        _ => false,
    }
}

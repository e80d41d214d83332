use crate::layer::LayerConfig;
use crate::workbook;
use clap::Parser;
use std::path::PathBuf;

/// Workbook read when no input path is given.
pub const DEFAULT_MAPPING_FILE: &str = "mitre-mapping.xlsx";

#[derive(Parser, Debug)]
#[command(name = "mitrenize")]
#[command(about = "Map data source and detection coverage onto an ATT&CK Navigator layer")]
#[command(version)]
pub struct Args {
    /// Mapping workbook holding the coverage sheet
    #[arg(default_value = DEFAULT_MAPPING_FILE)]
    pub input: PathBuf,

    /// Write the layer file here (default: derived from the layer name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worksheet holding the coverage table
    #[arg(long, default_value = workbook::DEFAULT_SHEET)]
    pub sheet: String,

    /// Layer name shown in the Navigator
    #[arg(long)]
    pub name: Option<String>,

    /// Layer description shown in the Navigator
    #[arg(long)]
    pub description: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Layer metadata from the flags, falling back to the defaults.
    pub fn layer_config(&self) -> LayerConfig {
        let mut config = LayerConfig::default();
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(description) = &self.description {
            config.description = description.clone();
        }
        config
    }
}

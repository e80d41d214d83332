use anyhow::{Context, Result};
use clap::Parser;
use mitrenize::{cli, output, generate_layer_file, GenerateOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse args early to get the verbose flag for logging initialization
    let args = cli::Args::parse();

    // Use RUST_LOG env var if set, otherwise use the verbose flag
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("mitrenize=debug")
    } else {
        EnvFilter::new("mitrenize=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("logging initialized (verbose={})", args.verbose);

    // Status info never goes to stdout
    eprintln!("mitrenize v{}", env!("CARGO_PKG_VERSION"));

    let options = GenerateOptions {
        input: args.input.clone(),
        sheet: args.sheet.clone(),
        layer: args.layer_config(),
        output: args.output.clone(),
    };

    let report = generate_layer_file(&options)
        .with_context(|| format!("failed to generate a layer from {}", args.input.display()))?;

    eprint!("{}", output::format_summary(&report));

    Ok(())
}

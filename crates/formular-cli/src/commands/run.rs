//! Export the newest document

use anyhow::{Context, Result};
use formular_core::{Config, ExportOptions, Exporter};

/// Run the export command
pub fn run(config_path: &str, dry_run: bool) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let exporter = Exporter::new(&config).context("Invalid configuration")?;

    let report = exporter
        .run(ExportOptions { dry_run })
        .context("Export failed")?;

    if report.dry_run {
        println!("{}", report.destination.display());
    } else {
        tracing::info!(
            "✓ Exported {} as {}",
            report.input_file.display(),
            report.destination.display()
        );
    }
    Ok(())
}

//! Preview the filename built from a GDT file

use anyhow::{Context, Result};
use formular_core::{Config, Exporter};
use std::path::PathBuf;

/// Run the preview command
pub fn run(config_path: &str, gdt_file: Option<&str>) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let exporter = Exporter::new(&config).context("Invalid configuration")?;

    let gdt_file = match gdt_file {
        Some(path) => PathBuf::from(path),
        None => exporter
            .latest_gdt_file()
            .context("Failed to locate GDT file")?,
    };

    let synthesized = exporter
        .synthesize(&gdt_file)
        .with_context(|| format!("Failed to read {}", gdt_file.display()))?;

    for (kennung, value) in config.export.kennungen.iter().zip(&synthesized.values) {
        tracing::info!("  {} = {}", kennung, value);
    }
    println!("{}", synthesized.stem);
    Ok(())
}

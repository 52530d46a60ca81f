//! Validate configuration command

use anyhow::{Context, Result};
use formular_core::Config;

/// Run the validate command
pub fn run(config_path: &str) -> Result<()> {
    tracing::info!("Validating configuration: {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Configuration is invalid")?;

    let compiler = config
        .filename_compiler()
        .context("Transformation rules are invalid")?;

    let export = &config.export;
    tracing::info!(
        "✓ Documents: {} in {}",
        export.input_file,
        config.input_dir().display()
    );
    tracing::info!(
        "✓ GDT files: {} in {}",
        export.gdt_file,
        config.gdt_dir().display()
    );
    tracing::info!("✓ Export to: {}", config.export_dir().display());
    tracing::info!(
        "✓ Fields: {} (separator '{}')",
        export.kennungen.join(", "),
        compiler.separator()
    );
    tracing::info!("✓ Transformation rules: {}", compiler.rules().len());
    for rule in compiler.rules().rules() {
        tracing::debug!(
            "  #{}: '{}' -> '{}'",
            rule.index(),
            rule.pattern(),
            rule.replacement()
        );
    }

    tracing::info!("✓ Configuration is valid");
    Ok(())
}

//! Write a starter configuration

use anyhow::Result;
use formular_core::config::DEFAULT_CONFIG_FILE;
use std::fs;
use std::path::Path;

const STARTER_CONFIG: &str = r#"{
  "input_path": "./input",
  "input_file": "*.pdf",
  "gdt_path": "./gdt",
  "gdt_file": "*.gdt",
  "export_path": "./export",
  "kennungen": ["3101", "3102", "3103"],
  "trennzeichen": "_",
  "transformations": [
    { "pattern": "^(\\d{2})(\\d{2})(\\d{4})$", "replacement": "$3-$2-$1" },
    { "pattern": "\\s+", "replacement": "-" }
  ],
  "delete_gdt": false,
  "delete_input": false
}
"#;

/// Run the init command
pub fn run(path: &str, force: bool) -> Result<()> {
    let dir = Path::new(path);

    // Create directory if it doesn't exist
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let config_path = dir.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    fs::write(&config_path, STARTER_CONFIG)?;

    tracing::info!("✓ Created {}", config_path.display());
    tracing::info!("");
    tracing::info!("Next steps:");
    tracing::info!("  edit kennungen and paths in {}", config_path.display());
    tracing::info!("  formular-export validate    # Check configuration");
    tracing::info!("  formular-export run         # Export the newest document");

    Ok(())
}

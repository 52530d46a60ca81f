//! Configuration parsing and validation
//!
//! This module handles loading and validating the exporter configuration.
//!
//! # Configuration Files
//!
//! - `config.json` - Default configuration, next to the executable's working directory
//! - `*.yaml` / `*.yml` - The same keys in YAML form
//!
//! Relative directories are resolved against the directory holding the
//! configuration file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compiler::FilenameCompiler;
use crate::encoding::{DEFAULT_ENCODINGS, EncodingChain};
use crate::error::{Error, Result};
use crate::extract::{FieldExtractor, RecordLayout};
use crate::transforms::{RuleChain, TransformationRule};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Exporter settings as written in `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory holding the generated documents
    pub input_path: String,

    /// Document file name or glob inside `input_path`
    pub input_file: String,

    /// Directory holding the GDT metadata files
    pub gdt_path: String,

    /// Metadata file name or glob inside `gdt_path`
    #[serde(default = "default_gdt_file")]
    pub gdt_file: String,

    /// Destination directory
    pub export_path: String,

    /// Field identifiers, in filename order
    pub kennungen: Vec<String>,

    /// Separator between filename components
    #[serde(default = "default_separator")]
    pub trennzeichen: String,

    /// Leading filename component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Trailing filename component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,

    /// Rules applied to every filename component
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<TransformationRule>,

    /// Delete the metadata file after a successful export
    #[serde(default)]
    pub delete_gdt: bool,

    /// Delete the source document after a successful export
    #[serde(default, alias = "delete_file")]
    pub delete_input: bool,

    /// Encodings tried when decoding the metadata file
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
}

fn default_gdt_file() -> String {
    "*.gdt".to_string()
}

fn default_separator() -> String {
    "_".to_string()
}

fn default_encodings() -> Vec<String> {
    DEFAULT_ENCODINGS.iter().map(|s| s.to_string()).collect()
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Exporter settings
    pub export: ExportConfig,

    /// Directory relative paths are resolved against
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a file or directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file, or a directory containing `config.json`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./config.json")?;
    /// println!("Fields: {:?}", config.export.kennungen);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(DEFAULT_CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let export = if is_yaml(&config_path) {
            serde_yaml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };

        Ok(Self { export, base_path })
    }

    /// Build a configuration from already parsed settings
    pub fn new(export: ExportConfig, base_path: impl Into<PathBuf>) -> Self {
        Self {
            export,
            base_path: base_path.into(),
        }
    }

    /// Resolved directory holding the documents
    pub fn input_dir(&self) -> PathBuf {
        self.resolve(&self.export.input_path)
    }

    /// Resolved directory holding the metadata files
    pub fn gdt_dir(&self) -> PathBuf {
        self.resolve(&self.export.gdt_path)
    }

    /// Resolved export directory
    pub fn export_dir(&self) -> PathBuf {
        self.resolve(&self.export.export_path)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Record layout of the metadata lines
    pub fn layout(&self) -> RecordLayout {
        RecordLayout::GDT
    }

    /// Build the encoding chain from the configured labels
    pub fn encoding_chain(&self) -> Result<EncodingChain> {
        EncodingChain::from_labels(&self.export.encodings)
    }

    /// Validate and compile the transformation rules
    pub fn rule_chain(&self) -> Result<RuleChain> {
        RuleChain::compile(&self.export.transformations)
    }

    /// Build the filename compiler, validating every rule
    pub fn filename_compiler(&self) -> Result<FilenameCompiler> {
        Ok(FilenameCompiler::new(self.export.trennzeichen.clone())
            .with_prefix(self.export.prefix.clone())
            .with_postfix(self.export.postfix.clone())
            .with_rules(self.rule_chain()?))
    }

    /// Check every setting the export depends on
    pub fn validate(&self) -> Result<()> {
        if self.export.kennungen.is_empty() {
            return Err(Error::ConfigInvalid {
                message: "'kennungen' must list at least one field identifier".to_string(),
            });
        }

        let width = self.layout().identifier_width();
        let bad: Vec<_> = self
            .export
            .kennungen
            .iter()
            .filter(|k| k.chars().count() != width)
            .map(|k| format!("'{}'", k))
            .collect();
        if !bad.is_empty() {
            return Err(Error::ConfigInvalid {
                message: format!(
                    "field identifiers must be {} characters long: {}",
                    width,
                    bad.join(", ")
                ),
            });
        }

        for (key, value) in [
            ("input_file", &self.export.input_file),
            ("gdt_file", &self.export.gdt_file),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigInvalid {
                    message: format!("'{}' must not be empty", key),
                });
            }
        }

        self.encoding_chain()?;
        self.rule_chain()?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

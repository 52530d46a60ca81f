//! Error types for formular-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for formular-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in formular-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse JSON configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParseYaml(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// A configured directory does not exist
    #[error("directory '{}' not found", .path.display())]
    DirectoryNotFound {
        /// Directory that was searched
        path: PathBuf,
    },

    /// No file in the directory matches the configured name or pattern
    #[error("no files matching '{pattern}' found in '{}'", .dir.display())]
    NoMatchingFile {
        /// Directory that was searched
        dir: PathBuf,
        /// File name or glob
        pattern: String,
    },

    /// The configured file name pattern is not a valid glob
    #[error("invalid file pattern '{pattern}': {message}")]
    InvalidGlob {
        /// The pattern that failed
        pattern: String,
        /// Error message
        message: String,
    },

    /// None of the candidate encodings could decode the metadata file
    #[error("could not decode '{}' with any of: {}", .path.display(), .tried.join(", "))]
    Encoding {
        /// Metadata file
        path: PathBuf,
        /// Encodings tried, in the order tried
        tried: Vec<String>,
    },

    /// One or more field identifiers had no matching metadata line
    #[error(
        "incomplete GDT metadata: no value found for field identifier(s) {}",
        .missing.join(", ")
    )]
    IncompleteExtraction {
        /// Identifiers that could not be resolved
        missing: Vec<String>,
    },

    /// A transformation rule lacks `pattern` or `replacement`
    #[error("transformation rule #{index} is missing '{key}'")]
    MissingRuleKey {
        /// Position of the rule in the configured list (1-based)
        index: usize,
        /// Missing key
        key: &'static str,
    },

    /// A transformation rule's pattern does not compile
    #[error("transformation rule #{index}: invalid regex pattern '{pattern}': {message}")]
    InvalidRegex {
        /// Position of the rule in the configured list (1-based)
        index: usize,
        /// The pattern that failed
        pattern: String,
        /// Error message
        message: String,
    },

    /// A replacement references capture groups the pattern does not define
    #[error(
        "transformation rule #{index}: pattern '{pattern}' has {groups} capture group(s) but the replacement references {}",
        group_list(.references)
    )]
    InvalidBackreference {
        /// Position of the rule in the configured list (1-based)
        index: usize,
        /// The rule's pattern
        pattern: String,
        /// Number of capture groups in the pattern
        groups: usize,
        /// Every out-of-range group number, in order of appearance
        references: Vec<usize>,
    },

    /// The synthesized filename cannot be used inside the export directory
    #[error("refusing to export as '{stem}': {reason}")]
    UnsafeFilename {
        /// Filename stem after transformations
        stem: String,
        /// Why the stem was rejected
        reason: &'static str,
    },

    /// Copying the document to the export location failed
    #[error("failed to copy '{}' to '{}': {source}", .from.display(), .to.display())]
    Copy {
        /// Source document
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Deleting a source file failed
    #[error("failed to delete '{}': {source}", .path.display())]
    Delete {
        /// File that could not be removed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn group_list(references: &[usize]) -> String {
    references
        .iter()
        .map(|n| format!("${}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Whether this error belongs to the rule validation family
    pub fn is_rule_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRuleKey { .. } | Self::InvalidRegex { .. } | Self::InvalidBackreference { .. }
        )
    }
}

//! Formular Export Core Library
//!
//! This crate provides the core functionality for formular-export:
//! - Configuration parsing and validation
//! - GDT metadata decoding and field extraction
//! - Transformation rules with `$N` backreferences
//! - Filename synthesis and the export pipeline
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Locator   │────▶│  Metadata   │────▶│  Filename   │────▶│   Copier    │
//! │ (newest *)  │     │   Parser    │     │  Compiler   │     │  (export)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use formular_core::{Config, Exporter, ExportOptions};
//!
//! let config = Config::load("./config.json")?;
//! let report = Exporter::new(&config)?.run(ExportOptions::default())?;
//! println!("Exported to {}", report.destination.display());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compiler;
pub mod config;
pub mod encoding;
pub mod error;
pub mod export;
pub mod extract;
pub mod files;
pub mod metadata;
pub mod transforms;

pub use compiler::FilenameCompiler;
pub use config::{Config, ExportConfig};
pub use error::{Error, Result};
pub use export::{ExportOptions, ExportReport, Exporter};
pub use extract::{FieldExtractor, RecordLayout};
pub use transforms::{RuleChain, TransformationRule};

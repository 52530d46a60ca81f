//! Export pipeline
//!
//! One sequential pass: locate the newest document and metadata file, decode
//! and parse the metadata, compile the filename, copy the document, then
//! optionally clean up the sources. Any error before the copy aborts the run;
//! cleanup failures are only logged.

use std::path::{Path, PathBuf};

use crate::compiler::FilenameCompiler;
use crate::config::Config;
use crate::encoding::EncodingChain;
use crate::error::{Error, Result};
use crate::extract::RecordLayout;
use crate::files;
use crate::metadata::parse_metadata;

/// Options for a single export run
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Resolve the destination name without copying or deleting anything
    pub dry_run: bool,
}

/// Filename synthesized from one metadata file
#[derive(Debug, Clone)]
pub struct Synthesized {
    /// Extracted field values, in identifier order
    pub values: Vec<String>,
    /// Filename stem after transformations
    pub stem: String,
    /// Name of the encoding used to decode the metadata file
    pub encoding: String,
}

/// Outcome of an export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Document that was exported
    pub input_file: PathBuf,
    /// Metadata file the name was built from
    pub gdt_file: PathBuf,
    /// Name of the encoding used to decode the metadata file
    pub encoding: String,
    /// Extracted field values, in identifier order
    pub values: Vec<String>,
    /// Filename stem after transformations
    pub stem: String,
    /// Export destination
    pub destination: PathBuf,
    /// Whether the metadata file was deleted
    pub deleted_gdt: bool,
    /// Whether the source document was deleted
    pub deleted_input: bool,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Runs exports for one configuration
#[derive(Debug)]
pub struct Exporter<'a> {
    config: &'a Config,
    decoder: EncodingChain,
    layout: RecordLayout,
    compiler: FilenameCompiler,
}

impl<'a> Exporter<'a> {
    /// Validate the configuration and prepare an exporter
    pub fn new(config: &'a Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            decoder: config.encoding_chain()?,
            layout: config.layout(),
            compiler: config.filename_compiler()?,
        })
    }

    /// Locate the newest metadata file
    pub fn latest_gdt_file(&self) -> Result<PathBuf> {
        files::find_latest(&self.config.gdt_dir(), &self.config.export.gdt_file)
    }

    /// Locate the newest document
    pub fn latest_input_file(&self) -> Result<PathBuf> {
        files::find_latest(&self.config.input_dir(), &self.config.export.input_file)
    }

    /// Decode a metadata file and build the filename stem from it
    pub fn synthesize(&self, gdt_file: &Path) -> Result<Synthesized> {
        let decoded = self.decoder.read_to_string(gdt_file)?;
        let values = parse_metadata(&decoded.text, &self.layout, &self.config.export.kennungen)?;
        let stem = self.compiler.compile(&values);
        check_stem(&stem)?;

        Ok(Synthesized {
            values,
            stem,
            encoding: decoded.encoding.name().to_string(),
        })
    }

    /// Run the full export
    pub fn run(&self, options: ExportOptions) -> Result<ExportReport> {
        let export_dir = self.config.export_dir();
        if !options.dry_run {
            files::ensure_dir(&export_dir)?;
        }

        let input_file = self.latest_input_file()?;
        let gdt_file = self.latest_gdt_file()?;
        let Synthesized {
            values,
            stem,
            encoding,
        } = self.synthesize(&gdt_file)?;

        let destination = export_dir.join(destination_name(&stem, &input_file));

        let mut report = ExportReport {
            input_file,
            gdt_file,
            encoding,
            values,
            stem,
            destination,
            deleted_gdt: false,
            deleted_input: false,
            dry_run: options.dry_run,
        };

        if options.dry_run {
            tracing::info!(
                "Dry run: would save {} as {}",
                report.input_file.display(),
                report.destination.display()
            );
            return Ok(report);
        }

        files::copy_file(&report.input_file, &report.destination)?;

        if self.config.export.delete_gdt {
            report.deleted_gdt = files::delete_best_effort(&report.gdt_file);
        }
        if self.config.export.delete_input {
            report.deleted_input = files::delete_best_effort(&report.input_file);
        }

        Ok(report)
    }
}

/// Reject stems that would leave the export directory or name no file
fn check_stem(stem: &str) -> Result<()> {
    let reason = if stem.trim().is_empty() {
        "the filename is empty"
    } else if stem.contains(['/', '\\']) {
        "the filename contains a path separator"
    } else if stem == "." || stem == ".." {
        "the filename is a relative directory reference"
    } else if stem.contains('\0') {
        "the filename contains a NUL character"
    } else {
        return Ok(());
    };

    Err(Error::UnsafeFilename {
        stem: stem.to_string(),
        reason,
    })
}

/// `<stem><.ext>` using the document's extension, if it has one
fn destination_name(stem: &str, input_file: &Path) -> String {
    match input_file.extension() {
        Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
        None => stem.to_string(),
    }
}

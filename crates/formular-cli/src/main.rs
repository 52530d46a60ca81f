//! Formular Export CLI
//!
//! Exports the newest generated document under a name built from the newest
//! GDT metadata file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Formular Export - rename documents from GDT metadata
#[derive(Parser)]
#[command(name = "formular-export")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json", env = "FORMULAR_EXPORT_CONFIG")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the newest document (default)
    Run {
        /// Show the destination without copying or deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and transformation rules without exporting
    Validate,

    /// Print the filename a GDT file would produce
    Preview {
        /// GDT file to read (defaults to the newest configured one)
        gdt_file: Option<String>,
    },

    /// Write a starter configuration
    Init {
        /// Directory to write config.json into
        #[arg(default_value = ".")]
        path: String,

        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => {
            commands::run::run(&cli.config, dry_run)?;
        }
        Commands::Validate => {
            commands::validate::run(&cli.config)?;
        }
        Commands::Preview { gdt_file } => {
            commands::preview::run(&cli.config, gdt_file.as_deref())?;
        }
        Commands::Init { path, force } => {
            commands::init::run(&path, force)?;
        }
    }

    Ok(())
}

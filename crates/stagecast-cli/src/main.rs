//! Stagecast CLI - Command-line interface for content-mapping documents
//!
//! This binary provides commands for validating, normalizing, and hashing
//! stagecast project documents.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use stagecast_cli::commands;

/// Stagecast - Content-Mapping Authoring Tools
#[derive(Parser)]
#[command(name = "stagecast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project document without modifying it
    Validate {
        /// Path to the document file (JSON)
        #[arg(short, long)]
        doc: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Rewrite mappings into canonical form (modes, defaults, feed graphs)
    Normalize {
        /// Path to the document file (JSON)
        #[arg(short, long)]
        doc: String,

        /// Rewrite the file in place instead of printing to stdout
        #[arg(short, long)]
        write: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print each mapping's live change-detection hash
    Hash {
        /// Path to the document file (JSON)
        #[arg(short, long)]
        doc: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { doc, json } => commands::validate::run(&doc, json),
        Commands::Normalize { doc, write, json } => commands::normalize::run(&doc, write, json),
        Commands::Hash { doc, json } => commands::hash::run(&doc, json),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

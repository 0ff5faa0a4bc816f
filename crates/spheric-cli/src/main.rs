//! Spheric CLI - writes the calm spheric ambient loop as a Standard MIDI File
//!
//! Without a subcommand the loop is generated; `inspect` decodes an existing
//! file and reports what it contains.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use spheric_cli::{commands, logging};

/// Spheric - deterministic ambient MIDI loop generator
#[derive(Parser)]
#[command(name = "spheric")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output file path (default: calm_spheric_loop.mid)
    #[arg(short, long)]
    out: Option<String>,

    /// JSON file overriding tempo, resolution and layer voices
    #[arg(long)]
    options: Option<String>,

    /// Output machine-readable JSON (no colored output)
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a MIDI file and report its tracks
    Inspect {
        /// Path to the MIDI file
        #[arg(short, long)]
        input: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Some(Commands::Inspect { input }) => commands::inspect::run(&input, cli.json),
        None => commands::generate::run(cli.out.as_deref(), cli.options.as_deref(), cli.json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

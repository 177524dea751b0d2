//! Tilemosaic CLI.
//!
//! Fetches tiled map imagery for a view extent into a local,
//! georeferenced tile cache, printing the composited tile paths in draw
//! order.

mod catalog;
mod collaborators;
mod commands;
mod error;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilemosaic", version, about = "Tiled map imagery fetcher")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and georeference all tiles for a view extent
    Fetch(commands::fetch::FetchArgs),

    /// List the layers available in the catalog
    Layers {
        /// Extra layer catalog file (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Fetch(args) => commands::fetch::run(args),
        Command::Layers { catalog } => commands::layers::run(catalog),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match tilemosaic::logging::init(Path::new("logs"), "tilemosaic.log") {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging unavailable: {}", e);
            None
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! `layers` command: list the available layer catalog.

use crate::catalog::Catalog;
use crate::error::CliError;
use std::path::PathBuf;

/// Run the layers command.
pub fn run(catalog_path: Option<PathBuf>) -> Result<(), CliError> {
    let catalog = match catalog_path {
        Some(path) => Catalog::with_file(&path)?,
        None => Catalog::builtin(),
    };

    for def in catalog.layers() {
        println!("{:20} {:4} {:2} levels  {}", def.id, def.format, def.levels, def.url);
    }

    Ok(())
}

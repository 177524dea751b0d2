//! CLI error types.

use std::fmt;

/// Errors surfaced to the user at the command level.
#[derive(Debug)]
pub enum CliError {
    /// The layer catalog file could not be loaded.
    Catalog(crate::catalog::CatalogError),

    /// A command-line value could not be parsed.
    InvalidArgument(String),

    /// The HTTP fetcher could not be constructed.
    Fetcher(String),

    /// The Tokio runtime could not be created.
    Runtime(std::io::Error),

    /// The render call failed at the extent or schema level.
    Render(tilemosaic::RenderError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Catalog(e) => write!(f, "{}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Fetcher(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to create async runtime: {}", e),
            CliError::Render(e) => write!(f, "Render failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::InvalidArgument(_) | CliError::Fetcher(_) => None,
        }
    }
}

impl From<tilemosaic::RenderError> for CliError {
    fn from(e: tilemosaic::RenderError) -> Self {
        CliError::Render(e)
    }
}

impl From<crate::catalog::CatalogError> for CliError {
    fn from(e: crate::catalog::CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

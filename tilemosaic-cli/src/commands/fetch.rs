//! `fetch` command: render a view extent into the local tile cache.
//!
//! Runs the full pipeline for one extent and prints the composited tile
//! paths in draw order. Ctrl-C cancels the render: in-flight fetches
//! finish, nothing new is issued, and already-cached tiles stay valid.

use crate::catalog::Catalog;
use crate::collaborators::{ConsoleRenderer, WebMercatorReprojector};
use crate::error::CliError;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tilemosaic::{
    Extent, Pipeline, PipelineConfig, ReqwestFetcher, RetryPolicy, SpatialRef, ViewRequest,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Layer identifier from the catalog
    #[arg(long)]
    pub layer: String,

    /// View extent as min-x,min-y,max-x,max-y in the view reference
    #[arg(long)]
    pub extent: String,

    /// Spatial reference of the view extent
    #[arg(long, default_value = "EPSG:3857")]
    pub srs: String,

    /// View width in pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// View height in pixels
    #[arg(long, default_value_t = 768)]
    pub height: u32,

    /// Cache root directory (defaults to the platform cache dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Extra layer catalog file (JSON)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Maximum concurrent tile fetches
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,

    /// Attempts per tile for transient failures
    #[arg(long, default_value_t = 3)]
    pub attempts: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Parse `min-x,min-y,max-x,max-y` into an extent.
fn parse_extent(text: &str) -> Result<Extent, CliError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(CliError::InvalidArgument(format!(
            "extent must be min-x,min-y,max-x,max-y (got {:?})",
            text
        )));
    }

    let mut values = [0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| {
            CliError::InvalidArgument(format!("extent component {:?} is not a number", part))
        })?;
    }

    Ok(Extent::new(values[0], values[1], values[2], values[3]))
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tilemosaic")
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::with_file(path)?,
        None => Catalog::builtin(),
    };

    let extent = parse_extent(&args.extent)?;
    let cache_root = args.cache_dir.clone().unwrap_or_else(default_cache_dir);

    let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(args.timeout))
        .map_err(|e| CliError::Fetcher(e.to_string()))?;

    let config = PipelineConfig::new(&cache_root)
        .with_concurrency(args.concurrency)
        .with_retry(RetryPolicy::exponential(args.attempts.max(1)));
    let pipeline = Pipeline::new(catalog, WebMercatorReprojector, fetcher, config);

    let view = ViewRequest {
        layer: args.layer.clone(),
        extent,
        display_ref: SpatialRef::new(&args.srs),
        width_px: args.width,
        height_px: args.height,
    };

    let cancel = CancellationToken::new();
    let ctrlc_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        warn!("interrupt received, cancelling render");
        ctrlc_token.cancel();
    }) {
        warn!(error = %e, "could not install interrupt handler");
    }

    info!(
        layer = %view.layer,
        cache = %cache_root.display(),
        "fetching view"
    );

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let mut renderer = ConsoleRenderer::new();
    let report = runtime.block_on(pipeline.render_with_cancel(&view, &mut renderer, &cancel))?;

    info!(composited = renderer.drawn(), "fetch complete");
    println!("{}", report);
    for skipped in &report.skipped {
        eprintln!("skipped {}: {}", skipped.key, skipped.reason);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extent_valid() {
        let extent = parse_extent("-100.5, -50, 100.5, 50").unwrap();
        assert_eq!(extent.min_x(), -100.5);
        assert_eq!(extent.max_y(), 50.0);
    }

    #[test]
    fn test_parse_extent_wrong_arity() {
        assert!(parse_extent("1,2,3").is_err());
        assert!(parse_extent("1,2,3,4,5").is_err());
    }

    #[test]
    fn test_parse_extent_not_numeric() {
        assert!(parse_extent("a,b,c,d").is_err());
    }
}

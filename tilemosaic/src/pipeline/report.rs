//! Render call outcome reporting.

use crate::cache::CacheWriteError;
use crate::fetch::FetchError;
use crate::tile::TileKey;
use std::fmt;
use thiserror::Error;

/// Why a planned tile was skipped instead of presented.
///
/// All of these are tile-scoped: the render call continues and degrades
/// to a partial mosaic.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// The fetch failed permanently, or exhausted its retry budget.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The tile's bytes could not be persisted.
    #[error("cache write failed: {0}")]
    CacheWrite(#[from] CacheWriteError),

    /// The render call was cancelled before this tile was acquired.
    #[error("render cancelled before acquisition")]
    Cancelled,
}

/// A planned tile that did not make it to the renderer.
#[derive(Debug)]
pub struct SkippedTile {
    pub key: TileKey,
    pub reason: SkipReason,
}

/// Summary of one render call.
///
/// The call itself succeeds whenever planning succeeded; per-tile
/// degradation shows up here rather than as an error.
#[derive(Debug)]
pub struct RenderReport {
    /// Number of tiles in the plan.
    pub planned: usize,
    /// Selected level index.
    pub level: usize,
    /// Whether presented tiles require display reprojection.
    pub needs_reproject: bool,
    /// Tiles satisfied straight from the disk cache.
    pub cache_hits: usize,
    /// Tiles fetched from the network this call.
    pub fetched: usize,
    /// Tiles the rendering collaborator rejected at presentation.
    pub draw_failures: usize,
    /// Tiles skipped during acquisition, with their reasons.
    pub skipped: Vec<SkippedTile>,
}

impl RenderReport {
    pub(crate) fn new(planned: usize, level: usize, needs_reproject: bool) -> Self {
        Self {
            planned,
            level,
            needs_reproject,
            cache_hits: 0,
            fetched: 0,
            draw_failures: 0,
            skipped: Vec::new(),
        }
    }

    /// Tiles that became ready (cache hit or fetched).
    pub fn ready(&self) -> usize {
        self.cache_hits + self.fetched
    }

    /// True when every planned tile was presented successfully.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.draw_failures == 0
    }
}

impl fmt::Display for RenderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {}: {} planned, {} ready ({} cached, {} fetched), {} skipped, {} draw failures",
            self.level,
            self.planned,
            self.ready(),
            self.cache_hits,
            self.fetched,
            self.skipped.len(),
            self.draw_failures
        )
    }
}

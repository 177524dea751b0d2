//! Tiling schema types.
//!
//! A [`TilingSchema`] describes one tiled imagery source: its resolution
//! ladder, tile pixel dimensions, image format, native spatial reference
//! and ground coverage. Schemas are immutable; everything downstream
//! (enumeration, cache layout, georeferencing) derives deterministically
//! from them.

mod level;

pub use level::{select_level, TiePolicy};

use crate::geo::{Extent, GroundPoint, SpatialRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raster format served by a tile source.
///
/// A closed set: the cache layout and the world-file extension table both
/// dispatch on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Png,
    Tif,
}

impl ImageFormat {
    /// File extension for the raster itself.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Tif => "tif",
        }
    }

    /// Extension of the world-file sidecar, per the usual convention
    /// (jgw/pgw/tfw). All formats in the closed set have one; the `Option`
    /// keeps the georeference writer honest should the set ever grow a
    /// format without a world-file convention.
    pub fn world_file_extension(&self) -> Option<&'static str> {
        match self {
            ImageFormat::Jpg => Some("jgw"),
            ImageFormat::Png => Some("pgw"),
            ImageFormat::Tif => Some("tfw"),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

/// Errors raised while constructing or querying a tiling schema.
///
/// These indicate a misconfigured catalog, not a runtime condition; the
/// pipeline treats them as fatal for the render call.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema declares no resolution levels at all.
    #[error("tiling schema has no resolution levels")]
    EmptyResolutions,

    /// The resolution list changes direction or repeats a value.
    #[error("resolution list is not strictly monotonic at index {index}")]
    NonMonotonicResolutions { index: usize },

    /// A tile dimension is zero.
    #[error("tile dimensions must be non-zero (got {width}x{height})")]
    ZeroTileDimension { width: u32, height: u32 },

    /// The schema's coverage extent is empty.
    #[error("schema coverage extent {0} is degenerate")]
    DegenerateCoverage(Extent),

    /// A level index outside the schema's resolution ladder.
    #[error("level {level} out of range ({levels} levels available)")]
    UnknownLevel { level: usize, levels: usize },

    /// The schema provider has no layer under this identifier.
    #[error("unknown layer: {0}")]
    UnknownLayer(String),
}

/// Immutable description of a tiled imagery source.
///
/// The grid origin is the top-left corner of the coverage extent: row 0 is
/// the northernmost tile row, matching raster row order. Construction goes
/// through [`TilingSchema::new`] so the invariants always hold; catalogs
/// deserialize their own definition types and build schemas from them.
#[derive(Debug, Clone)]
pub struct TilingSchema {
    resolutions: Vec<f64>,
    tile_width: u32,
    tile_height: u32,
    format: ImageFormat,
    srs: SpatialRef,
    coverage: Extent,
}

impl TilingSchema {
    /// Create a schema, validating its invariants.
    ///
    /// # Arguments
    ///
    /// * `resolutions` - Ground units per pixel for each level, strictly
    ///   monotonic (either direction), non-empty
    /// * `tile_width` / `tile_height` - Tile dimensions in pixels
    /// * `format` - Image format served by the source
    /// * `srs` - The source's native spatial reference
    /// * `coverage` - Ground extent of the whole tile grid
    ///
    /// # Errors
    ///
    /// Any violated invariant returns the matching [`SchemaError`]; a
    /// schema that fails construction is a configuration defect.
    pub fn new(
        resolutions: Vec<f64>,
        tile_width: u32,
        tile_height: u32,
        format: ImageFormat,
        srs: SpatialRef,
        coverage: Extent,
    ) -> Result<Self, SchemaError> {
        if resolutions.is_empty() {
            return Err(SchemaError::EmptyResolutions);
        }
        if let Some(index) = first_non_monotonic(&resolutions) {
            return Err(SchemaError::NonMonotonicResolutions { index });
        }
        if tile_width == 0 || tile_height == 0 {
            return Err(SchemaError::ZeroTileDimension {
                width: tile_width,
                height: tile_height,
            });
        }
        if coverage.is_degenerate() {
            return Err(SchemaError::DegenerateCoverage(coverage));
        }

        Ok(Self {
            resolutions,
            tile_width,
            tile_height,
            format,
            srs,
            coverage,
        })
    }

    /// The resolution ladder, in declaration order.
    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    /// Resolution of a specific level.
    pub fn resolution(&self, level: usize) -> Result<f64, SchemaError> {
        self.resolutions
            .get(level)
            .copied()
            .ok_or(SchemaError::UnknownLevel {
                level,
                levels: self.resolutions.len(),
            })
    }

    /// Number of levels in the ladder.
    pub fn level_count(&self) -> usize {
        self.resolutions.len()
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn srs(&self) -> &SpatialRef {
        &self.srs
    }

    /// Ground extent covered by the grid.
    pub fn coverage(&self) -> &Extent {
        &self.coverage
    }

    /// Top-left corner of the tile grid: column 0 starts at the coverage's
    /// west edge, row 0 at its north edge.
    pub fn grid_origin(&self) -> GroundPoint {
        GroundPoint::new(self.coverage.min_x(), self.coverage.max_y())
    }
}

/// Index of the first entry breaking strict monotonicity, if any.
fn first_non_monotonic(resolutions: &[f64]) -> Option<usize> {
    if resolutions.len() < 2 {
        return None;
    }
    let descending = resolutions[0] > resolutions[1];
    for (i, pair) in resolutions.windows(2).enumerate() {
        let ok = if descending {
            pair[0] > pair[1]
        } else {
            pair[0] < pair[1]
        };
        if !ok {
            return Some(i + 1);
        }
    }
    None
}

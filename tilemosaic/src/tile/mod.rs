//! Tile keys and view enumeration.
//!
//! A [`TileKey`] addresses one tile as (level, row, col); row 0 is the
//! northernmost row of the grid, matching raster row order, and columns
//! grow eastward. [`tiles_in_view`] turns a ground extent into the ordered
//! tile plan for a level: row-major, top-to-bottom then left-to-right, so
//! draw order is deterministic and overlapping tile edges composite the
//! same way on every render.

use crate::geo::Extent;
use crate::schema::{SchemaError, TilingSchema};
use std::fmt;

/// Unique address of one tile: level index plus grid position.
///
/// The (row, col) order mirrors raster indexing and is the convention used
/// everywhere in this crate, including cache file names and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Index into the schema's resolution ladder.
    pub level: u8,
    /// Grid row, 0 at the coverage's north edge, growing southward.
    pub row: u32,
    /// Grid column, 0 at the coverage's west edge, growing eastward.
    pub col: u32,
}

impl TileKey {
    /// Create a new tile key.
    pub fn new(level: u8, row: u32, col: u32) -> Self {
        Self { level, row, col }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.row, self.col)
    }
}

/// A tile key together with its ground extent.
///
/// The extent is derived from the key and schema at construction and never
/// mutated afterwards; re-deriving it later is unnecessary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileInfo {
    pub key: TileKey,
    pub extent: Extent,
}

impl TileInfo {
    /// Derive the tile's ground extent from its key.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownLevel`] if the key's level is outside the
    /// schema's ladder.
    pub fn from_key(schema: &TilingSchema, key: TileKey) -> Result<Self, SchemaError> {
        let resolution = schema.resolution(key.level as usize)?;
        let span_x = resolution * schema.tile_width() as f64;
        let span_y = resolution * schema.tile_height() as f64;
        let origin = schema.grid_origin();

        let min_x = origin.x + key.col as f64 * span_x;
        let max_y = origin.y - key.row as f64 * span_y;

        Ok(Self {
            key,
            extent: Extent::new(min_x, max_y - span_y, min_x + span_x, max_y),
        })
    }
}

/// Fraction of a tile span tolerated as floating-point noise on grid
/// boundaries. Keeps an extent edge that lands exactly on a tile border
/// from dragging in the neighbouring row or column.
const GRID_EPSILON: f64 = 1e-9;

/// Enumerate the tiles of `level` intersecting `extent`, row-major.
///
/// The extent is clipped to the schema's coverage first; an extent wholly
/// outside coverage yields an empty plan, which is not an error.
///
/// # Errors
///
/// [`SchemaError::UnknownLevel`] for a level outside the ladder.
pub fn tiles_in_view(
    schema: &TilingSchema,
    extent: &Extent,
    level: usize,
) -> Result<Vec<TileInfo>, SchemaError> {
    let resolution = schema.resolution(level)?;
    let span_x = resolution * schema.tile_width() as f64;
    let span_y = resolution * schema.tile_height() as f64;
    let origin = schema.grid_origin();

    let clipped = match extent.intersection(schema.coverage()) {
        Some(clipped) if !clipped.is_degenerate() => clipped,
        _ => return Ok(Vec::new()),
    };

    let first_col = grid_floor((clipped.min_x() - origin.x) / span_x);
    let last_col = grid_ceil((clipped.max_x() - origin.x) / span_x) - 1;
    let first_row = grid_floor((origin.y - clipped.max_y()) / span_y);
    let last_row = grid_ceil((origin.y - clipped.min_y()) / span_y) - 1;

    let mut tiles =
        Vec::with_capacity(((last_row - first_row + 1) * (last_col - first_col + 1)) as usize);
    for row in first_row..=last_row {
        for col in first_col..=last_col {
            let key = TileKey::new(level as u8, row as u32, col as u32);
            tiles.push(TileInfo::from_key(schema, key)?);
        }
    }

    Ok(tiles)
}

fn grid_floor(index: f64) -> i64 {
    (index + GRID_EPSILON).floor().max(0.0) as i64
}

fn grid_ceil(index: f64) -> i64 {
    (index - GRID_EPSILON).ceil().max(1.0) as i64
}

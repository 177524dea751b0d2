//! Tilemosaic - tiled map imagery as a georeferenced mosaic
//!
//! This library turns a requested map extent into a set of raster tiles:
//! it selects the nearest zoom level of a tiling schema, enumerates the
//! tiles intersecting the extent, resolves each one through a disk cache
//! before falling back to network fetch, writes world-file and
//! spatial-reference sidecars so every cached raster is self-describing,
//! and hands ready tiles to a rendering collaborator in deterministic
//! order.
//!
//! The hosts supply the edges: a schema catalog, a reprojection engine
//! and a rendering surface, each behind a small trait.

pub mod cache;
pub mod fetch;
pub mod geo;
pub mod georef;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod schema;
pub mod tile;

pub use cache::{CacheWriteError, FileCache};
pub use fetch::{FetchError, ReqwestFetcher, RetryPolicy, TileFetcher};
pub use geo::{Extent, ExtentProjector, GroundPoint, ProjectionError, Reprojector, SpatialRef};
pub use pipeline::{
    Pipeline, PipelineConfig, RasterRenderer, ReadyTile, RenderError, RenderReport, SurfaceError,
    ViewRequest,
};
pub use provider::{LayerConfig, RequestBuilder, SchemaProvider, UrlTemplateBuilder};
pub use schema::{select_level, ImageFormat, SchemaError, TiePolicy, TilingSchema};
pub use tile::{tiles_in_view, TileInfo, TileKey};

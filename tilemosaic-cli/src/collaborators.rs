//! Host-side implementations of the library's collaborator interfaces.
//!
//! The library keeps projection math and the rendering surface external;
//! the CLI brings a minimal reprojection engine (WGS 84 ↔ Web Mercator,
//! the only pair its catalog needs) and a renderer that reports composited
//! tiles instead of painting them.

use std::f64::consts::PI;
use tilemosaic::{
    Extent, GroundPoint, ProjectionError, RasterRenderer, ReadyTile, Reprojector, SpatialRef,
    SurfaceError,
};
use tracing::info;

/// WGS 84 semi-major axis in meters.
const EARTH_RADIUS: f64 = 6378137.0;

/// Reprojection engine for the WGS 84 / Web Mercator pair.
///
/// The legacy EPSG:102113 code is treated as Web Mercator. Any other
/// reference is reported unsupported, which the pipeline surfaces as a
/// fatal projection error.
pub struct WebMercatorReprojector;

enum Known {
    Geographic,
    Mercator,
}

impl WebMercatorReprojector {
    fn classify(srs: &SpatialRef) -> Option<Known> {
        match srs.code() {
            "EPSG:4326" => Some(Known::Geographic),
            "EPSG:3857" | "EPSG:102113" => Some(Known::Mercator),
            _ => None,
        }
    }

    fn to_mercator(p: GroundPoint) -> GroundPoint {
        let x = EARTH_RADIUS * p.x.to_radians();
        let y = EARTH_RADIUS * (p.y.to_radians().tan().asinh());
        GroundPoint::new(x, y)
    }

    fn to_geographic(p: GroundPoint) -> GroundPoint {
        let lon = (p.x / EARTH_RADIUS).to_degrees();
        let lat = (p.y / EARTH_RADIUS).sinh().atan() * 180.0 / PI;
        GroundPoint::new(lon, lat)
    }
}

impl Reprojector for WebMercatorReprojector {
    fn project_extent(
        &self,
        extent: &Extent,
        source: &SpatialRef,
        target: &SpatialRef,
    ) -> Result<Extent, ProjectionError> {
        let from = Self::classify(source).ok_or_else(|| ProjectionError::Unsupported {
            code: source.code().to_string(),
        })?;
        let to = Self::classify(target).ok_or_else(|| ProjectionError::Unsupported {
            code: target.code().to_string(),
        })?;

        let convert: fn(GroundPoint) -> GroundPoint = match (from, to) {
            (Known::Geographic, Known::Mercator) => Self::to_mercator,
            (Known::Mercator, Known::Geographic) => Self::to_geographic,
            // Same family (e.g. EPSG:3857 vs the legacy alias).
            _ => |p| p,
        };

        let min = convert(GroundPoint::new(extent.min_x(), extent.min_y()));
        let max = convert(GroundPoint::new(extent.max_x(), extent.max_y()));
        Ok(Extent::new(min.x, min.y, max.x, max.y))
    }
}

/// Renderer that logs each composited tile in draw order.
///
/// Stands in for a real display surface: the pipeline's presentation
/// contract (ordering, reprojection flag) is honored, the paint itself
/// is a log line.
#[derive(Default)]
pub struct ConsoleRenderer {
    drawn: usize,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles composited so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RasterRenderer for ConsoleRenderer {
    fn draw_raster(&mut self, tile: &ReadyTile) -> Result<(), SurfaceError> {
        self.drawn += 1;
        info!(
            tile = %tile.key,
            path = %tile.path.display(),
            from_cache = tile.from_cache,
            needs_reproject = tile.needs_reproject,
            "composited"
        );
        println!("{}", tile.path.display());
        Ok(())
    }
}

//! Ground-space geometry types.
//!
//! Provides the extent, point, and spatial-reference types shared by the
//! tiling schema, the enumerator, and the pipeline, plus the per-render
//! view transform that turns a center point and resolution into the ground
//! extent actually requested.

mod projector;

pub use projector::{ExtentProjector, ProjectionError, Reprojector};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in ground units (the units of a spatial reference, typically
/// meters or degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPoint {
    pub x: f64,
    pub y: f64,
}

impl GroundPoint {
    /// Create a new ground point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GroundPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in ground units.
///
/// Extents are plain data; operations that require non-degenerate input
/// (the extent projector, the view transform) validate at their own
/// boundary rather than in the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Extent {
    /// Create a new extent from its corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Width of the extent in ground units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the extent in ground units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point of the extent.
    pub fn center(&self) -> GroundPoint {
        GroundPoint::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// True if the extent has zero or negative span on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// True if this extent and `other` share any area.
    ///
    /// Touching edges count as intersecting; this keeps tiles whose border
    /// lies exactly on the view boundary in the draw set.
    pub fn intersects(&self, other: &Extent) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// The overlapping region of two extents, or `None` when they are
    /// disjoint.
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);

        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Extent::new(min_x, min_y, max_x, max_y))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// A spatial reference identified by an authority code such as `EPSG:3857`.
///
/// Two references are the same system iff their codes match; the defining
/// parameters live with the external reprojection service, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpatialRef(String);

impl SpatialRef {
    /// Create a spatial reference from an authority code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// WGS 84 geographic coordinates (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::new("EPSG:4326")
    }

    /// Web Mercator (EPSG:3857), the projection used by most public tile
    /// services.
    pub fn web_mercator() -> Self {
        Self::new("EPSG:3857")
    }

    /// The legacy ESRI code for Web Mercator (EPSG:102113), still used by
    /// older schema catalogs.
    pub fn web_mercator_legacy() -> Self {
        Self::new("EPSG:102113")
    }

    /// The Dutch national grid, RD New (EPSG:28992).
    pub fn rd_new() -> Self {
        Self::new("EPSG:28992")
    }

    /// The authority code, e.g. `EPSG:3857`.
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The transform for one render call: a center point, a resolution and the
/// view's pixel dimensions.
///
/// Recomputed on every render; never stored. The extent it produces is the
/// ground area the view actually covers at the requested resolution, which
/// can differ slightly from the caller's extent after projection.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    center: GroundPoint,
    resolution: f64,
    width_px: u32,
    height_px: u32,
}

impl ViewTransform {
    /// Create a view transform.
    ///
    /// # Arguments
    ///
    /// * `center` - Ground-space center of the view
    /// * `resolution` - Ground units per pixel
    /// * `width_px` / `height_px` - View dimensions in pixels
    pub fn new(center: GroundPoint, resolution: f64, width_px: u32, height_px: u32) -> Self {
        Self {
            center,
            resolution,
            width_px,
            height_px,
        }
    }

    /// The resolution in ground units per pixel.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Ground extent covered by the view at this transform.
    pub fn extent(&self) -> Extent {
        let half_w = self.width_px as f64 * self.resolution / 2.0;
        let half_h = self.height_px as f64 * self.resolution / 2.0;
        Extent::new(
            self.center.x - half_w,
            self.center.y - half_h,
            self.center.x + half_w,
            self.center.y + half_h,
        )
    }
}

/// Ground resolution implied by fitting `extent` across `width_px` pixels.
pub fn ground_resolution(extent: &Extent, width_px: u32) -> f64 {
    extent.width() / width_px as f64
}

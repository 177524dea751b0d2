//! Georeferencing sidecars for cached tiles.
//!
//! Two artifacts make a cached raster self-describing:
//!
//! - a **world file** (`.jgw`/`.pgw`/`.tfw`) carrying the affine
//!   pixel-to-ground transform as six newline-separated decimal values,
//! - a **spatial-reference sidecar** (`<file>.aux.xml`) declaring the
//!   coordinate system in well-known text.
//!
//! Both are derived once, at cache-write time, so later consumers place
//! the raster without re-deriving any geometry. Tiles are north-up only:
//! the rotation terms of the world file are always zero.

use crate::geo::{Extent, SpatialRef};
use crate::schema::TilingSchema;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Well-known text for WGS 84 (EPSG:4326).
const WKT_WGS84: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

/// Well-known text for Web Mercator (EPSG:3857 and the legacy 102113).
const WKT_WEB_MERCATOR: &str = r#"PROJCS["WGS_1984_Web_Mercator_Auxiliary_Sphere",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Mercator_Auxiliary_Sphere"],PARAMETER["False_Easting",0.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",0.0],PARAMETER["Standard_Parallel_1",0.0],PARAMETER["Auxiliary_Sphere_Type",0.0],UNIT["Meter",1.0]]"#;

/// Well-known text for the Dutch RD New grid (EPSG:28992).
const WKT_RD_NEW: &str = r#"PROJCS["RD_New",GEOGCS["GCS_Amersfoort",DATUM["D_Amersfoort",SPHEROID["Bessel_1841",6377397.155,299.1528128]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Double_Stereographic"],PARAMETER["False_Easting",155000.0],PARAMETER["False_Northing",463000.0],PARAMETER["Central_Meridian",5.38763888888889],PARAMETER["Scale_Factor",0.9999079],PARAMETER["Latitude_Of_Origin",52.15616055555555],UNIT["Meter",1.0]]"#;

/// Well-known text for a spatial reference, from the fixed sidecar table.
///
/// Returns `None` for identifiers outside the table; callers treat that
/// as "no sidecar", not as an error.
fn well_known_text(srs: &SpatialRef) -> Option<&'static str> {
    match srs.code() {
        "EPSG:4326" => Some(WKT_WGS84),
        "EPSG:3857" | "EPSG:102113" => Some(WKT_WEB_MERCATOR),
        "EPSG:28992" => Some(WKT_RD_NEW),
        _ => None,
    }
}

/// Path of the world file belonging to `tile_path`, or `None` when the
/// schema's format has no world-file convention.
pub fn world_file_path(tile_path: &Path, schema: &TilingSchema) -> Option<PathBuf> {
    schema
        .format()
        .world_file_extension()
        .map(|ext| tile_path.with_extension(ext))
}

/// Path of the spatial-reference sidecar belonging to `tile_path`.
pub fn srs_sidecar_path(tile_path: &Path) -> PathBuf {
    let mut name = tile_path.as_os_str().to_os_string();
    name.push(".aux.xml");
    PathBuf::from(name)
}

/// Write the world file for a tile.
///
/// The six lines, in canonical order: pixel size x, 0, 0, pixel size y
/// (negated, raster row 0 is the tile's top), origin x (extent min x),
/// origin y (extent max y). Returns the sidecar path, or `None` when the
/// format has no world-file extension (not an error; the raster is still
/// usable).
pub fn write_world_file(
    tile_path: &Path,
    extent: &Extent,
    schema: &TilingSchema,
) -> io::Result<Option<PathBuf>> {
    let Some(path) = world_file_path(tile_path, schema) else {
        return Ok(None);
    };

    let pixel_size_x = extent.width() / schema.tile_width() as f64;
    let pixel_size_y = -(extent.height() / schema.tile_height() as f64);

    let content = format!(
        "{}\n0\n0\n{}\n{}\n{}\n",
        pixel_size_x,
        pixel_size_y,
        extent.min_x(),
        extent.max_y()
    );
    fs::write(&path, content)?;

    Ok(Some(path))
}

/// Write the spatial-reference sidecar for a tile.
///
/// Identifiers outside the fixed table produce no sidecar and no error;
/// downstream consumers can still succeed using the in-memory reference.
pub fn write_srs_sidecar(tile_path: &Path, srs: &SpatialRef) -> io::Result<Option<PathBuf>> {
    let Some(wkt) = well_known_text(srs) else {
        return Ok(None);
    };

    let path = srs_sidecar_path(tile_path);
    let content = format!(
        "<PAMDataset>\n  <SRS>{}</SRS>\n</PAMDataset>\n",
        wkt
    );
    fs::write(&path, content)?;

    Ok(Some(path))
}

/// Make sure both sidecars exist for an already-cached tile.
///
/// Checked independently of the cache hit itself: a crash between the
/// byte-write and the sidecar-writes leaves a valid cache entry with
/// missing metadata, and this heals it on the next render.
pub fn ensure_sidecars(
    tile_path: &Path,
    extent: &Extent,
    schema: &TilingSchema,
) -> io::Result<()> {
    if let Some(path) = world_file_path(tile_path, schema) {
        if !path.is_file() {
            write_world_file(tile_path, extent, schema)?;
        }
    }
    if well_known_text(schema.srs()).is_some() && !srs_sidecar_path(tile_path).is_file() {
        write_srs_sidecar(tile_path, schema.srs())?;
    }
    Ok(())
}

/// Alternative strategy: stamp the spatial reference directly into the
/// raster dataset instead of writing a sidecar.
///
/// More expensive than sidecar files and needs a raster-capable backend,
/// so the pipeline never invokes it; hosts with such a backend can run it
/// as a post-pass over cached entries.
pub trait SpatialRefStamper: Send + Sync {
    /// Rewrite `raster` in place so it carries `srs` internally.
    fn stamp(&self, raster: &Path, srs: &SpatialRef) -> io::Result<()>;
}

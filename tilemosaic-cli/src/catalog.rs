//! Layer catalog.
//!
//! The library treats the schema catalog as an external collaborator;
//! this is the CLI's concrete one. It ships a couple of built-in global
//! Web Mercator layers and can merge more from a JSON file:
//!
//! ```json
//! [
//!   { "id": "my-layer", "url": "https://tiles.example.com/{z}/{x}/{y}.png",
//!     "format": "png", "levels": 18 }
//! ]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tilemosaic::{
    Extent, ImageFormat, LayerConfig, SchemaError, SchemaProvider, SpatialRef, TilingSchema,
    UrlTemplateBuilder,
};

/// Half the Web Mercator world span in meters.
const MERCATOR_HALF: f64 = 20037508.342789244;

/// Ground resolution of level 0: the world across one 256px tile.
const LEVEL0_RESOLUTION: f64 = 2.0 * MERCATOR_HALF / 256.0;

/// Tile edge length used by all catalog layers.
const TILE_SIZE: u32 = 256;

/// One catalog entry: a global Web Mercator XYZ layer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDef {
    /// Identifier used on the command line.
    pub id: String,
    /// URL template with `{z}`, `{x}`, `{y}` placeholders.
    pub url: String,
    /// Image format the service returns.
    pub format: ImageFormat,
    /// Number of zoom levels, starting at the one-tile world.
    pub levels: u8,
}

/// Errors loading a catalog file.
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "failed to read catalog file: {}", e),
            CatalogError::Parse(e) => write!(f, "failed to parse catalog file: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

/// The CLI's schema provider: built-in layers plus optional file entries.
pub struct Catalog {
    layers: BTreeMap<String, LayerDef>,
}

impl Catalog {
    /// Catalog with only the built-in layers.
    pub fn builtin() -> Self {
        let mut layers = BTreeMap::new();
        for def in [
            LayerDef {
                id: "osm".to_string(),
                url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                format: ImageFormat::Png,
                levels: 20,
            },
            LayerDef {
                id: "arcgis-imagery".to_string(),
                url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
                format: ImageFormat::Jpg,
                levels: 20,
            },
        ] {
            layers.insert(def.id.clone(), def);
        }
        Self { layers }
    }

    /// Built-in layers merged with entries from a JSON file; file entries
    /// win on identifier collisions.
    pub fn with_file(path: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        let content = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        let defs: Vec<LayerDef> = serde_json::from_str(&content).map_err(CatalogError::Parse)?;
        for def in defs {
            catalog.layers.insert(def.id.clone(), def);
        }
        Ok(catalog)
    }

    /// All layer definitions, sorted by identifier.
    pub fn layers(&self) -> impl Iterator<Item = &LayerDef> {
        self.layers.values()
    }
}

impl SchemaProvider for Catalog {
    fn layer_config(&self, layer: &str) -> Result<LayerConfig, SchemaError> {
        let def = self
            .layers
            .get(layer)
            .ok_or_else(|| SchemaError::UnknownLayer(layer.to_string()))?;

        let resolutions: Vec<f64> = (0..def.levels)
            .map(|level| LEVEL0_RESOLUTION / 2f64.powi(level as i32))
            .collect();

        let schema = TilingSchema::new(
            resolutions,
            TILE_SIZE,
            TILE_SIZE,
            def.format,
            SpatialRef::web_mercator(),
            Extent::new(-MERCATOR_HALF, -MERCATOR_HALF, MERCATOR_HALF, MERCATOR_HALF),
        )?;

        Ok(LayerConfig {
            schema,
            request_builder: Arc::new(UrlTemplateBuilder::new(def.url.clone())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_layers_present() {
        let catalog = Catalog::builtin();
        let ids: Vec<&str> = catalog.layers().map(|d| d.id.as_str()).collect();
        assert!(ids.contains(&"osm"));
        assert!(ids.contains(&"arcgis-imagery"));
    }

    #[test]
    fn test_builtin_schema_is_valid() {
        let catalog = Catalog::builtin();
        let config = catalog.layer_config("osm").unwrap();

        assert_eq!(config.schema.level_count(), 20);
        assert_eq!(config.schema.tile_width(), 256);
        assert_eq!(config.schema.srs(), &SpatialRef::web_mercator());
        // Level 0 spans the whole world across one tile.
        let level0 = config.schema.resolution(0).unwrap();
        assert!((level0 * 256.0 - 2.0 * MERCATOR_HALF).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_layer() {
        let catalog = Catalog::builtin();
        assert!(matches!(
            catalog.layer_config("nope"),
            Err(SchemaError::UnknownLayer(_))
        ));
    }

    #[test]
    fn test_file_entries_override_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "osm", "url": "https://mirror.example/{{z}}/{{x}}/{{y}}.png",
                 "format": "png", "levels": 12}}]"#
        )
        .unwrap();

        let catalog = Catalog::with_file(file.path()).unwrap();
        let osm = catalog.layers().find(|d| d.id == "osm").unwrap();
        assert_eq!(osm.url, "https://mirror.example/{z}/{x}/{y}.png");
        assert_eq!(catalog.layer_config("osm").unwrap().schema.level_count(), 12);
    }

    #[test]
    fn test_malformed_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            Catalog::with_file(file.path()),
            Err(CatalogError::Parse(_))
        ));
    }
}

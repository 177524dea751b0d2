//! URL-template request builder.
//!
//! Covers the common XYZ tile service shape, e.g.
//! `https://tile.example.com/{z}/{x}/{y}.png`. Placeholders:
//!
//! - `{z}` - level index
//! - `{x}` - column (west to east)
//! - `{y}` - row (north to south)

use super::RequestBuilder;
use crate::tile::TileInfo;

/// Request builder substituting tile coordinates into a URL template.
///
/// # Example
///
/// ```
/// use tilemosaic::provider::{RequestBuilder, UrlTemplateBuilder};
/// # use tilemosaic::geo::{Extent, SpatialRef};
/// # use tilemosaic::schema::{ImageFormat, TilingSchema};
/// # use tilemosaic::tile::{TileInfo, TileKey};
///
/// let builder = UrlTemplateBuilder::new("https://tile.example.com/{z}/{x}/{y}.png");
/// # let schema = TilingSchema::new(
/// #     vec![1.0], 256, 256, ImageFormat::Png,
/// #     SpatialRef::web_mercator(), Extent::new(0.0, 0.0, 512.0, 512.0),
/// # ).unwrap();
/// let tile = TileInfo::from_key(&schema, TileKey::new(0, 1, 0)).unwrap();
/// assert_eq!(builder.address(&tile), "https://tile.example.com/0/0/1.png");
/// ```
#[derive(Debug, Clone)]
pub struct UrlTemplateBuilder {
    template: String,
}

impl UrlTemplateBuilder {
    /// Create a builder from a template containing `{z}`, `{x}`, `{y}`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The raw template string.
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl RequestBuilder for UrlTemplateBuilder {
    fn address(&self, tile: &TileInfo) -> String {
        self.template
            .replace("{z}", &tile.key.level.to_string())
            .replace("{x}", &tile.key.col.to_string())
            .replace("{y}", &tile.key.row.to_string())
    }
}

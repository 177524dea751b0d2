//! Schema provider and request builder interfaces.
//!
//! The catalog of available layers lives with the host; the pipeline only
//! needs two capabilities from it: resolve a layer identifier into an
//! immutable [`TilingSchema`], and turn any enumerated tile into a fetch
//! address. Both are traits so hosts can back them with static tables,
//! config files or remote service discovery.

mod template;

pub use template::UrlTemplateBuilder;

use crate::schema::{SchemaError, TilingSchema};
use crate::tile::TileInfo;
use std::sync::Arc;

/// Builds the fetch address for a tile.
///
/// Must be a pure function of the tile's key and extent: the same tile
/// always yields the same address, so cached entries stay valid.
pub trait RequestBuilder: Send + Sync {
    /// The URI-like address to fetch this tile from.
    fn address(&self, tile: &TileInfo) -> String;
}

/// Everything the pipeline needs to serve one layer.
#[derive(Clone)]
pub struct LayerConfig {
    /// The layer's tiling schema.
    pub schema: TilingSchema,
    /// Address builder for the layer's tile service.
    pub request_builder: Arc<dyn RequestBuilder>,
}

/// Resolves layer identifiers into layer configurations.
pub trait SchemaProvider: Send + Sync {
    /// Look up the configuration for `layer`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownLayer`] when the identifier is not in the
    /// catalog.
    fn layer_config(&self, layer: &str) -> Result<LayerConfig, SchemaError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Extent, SpatialRef};
    use crate::schema::ImageFormat;
    use crate::tile::TileKey;

    struct FixedBuilder;

    impl RequestBuilder for FixedBuilder {
        fn address(&self, tile: &TileInfo) -> String {
            format!("tile://{}", tile.key)
        }
    }

    struct SingleLayerProvider {
        config: LayerConfig,
    }

    impl SchemaProvider for SingleLayerProvider {
        fn layer_config(&self, layer: &str) -> Result<LayerConfig, SchemaError> {
            if layer == "only" {
                Ok(self.config.clone())
            } else {
                Err(SchemaError::UnknownLayer(layer.to_string()))
            }
        }
    }

    fn sample_config() -> LayerConfig {
        LayerConfig {
            schema: TilingSchema::new(
                vec![1.0],
                256,
                256,
                ImageFormat::Png,
                SpatialRef::web_mercator(),
                Extent::new(0.0, 0.0, 256.0, 256.0),
            )
            .unwrap(),
            request_builder: Arc::new(FixedBuilder),
        }
    }

    #[test]
    fn test_known_layer_resolves() {
        let provider = SingleLayerProvider {
            config: sample_config(),
        };
        let config = provider.layer_config("only").unwrap();
        assert_eq!(config.schema.tile_width(), 256);
    }

    #[test]
    fn test_unknown_layer_errors() {
        let provider = SingleLayerProvider {
            config: sample_config(),
        };
        match provider.layer_config("missing") {
            Err(SchemaError::UnknownLayer(name)) => assert_eq!(name, "missing"),
            other => panic!("expected UnknownLayer, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_request_builder_is_pure() {
        let provider = SingleLayerProvider {
            config: sample_config(),
        };
        let config = provider.layer_config("only").unwrap();
        let tile = TileInfo::from_key(&config.schema, TileKey::new(0, 0, 0)).unwrap();

        let a = config.request_builder.address(&tile);
        let b = config.request_builder.address(&tile);
        assert_eq!(a, b);
        assert_eq!(a, "tile://0/0/0");
    }
}

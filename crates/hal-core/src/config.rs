//! Configuration for metadata, strategies and renderers
//!
//! Mirrors the layout of a `hal` configuration section:
//!
//! ```json
//! {
//!   "metadata_map": [
//!     {"__class__": "RouteBasedResourceMetadata", "resource_class": "Widget",
//!      "route": "widget", "extractor": "widget"}
//!   ],
//!   "resource_generator": {
//!     "strategies": {"RouteBasedResourceMetadata": "RouteBasedResourceStrategy"}
//!   },
//!   "renderer": {"json": {"pretty": false}, "xml": {"indent": 4}}
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    HalError, HalResult,
    metadata::{ClassRegistry, MetadataKind, MetadataMap},
    strategy::default_strategy,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HalConfig {
    /// One entry per class, see [`MetadataMap::from_config`]
    pub metadata_map: Vec<Value>,
    /// Strategy registrations
    pub resource_generator: ResourceGeneratorConfig,
    /// Renderer options
    pub renderer: RendererConfig,
}

impl HalConfig {
    /// Parse configuration from a JSON document
    ///
    /// # Errors
    /// Returns [`HalError::InvalidConfig`] for malformed JSON or fields of the
    /// wrong type.
    pub fn from_json_str(json: &str) -> HalResult<Self> {
        serde_json::from_str(json).map_err(|e| HalError::invalid_config(e.to_string()))
    }

    /// Build the metadata map described by `metadata_map`
    ///
    /// # Errors
    /// See [`MetadataMap::from_config`].
    pub fn build_metadata_map(&self, classes: &ClassRegistry) -> HalResult<MetadataMap> {
        MetadataMap::from_config(&self.metadata_map, classes)
    }
}

/// Metadata kind name to strategy name
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResourceGeneratorConfig {
    /// Strategy name per metadata kind name
    pub strategies: IndexMap<String, String>,
}

impl Default for ResourceGeneratorConfig {
    fn default() -> Self {
        Self {
            strategies: MetadataKind::ALL
                .into_iter()
                .map(|kind| (kind.as_str().to_string(), default_strategy(kind).name().to_string()))
                .collect(),
        }
    }
}

/// Renderer options
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RendererConfig {
    /// JSON renderer options
    pub json: JsonRendererConfig,
    /// XML renderer options
    pub xml: XmlRendererConfig,
}

/// JSON renderer options
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JsonRendererConfig {
    /// Pretty-print output
    pub pretty: bool,
}

impl Default for JsonRendererConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// XML renderer options
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct XmlRendererConfig {
    /// Spaces per nesting level; 0 writes everything on one line
    pub indent: usize,
}

impl Default for XmlRendererConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

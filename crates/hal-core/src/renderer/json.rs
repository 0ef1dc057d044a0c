//! HAL+JSON renderer

use tracing::debug;

use super::{HAL_JSON, Renderer};
use crate::{HalResult, config::JsonRendererConfig, domain::Resource};

/// Renders the normalized resource map with serde_json
///
/// Key order follows insertion order: data, then `_links`, then `_embedded`.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Create a renderer
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Renderer configured from `config`
    pub fn from_config(config: &JsonRendererConfig) -> Self {
        Self::new(config.pretty)
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer for JsonRenderer {
    fn media_type(&self) -> &'static str {
        HAL_JSON
    }

    fn render(&self, resource: &Resource) -> HalResult<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(resource)?
        } else {
            serde_json::to_string(resource)?
        };
        debug!(bytes = output.len(), pretty = self.pretty, "Rendered HAL+JSON");
        Ok(output)
    }
}

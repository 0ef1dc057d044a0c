//! Renderers - serialize resources to HAL wire formats

pub mod json;
pub mod xml;

pub use json::JsonRenderer;
pub use xml::XmlRenderer;

use crate::{HalResult, domain::Resource};

/// Media type of HAL+JSON documents
pub const HAL_JSON: &str = "application/hal+json";

/// Media type of HAL+XML documents
pub const HAL_XML: &str = "application/hal+xml";

/// Serializes a resource
pub trait Renderer: Send + Sync {
    /// Media type of the rendered document
    fn media_type(&self) -> &'static str;

    /// Render `resource`
    ///
    /// # Errors
    /// Returns an encoding error for values the format cannot express.
    fn render(&self, resource: &Resource) -> HalResult<String>;
}

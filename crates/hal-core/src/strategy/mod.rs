//! Strategies - the conversion algorithm bound to each metadata kind
//!
//! Each built-in strategy is a unit struct that checks it was handed its own
//! metadata variant and delegates to the shared helpers in [`extract`].
//! Strategies call back into the generator for nested objects, so the two
//! form a mutual recursion bounded by each resource's `max_depth`.

pub mod extract;
pub mod route;
pub mod url;

use std::sync::Arc;

pub use extract::{CollectionLinks, extract_collection, extract_instance};
pub use route::{RouteBasedCollectionStrategy, RouteBasedResourceStrategy};
pub use url::{UrlBasedCollectionStrategy, UrlBasedResourceStrategy};

use crate::{
    HalError, HalResult,
    domain::{Entity, Resource, ServerRequest},
    generator::ResourceGenerator,
    metadata::{Metadata, MetadataKind},
};

/// Converts an object into a resource according to its metadata
pub trait Strategy: Send + Sync {
    /// Name used in configuration and error messages
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Build the resource for `instance`
    ///
    /// `depth` is the nesting level of `instance`: 0 for the object handed
    /// to [`ResourceGenerator::from_object`], one more for each nested
    /// object or collection item.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::UnexpectedMetadataType`] when `metadata` is not
    /// the variant this strategy handles; propagates extraction, link
    /// generation and resource construction failures.
    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
        depth: usize,
    ) -> HalResult<Resource>;
}

/// Built-in strategy for each metadata kind
pub fn default_strategy(kind: MetadataKind) -> Arc<dyn Strategy> {
    match kind {
        MetadataKind::RouteBasedResource => Arc::new(RouteBasedResourceStrategy),
        MetadataKind::UrlBasedResource => Arc::new(UrlBasedResourceStrategy),
        MetadataKind::RouteBasedCollection => Arc::new(RouteBasedCollectionStrategy),
        MetadataKind::UrlBasedCollection => Arc::new(UrlBasedCollectionStrategy),
    }
}

/// Built-in strategy registered under `name`
///
/// # Errors
/// Returns [`HalError::InvalidStrategy`] for names that are not built-in
/// strategies.
pub fn builtin_strategy(name: &str) -> HalResult<Arc<dyn Strategy>> {
    MetadataKind::ALL
        .into_iter()
        .map(default_strategy)
        .find(|strategy| strategy.name() == name)
        .ok_or_else(|| HalError::InvalidStrategy(name.to_string()))
}

pub(crate) fn unexpected_metadata(strategy: &dyn Strategy, expected: MetadataKind, actual: &Metadata) -> HalError {
    HalError::unexpected_metadata(strategy.name(), expected.as_str(), actual.kind().as_str())
}

//! Resource generator
//!
//! Looks up the metadata for an object's class and hands the object to the
//! strategy registered for that metadata kind.

pub mod link;

use serde_json::{Map, Value};
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::{debug, trace};

pub use link::LinkGenerator;

use crate::{
    HalError, HalResult,
    config::ResourceGeneratorConfig,
    domain::{Entity, ExtractorProvider, Link, Resource, ServerRequest},
    metadata::{MetadataKind, MetadataMap},
    strategy::{Strategy, builtin_strategy, default_strategy},
};

/// Turns plain data and registered objects into resources
///
/// # Examples
/// ```
/// # use std::sync::Arc;
/// # use halrs::prelude::*;
/// # use halrs::infrastructure::{ExtractorRegistry, Request, RouteTemplates};
/// let generator = ResourceGenerator::new(
///     Arc::new(MetadataMap::new()),
///     Arc::new(ExtractorRegistry::new()),
///     LinkGenerator::new(Arc::new(RouteTemplates::new())),
/// );
///
/// let mut data = serde_json::Map::new();
/// data.insert("status".to_string(), "ok".into());
///
/// let resource = generator.from_array(data, Some("/status")).unwrap();
/// assert_eq!(resource.links().len(), 1);
/// ```
pub struct ResourceGenerator {
    metadata_map: Arc<MetadataMap>,
    extractors: Arc<dyn ExtractorProvider>,
    link_generator: LinkGenerator,
    strategies: HashMap<MetadataKind, Arc<dyn Strategy>>,
}

impl ResourceGenerator {
    /// Create a generator with the built-in strategy for every metadata kind
    pub fn new(
        metadata_map: Arc<MetadataMap>,
        extractors: Arc<dyn ExtractorProvider>,
        link_generator: LinkGenerator,
    ) -> Self {
        let mut generator = Self::without_strategies(metadata_map, extractors, link_generator);
        for kind in MetadataKind::ALL {
            generator.add_strategy(kind, default_strategy(kind));
        }
        generator
    }

    /// Create a generator with no strategies registered
    pub fn without_strategies(
        metadata_map: Arc<MetadataMap>,
        extractors: Arc<dyn ExtractorProvider>,
        link_generator: LinkGenerator,
    ) -> Self {
        Self {
            metadata_map,
            extractors,
            link_generator,
            strategies: HashMap::new(),
        }
    }

    /// Create a generator whose strategies come from configuration
    ///
    /// # Errors
    /// See [`ResourceGenerator::add_strategy_by_name`].
    pub fn from_config(
        config: &ResourceGeneratorConfig,
        metadata_map: Arc<MetadataMap>,
        extractors: Arc<dyn ExtractorProvider>,
        link_generator: LinkGenerator,
    ) -> HalResult<Self> {
        let mut generator = Self::without_strategies(metadata_map, extractors, link_generator);
        for (metadata_type, strategy) in &config.strategies {
            generator.add_strategy_by_name(metadata_type, strategy)?;
        }
        Ok(generator)
    }

    /// Register `strategy` for `kind`, replacing any previous one
    pub fn add_strategy(&mut self, kind: MetadataKind, strategy: Arc<dyn Strategy>) {
        debug!(kind = %kind, strategy = strategy.name(), "Registered strategy");
        self.strategies.insert(kind, strategy);
    }

    /// Register a built-in strategy by name for a metadata kind given by name
    ///
    /// # Errors
    /// - [`HalError::UnknownMetadataType`] if `metadata_type` names no
    ///   metadata kind
    /// - [`HalError::InvalidStrategy`] if `strategy` names no built-in
    ///   strategy
    pub fn add_strategy_by_name(&mut self, metadata_type: &str, strategy: &str) -> HalResult<()> {
        let kind: MetadataKind = metadata_type.parse()?;
        let strategy = builtin_strategy(strategy)?;
        self.add_strategy(kind, strategy);
        Ok(())
    }

    /// Whether a strategy is registered for `kind`
    pub fn has_strategy(&self, kind: MetadataKind) -> bool {
        self.strategies.contains_key(&kind)
    }

    /// Metadata consulted by [`ResourceGenerator::from_object`]
    pub fn metadata_map(&self) -> &MetadataMap {
        &self.metadata_map
    }

    /// Extractors referenced by metadata
    pub fn extractors(&self) -> &dyn ExtractorProvider {
        self.extractors.as_ref()
    }

    /// Link generator used by route-based strategies
    pub fn link_generator(&self) -> &LinkGenerator {
        &self.link_generator
    }

    /// Wrap plain data, with a `self` link to `uri` when given
    ///
    /// No metadata lookup happens; nested values stay plain data.
    ///
    /// # Errors
    /// Returns a domain error for empty or reserved keys. The `uri` is used
    /// verbatim, so an empty string yields an empty `href`.
    pub fn from_array(&self, data: Map<String, Value>, uri: Option<&str>) -> HalResult<Resource> {
        let resource = Resource::from_map(data)?;
        match uri {
            Some(uri) => Ok(resource.with_link(Link::new("self", uri)?)),
            None => Ok(resource),
        }
    }

    /// Generate the resource for a registered object
    ///
    /// # Errors
    /// - [`HalError::InvalidObject`] if the object's class has no metadata
    /// - [`HalError::UnknownMetadataType`] if no strategy handles the
    ///   metadata kind
    /// - anything the strategy raises
    pub fn from_object(&self, instance: &dyn Entity, request: &dyn ServerRequest) -> HalResult<Resource> {
        self.from_object_at_depth(instance, request, 0)
    }

    /// [`ResourceGenerator::from_object`] for an object nested `depth` levels deep
    ///
    /// Strategies call this for nested objects and collection items.
    ///
    /// # Errors
    /// Same as [`ResourceGenerator::from_object`].
    pub fn from_object_at_depth(
        &self,
        instance: &dyn Entity,
        request: &dyn ServerRequest,
        depth: usize,
    ) -> HalResult<Resource> {
        let class = instance.class_id();
        let metadata = self
            .metadata_map
            .get(class)
            .map_err(|_| HalError::unknown_object(class))?;
        let kind = metadata.kind();

        let strategy = self.strategies.get(&kind).ok_or_else(|| {
            HalError::UnknownMetadataType(format!("no strategy registered for {kind} (class {class})"))
        })?;

        trace!(class = %class, kind = %kind, depth, "Generating resource");
        strategy.create_resource(instance, &metadata, self, request, depth)
    }
}

impl fmt::Debug for ResourceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut strategies: Vec<(MetadataKind, &str)> = self
            .strategies
            .iter()
            .map(|(kind, strategy)| (*kind, strategy.name()))
            .collect();
        strategies.sort();

        f.debug_struct("ResourceGenerator")
            .field("metadata_map", &self.metadata_map)
            .field("strategies", &strategies)
            .finish_non_exhaustive()
    }
}

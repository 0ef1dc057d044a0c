//! Resource metadata

use indexmap::IndexMap;

use super::DEFAULT_MAX_DEPTH;
use crate::domain::{ClassId, Params};

/// Single resource whose self link is generated from a route
///
/// Identifier substitution copies extracted fields into route parameters:
/// each `(field, placeholder)` pair of
/// [`identifiers_to_placeholders`](Self::identifiers_to_placeholders) whose
/// field is present sets `route_params[placeholder]`. The default mapping
/// is `id -> id`.
#[derive(Debug, Clone)]
pub struct RouteBasedResourceMetadata {
    /// Class described
    pub class: ClassId,
    /// Route name handed to the URL generator
    pub route: String,
    /// Name of the extractor in the extractor provider
    pub extractor: String,
    /// Extracted field to route placeholder mapping
    pub identifiers_to_placeholders: IndexMap<String, String>,
    /// Static route parameters
    pub route_params: Params,
    /// Deepest nesting level at which nested objects are still expanded
    pub max_depth: usize,
}

impl RouteBasedResourceMetadata {
    /// Metadata with the default `id -> id` mapping and no route parameters
    pub fn new(class: ClassId, route: impl Into<String>, extractor: impl Into<String>) -> Self {
        Self {
            class,
            route: route.into(),
            extractor: extractor.into(),
            identifiers_to_placeholders: IndexMap::from([("id".to_string(), "id".to_string())]),
            route_params: Params::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Use `resource_identifier` as the identifying field, filling `placeholder`
    ///
    /// Replaces the default `id -> id` mapping.
    pub fn with_identifier(
        mut self,
        resource_identifier: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        self.identifiers_to_placeholders.shift_remove("id");
        self.identifiers_to_placeholders
            .insert(resource_identifier.into(), placeholder.into());
        self
    }

    /// Replace the whole identifier mapping
    pub fn with_identifiers_to_placeholders(mut self, mapping: IndexMap<String, String>) -> Self {
        self.identifiers_to_placeholders = mapping;
        self
    }

    /// Set a static route parameter
    pub fn with_route_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_params.insert(name.into(), value.into());
        self
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Single resource whose self link is a fixed URL
#[derive(Debug, Clone)]
pub struct UrlBasedResourceMetadata {
    /// Class described
    pub class: ClassId,
    /// Self link href, used verbatim
    pub url: String,
    /// Name of the extractor in the extractor provider
    pub extractor: String,
    /// Deepest nesting level at which nested objects are still expanded
    pub max_depth: usize,
}

impl UrlBasedResourceMetadata {
    /// Metadata with the default nesting limit
    pub fn new(class: ClassId, url: impl Into<String>, extractor: impl Into<String>) -> Self {
        Self {
            class,
            url: url.into(),
            extractor: extractor.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

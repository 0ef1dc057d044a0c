//! Metadata map and class registry

use dashmap::{DashMap, mapref::entry::Entry};
use indexmap::IndexMap;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::{any::Any, collections::HashMap, sync::Arc};
use tracing::debug;

use super::{
    DEFAULT_MAX_DEPTH, Metadata, MetadataKind, PaginationParamType, RouteBasedCollectionMetadata,
    RouteBasedResourceMetadata, UrlBasedCollectionMetadata, UrlBasedResourceMetadata,
};
use crate::{
    HalError, HalResult,
    domain::{ClassId, Params},
};

/// Key naming the metadata kind of a configuration entry
pub const CLASS_KEY: &str = "__class__";

/// Thread-safe map from class to metadata
///
/// Holds at most one metadata entry per class. Lookups hand out `Arc`s, so
/// generation never holds a shard lock while recursing into nested objects.
///
/// # Examples
/// ```
/// # use halrs::metadata::{MetadataMap, UrlBasedResourceMetadata};
/// # use halrs::domain::ClassId;
/// #[derive(Debug)]
/// struct Widget;
///
/// let map = MetadataMap::new();
/// map.add(UrlBasedResourceMetadata::new(ClassId::of::<Widget>(), "/widget", "widget"))
///     .unwrap();
///
/// assert!(map.has(ClassId::of::<Widget>()));
/// ```
#[derive(Debug, Default)]
pub struct MetadataMap {
    entries: DashMap<ClassId, Arc<Metadata>>,
}

impl MetadataMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for its class
    ///
    /// # Errors
    /// Returns [`HalError::DuplicateMetadata`] if the class already has metadata.
    pub fn add(&self, metadata: impl Into<Metadata>) -> HalResult<()> {
        let metadata = metadata.into();
        let class = metadata.class();

        match self.entries.entry(class) {
            Entry::Occupied(_) => Err(HalError::DuplicateMetadata(class.name().to_string())),
            Entry::Vacant(slot) => {
                debug!(class = %class, kind = %metadata.kind(), "Registered metadata");
                slot.insert(Arc::new(metadata));
                Ok(())
            }
        }
    }

    /// Whether `class` has metadata
    pub fn has(&self, class: ClassId) -> bool {
        self.entries.contains_key(&class)
    }

    /// Metadata registered for `class`
    ///
    /// # Errors
    /// Returns [`HalError::UndefinedMetadata`] if the class has none.
    pub fn get(&self, class: ClassId) -> HalResult<Arc<Metadata>> {
        self.entries
            .get(&class)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                HalError::UndefinedMetadata(format!("no metadata registered for class {class}"))
            })
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a map from configuration entries
    ///
    /// Each entry is a map whose `__class__` key names the metadata kind and
    /// whose remaining keys are that kind's fields in snake_case.
    ///
    /// # Errors
    /// - [`HalError::InvalidConfig`] for an entry that is not a map, lacks
    ///   `__class__`, or lacks a required field
    /// - [`HalError::UndefinedMetadata`] for an unknown kind name
    /// - [`HalError::UndefinedClass`] for a class missing from `classes`
    /// - [`HalError::DuplicateMetadata`] for a second entry for one class
    pub fn from_config(entries: &[Value], classes: &ClassRegistry) -> HalResult<Self> {
        let map = Self::new();
        for entry in entries {
            map.add(metadata_from_config(entry, classes)?)?;
        }
        Ok(map)
    }
}

/// Name to class lookup for configuration-driven setup
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `name`
    pub fn register<T: ?Sized + Any>(mut self, name: impl Into<String>) -> Self {
        self.classes.insert(name.into(), ClassId::of::<T>());
        self
    }

    /// Class registered under `name`
    ///
    /// # Errors
    /// Returns [`HalError::UndefinedClass`] for an unknown name.
    pub fn resolve(&self, name: &str) -> HalResult<ClassId> {
        self.classes
            .get(name)
            .copied()
            .ok_or_else(|| HalError::UndefinedClass(name.to_string()))
    }
}

fn default_identifier() -> String {
    "id".to_string()
}

fn default_pagination_param() -> String {
    "page".to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Deserialize)]
struct RouteBasedResourceEntry {
    resource_class: String,
    route: String,
    extractor: String,
    #[serde(default = "default_identifier")]
    resource_identifier: String,
    #[serde(default = "default_identifier")]
    route_identifier_placeholder: String,
    #[serde(default)]
    identifiers_to_placeholders_mapping: IndexMap<String, String>,
    #[serde(default)]
    route_params: Params,
    #[serde(default = "default_max_depth")]
    max_depth: usize,
}

#[derive(Deserialize)]
struct UrlBasedResourceEntry {
    resource_class: String,
    url: String,
    extractor: String,
    #[serde(default = "default_max_depth")]
    max_depth: usize,
}

#[derive(Deserialize)]
struct RouteBasedCollectionEntry {
    collection_class: String,
    collection_relation: String,
    route: String,
    #[serde(default = "default_pagination_param")]
    pagination_param: String,
    #[serde(default)]
    pagination_param_type: PaginationParamType,
    #[serde(default)]
    route_params: Params,
    #[serde(default)]
    query_string_arguments: Params,
}

#[derive(Deserialize)]
struct UrlBasedCollectionEntry {
    collection_class: String,
    collection_relation: String,
    url: String,
    #[serde(default = "default_pagination_param")]
    pagination_param: String,
    #[serde(default)]
    pagination_param_type: PaginationParamType,
}

fn parse_entry<T: DeserializeOwned>(kind: MetadataKind, entry: &Value) -> HalResult<T> {
    T::deserialize(entry).map_err(|e| HalError::invalid_config(format!("{kind} entry: {e}")))
}

fn metadata_from_config(entry: &Value, classes: &ClassRegistry) -> HalResult<Metadata> {
    let object = entry
        .as_object()
        .ok_or_else(|| HalError::invalid_config("metadata entries must be maps"))?;
    let kind_name = object
        .get(CLASS_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            HalError::invalid_config(format!("metadata entry is missing the {CLASS_KEY} key"))
        })?;
    let kind: MetadataKind = kind_name
        .parse()
        .map_err(|_| HalError::UndefinedMetadata(kind_name.to_string()))?;

    let metadata = match kind {
        MetadataKind::RouteBasedResource => {
            let e: RouteBasedResourceEntry = parse_entry(kind, entry)?;
            let mut mapping = IndexMap::from([(e.resource_identifier, e.route_identifier_placeholder)]);
            mapping.extend(e.identifiers_to_placeholders_mapping);

            let mut metadata =
                RouteBasedResourceMetadata::new(classes.resolve(&e.resource_class)?, e.route, e.extractor)
                    .with_identifiers_to_placeholders(mapping)
                    .with_max_depth(e.max_depth);
            metadata.route_params = e.route_params;
            metadata.into()
        }
        MetadataKind::UrlBasedResource => {
            let e: UrlBasedResourceEntry = parse_entry(kind, entry)?;
            UrlBasedResourceMetadata::new(classes.resolve(&e.resource_class)?, e.url, e.extractor)
                .with_max_depth(e.max_depth)
                .into()
        }
        MetadataKind::RouteBasedCollection => {
            let e: RouteBasedCollectionEntry = parse_entry(kind, entry)?;
            RouteBasedCollectionMetadata::new(
                classes.resolve(&e.collection_class)?,
                e.collection_relation,
                e.route,
            )
            .with_pagination(e.pagination_param, e.pagination_param_type)
            .with_route_params(e.route_params)
            .with_query_string_arguments(e.query_string_arguments)
            .into()
        }
        MetadataKind::UrlBasedCollection => {
            let e: UrlBasedCollectionEntry = parse_entry(kind, entry)?;
            UrlBasedCollectionMetadata::new(
                classes.resolve(&e.collection_class)?,
                e.collection_relation,
                e.url,
            )
            .with_pagination(e.pagination_param, e.pagination_param_type)
            .into()
        }
    };

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Widget;

    #[derive(Debug)]
    struct WidgetList;

    fn classes() -> ClassRegistry {
        ClassRegistry::new()
            .register::<Widget>("Widget")
            .register::<WidgetList>("WidgetList")
    }

    #[test]
    fn test_add_and_get() {
        let map = MetadataMap::new();
        assert!(map.is_empty());

        map.add(UrlBasedResourceMetadata::new(ClassId::of::<Widget>(), "/w", "w"))
            .unwrap();

        assert_eq!(map.len(), 1);
        assert!(map.has(ClassId::of::<Widget>()));
        assert!(!map.has(ClassId::of::<WidgetList>()));
        assert_eq!(
            map.get(ClassId::of::<Widget>()).unwrap().kind(),
            MetadataKind::UrlBasedResource
        );
    }

    #[test]
    fn test_get_undefined() {
        let map = MetadataMap::new();
        assert!(matches!(
            map.get(ClassId::of::<Widget>()),
            Err(HalError::UndefinedMetadata(_))
        ));
    }

    #[test]
    fn test_duplicate_metadata() {
        let map = MetadataMap::new();
        map.add(UrlBasedResourceMetadata::new(ClassId::of::<Widget>(), "/w", "w"))
            .unwrap();

        let result = map.add(RouteBasedResourceMetadata::new(ClassId::of::<Widget>(), "w", "w"));
        assert!(matches!(result, Err(HalError::DuplicateMetadata(_))));
        assert_eq!(
            map.get(ClassId::of::<Widget>()).unwrap().kind(),
            MetadataKind::UrlBasedResource
        );
    }

    #[test]
    fn test_from_config_route_based_resource() {
        let map = MetadataMap::from_config(
            &[json!({
                "__class__": "RouteBasedResourceMetadata",
                "resource_class": "Widget",
                "route": "widget",
                "extractor": "widget",
                "resource_identifier": "slug",
                "route_identifier_placeholder": "widget_slug",
                "identifiers_to_placeholders_mapping": {"owner_id": "owner"},
                "route_params": {"version": "v1"},
                "max_depth": 3
            })],
            &classes(),
        )
        .unwrap();

        let metadata = map.get(ClassId::of::<Widget>()).unwrap();
        let Metadata::RouteBasedResource(m) = metadata.as_ref() else {
            panic!("unexpected kind {:?}", metadata.kind());
        };
        assert_eq!(m.route, "widget");
        assert_eq!(m.max_depth, 3);
        assert_eq!(
            m.identifiers_to_placeholders,
            IndexMap::from([
                ("slug".to_string(), "widget_slug".to_string()),
                ("owner_id".to_string(), "owner".to_string()),
            ])
        );
        assert_eq!(m.route_params.get("version").map(String::as_str), Some("v1"));
    }

    #[test]
    fn test_from_config_collection_defaults() {
        let map = MetadataMap::from_config(
            &[json!({
                "__class__": "RouteBasedCollectionMetadata",
                "collection_class": "WidgetList",
                "collection_relation": "widgets",
                "route": "widgets",
                "query_string_arguments": {"sort": "name"}
            })],
            &classes(),
        )
        .unwrap();

        let metadata = map.get(ClassId::of::<WidgetList>()).unwrap();
        let Metadata::RouteBasedCollection(m) = metadata.as_ref() else {
            panic!("unexpected kind {:?}", metadata.kind());
        };
        assert_eq!(m.pagination_param, "page");
        assert_eq!(m.pagination_param_type, PaginationParamType::Query);
        assert_eq!(m.query_string_arguments().get("sort").map(String::as_str), Some("name"));
    }

    #[test]
    fn test_from_config_errors() {
        let classes = classes();

        let not_a_map = MetadataMap::from_config(&[json!("Widget")], &classes);
        assert!(matches!(not_a_map, Err(HalError::InvalidConfig(_))));

        let no_class = MetadataMap::from_config(&[json!({"url": "/w"})], &classes);
        assert!(matches!(no_class, Err(HalError::InvalidConfig(_))));

        let unknown_kind = MetadataMap::from_config(
            &[json!({"__class__": "FancyMetadata", "resource_class": "Widget"})],
            &classes,
        );
        assert!(matches!(unknown_kind, Err(HalError::UndefinedMetadata(name)) if name == "FancyMetadata"));

        let unknown_class = MetadataMap::from_config(
            &[json!({
                "__class__": "UrlBasedResourceMetadata",
                "resource_class": "Gizmo",
                "url": "/g",
                "extractor": "g"
            })],
            &classes,
        );
        assert!(matches!(unknown_class, Err(HalError::UndefinedClass(name)) if name == "Gizmo"));

        let missing_field = MetadataMap::from_config(
            &[json!({"__class__": "UrlBasedResourceMetadata", "resource_class": "Widget"})],
            &classes,
        );
        assert!(matches!(missing_field, Err(HalError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_config_duplicate() {
        let entry = json!({
            "__class__": "UrlBasedResourceMetadata",
            "resource_class": "Widget",
            "url": "/w",
            "extractor": "w"
        });

        let result = MetadataMap::from_config(&[entry.clone(), entry], &classes());
        assert!(matches!(result, Err(HalError::DuplicateMetadata(_))));
    }
}

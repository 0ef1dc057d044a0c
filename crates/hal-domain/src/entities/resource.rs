//! Resource entity
//!
//! A [`Resource`] aggregates data elements, embedded resources and links.
//! It is immutable: every `with_*`, `without_*` and `embed` call returns a
//! new resource and leaves the receiver unchanged. The state sits behind an
//! `Arc`, so clones are cheap and "unchanged" results share the receiver's
//! state (observable through [`Resource::ptr_eq`]).
//!
//! # Invariants
//! - A name never lives in both `data` and `embedded`
//! - `_links` and `_embedded` are never element names
//! - Every resource stored in one embedded collection has the same set of
//!   element names as its siblings (structural equivalence)

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{
    DomainError, DomainResult, validate_element_name,
    value_objects::{Element, Embedded, Link},
};

const CONTEXT_NEW: &str = "Resource::new";
const CONTEXT_WITH_ELEMENT: &str = "Resource::with_element";
const CONTEXT_WITHOUT_ELEMENT: &str = "Resource::without_element";
const CONTEXT_EMBED: &str = "Resource::embed";

#[derive(Debug, Clone, Default, PartialEq)]
struct ResourceState {
    data: IndexMap<String, Value>,
    embedded: IndexMap<String, Embedded>,
    links: Vec<Link>,
}

/// Immutable HAL resource
///
/// # Examples
/// ```
/// # use halrs_domain::{Link, Resource};
/// # use serde_json::json;
/// let resource = Resource::from_data([("id", 42), ("count", 3)])
///     .unwrap()
///     .with_element("name", "widget")
///     .unwrap()
///     .with_link(Link::new("self", "/widgets/42").unwrap());
///
/// assert_eq!(
///     resource.to_value(),
///     json!({
///         "id": 42,
///         "count": 3,
///         "name": "widget",
///         "_links": {"self": {"href": "/widgets/42"}}
///     })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resource {
    state: Arc<ResourceState>,
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state) || self.state == other.state
    }
}

impl Resource {
    /// Create a resource from data, links and embedded resources
    ///
    /// Data entries holding a resource, or a non-empty list of structurally
    /// equivalent resources, are promoted to embedded resources.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidName`] for empty or reserved names
    /// - [`DomainError::StructuralMismatch`] for heterogeneous resource lists
    /// - [`DomainError::NameCollision`] if a name appears as both data and
    ///   embedded resource
    pub fn new(
        data: IndexMap<String, Element>,
        links: Vec<Link>,
        embedded: IndexMap<String, Embedded>,
    ) -> DomainResult<Self> {
        let mut state = ResourceState {
            links,
            ..ResourceState::default()
        };

        for (name, element) in data {
            validate_element_name(&name, CONTEXT_NEW)?;
            match element.into_embedded() {
                Ok(resources) => {
                    ensure_homogeneous(&name, &resources, CONTEXT_NEW)?;
                    state.embedded.insert(name, resources);
                }
                Err(value) => {
                    state.data.insert(name, value);
                }
            }
        }

        for (name, resources) in embedded {
            validate_element_name(&name, CONTEXT_NEW)?;
            ensure_homogeneous(&name, &resources, CONTEXT_NEW)?;
            if state.data.contains_key(&name) {
                return Err(DomainError::name_collision(name, CONTEXT_NEW, "data"));
            }
            if resources.is_empty() {
                state.data.insert(name, Value::Array(Vec::new()));
            } else {
                state.embedded.insert(name, resources);
            }
        }

        Ok(Self::from_state(state))
    }

    /// Create a link-less resource from name/element pairs
    ///
    /// # Errors
    ///
    /// Same as [`Resource::new`].
    pub fn from_data<I, K, E>(data: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Element>,
    {
        let data = data
            .into_iter()
            .map(|(name, element)| (name.into(), element.into()))
            .collect();
        Self::new(data, Vec::new(), IndexMap::new())
    }

    /// Create a resource from a plain JSON object
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidName`] for empty or reserved keys.
    pub fn from_map(data: Map<String, Value>) -> DomainResult<Self> {
        Self::from_data(data)
    }

    fn from_state(state: ResourceState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    fn modify(&self, change: impl FnOnce(&mut ResourceState)) -> Self {
        let mut state = (*self.state).clone();
        change(&mut state);
        Self::from_state(state)
    }

    /// Whether both handles share the same state (identity, not equality)
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.state, &b.state)
    }

    /// Plain data elements
    pub fn data(&self) -> &IndexMap<String, Value> {
        &self.state.data
    }

    /// Embedded resources
    pub fn embedded(&self) -> &IndexMap<String, Embedded> {
        &self.state.embedded
    }

    /// Element stored under `name`, embedded resources taking precedence
    pub fn get_element(&self, name: &str) -> Option<Element> {
        if let Some(embedded) = self.state.embedded.get(name) {
            return Some(embedded.clone().into());
        }
        self.state.data.get(name).cloned().map(Element::Value)
    }

    /// All elements: data first, then embedded resources
    pub fn get_elements(&self) -> IndexMap<String, Element> {
        self.state
            .data
            .iter()
            .map(|(name, value)| (name.clone(), Element::Value(value.clone())))
            .chain(
                self.state
                    .embedded
                    .iter()
                    .map(|(name, embedded)| (name.clone(), embedded.clone().into())),
            )
            .collect()
    }

    /// Element names, sorted; the basis of structural equivalence
    pub fn structure(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .state
            .data
            .keys()
            .chain(self.state.embedded.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Return a copy with `name` set to `value`
    ///
    /// Resources and non-empty resource lists are delegated to
    /// [`Resource::embed`]; everything else becomes (or replaces) data.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidName`] for empty or reserved names
    /// - [`DomainError::NameCollision`] if `name` holds an embedded resource
    /// - any error of [`Resource::embed`]
    pub fn with_element(&self, name: &str, value: impl Into<Element>) -> DomainResult<Self> {
        validate_element_name(name, CONTEXT_WITH_ELEMENT)?;

        let element: Element = value.into();
        match element.into_embedded() {
            Ok(resources) => self.embed(name, resources, false),
            Err(value) => {
                if self.state.embedded.contains_key(name) {
                    return Err(DomainError::name_collision(
                        name,
                        CONTEXT_WITH_ELEMENT,
                        "an embedded resource",
                    ));
                }
                Ok(self.modify(|state| {
                    state.data.insert(name.to_string(), value);
                }))
            }
        }
    }

    /// Apply [`Resource::with_element`] for each pair, left to right
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first failing element.
    pub fn with_elements<I, K, E>(&self, elements: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (K, E)>,
        K: AsRef<str>,
        E: Into<Element>,
    {
        elements
            .into_iter()
            .try_fold(self.clone(), |resource, (name, value)| {
                resource.with_element(name.as_ref(), value)
            })
    }

    /// Return a copy without element `name`; the same resource if absent
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidName`] for empty or reserved names.
    pub fn without_element(&self, name: &str) -> DomainResult<Self> {
        validate_element_name(name, CONTEXT_WITHOUT_ELEMENT)?;

        if self.state.data.contains_key(name) {
            return Ok(self.modify(|state| {
                state.data.shift_remove(name);
            }));
        }

        if self.state.embedded.contains_key(name) {
            return Ok(self.modify(|state| {
                state.embedded.shift_remove(name);
            }));
        }

        Ok(self.clone())
    }

    /// Return a copy embedding `resource` under `name`
    ///
    /// When `name` already holds embedded resources the new ones are
    /// aggregated into a collection after a structural-equivalence check.
    /// `force_collection` wraps a lone resource into a one-element
    /// collection when nothing was embedded under `name` before.
    ///
    /// An empty collection embeds nothing: it leaves existing embedded
    /// resources untouched and otherwise stores `name` as data `[]`, the
    /// same as [`Resource::with_element`].
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidName`] for empty or reserved names
    /// - [`DomainError::NameCollision`] if `name` holds data
    /// - [`DomainError::StructuralMismatch`] if the resources differ in shape
    pub fn embed(
        &self,
        name: &str,
        resource: impl Into<Embedded>,
        force_collection: bool,
    ) -> DomainResult<Self> {
        validate_element_name(name, CONTEXT_EMBED)?;

        if self.state.data.contains_key(name) {
            return Err(DomainError::name_collision(name, CONTEXT_EMBED, "data"));
        }

        let resource = resource.into();
        if resource.is_empty() {
            if self.state.embedded.contains_key(name) {
                return Ok(self.clone());
            }
            return Ok(self.modify(|state| {
                state.data.insert(name.to_string(), Value::Array(Vec::new()));
            }));
        }
        ensure_homogeneous(name, &resource, CONTEXT_EMBED)?;

        let aggregated = self.aggregate(name, resource, force_collection)?;
        Ok(self.modify(|state| {
            state.embedded.insert(name.to_string(), aggregated);
        }))
    }

    fn aggregate(
        &self,
        name: &str,
        resource: Embedded,
        force_collection: bool,
    ) -> DomainResult<Embedded> {
        let Some(existing) = self.state.embedded.get(name) else {
            return Ok(match resource {
                Embedded::Resource(single) if force_collection => {
                    Embedded::Collection(vec![single])
                }
                other => other,
            });
        };

        let aggregated = match (existing, resource) {
            (Embedded::Resource(current), Embedded::Resource(new)) => {
                compare(current, &new, name, CONTEXT_EMBED)?;
                vec![current.clone(), new]
            }
            (Embedded::Collection(current), Embedded::Resource(new)) => {
                if let Some(first) = current.first() {
                    compare(first, &new, name, CONTEXT_EMBED)?;
                }
                let mut collection = current.clone();
                collection.push(new);
                collection
            }
            (existing, Embedded::Collection(new)) => {
                let mut collection = existing.clone().into_vec();
                if let (Some(first), Some(candidate)) = (collection.first(), new.first()) {
                    compare(first, candidate, name, CONTEXT_EMBED)?;
                }
                collection.extend(new);
                collection
            }
        };

        Ok(Embedded::Collection(aggregated))
    }

    /// All links, in insertion order
    pub fn links(&self) -> &[Link] {
        &self.state.links
    }

    /// Links carrying `relation`
    pub fn links_by_rel(&self, relation: &str) -> Vec<&Link> {
        self.state
            .links
            .iter()
            .filter(|link| link.has_relation(relation))
            .collect()
    }

    /// Return a copy with `link` appended; the same resource if already present
    pub fn with_link(&self, link: Link) -> Self {
        if self.state.links.contains(&link) {
            return self.clone();
        }
        self.modify(|state| state.links.push(link))
    }

    /// Return a copy without `link`; the same resource if absent
    pub fn without_link(&self, link: &Link) -> Self {
        if !self.state.links.contains(link) {
            return self.clone();
        }
        self.modify(|state| state.links.retain(|candidate| candidate != link))
    }

    /// Canonical normalised form
    ///
    /// Data elements, then `_links` and `_embedded` when non-empty.
    pub fn to_array(&self) -> Map<String, Value> {
        let mut normalised: Map<String, Value> = self
            .state
            .data
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let links = self.serialize_links();
        if !links.is_empty() {
            normalised.insert("_links".to_string(), Value::Object(links));
        }

        if !self.state.embedded.is_empty() {
            let embedded = self
                .state
                .embedded
                .iter()
                .map(|(name, resources)| (name.clone(), resources.to_value()))
                .collect();
            normalised.insert("_embedded".to_string(), Value::Object(embedded));
        }

        normalised
    }

    /// [`Resource::to_array`] wrapped in a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_array())
    }

    /// Group links by relation.
    ///
    /// A relation holding exactly one link serializes as that link's
    /// representation, unless the link carried the [`Link::AS_COLLECTION`]
    /// marker; more than one link always serializes as an array.
    fn serialize_links(&self) -> Map<String, Value> {
        #[derive(Default)]
        struct Grouped {
            representations: Vec<Value>,
            force_collection: bool,
        }

        let mut by_relation: IndexMap<&str, Grouped> = IndexMap::new();
        for link in &self.state.links {
            let representation = Value::Object(link.to_representation());
            let force_collection = link.forces_collection();

            for relation in link.relations() {
                let group = by_relation.entry(relation.as_str()).or_default();
                group.representations.push(representation.clone());

                match group.representations.len() {
                    1 => group.force_collection = force_collection,
                    // a second link makes the marker redundant
                    _ => group.force_collection = false,
                }
            }
        }

        by_relation
            .into_iter()
            .map(|(relation, mut group)| {
                let value = if group.representations.len() == 1 && !group.force_collection {
                    group.representations.remove(0)
                } else {
                    Value::Array(group.representations)
                };
                (relation.to_string(), value)
            })
            .collect()
    }
}

impl Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_array().serialize(serializer)
    }
}

fn ensure_homogeneous(name: &str, resources: &Embedded, context: &str) -> DomainResult<()> {
    if let Embedded::Collection(collection) = resources
        && let Some((first, rest)) = collection.split_first()
    {
        for resource in rest {
            compare(first, resource, name, context)?;
        }
    }
    Ok(())
}

/// Shallow structural equivalence: same sorted element names.
fn compare(a: &Resource, b: &Resource, name: &str, context: &str) -> DomainResult<()> {
    if a.structure() != b.structure() {
        return Err(DomainError::structural_mismatch(name, context));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: i64) -> Resource {
        Resource::from_data([("id", id)]).unwrap()
    }

    #[test]
    fn test_round_trip_plain_data() {
        let resource = Resource::from_data([("a", Element::from(1)), ("b", Element::from("x"))])
            .unwrap();
        assert_eq!(resource.to_value(), json!({"a": 1, "b": "x"}));
    }

    #[test]
    fn test_constructor_promotes_resources() {
        let resource = Resource::from_data([("child", Element::from(item(1)))]).unwrap();
        assert!(resource.data().is_empty());
        assert!(resource.embedded().contains_key("child"));
    }

    #[test]
    fn test_constructor_rejects_collision() {
        let data = IndexMap::from([("foo".to_string(), Element::from("bar"))]);
        let embedded = IndexMap::from([("foo".to_string(), Embedded::from(item(1)))]);
        assert!(matches!(
            Resource::new(data, Vec::new(), embedded),
            Err(DomainError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_single_then_single_promotes_to_collection() {
        let (a, b) = (item(1), item(2));
        let resource = Resource::default()
            .embed("r", a.clone(), false)
            .unwrap()
            .embed("r", b.clone(), false)
            .unwrap();
        assert_eq!(resource.get_element("r"), Some(Element::Collection(vec![a, b])));
    }

    #[test]
    fn test_force_collection_only_applies_to_first_embed() {
        let resource = Resource::default().embed("r", item(1), true).unwrap();
        assert_eq!(
            resource.to_value(),
            json!({"_embedded": {"r": [{"id": 1}]}})
        );
    }

    #[test]
    fn test_collections_concatenate() {
        let resource = Resource::default()
            .embed("r", vec![item(1), item(2)], false)
            .unwrap()
            .embed("r", vec![item(3)], false)
            .unwrap();
        assert_eq!(
            resource.get_element("r"),
            Some(Element::Collection(vec![item(1), item(2), item(3)]))
        );
    }

    #[test]
    fn test_forced_link_collection_marker_dropped_by_second_link() {
        let first = Link::new("about", "/a").unwrap().as_collection();
        let second = Link::new("about", "/b").unwrap();

        let single = Resource::default().with_link(first.clone());
        assert_eq!(
            single.to_value(),
            json!({"_links": {"about": [{"href": "/a"}]}})
        );

        let double = single.with_link(second);
        assert_eq!(
            double.to_value(),
            json!({"_links": {"about": [{"href": "/a"}, {"href": "/b"}]}})
        );
    }

    #[test]
    fn test_multi_relation_link_serializes_under_each_relation() {
        let link = Link::from_parts(["self", "canonical"], "/x", false, Default::default()).unwrap();
        let resource = Resource::default().with_link(link);
        assert_eq!(
            resource.to_value(),
            json!({"_links": {"self": {"href": "/x"}, "canonical": {"href": "/x"}}})
        );
    }
}

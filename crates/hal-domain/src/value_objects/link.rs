//! Link value object
//!
//! A link carries one or more relation names, a target href, a templated
//! flag and free-form attributes (`title`, `type`, `hreflang`, ...).
//! Attribute values are restricted to JSON scalars and arrays of strings.

use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::{DomainError, DomainResult};

/// Ordered link attributes
pub type LinkAttributes = indexmap::IndexMap<String, Value>;

/// Immutable HAL link
///
/// # Examples
/// ```
/// # use halrs_domain::Link;
/// let link = Link::new("self", "/api/widgets/42").unwrap();
/// let link = link.with_attribute("title", "Widget 42").unwrap();
///
/// assert_eq!(link.relations(), &["self".to_string()]);
/// assert_eq!(link.href(), "/api/widgets/42");
/// assert!(!link.is_templated());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    relations: SmallVec<[String; 2]>,
    href: String,
    templated: bool,
    attributes: LinkAttributes,
}

impl Link {
    /// Attribute key that forces the link's relation to serialize as an
    /// array even when it holds a single link. Never emitted on the wire.
    pub const AS_COLLECTION: &'static str = "__FORCE_COLLECTION__";

    /// Create a link with a single relation
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRelation`] if `relation` is empty.
    pub fn new(relation: impl Into<String>, href: impl Into<String>) -> DomainResult<Self> {
        Self::from_parts([relation.into()], href, false, LinkAttributes::new())
    }

    /// Create a templated (RFC 6570) link with a single relation
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRelation`] if `relation` is empty.
    pub fn templated(relation: impl Into<String>, href: impl Into<String>) -> DomainResult<Self> {
        Self::from_parts([relation.into()], href, true, LinkAttributes::new())
    }

    /// Create a link from all of its parts
    ///
    /// Duplicate relations are collapsed, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidRelation`] if no relation is given or one is empty
    /// - [`DomainError::InvalidLinkAttribute`] if an attribute name is empty or a
    ///   value is neither a scalar nor an array of strings
    pub fn from_parts<I, S>(
        relations: I,
        href: impl Into<String>,
        templated: bool,
        attributes: LinkAttributes,
    ) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rels: SmallVec<[String; 2]> = SmallVec::new();
        for relation in relations {
            let relation = relation.into();
            validate_relation(&relation)?;
            if !rels.contains(&relation) {
                rels.push(relation);
            }
        }

        if rels.is_empty() {
            return Err(DomainError::InvalidRelation(
                "a link requires at least one relation".to_string(),
            ));
        }

        for (name, value) in &attributes {
            validate_attribute(name, value)?;
        }

        Ok(Self {
            relations: rels,
            href: href.into(),
            templated,
            attributes,
        })
    }

    /// Relation names, in insertion order
    pub fn relations(&self) -> &[String] {
        &self.relations
    }

    /// Whether the link carries `relation`
    pub fn has_relation(&self, relation: &str) -> bool {
        self.relations.iter().any(|rel| rel == relation)
    }

    /// Target URI (or URI template)
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Whether the href is a URI template
    pub fn is_templated(&self) -> bool {
        self.templated
    }

    /// Link attributes
    pub fn attributes(&self) -> &LinkAttributes {
        &self.attributes
    }

    /// Return a copy pointing at `href`
    pub fn with_href(&self, href: impl ToString) -> Self {
        let mut new = self.clone();
        new.href = href.to_string();
        new
    }

    /// Return a copy with the templated flag set to `templated`
    pub fn with_templated(&self, templated: bool) -> Self {
        let mut new = self.clone();
        new.templated = templated;
        new
    }

    /// Return a copy carrying `relation`; unchanged if already present
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRelation`] if `relation` is empty.
    pub fn with_rel(&self, relation: impl Into<String>) -> DomainResult<Self> {
        let relation = relation.into();
        validate_relation(&relation)?;

        if self.has_relation(&relation) {
            return Ok(self.clone());
        }

        let mut new = self.clone();
        new.relations.push(relation);
        Ok(new)
    }

    /// Return a copy without `relation`; unchanged if absent
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRelation`] when removing the last relation.
    pub fn without_rel(&self, relation: &str) -> DomainResult<Self> {
        if !self.has_relation(relation) {
            return Ok(self.clone());
        }

        if self.relations.len() == 1 {
            return Err(DomainError::InvalidRelation(format!(
                "cannot remove {relation:?}: a link requires at least one relation"
            )));
        }

        let mut new = self.clone();
        new.relations.retain(|rel| rel != relation);
        Ok(new)
    }

    /// Return a copy with attribute `name` set to `value`
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLinkAttribute`] for an empty name or a value
    /// that is neither a scalar nor an array of strings.
    pub fn with_attribute(&self, name: impl Into<String>, value: impl Into<Value>) -> DomainResult<Self> {
        let name = name.into();
        let value = value.into();
        validate_attribute(&name, &value)?;

        let mut new = self.clone();
        new.attributes.insert(name, value);
        Ok(new)
    }

    /// Return a copy without attribute `name`
    pub fn without_attribute(&self, name: &str) -> Self {
        if !self.attributes.contains_key(name) {
            return self.clone();
        }

        let mut new = self.clone();
        new.attributes.shift_remove(name);
        new
    }

    /// Return a copy whose relations always serialize as arrays
    pub fn as_collection(&self) -> Self {
        let mut new = self.clone();
        new.attributes
            .insert(Self::AS_COLLECTION.to_string(), Value::Bool(true));
        new
    }

    /// Whether the [`Link::AS_COLLECTION`] marker is set to a truthy value
    pub fn forces_collection(&self) -> bool {
        match self.attributes.get(Self::AS_COLLECTION) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty() && s != "0",
            Some(Value::Array(items)) => !items.is_empty(),
            _ => false,
        }
    }

    /// Wire representation: attributes, then `href`, then `templated` when set.
    ///
    /// The [`Link::AS_COLLECTION`] marker is never part of the representation.
    pub fn to_representation(&self) -> Map<String, Value> {
        let mut representation: Map<String, Value> = self
            .attributes
            .iter()
            .filter(|(name, _)| name.as_str() != Self::AS_COLLECTION)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        representation.insert("href".to_string(), Value::String(self.href.clone()));
        if self.templated {
            representation.insert("templated".to_string(), Value::Bool(true));
        }

        representation
    }
}

fn validate_relation(relation: &str) -> DomainResult<()> {
    if relation.trim().is_empty() {
        return Err(DomainError::InvalidRelation(
            "relations must be non-empty strings".to_string(),
        ));
    }
    Ok(())
}

fn validate_attribute(name: &str, value: &Value) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::InvalidLinkAttribute(
            "attribute names must be non-empty strings".to_string(),
        ));
    }

    match value {
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
        Value::Array(items) if items.iter().all(Value::is_string) => Ok(()),
        Value::Array(_) => Err(DomainError::InvalidLinkAttribute(format!(
            "attribute {name:?} must be an array of strings"
        ))),
        Value::Null | Value::Object(_) => Err(DomainError::InvalidLinkAttribute(format!(
            "attribute {name:?} must be a scalar or an array of strings"
        ))),
    }
}

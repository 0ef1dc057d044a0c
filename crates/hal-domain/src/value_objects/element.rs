//! Element value objects
//!
//! [`Element`] is anything a resource can hold under a name: plain data or
//! one or more embedded resources. [`Embedded`] is the stored form of the
//! embedded side.

use serde_json::Value;

use crate::entities::Resource;

/// Embedded resource value: a single resource or a homogeneous collection
#[derive(Debug, Clone, PartialEq)]
pub enum Embedded {
    /// Single embedded resource
    Resource(Resource),
    /// Collection of structurally equivalent resources
    Collection(Vec<Resource>),
}

impl Embedded {
    /// First resource, if any
    pub fn first(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            Self::Collection(resources) => resources.first(),
        }
    }

    /// Whether this value serializes as an array
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Number of resources held
    pub fn len(&self) -> usize {
        match self {
            Self::Resource(_) => 1,
            Self::Collection(resources) => resources.len(),
        }
    }

    /// Whether no resource is held (only possible for an empty collection)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All held resources as a vector
    pub fn into_vec(self) -> Vec<Resource> {
        match self {
            Self::Resource(resource) => vec![resource],
            Self::Collection(resources) => resources,
        }
    }

    /// Normalised form: `to_array()` of each resource
    pub fn to_value(&self) -> Value {
        match self {
            Self::Resource(resource) => resource.to_value(),
            Self::Collection(resources) => {
                Value::Array(resources.iter().map(Resource::to_value).collect())
            }
        }
    }
}

impl From<Resource> for Embedded {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}

impl From<Vec<Resource>> for Embedded {
    fn from(resources: Vec<Resource>) -> Self {
        Self::Collection(resources)
    }
}

/// Any value a resource can hold under an element name
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Plain data (scalar, array or map)
    Value(Value),
    /// A single resource
    Resource(Resource),
    /// A list of resources
    Collection(Vec<Resource>),
}

impl Element {
    /// Plain data, if this is a data element
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Single resource, if this is one
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Resource list, if this is one
    pub fn as_collection(&self) -> Option<&[Resource]> {
        match self {
            Self::Collection(resources) => Some(resources),
            _ => None,
        }
    }

    /// Convert into an embedded value when the element qualifies.
    ///
    /// Empty resource lists never qualify: they stay plain (empty array) data.
    pub fn into_embedded(self) -> Result<Embedded, Value> {
        match self {
            Self::Resource(resource) => Ok(Embedded::Resource(resource)),
            Self::Collection(resources) if !resources.is_empty() => {
                Ok(Embedded::Collection(resources))
            }
            Self::Collection(_) => Err(Value::Array(Vec::new())),
            Self::Value(value) => Err(value),
        }
    }
}

impl From<Embedded> for Element {
    fn from(embedded: Embedded) -> Self {
        match embedded {
            Embedded::Resource(resource) => Self::Resource(resource),
            Embedded::Collection(resources) => Self::Collection(resources),
        }
    }
}

impl From<Resource> for Element {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}

impl From<Vec<Resource>> for Element {
    fn from(resources: Vec<Resource>) -> Self {
        Self::Collection(resources)
    }
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! element_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

element_from_scalar!(&str, String, bool, i32, i64, u32, u64, usize, f64);

//! Extraction contract

use indexmap::IndexMap;
use serde_json::Value;
use std::{fmt, sync::Arc};

use crate::{HalResult, domain::Entity};

/// One extracted field
#[derive(Clone)]
pub enum Field {
    /// Plain value, copied into the resource data
    Value(Value),
    /// Nested object, turned into a resource through its own metadata
    Object(Arc<dyn Entity>),
}

impl Field {
    /// Wrap a nested object
    pub fn object(entity: impl Entity) -> Self {
        Self::Object(Arc::new(entity))
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Object(entity) => f.debug_tuple("Object").field(&entity.class_id()).finish(),
        }
    }
}

macro_rules! field_from_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )+
    };
}

field_from_value!(Value, &str, String, bool, i32, i64, u32, u64, usize, f64);

/// Extracted fields in extraction order
pub type Fields = IndexMap<String, Field>;

/// Flattens an object into a field map
pub trait Extractor: Send + Sync {
    /// Extract the fields of `instance`
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidExtractor`](crate::HalError::InvalidExtractor)
    /// when the extractor cannot handle the instance's type.
    fn extract(&self, instance: &dyn Entity) -> HalResult<Fields>;
}

/// Resolves extractors by the name stored in metadata
pub trait ExtractorProvider: Send + Sync {
    /// Extractor registered under `name`
    fn get(&self, name: &str) -> Option<Arc<dyn Extractor>>;
}

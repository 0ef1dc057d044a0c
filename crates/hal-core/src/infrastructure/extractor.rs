//! Extractor adapters and the name-keyed extractor registry

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    HalError, HalResult,
    domain::{ClassId, Entity, Extractor, ExtractorProvider, Field, Fields},
};

fn downcast<T: Entity>(instance: &dyn Entity) -> HalResult<&T> {
    instance.as_any().downcast_ref::<T>().ok_or_else(|| {
        HalError::invalid_extractor(format!(
            "extractor for {} cannot extract instances of {}",
            ClassId::of::<T>(),
            instance.class_id()
        ))
    })
}

/// Extractor backed by a typed closure
///
/// # Examples
/// ```
/// # use halrs::prelude::*;
/// # use halrs::infrastructure::FnExtractor;
/// #[derive(Debug)]
/// struct Widget {
///     id: u64,
/// }
/// halrs::impl_entity!(Widget);
///
/// let extractor = FnExtractor::new(|widget: &Widget| {
///     let mut fields = Fields::new();
///     fields.insert("id".to_string(), widget.id.into());
///     fields
/// });
///
/// let fields = extractor.extract(&Widget { id: 7 }).unwrap();
/// assert_eq!(fields.len(), 1);
/// ```
pub struct FnExtractor<T, F> {
    extract: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> FnExtractor<T, F>
where
    T: Entity,
    F: Fn(&T) -> Fields + Send + Sync,
{
    /// Wrap `extract`
    pub fn new(extract: F) -> Self {
        Self {
            extract,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Extractor for FnExtractor<T, F>
where
    T: Entity,
    F: Fn(&T) -> Fields + Send + Sync,
{
    fn extract(&self, instance: &dyn Entity) -> HalResult<Fields> {
        downcast::<T>(instance).map(|typed| (self.extract)(typed))
    }
}

/// Extractor that flattens a type through its `serde::Serialize` impl
///
/// Only plain values come out of this extractor; nested objects that should
/// become embedded resources need an [`FnExtractor`] returning
/// [`Field::Object`].
pub struct SerializeExtractor<T> {
    _marker: PhantomData<fn(&T)>,
}

impl<T> SerializeExtractor<T> {
    /// Create the extractor
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerializeExtractor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity + Serialize> Extractor for SerializeExtractor<T> {
    fn extract(&self, instance: &dyn Entity) -> HalResult<Fields> {
        let typed = downcast::<T>(instance)?;
        match serde_json::to_value(typed)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, Field::Value(value)))
                .collect()),
            other => Err(HalError::invalid_extractor(format!(
                "{} serialized to a non-map value: {other}",
                ClassId::of::<T>()
            ))),
        }
    }
}

/// Thread-safe extractor registry keyed by name
///
/// Metadata refers to extractors by name; the generator resolves them here
/// at extraction time.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: Arc<DashMap<String, Arc<dyn Extractor>>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `extractor` under `name`, returning the one it replaced
    pub fn register(
        &self,
        name: impl Into<String>,
        extractor: impl Extractor + 'static,
    ) -> Option<Arc<dyn Extractor>> {
        self.extractors.insert(name.into(), Arc::new(extractor))
    }

    /// Register a typed closure under `name`
    pub fn register_fn<T, F>(&self, name: impl Into<String>, extract: F) -> Option<Arc<dyn Extractor>>
    where
        T: Entity,
        F: Fn(&T) -> Fields + Send + Sync + 'static,
    {
        self.register(name, FnExtractor::new(extract))
    }

    /// Whether an extractor is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.extractors.contains_key(name)
    }

    /// Number of registered extractors
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl ExtractorProvider for ExtractorRegistry {
    fn get(&self, name: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.extractors.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &names)
            .finish()
    }
}

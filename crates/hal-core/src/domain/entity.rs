//! Object model: the values a generator turns into resources

use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// Identity of a Rust type registered with the metadata map
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// error messages and logs.
#[derive(Clone, Copy)]
pub struct ClassId {
    type_id: TypeId,
    name: &'static str,
}

impl ClassId {
    /// Identity of `T`
    pub fn of<T: ?Sized + Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying type id
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassId").field(&self.name).finish()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An application object the generator can look up in the metadata map
///
/// Usually implemented through [`impl_entity!`](crate::impl_entity).
pub trait Entity: Any + Send + Sync + fmt::Debug {
    /// Class under which metadata for this object is registered
    fn class_id(&self) -> ClassId;

    /// Upcast used by extractors to recover the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Iteration capability, present for collection objects
    fn as_collection(&self) -> Option<&dyn Collection> {
        None
    }
}

/// Iterable group of entities
pub trait Collection: Send + Sync {
    /// Every item, in order
    fn items(&self) -> Box<dyn Iterator<Item = &dyn Entity> + '_>;

    /// Item count when known without iterating
    fn count(&self) -> Option<usize> {
        None
    }

    /// Pagination capability, present for paginated collections
    fn as_paginator(&self) -> Option<&dyn Paginator> {
        None
    }
}

/// Page-aware view over a collection
///
/// The current page is interior state so that a shared paginator can be
/// positioned by the strategy that renders it.
pub trait Paginator: Send + Sync {
    /// Number of pages for the configured page size
    fn page_count(&self) -> usize;

    /// Number of items across all pages
    fn total_item_count(&self) -> usize;

    /// Position the paginator on `page` (1-based)
    fn set_current_page_number(&self, page: usize);

    /// Items of the current page
    fn current_items(&self) -> Box<dyn Iterator<Item = &dyn Entity> + '_>;
}

/// Implement [`Entity`] for one or more types
///
/// ```
/// #[derive(Debug)]
/// struct Widget {
///     id: u64,
/// }
///
/// halrs::impl_entity!(Widget);
/// ```
///
/// The `collection` form additionally exposes the type's [`Collection`]
/// implementation:
///
/// ```ignore
/// halrs::impl_entity!(collection WidgetList);
/// ```
#[macro_export]
macro_rules! impl_entity {
    (collection $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::domain::Entity for $ty {
                fn class_id(&self) -> $crate::domain::ClassId {
                    $crate::domain::ClassId::of::<$ty>()
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn as_collection(&self) -> ::std::option::Option<&dyn $crate::domain::Collection> {
                    ::std::option::Option::Some(self)
                }
            }
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::domain::Entity for $ty {
                fn class_id(&self) -> $crate::domain::ClassId {
                    $crate::domain::ClassId::of::<$ty>()
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }
            }
        )+
    };
}

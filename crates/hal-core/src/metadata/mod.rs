//! Metadata - declarative descriptions of how objects become resources
//!
//! The set of metadata kinds is closed: resources and collections, each
//! either route-based (links built by the URL generator) or URL-based
//! (links built from a fixed URL). Strategies are registered per
//! [`MetadataKind`].

pub mod collection;
pub mod map;
pub mod resource;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub use collection::{CollectionMetadata, RouteBasedCollectionMetadata, UrlBasedCollectionMetadata};
pub use map::{ClassRegistry, MetadataMap};
pub use resource::{RouteBasedResourceMetadata, UrlBasedResourceMetadata};

use crate::{HalError, HalResult, domain::ClassId};

/// Default nesting limit for resource metadata
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Discriminant of [`Metadata`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKind {
    /// [`RouteBasedResourceMetadata`]
    RouteBasedResource,
    /// [`UrlBasedResourceMetadata`]
    UrlBasedResource,
    /// [`RouteBasedCollectionMetadata`]
    RouteBasedCollection,
    /// [`UrlBasedCollectionMetadata`]
    UrlBasedCollection,
}

impl MetadataKind {
    /// Every kind, in declaration order
    pub const ALL: [MetadataKind; 4] = [
        Self::RouteBasedResource,
        Self::UrlBasedResource,
        Self::RouteBasedCollection,
        Self::UrlBasedCollection,
    ];

    /// Name used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RouteBasedResource => "RouteBasedResourceMetadata",
            Self::UrlBasedResource => "UrlBasedResourceMetadata",
            Self::RouteBasedCollection => "RouteBasedCollectionMetadata",
            Self::UrlBasedCollection => "UrlBasedCollectionMetadata",
        }
    }

    /// Whether the kind describes a collection
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::RouteBasedCollection | Self::UrlBasedCollection)
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataKind {
    type Err = HalError;

    fn from_str(s: &str) -> HalResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| HalError::UnknownMetadataType(s.to_string()))
    }
}

/// Where a collection reads and writes its page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationParamType {
    /// Query string parameter
    #[default]
    Query,
    /// Route placeholder / request attribute
    Placeholder,
}

/// Metadata registered for one class
#[derive(Debug, Clone)]
pub enum Metadata {
    /// Single resource, self link from a route
    RouteBasedResource(RouteBasedResourceMetadata),
    /// Single resource, self link from a fixed URL
    UrlBasedResource(UrlBasedResourceMetadata),
    /// Collection, links from a route
    RouteBasedCollection(RouteBasedCollectionMetadata),
    /// Collection, links from a fixed URL
    UrlBasedCollection(UrlBasedCollectionMetadata),
}

impl Metadata {
    /// Kind of this metadata
    pub fn kind(&self) -> MetadataKind {
        match self {
            Self::RouteBasedResource(_) => MetadataKind::RouteBasedResource,
            Self::UrlBasedResource(_) => MetadataKind::UrlBasedResource,
            Self::RouteBasedCollection(_) => MetadataKind::RouteBasedCollection,
            Self::UrlBasedCollection(_) => MetadataKind::UrlBasedCollection,
        }
    }

    /// Class the metadata describes
    pub fn class(&self) -> ClassId {
        match self {
            Self::RouteBasedResource(m) => m.class,
            Self::UrlBasedResource(m) => m.class,
            Self::RouteBasedCollection(m) => m.class,
            Self::UrlBasedCollection(m) => m.class,
        }
    }

    /// Collection view, for the collection kinds
    pub fn as_collection(&self) -> Option<&dyn CollectionMetadata> {
        match self {
            Self::RouteBasedCollection(m) => Some(m),
            Self::UrlBasedCollection(m) => Some(m),
            Self::RouteBasedResource(_) | Self::UrlBasedResource(_) => None,
        }
    }
}

impl From<RouteBasedResourceMetadata> for Metadata {
    fn from(metadata: RouteBasedResourceMetadata) -> Self {
        Self::RouteBasedResource(metadata)
    }
}

impl From<UrlBasedResourceMetadata> for Metadata {
    fn from(metadata: UrlBasedResourceMetadata) -> Self {
        Self::UrlBasedResource(metadata)
    }
}

impl From<RouteBasedCollectionMetadata> for Metadata {
    fn from(metadata: RouteBasedCollectionMetadata) -> Self {
        Self::RouteBasedCollection(metadata)
    }
}

impl From<UrlBasedCollectionMetadata> for Metadata {
    fn from(metadata: UrlBasedCollectionMetadata) -> Self {
        Self::UrlBasedCollection(metadata)
    }
}

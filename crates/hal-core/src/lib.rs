//! # halrs
//!
//! Metadata-driven generation of HAL (Hypertext Application Language)
//! resources, with HAL+JSON and HAL+XML rendering.
//!
//! Application types are registered in a [`MetadataMap`] together with the
//! route or URL their links point at and the name of the extractor that
//! flattens them. A [`ResourceGenerator`] then turns instances, including
//! nested objects and paginated collections, into immutable [`Resource`]s
//! which the renderers serialize.
//!
//! ```
//! use std::sync::Arc;
//! use halrs::prelude::*;
//! use halrs::infrastructure::{ExtractorRegistry, Request, RouteTemplates};
//!
//! #[derive(Debug)]
//! struct Widget {
//!     id: u64,
//!     name: String,
//! }
//! halrs::impl_entity!(Widget);
//!
//! let metadata = MetadataMap::new();
//! metadata
//!     .add(RouteBasedResourceMetadata::new(ClassId::of::<Widget>(), "widget", "widget"))
//!     .unwrap();
//!
//! let extractors = ExtractorRegistry::new();
//! extractors.register_fn("widget", |w: &Widget| {
//!     let mut fields = Fields::new();
//!     fields.insert("id".to_string(), w.id.into());
//!     fields.insert("name".to_string(), w.name.clone().into());
//!     fields
//! });
//!
//! let generator = ResourceGenerator::new(
//!     Arc::new(metadata),
//!     Arc::new(extractors),
//!     LinkGenerator::new(Arc::new(RouteTemplates::new().with_route("widget", "/widgets/{id}"))),
//! );
//!
//! let widget = Widget { id: 42, name: "x".to_string() };
//! let resource = generator.from_object(&widget, &Request::new("/widgets/42")).unwrap();
//!
//! let json = JsonRenderer::new(false).render(&resource).unwrap();
//! assert_eq!(json, r#"{"id":42,"name":"x","_links":{"self":{"href":"/widgets/42"}}}"#);
//! ```

#![warn(rust_2018_idioms)]
#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod infrastructure;
pub mod metadata;
pub mod renderer;
pub mod response;
pub mod strategy;

// Domain layer exports
pub use domain::{
    ClassId, Collection, DomainError, DomainResult, Element, Embedded, Entity, Extractor,
    ExtractorProvider, Field, Fields, Link, LinkAttributes, Paginator, Params, Resource,
    ServerRequest, UrlGenerator,
};

pub use config::{HalConfig, JsonRendererConfig, RendererConfig, ResourceGeneratorConfig, XmlRendererConfig};
pub use error::{HalError, HalResult};
pub use generator::{LinkGenerator, ResourceGenerator};
pub use metadata::{
    ClassRegistry, CollectionMetadata, Metadata, MetadataKind, MetadataMap, PaginationParamType,
    RouteBasedCollectionMetadata, RouteBasedResourceMetadata, UrlBasedCollectionMetadata,
    UrlBasedResourceMetadata,
};
pub use renderer::{HAL_JSON, HAL_XML, JsonRenderer, Renderer, XmlRenderer};
pub use response::{HalResponse, ResponseFactory};
pub use strategy::{
    RouteBasedCollectionStrategy, RouteBasedResourceStrategy, Strategy, UrlBasedCollectionStrategy,
    UrlBasedResourceStrategy,
};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        ClassId, ClassRegistry, Collection, DomainError, Element, Embedded, Entity, Extractor,
        ExtractorProvider, Field, Fields, HalConfig, HalError, HalResponse, HalResult,
        JsonRenderer, Link, LinkGenerator, Metadata, MetadataKind, MetadataMap,
        PaginationParamType, Paginator, Params, Renderer, Resource, ResourceGenerator,
        ResponseFactory, RouteBasedCollectionMetadata, RouteBasedResourceMetadata,
        ServerRequest, Strategy, UrlBasedCollectionMetadata, UrlBasedResourceMetadata,
        UrlGenerator, XmlRenderer,
    };
}

//! Domain layer - resource model plus the object model it is generated from
//!
//! Re-exports the pure resource model from `halrs-domain` and adds the
//! traits through which application objects, requests and URL builders are
//! seen by the generator.

pub mod entity;
pub mod ports;

pub use entity::{ClassId, Collection, Entity, Paginator};
pub use halrs_domain::{
    DomainError, DomainResult, Element, Embedded, Link, LinkAttributes, RESERVED_NAMES, Resource,
    validate_element_name,
};
pub use ports::{
    Extractor, ExtractorProvider, Field, Fields, Params, ServerRequest, UrlGenerator,
};

//! Infrastructure layer - stock adapters for the domain ports
//!
//! In-memory request, route-template URL generator, extractor registry and
//! vector-backed collections. Applications embedding the generator in an
//! HTTP stack usually replace the request and URL generator with their
//! framework's own types.

pub mod collection;
pub mod extractor;
pub mod request;
pub mod url_generator;

pub use collection::{VecCollection, VecPaginator};
pub use extractor::{ExtractorRegistry, FnExtractor, SerializeExtractor};
pub use request::Request;
pub use url_generator::RouteTemplates;

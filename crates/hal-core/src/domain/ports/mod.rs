//! Ports - contracts for the collaborators a generator depends on
//!
//! Extractors flatten objects into fields, requests supply query parameters
//! and attributes, URL generators turn route names into hrefs. Stock
//! adapters live in [`crate::infrastructure`].

pub mod extractor;
pub mod request;
pub mod url;

pub use extractor::{Extractor, ExtractorProvider, Field, Fields};
pub use request::ServerRequest;
pub use url::{Params, UrlGenerator};

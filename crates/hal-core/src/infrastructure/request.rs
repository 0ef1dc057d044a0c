//! In-memory request

use indexmap::IndexMap;
use serde_json::Value;
use url::form_urlencoded;

use crate::domain::{Params, ServerRequest};

/// Builder-style [`ServerRequest`] implementation
///
/// # Examples
/// ```
/// # use halrs::infrastructure::Request;
/// # use halrs::domain::ServerRequest;
/// let request = Request::new("/widgets?page=2&sort=name")
///     .with_attribute("tenant", "acme")
///     .with_header("Accept", "application/hal+xml");
///
/// assert_eq!(request.query_params().get("page").map(String::as_str), Some("2"));
/// assert_eq!(request.header("accept"), Some("application/hal+xml"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    uri: String,
    query_params: Params,
    attributes: IndexMap<String, Value>,
    headers: IndexMap<String, String>,
}

impl Request {
    /// Create a request for `uri`, decoding its query string
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let query_params = uri
            .split_once('?')
            .map(|(_, query)| query.split('#').next().unwrap_or_default())
            .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self {
            uri,
            query_params,
            ..Self::default()
        }
    }

    /// Set a query parameter, replacing any decoded from the URI
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Set a routing attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a header; names are stored lowercased
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}

impl ServerRequest for Request {
    fn query_params(&self) -> &Params {
        &self.query_params
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

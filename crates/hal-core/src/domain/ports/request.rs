//! Read-only view of the incoming request

use serde_json::Value;

use super::Params;

/// The parts of a server request that resource generation reads
pub trait ServerRequest: Send + Sync {
    /// Decoded query parameters
    fn query_params(&self) -> &Params;

    /// Routing attribute, such as a matched path placeholder
    fn attribute(&self, name: &str) -> Option<&Value>;

    /// Request URI
    fn uri(&self) -> &str;

    /// Header value, matched case-insensitively
    fn header(&self, _name: &str) -> Option<&str> {
        None
    }
}

//! Error types for HAL generation and rendering

use crate::domain::DomainError;

/// Result type alias for HAL operations
pub type HalResult<T> = std::result::Result<T, HalError>;

/// Main error type for HAL operations
///
/// Every error is raised synchronously by the failing call. Nothing is
/// retried internally: generation and rendering are deterministic, so a
/// retry would reproduce the same failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HalError {
    /// Resource or link invariant violated
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Object unknown to the metadata map
    #[error("Invalid object: {0}")]
    InvalidObject(String),

    /// No strategy registered for a metadata kind, or an unknown kind name
    #[error("Unknown metadata type: {0}")]
    UnknownMetadataType(String),

    /// Strategy handed metadata of the wrong kind
    #[error("Strategy {strategy} expects {expected} metadata, got {actual}")]
    UnexpectedMetadataType {
        /// Strategy that rejected the metadata
        strategy: String,
        /// Metadata kind the strategy handles
        expected: String,
        /// Metadata kind it received
        actual: String,
    },

    /// Collection strategy handed a non-iterable instance
    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    /// Extractor missing or unable to extract the instance
    #[error("Invalid extractor: {0}")]
    InvalidExtractor(String),

    /// Strategy name does not resolve to a strategy
    #[error("Invalid strategy: {0}")]
    InvalidStrategy(String),

    /// Requested page outside the paginator's range
    #[error("Page {page} is out of bounds. Collection has {page_count} page(s)")]
    OutOfBounds {
        /// Requested page, as received
        page: String,
        /// Number of pages in the collection
        page_count: usize,
    },

    /// Malformed configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Second metadata entry for one class
    #[error("Duplicate metadata for class {0}")]
    DuplicateMetadata(String),

    /// Class name unknown to the class registry
    #[error("Undefined class: {0}")]
    UndefinedClass(String),

    /// Metadata kind name unknown, or no metadata for a class
    #[error("Undefined metadata: {0}")]
    UndefinedMetadata(String),

    /// Value with no XML representation
    #[error("Unserializable value: {0}")]
    Unserializable(String),

    /// Nested extraction went deeper than the metadata allows
    #[error("Maximum extraction depth {max_depth} exceeded while extracting {class}")]
    MaxDepthExceeded {
        /// Class whose nested object crossed the limit
        class: String,
        /// Configured maximum depth
        max_depth: usize,
    },

    /// URL generator failure
    #[error("URL generation failed: {0}")]
    UrlGeneration(String),

    /// XML writer failure
    #[error("XML encoding failed: {0}")]
    Xml(String),

    /// JSON encoder failure
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl HalError {
    /// Create an invalid object error for an unregistered class
    pub fn unknown_object(class: impl std::fmt::Display) -> Self {
        Self::InvalidObject(format!(
            "cannot generate a resource for instances of {class}: no metadata registered"
        ))
    }

    /// Create an unexpected metadata type error
    pub fn unexpected_metadata(
        strategy: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::UnexpectedMetadataType {
            strategy: strategy.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an out-of-bounds error
    pub fn out_of_bounds(page: impl ToString, page_count: usize) -> Self {
        Self::OutOfBounds {
            page: page.to_string(),
            page_count,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an invalid extractor error
    pub fn invalid_extractor(message: impl Into<String>) -> Self {
        Self::InvalidExtractor(message.into())
    }

    /// Create an unserializable value error
    pub fn unserializable(message: impl Into<String>) -> Self {
        Self::Unserializable(message.into())
    }

    /// Create an XML encoding error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = HalError::out_of_bounds(6, 5);
        assert_eq!(
            err.to_string(),
            "Page 6 is out of bounds. Collection has 5 page(s)"
        );
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: HalError = DomainError::InvalidRelation("empty".to_string()).into();
        assert!(matches!(err, HalError::Domain(DomainError::InvalidRelation(_))));
    }
}

//! HAL Domain Layer - Immutable Resource Model
//!
//! This crate contains the pure domain model for HAL (Hypertext Application
//! Language) resources: typed links, data elements and embedded
//! sub-resources. It performs no I/O and carries no logging; every type is an
//! immutable value whose "mutators" return new instances.
//!
//! ## Architecture
//!
//! - **Value Objects**: [`Link`], [`Element`], [`Embedded`]
//! - **Entities**: [`Resource`], the aggregate that owns the element,
//!   collision and aggregation rules
//! - **Normalisation**: [`Resource::to_array`] produces the canonical
//!   `_links` / `_embedded` map consumed by every renderer

#![warn(missing_docs)]

pub mod entities;
pub mod value_objects;

// Re-export core types
pub use entities::Resource;
pub use value_objects::{Element, Embedded, Link, LinkAttributes};

/// Element names reserved for the HAL wire format.
pub const RESERVED_NAMES: [&str; 2] = ["_links", "_embedded"];

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
///
/// Every error is raised synchronously by the operation that detected it and
/// leaves the receiver untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Empty or reserved element name
    #[error("{context}: invalid element name {name:?}; {reason}")]
    InvalidName {
        /// Offending name
        name: String,
        /// Operation that rejected the name
        context: String,
        /// Why the name was rejected
        reason: String,
    },

    /// Name already used by the other kind of element
    #[error("{context}: element {name:?} already exists as {existing}")]
    NameCollision {
        /// Colliding element name
        name: String,
        /// Operation that detected the collision
        context: String,
        /// Which side already holds the name ("data" or "an embedded resource")
        existing: String,
    },

    /// Resources aggregated under one relation differ in shape
    #[error("{context} detected structurally inequivalent resources for element {name}")]
    StructuralMismatch {
        /// Element (relation) name being aggregated
        name: String,
        /// Operation performing the aggregation
        context: String,
    },

    /// Malformed link relation
    #[error("Invalid link relation: {0}")]
    InvalidRelation(String),

    /// Malformed link attribute name or value
    #[error("Invalid link attribute: {0}")]
    InvalidLinkAttribute(String),
}

impl DomainError {
    /// Create an invalid name error
    pub fn invalid_name(
        name: impl Into<String>,
        context: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidName {
            name: name.into(),
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a name collision error
    pub fn name_collision(
        name: impl Into<String>,
        context: impl Into<String>,
        existing: impl Into<String>,
    ) -> Self {
        Self::NameCollision {
            name: name.into(),
            context: context.into(),
            existing: existing.into(),
        }
    }

    /// Create a structural mismatch error
    pub fn structural_mismatch(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            name: name.into(),
            context: context.into(),
        }
    }
}

/// Validate an element name against the HAL naming rules.
///
/// # Errors
///
/// Returns [`DomainError::InvalidName`] for empty or reserved names.
pub fn validate_element_name(name: &str, context: &str) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::invalid_name(
            name,
            context,
            "element names must be non-empty strings",
        ));
    }

    if RESERVED_NAMES.contains(&name) {
        return Err(DomainError::invalid_name(
            name,
            context,
            "element names must not be reserved words (_links, _embedded)",
        ));
    }

    Ok(())
}

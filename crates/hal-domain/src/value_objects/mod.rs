//! Domain Value Objects
//!
//! Immutable objects that represent concepts in the domain
//! with no conceptual identity, only defined by their attributes.

mod element;
mod link;

pub use element::{Element, Embedded};
pub use link::{Link, LinkAttributes};

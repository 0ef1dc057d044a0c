//! Comprehensive tests for the Link value object

use halrs_domain::{DomainError, Link, LinkAttributes};
use serde_json::json;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_link_new() {
    let link = Link::new("self", "/api/foo").unwrap();
    assert_eq!(link.relations(), &["self".to_string()]);
    assert_eq!(link.href(), "/api/foo");
    assert!(!link.is_templated());
    assert!(link.attributes().is_empty());
}

#[test]
fn test_link_templated() {
    let link = Link::templated("search", "/api/foo{?q}").unwrap();
    assert!(link.is_templated());
}

#[test]
fn test_link_rejects_blank_relation() {
    assert!(matches!(Link::new("  ", "/x"), Err(DomainError::InvalidRelation(_))));
}

#[test]
fn test_link_from_parts_validates_attributes() {
    let mut attributes = LinkAttributes::new();
    attributes.insert("title".to_string(), json!("ok"));
    attributes.insert("bad".to_string(), json!({"nested": true}));

    assert!(matches!(
        Link::from_parts(["self"], "/x", false, attributes),
        Err(DomainError::InvalidLinkAttribute(_))
    ));
}

// ============================================================================
// With/without operations
// ============================================================================

#[test]
fn test_with_href_accepts_displayable_values() {
    let link = Link::new("self", "/a").unwrap();
    let changed = link.with_href(format_args!("/b/{}", 2));
    assert_eq!(changed.href(), "/b/2");
    assert_eq!(link.href(), "/a");
}

#[test]
fn test_with_rel_appends_once() {
    let link = Link::new("self", "/a").unwrap();
    let with_canonical = link.with_rel("canonical").unwrap();
    assert_eq!(
        with_canonical.relations(),
        &["self".to_string(), "canonical".to_string()]
    );

    let unchanged = with_canonical.with_rel("self").unwrap();
    assert_eq!(unchanged, with_canonical);
}

#[test]
fn test_with_rel_rejects_empty() {
    let link = Link::new("self", "/a").unwrap();
    assert!(matches!(link.with_rel(""), Err(DomainError::InvalidRelation(_))));
}

#[test]
fn test_without_rel() {
    let link = Link::from_parts(["self", "canonical"], "/a", false, LinkAttributes::new()).unwrap();
    let removed = link.without_rel("canonical").unwrap();
    assert_eq!(removed.relations(), &["self".to_string()]);
    assert!(link.has_relation("canonical"));
}

#[test]
fn test_with_and_without_attribute() {
    let link = Link::new("self", "/a")
        .unwrap()
        .with_attribute("title", "A")
        .unwrap()
        .with_attribute("hreflang", json!(["en", "de"]))
        .unwrap();

    assert_eq!(link.attributes().get("title"), Some(&json!("A")));
    assert_eq!(link.attributes().get("hreflang"), Some(&json!(["en", "de"])));

    let without = link.without_attribute("title");
    assert!(without.attributes().get("title").is_none());
    assert_eq!(without.without_attribute("missing"), without);
}

#[test]
fn test_with_templated() {
    let link = Link::new("self", "/a{?x}").unwrap().with_templated(true);
    assert!(link.is_templated());
    assert_eq!(
        serde_json::Value::Object(link.to_representation()),
        json!({"href": "/a{?x}", "templated": true})
    );
}

#[test]
fn test_collection_marker_truthiness() {
    let link = Link::new("item", "/a").unwrap();
    assert!(!link.forces_collection());
    assert!(link.with_attribute(Link::AS_COLLECTION, true).unwrap().forces_collection());
    assert!(!link.with_attribute(Link::AS_COLLECTION, false).unwrap().forces_collection());
    assert!(link.with_attribute(Link::AS_COLLECTION, 1).unwrap().forces_collection());
}

//! Comprehensive tests for rendering generated resources

use std::sync::Arc;

use halrs::{
    infrastructure::{ExtractorRegistry, Request, RouteTemplates, SerializeExtractor, VecPaginator},
    prelude::*,
};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
struct Article {
    id: u32,
    title: String,
    published: bool,
    tags: Vec<String>,
}

halrs::impl_entity!(Article);

fn article(id: u32) -> Article {
    Article {
        id,
        title: format!("Article {id}"),
        published: id % 2 == 0,
        tags: vec!["rust".to_string(), "hal".to_string()],
    }
}

fn generator() -> ResourceGenerator {
    let metadata = MetadataMap::new();
    metadata
        .add(RouteBasedResourceMetadata::new(ClassId::of::<Article>(), "article", "article"))
        .unwrap();
    metadata
        .add(RouteBasedCollectionMetadata::new(
            ClassId::of::<VecPaginator<Article>>(),
            "articles",
            "articles",
        ))
        .unwrap();

    let extractors = ExtractorRegistry::new();
    extractors.register("article", SerializeExtractor::<Article>::new());

    ResourceGenerator::new(
        Arc::new(metadata),
        Arc::new(extractors),
        LinkGenerator::new(Arc::new(
            RouteTemplates::new()
                .with_route("article", "/articles/{id}")
                .with_route("articles", "/articles"),
        )),
    )
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_resource() {
    let resource = generator().from_object(&article(1), &Request::new("/")).unwrap();
    let json = JsonRenderer::new(false).render(&resource).unwrap();

    assert_eq!(
        json,
        r#"{"id":1,"title":"Article 1","published":false,"tags":["rust","hal"],"_links":{"self":{"href":"/articles/1"}}}"#
    );
}

#[test]
fn test_json_paginated_collection() {
    let paginator = VecPaginator::new((1..=3).map(article).collect(), 2);
    let request = Request::new("/articles?page=2");

    let resource = generator().from_object(&paginator, &request).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&JsonRenderer::default().render(&resource).unwrap()).unwrap();

    assert_eq!(parsed["_page"], json!(2));
    assert_eq!(parsed["_page_count"], json!(2));
    assert_eq!(parsed["_total_items"], json!(3));
    assert_eq!(parsed["_links"]["prev"]["href"], json!("/articles?page=1"));
    assert!(parsed["_links"].get("next").is_none());
    assert_eq!(parsed["_embedded"]["articles"][0]["id"], json!(3));
}

#[test]
fn test_json_single_item_collection_stays_array() {
    let paginator = VecPaginator::new(vec![article(9)], 5);
    let resource = generator().from_object(&paginator, &Request::new("/articles")).unwrap();

    assert!(resource.to_value()["_embedded"]["articles"].is_array());
}

#[test]
fn test_json_link_relation_collapsing() {
    let one = Resource::default().with_link(Link::new("about", "/a").unwrap());
    assert_eq!(one.to_value(), json!({"_links": {"about": {"href": "/a"}}}));

    let two = one.with_link(Link::new("about", "/b").unwrap());
    assert_eq!(
        two.to_value(),
        json!({"_links": {"about": [{"href": "/a"}, {"href": "/b"}]}})
    );

    let forced = Resource::default().with_link(Link::new("item", "/i").unwrap().as_collection());
    assert_eq!(forced.to_value(), json!({"_links": {"item": [{"href": "/i"}]}}));
}

// ============================================================================
// XML
// ============================================================================

#[test]
fn test_xml_self_link_promotion() {
    let resource = generator()
        .from_object(&article(2), &Request::new("/"))
        .unwrap()
        .with_link(Link::new("author", "/people/1").unwrap());

    let xml = XmlRenderer::new(0).render(&resource).unwrap();

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<resource rel="self" href="/articles/2">"#));
    assert!(xml.contains(r#"<link rel="author" href="/people/1"/>"#));
    assert!(!xml.contains(r#"<link rel="self""#));
    assert!(xml.contains("<published>true</published>"));
    assert!(xml.contains("<tags>rust</tags><tags>hal</tags>"));
}

#[test]
fn test_xml_paginated_collection() {
    let paginator = VecPaginator::new((1..=4).map(article).collect(), 2);
    let resource = generator()
        .from_object(&paginator, &Request::new("/articles"))
        .unwrap();

    let xml = XmlRenderer::new(0).render(&resource).unwrap();

    assert!(xml.contains(r#"<resource rel="self" href="/articles?page=1">"#));
    assert!(xml.contains(r#"<link rel="next" href="/articles?page=2"/>"#));
    assert!(xml.contains(r#"<resource rel="articles" href="/articles/1">"#));
    assert!(xml.contains(r#"<resource rel="articles" href="/articles/2">"#));
    assert!(!xml.contains(r#"href="/articles/3""#));
    assert!(xml.ends_with("<_total_items>4</_total_items><_page>1</_page><_page_count>2</_page_count></resource>"));
}

#[test]
fn test_xml_query_string_is_escaped_in_attributes() {
    let resource = Resource::default()
        .with_link(Link::new("self", "/search?q=a&page=2").unwrap());
    let xml = XmlRenderer::new(0).render(&resource).unwrap();

    assert!(xml.contains(r#"href="/search?q=a&amp;page=2""#));
}

// ============================================================================
// Response factory
// ============================================================================

#[test]
fn test_response_negotiation() {
    let resource = generator().from_object(&article(1), &Request::new("/")).unwrap();
    let factory = ResponseFactory::from_config(&HalConfig::default().renderer);

    let json = factory
        .create_response(&Request::new("/articles/1"), &resource)
        .unwrap();
    assert_eq!(json.status, 200);
    assert_eq!(json.content_type, "application/hal+json");
    assert!(json.body.contains("\"_links\""));

    let xml = factory
        .create_response(
            &Request::new("/articles/1").with_header("Accept", "application/hal+xml"),
            &resource,
        )
        .unwrap();
    assert_eq!(xml.content_type, "application/hal+xml");
    assert!(xml.body.contains(r#"<resource rel="self" href="/articles/1">"#));
}

#[test]
fn test_response_propagates_render_errors() {
    let resource = Resource::from_data([("9lives", 9)]).unwrap();
    let result = ResponseFactory::default().create_response(
        &Request::new("/").with_header("Accept", "application/xml"),
        &resource,
    );

    assert!(matches!(result, Err(HalError::Unserializable(_))));
}

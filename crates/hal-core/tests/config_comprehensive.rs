//! Comprehensive tests for configuration-driven setup

use std::sync::Arc;

use halrs::{
    infrastructure::{ExtractorRegistry, Request, RouteTemplates, VecPaginator},
    prelude::*,
};

#[derive(Debug)]
struct Book {
    isbn: String,
}

halrs::impl_entity!(Book);

const CONFIG: &str = r#"{
    "metadata_map": [
        {
            "__class__": "RouteBasedResourceMetadata",
            "resource_class": "Book",
            "route": "book",
            "extractor": "book",
            "resource_identifier": "isbn",
            "route_identifier_placeholder": "book_isbn"
        },
        {
            "__class__": "RouteBasedCollectionMetadata",
            "collection_class": "BookPages",
            "collection_relation": "books",
            "route": "books",
            "pagination_param": "p",
            "pagination_param_type": "placeholder"
        }
    ],
    "renderer": {"json": {"pretty": false}}
}"#;

fn classes() -> ClassRegistry {
    ClassRegistry::new()
        .register::<Book>("Book")
        .register::<VecPaginator<Book>>("BookPages")
}

fn extractors() -> Arc<ExtractorRegistry> {
    let registry = ExtractorRegistry::new();
    registry.register_fn("book", |b: &Book| {
        let mut fields = Fields::new();
        fields.insert("isbn".to_string(), b.isbn.clone().into());
        fields
    });
    Arc::new(registry)
}

fn links() -> LinkGenerator {
    LinkGenerator::new(Arc::new(
        RouteTemplates::new()
            .with_route("book", "/books/{book_isbn}")
            .with_route("books", "/books/page/{p}"),
    ))
}

#[test]
fn test_full_configuration() {
    let config = HalConfig::from_json_str(CONFIG).unwrap();
    let metadata = config.build_metadata_map(&classes()).unwrap();
    assert_eq!(metadata.len(), 2);

    let generator = ResourceGenerator::from_config(
        &config.resource_generator,
        Arc::new(metadata),
        extractors(),
        links(),
    )
    .unwrap();

    let books = VecPaginator::new(
        ["111", "222", "333"]
            .into_iter()
            .map(|isbn| Book {
                isbn: isbn.to_string(),
            })
            .collect(),
        2,
    );
    let request = Request::new("/books/page/2").with_attribute("p", "2");

    let resource = generator.from_object(&books, &request).unwrap();
    let factory = ResponseFactory::from_config(&config.renderer);
    let response = factory.create_response(&request, &resource).unwrap();

    assert_eq!(
        response.body,
        concat!(
            r#"{"_total_items":3,"_page":2,"_page_count":2,"#,
            r#""_links":{"self":{"href":"/books/page/2"},"first":{"href":"/books/page/1"},"prev":{"href":"/books/page/1"}},"#,
            r#""_embedded":{"books":[{"isbn":"333","_links":{"self":{"href":"/books/333"}}}]}}"#
        )
    );
}

#[test]
fn test_strategy_configuration_errors() {
    let config = HalConfig::from_json_str(
        r#"{"resource_generator": {"strategies": {"BookMetadata": "RouteBasedResourceStrategy"}}}"#,
    )
    .unwrap();
    let result = ResourceGenerator::from_config(
        &config.resource_generator,
        Arc::new(MetadataMap::new()),
        extractors(),
        links(),
    );
    assert!(matches!(result, Err(HalError::UnknownMetadataType(_))));

    let config = HalConfig::from_json_str(
        r#"{"resource_generator": {"strategies": {"RouteBasedResourceMetadata": "BookStrategy"}}}"#,
    )
    .unwrap();
    let result = ResourceGenerator::from_config(
        &config.resource_generator,
        Arc::new(MetadataMap::new()),
        extractors(),
        links(),
    );
    assert!(matches!(result, Err(HalError::InvalidStrategy(_))));
}

#[test]
fn test_configured_generator_without_matching_strategy() {
    let config = HalConfig::from_json_str(
        r#"{"resource_generator": {"strategies": {"UrlBasedResourceMetadata": "UrlBasedResourceStrategy"}}}"#,
    )
    .unwrap();
    let metadata = HalConfig::from_json_str(CONFIG)
        .unwrap()
        .build_metadata_map(&classes())
        .unwrap();

    let generator = ResourceGenerator::from_config(
        &config.resource_generator,
        Arc::new(metadata),
        extractors(),
        links(),
    )
    .unwrap();

    let book = Book {
        isbn: "1".to_string(),
    };
    let result = generator.from_object(&book, &Request::new("/"));
    assert!(matches!(result, Err(HalError::UnknownMetadataType(_))));
}

#[test]
fn test_metadata_configuration_errors() {
    let config = HalConfig::from_json_str(CONFIG).unwrap();

    let result = config.build_metadata_map(&ClassRegistry::new().register::<Book>("Book"));
    assert!(matches!(result, Err(HalError::UndefinedClass(name)) if name == "BookPages"));
}

//! Extraction helpers shared by the built-in strategies

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    HalError, HalResult,
    domain::{Collection, Element, Embedded, Entity, Field, Link, Paginator, Resource, ServerRequest},
    generator::ResourceGenerator,
    metadata::{CollectionMetadata, PaginationParamType},
};

/// Extract `instance` into resource elements
///
/// Plain fields are copied. Nested objects become resources through the
/// generator; a nested collection contributes only the items embedded under
/// its collection relation, never the wrapping collection resource.
///
/// # Errors
/// - [`HalError::InvalidExtractor`] if no extractor is registered as
///   `extractor`, or it rejects the instance
/// - [`HalError::MaxDepthExceeded`] for a nested object when `depth`
///   exceeds `max_depth`
/// - [`HalError::InvalidObject`] for a nested object without metadata
pub fn extract_instance(
    instance: &dyn Entity,
    extractor: &str,
    max_depth: usize,
    generator: &ResourceGenerator,
    request: &dyn ServerRequest,
    depth: usize,
) -> HalResult<IndexMap<String, Element>> {
    let fields = generator
        .extractors()
        .get(extractor)
        .ok_or_else(|| {
            HalError::invalid_extractor(format!(
                "no extractor registered as {extractor:?} for {}",
                instance.class_id()
            ))
        })?
        .extract(instance)?;

    let mut elements = IndexMap::with_capacity(fields.len());
    for (name, field) in fields {
        let element = match field {
            Field::Value(value) => Element::Value(value),
            Field::Object(object) => {
                if depth > max_depth {
                    return Err(HalError::MaxDepthExceeded {
                        class: instance.class_id().name().to_string(),
                        max_depth,
                    });
                }
                extract_nested(&name, instance, object.as_ref(), generator, request, depth)?
            }
        };
        elements.insert(name, element);
    }

    Ok(elements)
}

fn extract_nested(
    name: &str,
    parent: &dyn Entity,
    object: &dyn Entity,
    generator: &ResourceGenerator,
    request: &dyn ServerRequest,
    depth: usize,
) -> HalResult<Element> {
    let class = object.class_id();
    let metadata = generator.metadata_map().get(class).map_err(|_| {
        HalError::InvalidObject(format!(
            "field {name:?} of {} holds an instance of {class}, which has no metadata",
            parent.class_id()
        ))
    })?;

    trace!(field = name, class = %class, depth = depth + 1, "Extracting nested object");
    let child = generator.from_object_at_depth(object, request, depth + 1)?;

    Ok(match metadata.as_collection() {
        Some(collection) => child
            .get_element(collection.collection_relation())
            .unwrap_or_else(|| Element::Collection(Vec::new())),
        None => Element::Resource(child),
    })
}

/// Link generation hooks used by [`extract_collection`]
pub trait CollectionLinks {
    /// Metadata variant the hooks read
    type Metadata: CollectionMetadata;

    /// Self link of an unpaginated collection
    ///
    /// # Errors
    /// Propagates link generation failures.
    fn generate_self_link(
        &self,
        metadata: &Self::Metadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
    ) -> HalResult<Link>;

    /// Link with relation `relation` to page `page`
    ///
    /// # Errors
    /// Propagates link generation failures.
    fn generate_link_for_page(
        &self,
        relation: &str,
        page: usize,
        metadata: &Self::Metadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
    ) -> HalResult<Link>;
}

/// Build the resource for a collection
///
/// Paginated collections render the requested page with `self`, `first`,
/// `prev`, `next` and `last` links as applicable plus `_total_items`,
/// `_page` and `_page_count`. Other collections render every item with a
/// `self` link and `_total_items`.
///
/// # Errors
/// - [`HalError::OutOfBounds`] for a requested page outside `1..=page_count`
///   (page 1 is always valid)
/// - anything raised while generating item resources or links
pub fn extract_collection<S: CollectionLinks>(
    strategy: &S,
    collection: &dyn Collection,
    metadata: &S::Metadata,
    generator: &ResourceGenerator,
    request: &dyn ServerRequest,
    depth: usize,
) -> HalResult<Resource> {
    match collection.as_paginator() {
        Some(paginator) => {
            extract_paginator(strategy, paginator, metadata, generator, request, depth)
        }
        None => extract_iterable(strategy, collection, metadata, generator, request, depth),
    }
}

fn extract_paginator<S: CollectionLinks>(
    strategy: &S,
    paginator: &dyn Paginator,
    metadata: &S::Metadata,
    generator: &ResourceGenerator,
    request: &dyn ServerRequest,
    depth: usize,
) -> HalResult<Resource> {
    let page_count = paginator.page_count();
    let page = requested_page(metadata, request, page_count)?;
    debug!(
        class = %metadata.class(),
        page,
        page_count,
        "Rendering collection page"
    );

    paginator.set_current_page_number(page);

    let page_link = |relation: &str, target: usize| {
        strategy.generate_link_for_page(relation, target, metadata, generator, request)
    };
    let mut links = vec![page_link("self", page)?];
    if page > 1 {
        links.push(page_link("first", 1)?);
        links.push(page_link("prev", page - 1)?);
    }
    if page < page_count {
        links.push(page_link("next", page + 1)?);
        links.push(page_link("last", page_count)?);
    }

    let items = paginator
        .current_items()
        .map(|item| generator.from_object_at_depth(item, request, depth + 1))
        .collect::<HalResult<Vec<_>>>()?;

    let data = IndexMap::from([
        ("_total_items".to_string(), Element::Value(Value::from(paginator.total_item_count()))),
        ("_page".to_string(), Element::Value(Value::from(page))),
        ("_page_count".to_string(), Element::Value(Value::from(page_count))),
    ]);

    collection_resource(metadata, data, links, items)
}

fn extract_iterable<S: CollectionLinks>(
    strategy: &S,
    collection: &dyn Collection,
    metadata: &S::Metadata,
    generator: &ResourceGenerator,
    request: &dyn ServerRequest,
    depth: usize,
) -> HalResult<Resource> {
    let items = collection
        .items()
        .map(|item| generator.from_object_at_depth(item, request, depth + 1))
        .collect::<HalResult<Vec<_>>>()?;
    let total = collection.count().unwrap_or(items.len());

    let data = IndexMap::from([(
        "_total_items".to_string(),
        Element::Value(Value::from(total)),
    )]);
    let links = vec![strategy.generate_self_link(metadata, generator, request)?];

    collection_resource(metadata, data, links, items)
}

fn collection_resource(
    metadata: &dyn CollectionMetadata,
    data: IndexMap<String, Element>,
    links: Vec<Link>,
    items: Vec<Resource>,
) -> HalResult<Resource> {
    let embedded = IndexMap::from([(
        metadata.collection_relation().to_string(),
        Embedded::Collection(items),
    )]);
    Ok(Resource::new(data, links, embedded)?)
}

/// Page requested by `request`, validated against `page_count`
///
/// A missing parameter means page 1. Unparsable values are reported as out
/// of bounds.
fn requested_page(
    metadata: &dyn CollectionMetadata,
    request: &dyn ServerRequest,
    page_count: usize,
) -> HalResult<usize> {
    let param = metadata.pagination_param();
    let raw = match metadata.pagination_param_type() {
        PaginationParamType::Query => request.query_params().get(param).cloned(),
        PaginationParamType::Placeholder => request.attribute(param).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    };

    let Some(raw) = raw else {
        return Ok(1);
    };

    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|page| usize::try_from(page).ok())
        .filter(|&page| page == 1 || (page >= 1 && page <= page_count))
        .ok_or_else(|| HalError::out_of_bounds(&raw, page_count))
}

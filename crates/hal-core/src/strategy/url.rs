//! URL-based strategies

use indexmap::IndexMap;
use url::form_urlencoded;

use super::{CollectionLinks, Strategy, extract_collection, extract_instance, unexpected_metadata};
use crate::{
    HalError, HalResult,
    domain::{Entity, Link, Resource, ServerRequest},
    generator::ResourceGenerator,
    metadata::{Metadata, MetadataKind, PaginationParamType, UrlBasedCollectionMetadata},
};

/// Strategy for [`UrlBasedResourceMetadata`](crate::metadata::UrlBasedResourceMetadata)
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlBasedResourceStrategy;

impl Strategy for UrlBasedResourceStrategy {
    fn name(&self) -> &'static str {
        "UrlBasedResourceStrategy"
    }

    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::UrlBasedResource(metadata) = metadata else {
            return Err(unexpected_metadata(self, MetadataKind::UrlBasedResource, metadata));
        };

        let data = extract_instance(
            instance,
            &metadata.extractor,
            metadata.max_depth,
            generator,
            request,
            depth,
        )?;
        let link = Link::new("self", metadata.url.as_str())?;

        Ok(Resource::new(data, vec![link], IndexMap::new())?)
    }
}

/// Strategy for [`UrlBasedCollectionMetadata`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlBasedCollectionStrategy;

impl Strategy for UrlBasedCollectionStrategy {
    fn name(&self) -> &'static str {
        "UrlBasedCollectionStrategy"
    }

    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::UrlBasedCollection(metadata) = metadata else {
            return Err(unexpected_metadata(self, MetadataKind::UrlBasedCollection, metadata));
        };
        let collection = instance.as_collection().ok_or_else(|| {
            HalError::InvalidCollection(format!("{} is not a collection", instance.class_id()))
        })?;

        extract_collection(self, collection, metadata, generator, request, depth)
    }
}

impl CollectionLinks for UrlBasedCollectionStrategy {
    type Metadata = UrlBasedCollectionMetadata;

    fn generate_self_link(
        &self,
        metadata: &UrlBasedCollectionMetadata,
        _generator: &ResourceGenerator,
        _request: &dyn ServerRequest,
    ) -> HalResult<Link> {
        Ok(Link::new("self", metadata.url.as_str())?)
    }

    fn generate_link_for_page(
        &self,
        relation: &str,
        page: usize,
        metadata: &UrlBasedCollectionMetadata,
        _generator: &ResourceGenerator,
        _request: &dyn ServerRequest,
    ) -> HalResult<Link> {
        let href = page_url(
            &metadata.url,
            &metadata.pagination_param,
            metadata.pagination_param_type,
            page,
        );
        Ok(Link::new(relation, href)?)
    }
}

/// `url` pointing at `page`
///
/// The fragment is dropped. Placeholder mode substitutes every `{param}`
/// token; query mode sets `param` in the query string, keeping the other
/// parameters in place.
fn page_url(url: &str, param: &str, param_type: PaginationParamType, page: usize) -> String {
    let url = url.split_once('#').map_or(url, |(base, _)| base);
    let page = page.to_string();

    match param_type {
        PaginationParamType::Placeholder => url.replace(&format!("{{{param}}}"), &page),
        PaginationParamType::Query => {
            let (base, query) = url.split_once('?').unwrap_or((url, ""));

            let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .filter(|(name, _)| name != param)
                .collect();
            let position = form_urlencoded::parse(query.as_bytes())
                .position(|(name, _)| name == param)
                .unwrap_or(pairs.len());
            pairs.insert(position, (param.to_string(), page));

            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            format!("{base}?{query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_appends_query_param() {
        assert_eq!(
            page_url("/widgets", "page", PaginationParamType::Query, 2),
            "/widgets?page=2"
        );
    }

    #[test]
    fn test_page_url_rewrites_in_place() {
        assert_eq!(
            page_url("/widgets?sort=name&page=1&limit=5", "page", PaginationParamType::Query, 3),
            "/widgets?sort=name&page=3&limit=5"
        );
    }

    #[test]
    fn test_page_url_preserves_other_params() {
        assert_eq!(
            page_url("/widgets?sort=name", "p", PaginationParamType::Query, 4),
            "/widgets?sort=name&p=4"
        );
    }

    #[test]
    fn test_page_url_strips_fragment() {
        assert_eq!(
            page_url("/widgets?sort=name#top", "page", PaginationParamType::Query, 2),
            "/widgets?sort=name&page=2"
        );
        assert_eq!(
            page_url("/widgets/{page}#top", "page", PaginationParamType::Placeholder, 2),
            "/widgets/2"
        );
    }

    #[test]
    fn test_page_url_placeholder() {
        assert_eq!(
            page_url("/users/{p}/widgets?sort=name", "p", PaginationParamType::Placeholder, 7),
            "/users/7/widgets?sort=name"
        );
    }
}

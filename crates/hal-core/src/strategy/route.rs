//! Route-based strategies

use indexmap::IndexMap;
use serde_json::Value;

use super::{CollectionLinks, Strategy, extract_collection, extract_instance, unexpected_metadata};
use crate::{
    HalError, HalResult,
    domain::{Element, Entity, Link, Params, Resource, ServerRequest},
    generator::ResourceGenerator,
    metadata::{
        Metadata, MetadataKind, PaginationParamType, RouteBasedCollectionMetadata,
    },
};

/// Strategy for [`RouteBasedResourceMetadata`](crate::metadata::RouteBasedResourceMetadata)
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteBasedResourceStrategy;

impl Strategy for RouteBasedResourceStrategy {
    fn name(&self) -> &'static str {
        "RouteBasedResourceStrategy"
    }

    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::RouteBasedResource(metadata) = metadata else {
            return Err(unexpected_metadata(self, MetadataKind::RouteBasedResource, metadata));
        };

        let data = extract_instance(
            instance,
            &metadata.extractor,
            metadata.max_depth,
            generator,
            request,
            depth,
        )?;

        let mut route_params = metadata.route_params.clone();
        for (identifier, placeholder) in &metadata.identifiers_to_placeholders {
            if let Some(value) = data
                .get(identifier)
                .and_then(Element::as_value)
                .and_then(route_param_value)
            {
                route_params.insert(placeholder.clone(), value);
            }
        }

        let link = generator.link_generator().from_route(
            "self",
            request,
            &metadata.route,
            &route_params,
            &Params::new(),
        )?;

        Ok(Resource::new(data, vec![link], IndexMap::new())?)
    }
}

fn route_param_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Strategy for [`RouteBasedCollectionMetadata`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteBasedCollectionStrategy;

impl RouteBasedCollectionStrategy {
    /// Request query merged with the metadata's query-string arguments
    fn query_params(metadata: &RouteBasedCollectionMetadata, request: &dyn ServerRequest) -> Params {
        let mut query = request.query_params().clone();
        query.extend(metadata.query_string_arguments());
        query
    }
}

impl Strategy for RouteBasedCollectionStrategy {
    fn name(&self) -> &'static str {
        "RouteBasedCollectionStrategy"
    }

    fn create_resource(
        &self,
        instance: &dyn Entity,
        metadata: &Metadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
        depth: usize,
    ) -> HalResult<Resource> {
        let Metadata::RouteBasedCollection(metadata) = metadata else {
            return Err(unexpected_metadata(self, MetadataKind::RouteBasedCollection, metadata));
        };
        let collection = instance.as_collection().ok_or_else(|| {
            HalError::InvalidCollection(format!("{} is not a collection", instance.class_id()))
        })?;

        extract_collection(self, collection, metadata, generator, request, depth)
    }
}

impl CollectionLinks for RouteBasedCollectionStrategy {
    type Metadata = RouteBasedCollectionMetadata;

    fn generate_self_link(
        &self,
        metadata: &RouteBasedCollectionMetadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
    ) -> HalResult<Link> {
        generator.link_generator().from_route(
            "self",
            request,
            &metadata.route,
            &metadata.route_params(),
            &Self::query_params(metadata, request),
        )
    }

    fn generate_link_for_page(
        &self,
        relation: &str,
        page: usize,
        metadata: &RouteBasedCollectionMetadata,
        generator: &ResourceGenerator,
        request: &dyn ServerRequest,
    ) -> HalResult<Link> {
        let mut route_params = metadata.route_params();
        let mut query = Self::query_params(metadata, request);

        let target = match metadata.pagination_param_type {
            PaginationParamType::Placeholder => &mut route_params,
            PaginationParamType::Query => &mut query,
        };
        target.insert(metadata.pagination_param.clone(), page.to_string());

        generator
            .link_generator()
            .from_route(relation, request, &metadata.route, &route_params, &query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_param_value() {
        assert_eq!(route_param_value(&json!("abc")), Some("abc".to_string()));
        assert_eq!(route_param_value(&json!(42)), Some("42".to_string()));
        assert_eq!(route_param_value(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(route_param_value(&json!(true)), Some("true".to_string()));
        assert_eq!(route_param_value(&json!(null)), None);
        assert_eq!(route_param_value(&json!([1])), None);
    }
}

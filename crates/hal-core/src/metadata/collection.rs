//! Collection metadata

use parking_lot::RwLock;

use super::PaginationParamType;
use crate::domain::{ClassId, Params};

/// Fields shared by both collection kinds
pub trait CollectionMetadata {
    /// Class described
    fn class(&self) -> ClassId;

    /// Relation the items are embedded under
    fn collection_relation(&self) -> &str;

    /// Name of the page parameter
    fn pagination_param(&self) -> &str;

    /// Where the page parameter lives
    fn pagination_param_type(&self) -> PaginationParamType;
}

/// Collection whose links are generated from a route
///
/// Route parameters and query-string arguments can be changed after the
/// metadata is registered, e.g. to scope a shared collection route to the
/// current parent resource. Both are read when links are generated.
#[derive(Debug)]
pub struct RouteBasedCollectionMetadata {
    /// Class described
    pub class: ClassId,
    /// Relation the items are embedded under
    pub collection_relation: String,
    /// Route name handed to the URL generator
    pub route: String,
    /// Name of the page parameter
    pub pagination_param: String,
    /// Where the page parameter lives
    pub pagination_param_type: PaginationParamType,
    route_params: RwLock<Params>,
    query_string_arguments: RwLock<Params>,
}

impl RouteBasedCollectionMetadata {
    /// Metadata paginated through the `page` query parameter
    pub fn new(
        class: ClassId,
        collection_relation: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            class,
            collection_relation: collection_relation.into(),
            route: route.into(),
            pagination_param: "page".to_string(),
            pagination_param_type: PaginationParamType::Query,
            route_params: RwLock::new(Params::new()),
            query_string_arguments: RwLock::new(Params::new()),
        }
    }

    /// Change the page parameter
    pub fn with_pagination(mut self, param: impl Into<String>, param_type: PaginationParamType) -> Self {
        self.pagination_param = param.into();
        self.pagination_param_type = param_type;
        self
    }

    /// Set the initial route parameters
    pub fn with_route_params(self, route_params: Params) -> Self {
        *self.route_params.write() = route_params;
        self
    }

    /// Set the initial query-string arguments
    pub fn with_query_string_arguments(self, arguments: Params) -> Self {
        *self.query_string_arguments.write() = arguments;
        self
    }

    /// Snapshot of the route parameters
    pub fn route_params(&self) -> Params {
        self.route_params.read().clone()
    }

    /// Replace the route parameters
    pub fn set_route_params(&self, route_params: Params) {
        *self.route_params.write() = route_params;
    }

    /// Snapshot of the query-string arguments
    pub fn query_string_arguments(&self) -> Params {
        self.query_string_arguments.read().clone()
    }

    /// Replace the query-string arguments
    pub fn set_query_string_arguments(&self, arguments: Params) {
        *self.query_string_arguments.write() = arguments;
    }
}

impl Clone for RouteBasedCollectionMetadata {
    fn clone(&self) -> Self {
        Self {
            class: self.class,
            collection_relation: self.collection_relation.clone(),
            route: self.route.clone(),
            pagination_param: self.pagination_param.clone(),
            pagination_param_type: self.pagination_param_type,
            route_params: RwLock::new(self.route_params()),
            query_string_arguments: RwLock::new(self.query_string_arguments()),
        }
    }
}

impl CollectionMetadata for RouteBasedCollectionMetadata {
    fn class(&self) -> ClassId {
        self.class
    }

    fn collection_relation(&self) -> &str {
        &self.collection_relation
    }

    fn pagination_param(&self) -> &str {
        &self.pagination_param
    }

    fn pagination_param_type(&self) -> PaginationParamType {
        self.pagination_param_type
    }
}

/// Collection whose links are derived from a fixed URL
///
/// Page links rewrite the URL itself: the `{param}` token in placeholder
/// mode, the query parameter in query mode.
#[derive(Debug, Clone)]
pub struct UrlBasedCollectionMetadata {
    /// Class described
    pub class: ClassId,
    /// Relation the items are embedded under
    pub collection_relation: String,
    /// Collection URL
    pub url: String,
    /// Name of the page parameter
    pub pagination_param: String,
    /// Where the page parameter lives
    pub pagination_param_type: PaginationParamType,
}

impl UrlBasedCollectionMetadata {
    /// Metadata paginated through the `page` query parameter
    pub fn new(class: ClassId, collection_relation: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            class,
            collection_relation: collection_relation.into(),
            url: url.into(),
            pagination_param: "page".to_string(),
            pagination_param_type: PaginationParamType::Query,
        }
    }

    /// Change the page parameter
    pub fn with_pagination(mut self, param: impl Into<String>, param_type: PaginationParamType) -> Self {
        self.pagination_param = param.into();
        self.pagination_param_type = param_type;
        self
    }
}

impl CollectionMetadata for UrlBasedCollectionMetadata {
    fn class(&self) -> ClassId {
        self.class
    }

    fn collection_relation(&self) -> &str {
        &self.collection_relation
    }

    fn pagination_param(&self) -> &str {
        &self.pagination_param
    }

    fn pagination_param_type(&self) -> PaginationParamType {
        self.pagination_param_type
    }
}

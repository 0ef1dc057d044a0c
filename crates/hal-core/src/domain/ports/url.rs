//! URL generation contract

use indexmap::IndexMap;

use super::ServerRequest;
use crate::HalResult;

/// Ordered string parameters for routes and query strings
pub type Params = IndexMap<String, String>;

/// Builds hrefs from route names
pub trait UrlGenerator: Send + Sync {
    /// Generate the URL for `route`
    ///
    /// # Errors
    ///
    /// Returns [`HalError::UrlGeneration`](crate::HalError::UrlGeneration) if
    /// the route is unknown or a required parameter is missing.
    fn generate(
        &self,
        request: &dyn ServerRequest,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> HalResult<String>;
}

impl<F> UrlGenerator for F
where
    F: Fn(&dyn ServerRequest, &str, &Params, &Params) -> HalResult<String> + Send + Sync,
{
    fn generate(
        &self,
        request: &dyn ServerRequest,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> HalResult<String> {
        self(request, route, route_params, query_params)
    }
}

//! Route-based link generation

use std::{fmt, sync::Arc};

use crate::{
    HalResult,
    domain::{Link, Params, ServerRequest, UrlGenerator},
};

/// Builds [`Link`]s whose hrefs come from a [`UrlGenerator`]
#[derive(Clone)]
pub struct LinkGenerator {
    url_generator: Arc<dyn UrlGenerator>,
}

impl LinkGenerator {
    /// Wrap `url_generator`
    pub fn new(url_generator: Arc<dyn UrlGenerator>) -> Self {
        Self { url_generator }
    }

    /// Link with relation `relation` pointing at `route`
    ///
    /// # Errors
    ///
    /// Propagates URL generator failures; fails with
    /// [`DomainError::InvalidRelation`](crate::DomainError::InvalidRelation)
    /// for a blank relation.
    pub fn from_route(
        &self,
        relation: &str,
        request: &dyn ServerRequest,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> HalResult<Link> {
        let href = self
            .url_generator
            .generate(request, route, route_params, query_params)?;
        Ok(Link::new(relation, href)?)
    }

    /// Same as [`LinkGenerator::from_route`] with the templated flag set
    ///
    /// # Errors
    ///
    /// See [`LinkGenerator::from_route`].
    pub fn templated_from_route(
        &self,
        relation: &str,
        request: &dyn ServerRequest,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> HalResult<Link> {
        self.from_route(relation, request, route, route_params, query_params)
            .map(|link| link.with_templated(true))
    }
}

impl fmt::Debug for LinkGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkGenerator").finish_non_exhaustive()
    }
}

//! Route-template URL generator

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::form_urlencoded;

use crate::{
    HalError, HalResult,
    domain::{Params, ServerRequest, UrlGenerator},
};

/// Characters escaped in a substituted path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL generator over named path templates with `{placeholder}` segments
///
/// Parameter values are percent-encoded as single path segments. `{?name}`
/// and `{&name}` query expansions are left untouched so templated links can
/// carry them.
///
/// # Examples
/// ```
/// # use halrs::infrastructure::{Request, RouteTemplates};
/// # use halrs::domain::{Params, UrlGenerator};
/// let routes = RouteTemplates::new().with_route("widget", "/widgets/{id}");
///
/// let mut params = Params::new();
/// params.insert("id".to_string(), "42".to_string());
///
/// let href = routes
///     .generate(&Request::new("/"), "widget", &params, &Params::new())
///     .unwrap();
/// assert_eq!(href, "/widgets/42");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTemplates {
    routes: IndexMap<String, String>,
    base_url: String,
}

impl RouteTemplates {
    /// Create a generator with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the template for `name`
    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }

    /// Prefix every generated URL with `base_url`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn expand(route: &str, template: &str, params: &Params) -> HalResult<String> {
        let mut path = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            let Some(end) = rest[start..].find('}') else {
                return Err(HalError::UrlGeneration(format!(
                    "route {route} has an unterminated placeholder in {template:?}"
                )));
            };
            let name = &rest[start + 1..start + end];

            // query expansions stay in place for templated links
            if name.starts_with(['?', '&']) {
                path.push_str(&rest[..=start + end]);
                rest = &rest[start + end + 1..];
                continue;
            }

            let value = params.get(name).ok_or_else(|| {
                HalError::UrlGeneration(format!("route {route} requires parameter {name:?}"))
            })?;

            path.push_str(&rest[..start]);
            path.extend(utf8_percent_encode(value, PATH_SEGMENT));
            rest = &rest[start + end + 1..];
        }

        path.push_str(rest);
        Ok(path)
    }
}

impl UrlGenerator for RouteTemplates {
    fn generate(
        &self,
        _request: &dyn ServerRequest,
        route: &str,
        route_params: &Params,
        query_params: &Params,
    ) -> HalResult<String> {
        let template = self
            .routes
            .get(route)
            .ok_or_else(|| HalError::UrlGeneration(format!("route {route} is not defined")))?;

        let mut url = format!("{}{}", self.base_url, Self::expand(route, template, route_params)?);

        if !query_params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query_params)
                .finish();
            url.push('?');
            url.push_str(&query);
        }

        Ok(url)
    }
}

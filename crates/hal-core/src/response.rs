//! Content-negotiated HAL responses

use tracing::debug;

use crate::{
    HalResult,
    config::RendererConfig,
    domain::{Resource, ServerRequest},
    renderer::{JsonRenderer, Renderer, XmlRenderer},
};

/// Rendered response ready to hand to an HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header value
    pub content_type: String,
    /// Rendered document
    pub body: String,
}

/// Picks a renderer from the request's `Accept` header
///
/// HAL+JSON is the default; HAL+XML is chosen when the best-ranked
/// acceptable media type is an XML type.
#[derive(Debug, Clone, Default)]
pub struct ResponseFactory {
    json: JsonRenderer,
    xml: XmlRenderer,
}

impl ResponseFactory {
    /// Create a factory from explicit renderers
    pub fn new(json: JsonRenderer, xml: XmlRenderer) -> Self {
        Self { json, xml }
    }

    /// Factory configured from `config`
    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(
            JsonRenderer::from_config(&config.json),
            XmlRenderer::from_config(&config.xml),
        )
    }

    /// Render `resource` for `request` with status 200
    ///
    /// # Errors
    /// Propagates renderer failures.
    pub fn create_response(&self, request: &dyn ServerRequest, resource: &Resource) -> HalResult<HalResponse> {
        self.create_response_with_status(request, resource, 200)
    }

    /// Render `resource` for `request` with `status`
    ///
    /// # Errors
    /// Propagates renderer failures.
    pub fn create_response_with_status(
        &self,
        request: &dyn ServerRequest,
        resource: &Resource,
        status: u16,
    ) -> HalResult<HalResponse> {
        let renderer = self.negotiate(request.header("accept").unwrap_or("*/*"));
        debug!(media_type = renderer.media_type(), status, "Negotiated HAL response");

        Ok(HalResponse {
            status,
            content_type: renderer.media_type().to_string(),
            body: renderer.render(resource)?,
        })
    }

    fn negotiate(&self, accept: &str) -> &dyn Renderer {
        let mut best: Option<(f32, Format)> = None;

        for range in accept.split(',') {
            let mut parts = range.split(';').map(str::trim);
            let media_type = parts.next().unwrap_or_default().to_ascii_lowercase();
            let quality = parts
                .filter_map(|param| param.strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            let Some(format) = Format::for_media_type(&media_type) else {
                continue;
            };
            if quality <= 0.0 {
                continue;
            }

            // JSON wins ties
            let better = match best {
                None => true,
                Some((q, f)) => quality > q || (quality == q && format < f),
            };
            if better {
                best = Some((quality, format));
            }
        }

        match best.map(|(_, format)| format) {
            Some(Format::Xml) => &self.xml,
            Some(Format::Json) | None => &self.json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Format {
    Json,
    Xml,
}

impl Format {
    fn for_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "*/*" | "application/*" => Some(Self::Json),
            t if t.ends_with("/json") || t.ends_with("+json") => Some(Self::Json),
            t if t.ends_with("/xml") || t.ends_with("+xml") => Some(Self::Xml),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Link, infrastructure::Request, renderer::{HAL_JSON, HAL_XML}};

    fn resource() -> Resource {
        Resource::from_data([("id", 1)])
            .unwrap()
            .with_link(Link::new("self", "/a/1").unwrap())
    }

    fn content_type(accept: Option<&str>) -> String {
        let mut request = Request::new("/a/1");
        if let Some(accept) = accept {
            request = request.with_header("Accept", accept);
        }
        ResponseFactory::default()
            .create_response(&request, &resource())
            .unwrap()
            .content_type
    }

    #[test]
    fn test_json_is_default() {
        assert_eq!(content_type(None), HAL_JSON);
        assert_eq!(content_type(Some("*/*")), HAL_JSON);
        assert_eq!(content_type(Some("text/html")), HAL_JSON);
    }

    #[test]
    fn test_xml_requested() {
        assert_eq!(content_type(Some("application/hal+xml")), HAL_XML);
        assert_eq!(content_type(Some("application/xml")), HAL_XML);
        assert_eq!(content_type(Some("text/html, application/xml;q=0.9")), HAL_XML);
    }

    #[test]
    fn test_quality_ordering() {
        assert_eq!(
            content_type(Some("application/json;q=0.5, application/xml;q=0.8")),
            HAL_XML
        );
        assert_eq!(
            content_type(Some("application/xml;q=0.5, application/hal+json")),
            HAL_JSON
        );
        assert_eq!(content_type(Some("application/xml;q=0, */*;q=0.1")), HAL_JSON);
    }

    #[test]
    fn test_response_body_and_status() {
        let response = ResponseFactory::new(JsonRenderer::new(false), XmlRenderer::new(0))
            .create_response_with_status(&Request::new("/a/1"), &resource(), 201)
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.body, r#"{"id":1,"_links":{"self":{"href":"/a/1"}}}"#);
    }
}

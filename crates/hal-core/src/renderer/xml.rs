//! HAL+XML renderer
//!
//! Builds the document depth-first from [`Resource::to_array`]:
//!
//! - each resource is a `<resource>` element; a single `self` link is
//!   promoted onto its attributes (`rel`, `href`, then the link's other
//!   attributes), `rel` being `self` at the root and the embedding relation
//!   below it
//! - remaining links become `<link rel=".." ../>` children
//! - embedded resources become nested `<resource>` children
//! - data entries become elements named after their key

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde_json::{Map, Value};
use tracing::debug;

use super::{HAL_XML, Renderer};
use crate::{HalError, HalResult, config::XmlRendererConfig, domain::Resource};

type XmlWriter = Writer<Vec<u8>>;

/// Renders resources as UTF-8 HAL+XML
#[derive(Debug, Clone, Copy)]
pub struct XmlRenderer {
    indent: usize,
}

impl XmlRenderer {
    /// Create a renderer indenting by `indent` spaces; 0 disables indentation
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Renderer configured from `config`
    pub fn from_config(config: &XmlRendererConfig) -> Self {
        Self::new(config.indent)
    }
}

impl Default for XmlRenderer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Renderer for XmlRenderer {
    fn media_type(&self) -> &'static str {
        HAL_XML
    }

    fn render(&self, resource: &Resource) -> HalResult<String> {
        let mut writer = if self.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', self.indent)
        } else {
            Writer::new(Vec::new())
        };

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        write_resource(&mut writer, &resource.to_array(), "self")?;

        let output = String::from_utf8(writer.into_inner()).map_err(|e| HalError::xml(e.to_string()))?;
        debug!(bytes = output.len(), "Rendered HAL+XML");
        Ok(output)
    }
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> HalResult<()> {
    writer
        .write_event(event)
        .map_err(|e| HalError::xml(e.to_string()))
}

fn write_resource(writer: &mut XmlWriter, resource: &Map<String, Value>, rel: &str) -> HalResult<()> {
    let links = resource.get("_links").and_then(Value::as_object);
    let embedded = resource.get("_embedded").and_then(Value::as_object);

    let self_link = links
        .and_then(|links| links.get("self"))
        .and_then(Value::as_object)
        .filter(|link| link.contains_key("href"));

    let mut start = BytesStart::new("resource");
    if let Some(link) = self_link {
        start.push_attribute(("rel", rel));
        if let Some(href) = link.get("href") {
            start.push_attribute(("href", attribute_value(href)?.as_str()));
        }
        for (name, value) in link.iter().filter(|(name, _)| *name != "href") {
            ensure_link_attribute("self", name)?;
            start.push_attribute((name.as_str(), attribute_value(value)?.as_str()));
        }
    }

    let other_links: Vec<(&String, &Value)> = links
        .into_iter()
        .flatten()
        .filter(|(relation, _)| self_link.is_none() || *relation != "self")
        .collect();
    let children: Vec<(&String, &Value)> = embedded.into_iter().flatten().collect();
    let data: Vec<(&String, &Value)> = resource
        .iter()
        .filter(|(name, _)| *name != "_links" && *name != "_embedded")
        .collect();

    if other_links.is_empty() && children.is_empty() && data.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    let end = start.to_end().into_owned();
    emit(writer, Event::Start(start))?;

    for (relation, link) in other_links {
        for_each_item(link, |item| write_link(writer, relation, item))?;
    }
    for (relation, child) in children {
        for_each_item(child, |item| {
            let map = item.as_object().ok_or_else(|| {
                HalError::unserializable(format!("embedded {relation:?} is not a resource"))
            })?;
            write_resource(writer, map, relation)
        })?;
    }
    for (name, value) in data {
        write_field(writer, name, value)?;
    }

    emit(writer, Event::End(end))
}

/// Call `f` once per array item, or once for a non-array value
fn for_each_item(
    value: &Value,
    mut f: impl FnMut(&Value) -> HalResult<()>,
) -> HalResult<()> {
    match value {
        Value::Array(items) => items.iter().try_for_each(f),
        other => f(other),
    }
}

fn write_link(writer: &mut XmlWriter, relation: &str, link: &Value) -> HalResult<()> {
    let attributes = link
        .as_object()
        .ok_or_else(|| HalError::unserializable(format!("link {relation:?} is not a map")))?;

    let mut element = BytesStart::new("link");
    element.push_attribute(("rel", relation));
    for (name, value) in attributes {
        ensure_link_attribute(relation, name)?;
        element.push_attribute((name.as_str(), attribute_value(value)?.as_str()));
    }
    emit(writer, Event::Empty(element))
}

fn write_field(writer: &mut XmlWriter, name: &str, value: &Value) -> HalResult<()> {
    ensure_name(name)?;

    match value {
        Value::Null => emit(writer, Event::Empty(BytesStart::new(name))),
        Value::Object(map) if map.is_empty() => emit(writer, Event::Empty(BytesStart::new(name))),
        Value::Object(map) => {
            emit(writer, Event::Start(BytesStart::new(name)))?;
            for (key, nested) in map {
                write_field(writer, key, nested)?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        Value::Array(items) => items.iter().try_for_each(|item| {
            if item.is_array() {
                return Err(HalError::unserializable(format!(
                    "element {name:?} holds an array nested in an array"
                )));
            }
            write_field(writer, name, item)
        }),
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            emit(writer, Event::Start(BytesStart::new(name)))?;
            emit(writer, Event::Text(BytesText::new(&text)))?;
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Attribute text; lists are joined with commas
fn attribute_value(value: &Value) -> HalResult<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| {
                    HalError::unserializable("link attribute lists may only hold scalars")
                })
            })
            .collect::<HalResult<Vec<_>>>()
            .map(|parts| parts.join(",")),
        other => scalar_text(other)
            .ok_or_else(|| HalError::unserializable("link attributes cannot be maps")),
    }
}

/// `rel` is written from the relation and may not repeat as an attribute
fn ensure_link_attribute(relation: &str, name: &str) -> HalResult<()> {
    if name == "rel" {
        return Err(HalError::unserializable(format!(
            "link {relation:?} carries a \"rel\" attribute"
        )));
    }
    ensure_name(name)
}

/// Reject names that cannot be used as XML element or attribute names
fn ensure_name(name: &str) -> HalResult<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));

    if valid {
        Ok(())
    } else {
        Err(HalError::unserializable(format!(
            "{name:?} is not a valid XML name"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Link;
    use serde_json::json;

    const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

    fn compact(resource: &Resource) -> String {
        XmlRenderer::new(0).render(resource).unwrap()
    }

    fn resource(data: Value) -> Resource {
        match data {
            Value::Object(map) => Resource::from_map(map).unwrap(),
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_self_link_promoted_to_attributes() {
        let res = resource(json!({"id": 1}))
            .with_link(Link::new("self", "/a/1").unwrap())
            .with_link(Link::new("about", "/about").unwrap());

        assert_eq!(
            compact(&res),
            format!(
                r#"{DECL}<resource rel="self" href="/a/1"><link rel="about" href="/about"/><id>1</id></resource>"#
            )
        );
    }

    #[test]
    fn test_resource_without_self_link_has_no_rel() {
        let res = resource(json!({"id": 1}));
        assert_eq!(compact(&res), format!("{DECL}<resource><id>1</id></resource>"));
    }

    #[test]
    fn test_empty_resource() {
        let res = Resource::default().with_link(Link::new("self", "/empty").unwrap());
        assert_eq!(
            compact(&res),
            format!(r#"{DECL}<resource rel="self" href="/empty"/>"#)
        );
    }

    #[test]
    fn test_self_link_extra_attributes() {
        let link = Link::new("self", "/a")
            .unwrap()
            .with_attribute("title", "A & B")
            .unwrap()
            .with_attribute("hreflang", json!(["en", "de"]))
            .unwrap();
        let res = Resource::default().with_link(link);

        assert_eq!(
            compact(&res),
            format!(r#"{DECL}<resource rel="self" href="/a" title="A &amp; B" hreflang="en,de"/>"#)
        );
    }

    #[test]
    fn test_templated_link_attribute() {
        let res = Resource::default().with_link(Link::templated("search", "/s{?q}").unwrap());
        assert_eq!(
            compact(&res),
            format!(r#"{DECL}<resource><link rel="search" href="/s{{?q}}" templated="true"/></resource>"#)
        );
    }

    #[test]
    fn test_embedded_resources_use_relation() {
        let child = |id: i64| {
            resource(json!({"id": id})).with_link(Link::new("self", format!("/c/{id}")).unwrap())
        };
        let res = Resource::default()
            .embed("child", vec![child(1), child(2)], false)
            .unwrap();

        assert_eq!(
            compact(&res),
            format!(
                r#"{DECL}<resource><resource rel="child" href="/c/1"><id>1</id></resource><resource rel="child" href="/c/2"><id>2</id></resource></resource>"#
            )
        );
    }

    #[test]
    fn test_data_values() {
        let res = resource(json!({
            "flag": false,
            "none": null,
            "tags": ["a", "b"],
            "size": {"w": 2, "h": 3.5},
            "text": "<hi>"
        }));

        assert_eq!(
            compact(&res),
            format!(
                "{DECL}<resource><flag>false</flag><none/><tags>a</tags><tags>b</tags><size><w>2</w><h>3.5</h></size><text>&lt;hi&gt;</text></resource>"
            )
        );
    }

    #[test]
    fn test_array_of_maps() {
        let res = resource(json!({"point": [{"x": 1}, {"x": 2}]}));
        assert_eq!(
            compact(&res),
            format!("{DECL}<resource><point><x>1</x></point><point><x>2</x></point></resource>")
        );
    }

    #[test]
    fn test_nested_arrays_are_unserializable() {
        let res = resource(json!({"matrix": [[1, 2], [3, 4]]}));
        assert!(matches!(
            XmlRenderer::default().render(&res),
            Err(HalError::Unserializable(_))
        ));
    }

    #[test]
    fn test_invalid_element_name() {
        let res = resource(json!({"1st": true}));
        assert!(matches!(
            XmlRenderer::default().render(&res),
            Err(HalError::Unserializable(_))
        ));

        let res = resource(json!({"has space": true}));
        assert!(matches!(
            XmlRenderer::default().render(&res),
            Err(HalError::Unserializable(_))
        ));
    }

    #[test]
    fn test_rel_link_attribute_is_unserializable() {
        let about = Link::new("about", "/a").unwrap().with_attribute("rel", "x").unwrap();
        let res = Resource::default().with_link(about);
        assert!(matches!(
            XmlRenderer::new(0).render(&res),
            Err(HalError::Unserializable(msg)) if msg.contains("about")
        ));

        let own = Link::new("self", "/a").unwrap().with_attribute("rel", "x").unwrap();
        let res = Resource::default().with_link(own);
        assert!(matches!(
            XmlRenderer::new(0).render(&res),
            Err(HalError::Unserializable(_))
        ));
    }

    #[test]
    fn test_indented_output() {
        let res = resource(json!({"id": 1})).with_link(Link::new("self", "/a/1").unwrap());
        let xml = XmlRenderer::new(2).render(&res).unwrap();

        assert!(xml.starts_with(DECL));
        assert!(xml.contains(r#"<resource rel="self" href="/a/1">"#));
        assert!(xml.contains("\n  <id>1</id>"));
    }
}

#![deny(missing_docs)]

//! # Refract Serialization
//!
//! Refract JSON serialization of element trees.

use super::{Content, Element, SourceMap};
use indexmap::IndexMap;
use serde_json::{json, Map, Value as JsonValue};

impl Element {
    /// Serializes the element into refract JSON.
    ///
    /// Classes are emitted under `meta.classes`, the source map under
    /// `attributes.sourceMap`. Empty maps and empty content are omitted.
    pub fn to_refract(&self) -> JsonValue {
        let mut object = Map::new();
        object.insert("element".into(), JsonValue::String(self.kind.clone()));

        let mut meta = entries_to_refract(&self.meta);
        if !self.classes.is_empty() {
            let classes: Vec<JsonValue> = self
                .classes
                .iter()
                .map(|c| json!({ "element": "string", "content": c }))
                .collect();
            meta.insert(
                "classes".into(),
                json!({ "element": "array", "content": classes }),
            );
        }
        if !meta.is_empty() {
            object.insert("meta".into(), JsonValue::Object(meta));
        }

        let mut attributes = entries_to_refract(&self.attributes);
        if let Some(source_map) = &self.source_map {
            attributes.insert("sourceMap".into(), source_map_to_refract(source_map));
        }
        if !attributes.is_empty() {
            object.insert("attributes".into(), JsonValue::Object(attributes));
        }

        let content = match &self.content {
            Content::Empty => None,
            Content::String(s) => Some(JsonValue::String(s.clone())),
            Content::Number(n) => Some(JsonValue::Number(n.clone())),
            Content::Boolean(b) => Some(JsonValue::Bool(*b)),
            Content::Elements(children) => Some(JsonValue::Array(
                children.iter().map(Element::to_refract).collect(),
            )),
            Content::Member(member) => Some(json!({
                "key": member.key.to_refract(),
                "value": member.value.to_refract(),
            })),
        };
        if let Some(content) = content {
            object.insert("content".into(), content);
        }

        JsonValue::Object(object)
    }
}

fn entries_to_refract(entries: &IndexMap<String, Element>) -> Map<String, JsonValue> {
    entries
        .iter()
        .map(|(name, value)| (name.clone(), value.to_refract()))
        .collect()
}

fn source_map_to_refract(source_map: &SourceMap) -> JsonValue {
    let ranges: Vec<JsonValue> = source_map
        .ranges()
        .iter()
        .map(|(offset, length)| {
            json!({
                "element": "array",
                "content": [
                    { "element": "number", "content": offset },
                    { "element": "number", "content": length },
                ],
            })
        })
        .collect();
    json!({
        "element": "array",
        "content": [{ "element": "sourceMap", "content": ranges }],
    })
}

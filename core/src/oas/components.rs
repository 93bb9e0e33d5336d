#![deny(missing_docs)]

//! # Components Object
//!
//! Registers reusable components in the `Context` so later `$ref`s can be
//! resolved. Sections are parsed in document order and entries are defined
//! as soon as they parse, so an entry may only reference entries registered
//! before it. Schema ids are declared up front, which lets schemas refer to
//! themselves or to schemas further down through placeholders. An entry that
//! fails is left out of the registry and the section.

use crate::annotations::{invalid_key_warning, type_mismatch};
use crate::combinators::{parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::{Element, Member};
use crate::oas::operation::parse_response_object;
use crate::oas::parameter::parse_parameter_object;
use crate::oas::reference::{is_reference, parse_reference_object, parse_reference_or};
use crate::parse_result::{ParseResult, Severity};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const NAME: &str = "Components Object";
const COMPONENT_KEY_PATTERN: &str = r"^[a-zA-Z0-9._-]+$";

const GRAMMAR: Grammar = Grammar::new(
    NAME,
    &[
        "schemas",
        "parameters",
        "responses",
        "requestBodies",
        "headers",
        "examples",
        "securitySchemes",
    ],
    &["links", "callbacks", "pathItems"],
);

/// Whether `key` is a valid component identifier.
pub fn is_component_key(key: &str) -> bool {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    KEY_RE
        .get_or_init(|| Regex::new(COMPONENT_KEY_PATTERN).expect("Invalid regex constant"))
        .is_match(key)
}

/// Parses a Components Object, registering every component it defines.
///
/// The returned object maps each section to its parsed entries; schemas are
/// `dataStructure` elements with meta `id`.
pub fn parse_components_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                if value.is_object() {
                    declare_schemas(context, &value);
                }
                value
            }),
            step(|value, context| {
                parse_object(context, NAME, value, &[], |member, context| {
                    GRAMMAR.dispatch(member, context, |kind, member, context| {
                        parse_section(context, kind, member)
                    })
                })
            }),
        ],
    )
}

fn declare_schemas(context: &mut Context, components: &Element) {
    let registry = context.components_mut();
    let Some(schemas) = components.get("schemas").filter(|s| s.is_object()) else {
        return;
    };
    registry.add_kind("schemas");
    for member in schemas.members() {
        if let Some(id) = member.key_str().filter(|id| is_component_key(id)) {
            registry.declare("schemas", id);
        }
    }
}

fn parse_section(context: &mut Context, kind: &str, member: Member) -> ParseResult {
    if !member.value.is_object() {
        return type_mismatch(NAME, &member, "object", Severity::Warning);
    }
    context.components_mut().add_kind(kind);

    parse_object(context, NAME, member.value, &[], |entry, context| {
        let Some(id) = entry.key_str().filter(|id| is_component_key(id)).map(String::from) else {
            return invalid_key_warning(NAME, &entry);
        };
        let result = parse_entry(context, kind, &id, entry);

        match result.value() {
            Some(value) => {
                debug!(kind, id = id.as_str(), "registered component");
                context.components_mut().define(kind, &id, value.clone());
            }
            None => context.components_mut().forget(kind, &id),
        }
        result.isolate()
    })
}

fn parse_entry(context: &mut Context, kind: &str, id: &str, entry: Member) -> ParseResult {
    match kind {
        "schemas" => parse_schema(context, id, entry.value),
        "parameters" => parse_reference_or(context, kind, entry.value, false, parse_parameter_object),
        "responses" => parse_reference_or(context, kind, entry.value, false, parse_response_object),
        _ if entry.value.is_object() => ParseResult::wrap(entry.value),
        _ => type_mismatch(NAME, &entry, "object", Severity::Warning),
    }
}

/// A schema becomes a `dataStructure` holding the schema as written, or a
/// placeholder naming the schema it refers to.
fn parse_schema(context: &mut Context, id: &str, element: Element) -> ParseResult {
    let id_element = Element::string(id);
    if is_reference(&element) {
        return pipe_parse_result(
            context,
            element,
            vec![
                step(|value, context| parse_reference_object(context, "schemas", value, true)),
                step(|placeholder, _| data_structure(id_element, placeholder)),
            ],
        );
    }
    if !element.is_object() {
        let member = Member::new(id_element, element);
        return type_mismatch(NAME, &member, "object", Severity::Warning);
    }
    ParseResult::wrap(data_structure(id_element, element))
}

fn data_structure(id: Element, content: Element) -> Element {
    let mut data_structure = Element::container("dataStructure", vec![content]);
    data_structure.set_meta("id", id);
    data_structure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ComponentEntry, ParseOptions};
    use crate::loader::parse_yaml;

    fn parse(source: &str) -> (Context, ParseResult) {
        let mut context = Context::new(ParseOptions::default());
        let result = parse_components_object(&mut context, parse_yaml(source).unwrap());
        (context, result)
    }

    #[test]
    fn test_component_keys() {
        assert!(is_component_key("User.v1_final-2"));
        assert!(!is_component_key("bad key"));
        assert!(!is_component_key(""));
    }

    #[test]
    fn test_registers_sections() {
        let (context, result) = parse(
            "schemas:\n  User: {type: object}\n\
             parameters:\n  Limit: {name: limit, in: query}\n\
             responses:\n  NotFound: {description: Missing}\n\
             securitySchemes:\n  Token: {type: http, scheme: bearer}\n\
             links: {}\n",
        );
        assert_eq!(
            result.messages(),
            vec!["'Components Object' contains unsupported key 'links'"]
        );
        let registry = context.state.components.as_ref().unwrap();
        for (kind, id) in [
            ("schemas", "User"),
            ("parameters", "Limit"),
            ("responses", "NotFound"),
            ("securitySchemes", "Token"),
        ] {
            assert!(
                matches!(registry.get(kind, id), Some(ComponentEntry::Defined(_))),
                "{kind}/{id}"
            );
        }

        let user = result.value().unwrap().get("schemas").unwrap().get("User").unwrap();
        assert_eq!(user.kind, "dataStructure");
        assert_eq!(user.id(), Some("User"));
    }

    #[test]
    fn test_left_to_right_registration() {
        let (context, result) = parse(
            "parameters:\n  Page: {$ref: '#/components/parameters/Limit'}\n  Limit: {name: limit, in: query}\n",
        );
        assert_eq!(
            result.messages(),
            vec!["'#/components/parameters/Limit' is not defined"]
        );
        assert!(result.has_errors());
        let parameters = result.value().unwrap().get("parameters").unwrap();
        let ids: Vec<_> = parameters.members().map(Member::key_name).collect();
        assert_eq!(ids, vec!["Limit"]);

        let registry = context.state.components.as_ref().unwrap();
        assert!(registry.get("parameters", "Page").is_none());
        assert!(matches!(
            registry.get("parameters", "Limit"),
            Some(ComponentEntry::Defined(_))
        ));
    }

    #[test]
    fn test_recursive_schema_placeholder() {
        let (_, result) = parse(
            "schemas:\n  Alias: {$ref: '#/components/schemas/Node'}\n  Node: {type: object}\n",
        );
        assert_eq!(result.annotations().count(), 0);
        let alias = result.value().unwrap().get("schemas").unwrap().get("Alias").unwrap();
        assert_eq!(alias.children()[0].kind, "Node");
    }

    #[test]
    fn test_invalid_entries() {
        let (context, result) = parse("schemas:\n  bad key: {}\n  Flag: true\nexamples: []\n");
        assert_eq!(
            result.messages(),
            vec![
                "'Components Object' contains invalid key 'bad key'",
                "'Components Object' 'Flag' is not an object",
                "'Components Object' 'examples' is not an object",
            ]
        );
        let registry = context.state.components.as_ref().unwrap();
        assert!(registry.get("schemas", "Flag").is_none());
        assert!(!registry.has_kind("examples"));
    }
}

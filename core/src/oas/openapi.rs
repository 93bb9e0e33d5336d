#![deny(missing_docs)]

//! # OpenAPI Object
//!
//! Root production. Members are parsed in document order and `components`
//! registers its entries when it is reached, so a `$ref` only resolves to a
//! component declared earlier in the document. A failing `servers`, `paths`
//! entry or `components` entry is dropped on its own.

use crate::annotations::{error, required_keys_check, type_mismatch, warning};
use crate::combinators::{parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::{Element, Member};
use crate::oas::components::parse_components_object;
use crate::oas::info::parse_info_object;
use crate::oas::paths::parse_paths_object;
use crate::oas::server::parse_servers;
use crate::parse_result::{ParseResult, Severity};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const NAME: &str = "OpenAPI Object";

const GRAMMAR: Grammar = Grammar::new(
    NAME,
    &["openapi", "info", "servers", "paths", "components"],
    &["security", "tags", "externalDocs", "webhooks", "jsonSchemaDialect"],
);

/// Parses an OpenAPI document root into the `api` category.
pub fn parse_openapi_object(context: &mut Context, element: Element) -> ParseResult {
    if !element.is_object() {
        return ParseResult::wrap(error(format!("'{}' is not an object", NAME), &element));
    }

    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, _| required_keys_check(NAME, &["openapi", "info", "paths"], value)),
            step(|value, context| parse_object(context, NAME, value, &[], parse_member)),
            step(|document, context| build_api(context, &document)),
        ],
    )
}

fn parse_member(member: Member, context: &mut Context) -> ParseResult {
    GRAMMAR.dispatch(member, context, |key, member, context| match key {
        "openapi" => parse_version(context, member),
        "info" | "paths" if !member.value.is_object() => {
            type_mismatch(NAME, &member, "object", Severity::Error)
        }
        "info" => parse_info_object(context, member.value),
        "servers" => parse_servers(context, NAME, member).isolate(),
        "components" => parse_components_object(context, member.value).isolate(),
        _ => parse_paths_object(context, member.value),
    })
}

fn parse_version(context: &mut Context, member: Member) -> ParseResult {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE.get_or_init(|| Regex::new(r"^3\.(\d+)\.(\d+)$").expect("Invalid regex"));

    let Some(version) = member.value.as_str().map(String::from) else {
        return type_mismatch(NAME, &member, "string", Severity::Error);
    };
    let Some(captures) = re.captures(&version) else {
        return ParseResult::wrap(error(
            format!("Unsupported OpenAPI version '{}'", version),
            &member.value,
        ));
    };

    let minor = captures[1].parse::<u64>().unwrap_or(u64::MAX);
    let patch = captures[2].parse::<u64>().unwrap_or(u64::MAX);
    context.state.openapi_version = Some((3, minor, patch));
    debug!(version = %version, "openapi version");

    let mut result = ParseResult::new();
    if minor != 0 {
        result.push(warning(
            format!("Version '{}' is not fully supported", version),
            &member.value,
        ));
    }
    ParseResult::wrap(member.into_element()).merge(result)
}

fn build_api(context: &Context, document: &Element) -> ParseResult {
    let Some(info) = document.get("info") else {
        return ParseResult::new();
    };
    let mut api = info.clone();
    if api.source_map.is_none() {
        api.source_map = context.source_map_of(document);
    }

    if let Some(hosts) = document.get("servers") {
        api.push(hosts.clone());
    }
    if let Some(resources) = document.get("paths") {
        for resource in resources.children() {
            api.push(resource.clone());
        }
    }

    let data_structures: Vec<Element> = document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .map(|schemas| schemas.members().map(|m| m.value.clone()).collect())
        .unwrap_or_default();
    if !data_structures.is_empty() {
        api.push(Element::container("category", data_structures).with_class("dataStructures"));
    }
    ParseResult::wrap(api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseOptions;
    use crate::loader::parse_yaml;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ParseResult {
        let mut context = Context::new(ParseOptions::default());
        parse_openapi_object(&mut context, parse_yaml(source).unwrap())
    }

    #[test]
    fn test_minimal_document() {
        let result = parse("openapi: 3.0.3\ninfo: {title: Pets, version: '1'}\npaths: {}\n");
        assert_eq!(result.annotations().count(), 0);
        let api = result.value().unwrap();
        assert!(api.has_class("api"));
        assert_eq!(api.title(), Some("Pets"));
    }

    #[test]
    fn test_required_keys() {
        let result = parse("info: {title: Pets, version: '1'}\nservers: 3\n");
        assert_eq!(
            result.messages(),
            vec![
                "'OpenAPI Object' is missing required property 'openapi'",
                "'OpenAPI Object' is missing required property 'paths'",
            ]
        );
    }

    #[test]
    fn test_required_members_must_be_objects() {
        let result = parse("openapi: 3.0.0\ninfo: Pets\npaths: {}\n");
        assert_eq!(result.messages(), vec!["'OpenAPI Object' 'info' is not an object"]);
        assert!(result.has_errors());
    }

    #[test]
    fn test_not_an_object() {
        let result = parse("- openapi\n");
        assert_eq!(result.messages(), vec!["'OpenAPI Object' is not an object"]);
        assert!(result.has_errors());
    }

    #[test]
    fn test_versions() {
        let result = parse("openapi: 3.1.0\ninfo: {title: A, version: '1'}\npaths: {}\n");
        assert_eq!(result.messages(), vec!["Version '3.1.0' is not fully supported"]);
        assert!(result.value().is_some());

        let result = parse("openapi: 2.0.0\ninfo: {title: A, version: '1'}\npaths: {}\n");
        assert_eq!(result.messages(), vec!["Unsupported OpenAPI version '2.0.0'"]);
        assert!(result.value().is_none());
    }

    #[test]
    fn test_components_resolve_after_declaration() {
        let result = parse(
            "openapi: 3.0.0\ninfo: {title: A, version: '1'}\n\
             components:\n  parameters:\n    Limit: {name: limit, in: query}\n  schemas:\n    Item: {type: object}\n\
             paths:\n  /items:\n    parameters:\n      - $ref: '#/components/parameters/Limit'\n",
        );
        assert_eq!(result.annotations().count(), 0);
        let api = result.value().unwrap();
        let resource = &api.children()[0];
        assert_eq!(
            resource.attribute("href").and_then(Element::as_str),
            Some("/items{?limit}")
        );
        let data_structures = &api.children()[1];
        assert!(data_structures.has_class("dataStructures"));
        assert_eq!(data_structures.children()[0].id(), Some("Item"));
    }

    #[test]
    fn test_components_declared_later_do_not_resolve() {
        let result = parse(
            "openapi: 3.0.0\ninfo: {title: A, version: '1'}\n\
             paths:\n  /items:\n    parameters:\n      - $ref: '#/components/parameters/Limit'\n\
             components:\n  parameters:\n    Limit: {name: limit, in: query}\n",
        );
        assert_eq!(result.messages(), vec!["'#/components' is not defined"]);
        assert!(result.has_errors());

        let api = result.value().unwrap();
        let resource = &api.children()[0];
        assert_eq!(resource.attribute("href").and_then(Element::as_str), Some("/items"));
    }

    #[test]
    fn test_root_diagnostics_follow_member_order() {
        let result = parse(
            "openapi: 3.0.0\ninfo: {title: A, version: '1'}\n\
             paths: {/a: {bogusPath: 1}}\ncomponents: {bogusComp: {}}\ntags: []\n",
        );
        assert_eq!(
            result.messages(),
            vec![
                "'Path Item Object' contains invalid key 'bogusPath'",
                "'Components Object' contains invalid key 'bogusComp'",
                "'OpenAPI Object' contains unsupported key 'tags'",
            ]
        );
    }

    #[test]
    fn test_layout_and_unsupported_keys() {
        let result = parse(
            "openapi: 3.0.0\ninfo: {title: A, version: '1', description: Hello}\n\
             servers: [{url: 'https://api.example'}]\ntags: []\npaths: {/a: {}, /b: {}}\n",
        );
        assert_eq!(
            result.messages(),
            vec!["'OpenAPI Object' contains unsupported key 'tags'"]
        );
        let kinds: Vec<_> = result
            .value()
            .unwrap()
            .children()
            .iter()
            .map(|e| e.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["copy", "category", "resource", "resource"]);
    }
}

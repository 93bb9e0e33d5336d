#![deny(missing_docs)]

//! # Server Objects
//!
//! Server Objects, rendered as `resource` elements classed `host`.

use crate::annotations::type_mismatch;
use crate::combinators::{parse_array, parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::{Element, Member};
use crate::oas::fields::{parse_copy, parse_string};
use crate::parse_result::{ParseResult, Severity};

const NAME: &str = "Server Object";

const GRAMMAR: Grammar = Grammar::new(NAME, &["url", "description"], &["variables"]);

/// Parses a Server Object into a host resource.
pub fn parse_server_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, NAME, value, &["url"], |member, context| {
                    GRAMMAR.dispatch(member, context, |key, member, context| match key {
                        "url" => parse_string(NAME, member, true),
                        _ => parse_copy(context, NAME, member, false),
                    })
                })
            }),
            step(|server, context| {
                let mut host = context.locate(Element::new("resource"), &server).with_class("host");
                if let Some(url) = server.get("url") {
                    host.set_attribute("href", context.locate(url.clone(), url));
                }
                if let Some(copy) = server.get("description") {
                    host.push(copy.clone());
                }
                host
            }),
        ],
    )
}

/// Parses a `servers` member into a `hosts` category.
pub fn parse_servers(context: &mut Context, container: &str, member: Member) -> ParseResult {
    if !member.value.is_array() {
        return type_mismatch(container, &member, "array", Severity::Warning);
    }
    let Member { key, value } = member;
    let result = parse_array(context, container, value, |item, context| {
        parse_server_object(context, item)
    });
    result
        .into_iter()
        .map(|e| {
            if e.is_annotation() {
                e
            } else {
                let hosts = Element::container("category", e.into_children()).with_class("hosts");
                Element::member(key.clone(), hosts)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseOptions;
    use crate::loader::parse_yaml;

    #[test]
    fn test_server_to_host() {
        let mut context = Context::new(ParseOptions::default());
        let element = parse_yaml("url: https://api.example.com/v1\ndescription: Production\nvariables: {}\n").unwrap();
        let result = parse_server_object(&mut context, element);

        let host = result.value().unwrap();
        assert_eq!(host.kind, "resource");
        assert!(host.has_class("host"));
        assert_eq!(
            host.attribute("href").and_then(Element::as_str),
            Some("https://api.example.com/v1")
        );
        assert_eq!(host.children()[0].text(), Some("Production"));
        assert_eq!(
            result.messages(),
            vec!["'Server Object' contains unsupported key 'variables'"]
        );
    }

    #[test]
    fn test_servers_member() {
        let mut context = Context::new(ParseOptions::default());
        let member = Member::new(
            Element::string("servers"),
            parse_yaml("- url: https://a.example\n- url: https://b.example\n").unwrap(),
        );
        let result = parse_servers(&mut context, "OpenAPI Object", member);
        let hosts = &result.value().and_then(Element::as_member).unwrap().value;
        assert!(hosts.has_class("hosts"));
        assert_eq!(hosts.children().len(), 2);

        let member = Member::new(Element::string("servers"), parse_yaml("- description: no url").unwrap());
        let result = parse_servers(&mut context, "OpenAPI Object", member);
        assert_eq!(
            result.messages(),
            vec!["'Server Object' is missing required property 'url'"]
        );
    }
}

#![deny(missing_docs)]

//! # Parameter Objects
//!
//! Parses Parameter Objects and converts validated parameters into the
//! pieces a resource or transition needs: href variables, the query-string
//! template and request headers.

use crate::annotations::{error, type_mismatch, warning};
use crate::combinators::{parse_array, parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::{Element, Member};
use crate::oas::fields::{flag_of, parse_boolean, parse_string, string_of};
use crate::oas::reference::parse_reference_or;
use crate::parse_result::{ParseResult, Severity};

const NAME: &str = "Parameter Object";

const GRAMMAR: Grammar = Grammar::new(
    NAME,
    &["name", "in", "description", "required", "explode", "example"],
    &[
        "deprecated",
        "allowEmptyValue",
        "style",
        "allowReserved",
        "schema",
        "content",
        "examples",
    ],
);

/// Where a parameter is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Part of the query string.
    Query,
    /// A request header.
    Header,
    /// A path template variable.
    Path,
    /// A cookie (not supported).
    Cookie,
}

impl Location {
    /// Parses the value of an `in` field.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "query" => Some(Location::Query),
            "header" => Some(Location::Header),
            "path" => Some(Location::Path),
            "cookie" => Some(Location::Cookie),
            _ => None,
        }
    }
}

/// Parses a Parameter Object into a validated parameter object.
///
/// Cookie parameters produce a warning and no value.
pub fn parse_parameter_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| parse_object(context, NAME, value, &["name", "in"], parse_member)),
            step(|parameter, _| {
                if location(&parameter) == Some(Location::Cookie) {
                    let origin = parameter.get("in").unwrap_or(&parameter);
                    ParseResult::wrap(warning(
                        format!("'{}' 'in' 'cookie' is unsupported", NAME),
                        origin,
                    ))
                } else {
                    ParseResult::wrap(parameter)
                }
            }),
        ],
    )
}

fn parse_member(member: Member, context: &mut Context) -> ParseResult {
    GRAMMAR.dispatch(member, context, |key, member, _| match key {
        "name" => parse_string(NAME, member, true),
        "in" => parse_in(member),
        "description" => parse_string(NAME, member, false),
        "required" | "explode" => parse_boolean(NAME, member, false),
        _ => ParseResult::wrap(member.into_element()),
    })
}

fn parse_in(member: Member) -> ParseResult {
    match member.value.as_str().map(Location::parse) {
        Some(Some(_)) => ParseResult::wrap(member.into_element()),
        Some(None) => ParseResult::wrap(error(
            format!(
                "'{}' 'in' must be either 'query', 'header', 'path' or 'cookie'",
                NAME
            ),
            &member.value,
        )),
        None => type_mismatch(NAME, &member, "string", Severity::Error),
    }
}

/// Parses a `parameters` member: an array of Parameter or Reference Objects.
///
/// A non-array value is a warning and the member is dropped.
pub fn parse_parameters(context: &mut Context, container: &str, member: Member) -> ParseResult {
    if !member.value.is_array() {
        return type_mismatch(container, &member, "array", Severity::Warning);
    }
    let Member { key, value } = member;
    let result = parse_array(context, container, value, |item, context| {
        parse_reference_or(context, "parameters", item, false, parse_parameter_object)
    });
    result
        .into_iter()
        .map(|e| if e.is_annotation() { e } else { Element::member(key.clone(), e) })
        .collect()
}

/// The location of a validated parameter.
pub fn location(parameter: &Element) -> Option<Location> {
    string_of(parameter, "in").and_then(Location::parse)
}

/// The name of a validated parameter.
pub fn name(parameter: &Element) -> Option<&str> {
    string_of(parameter, "name")
}

/// Validated parameters stored under `parameters` in a parsed object.
pub fn parameters_of(object: &Element) -> &[Element] {
    object.get("parameters").map(Element::children).unwrap_or_default()
}

/// Parameters at `at`, in declaration order.
pub fn located(parameters: &[Element], at: Location) -> Vec<&Element> {
    parameters
        .iter()
        .filter(|p| location(p) == Some(at))
        .collect()
}

/// Builds the RFC 6570 query-string expansion, e.g. `{?limit,tags*}`.
///
/// Returns an empty string when there are no query parameters.
pub fn query_template<'a>(parameters: impl IntoIterator<Item = &'a Element>) -> String {
    let names: Vec<String> = parameters
        .into_iter()
        .filter_map(|p| {
            let variable = name(p)?;
            Some(if flag_of(p, "explode") {
                format!("{}*", variable)
            } else {
                variable.to_string()
            })
        })
        .collect();

    if names.is_empty() {
        String::new()
    } else {
        format!("{{?{}}}", names.join(","))
    }
}

/// Builds an `hrefVariables` element, or `None` without parameters.
pub fn href_variables<'a>(
    context: &Context,
    parameters: impl IntoIterator<Item = &'a Element>,
) -> Option<Element> {
    let members: Vec<Element> = parameters
        .into_iter()
        .filter_map(|p| variable(context, p))
        .collect();
    if members.is_empty() {
        None
    } else {
        Some(Element::container("hrefVariables", members))
    }
}

fn variable(context: &Context, parameter: &Element) -> Option<Element> {
    let key = parameter.get("name")?;
    let value = parameter
        .get("example")
        .cloned()
        .unwrap_or_else(|| Element::new("string"));
    let mut member = context.locate(Element::member(key.clone(), value), parameter);

    if let Some(description) = string_of(parameter, "description") {
        member.set_meta("description", Element::string(description));
    }
    if flag_of(parameter, "required") {
        member.set_attribute(
            "typeAttributes",
            Element::array(vec![Element::string("required")]),
        );
    }
    Some(member)
}

/// Converts header parameters into header members (`name: example`).
pub fn header_members<'a>(
    context: &Context,
    parameters: impl IntoIterator<Item = &'a Element>,
) -> Vec<Element> {
    parameters
        .into_iter()
        .filter_map(|p| {
            let key = p.get("name")?;
            let value = match p.get("example") {
                Some(example) if example.as_str().is_some() => example.clone(),
                _ => Element::new("string"),
            };
            Some(context.locate(Element::member(key.clone(), value), p))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseOptions;
    use crate::loader::parse_yaml;

    fn context() -> Context {
        Context::new(ParseOptions::default())
    }

    fn parse(source: &str) -> ParseResult {
        parse_parameter_object(&mut context(), parse_yaml(source).unwrap())
    }

    #[test]
    fn test_valid_parameter() {
        let result = parse("name: id\nin: path\nrequired: true\nx-internal: 1\nschema: {type: string}\n");
        let parameter = result.value().unwrap();
        assert_eq!(name(parameter), Some("id"));
        assert_eq!(location(parameter), Some(Location::Path));
        assert!(!parameter.has_key("x-internal"));
        assert!(!parameter.has_key("schema"));
        assert_eq!(
            result.messages(),
            vec!["'Parameter Object' contains unsupported key 'schema'"]
        );
    }

    #[test]
    fn test_missing_required_keys() {
        let result = parse("description: nothing else\n");
        assert_eq!(
            result.messages(),
            vec![
                "'Parameter Object' is missing required property 'name'",
                "'Parameter Object' is missing required property 'in'",
            ]
        );
    }

    #[test]
    fn test_invalid_location_is_error() {
        let result = parse("name: id\nin: body\n");
        assert_eq!(
            result.messages(),
            vec!["'Parameter Object' 'in' must be either 'query', 'header', 'path' or 'cookie'"]
        );
        assert!(result.has_errors());
    }

    #[test]
    fn test_cookie_parameter_is_dropped() {
        let result = parse("name: session\nin: cookie\n");
        assert_eq!(result.values().count(), 0);
        assert_eq!(result.messages(), vec!["'Parameter Object' 'in' 'cookie' is unsupported"]);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_query_template_and_variables() {
        let result = parse_yaml(
            "- {name: limit, in: query}\n- {name: tags, in: query, explode: true, required: true, description: Filter}\n",
        )
        .unwrap();
        let parameters: Vec<Element> = result
            .into_children()
            .into_iter()
            .map(|p| parse_parameter_object(&mut context(), p).into_value().unwrap())
            .collect();

        assert_eq!(query_template(&parameters), "{?limit,tags*}");
        assert_eq!(query_template(&[] as &[Element]), "");

        let variables = href_variables(&context(), &parameters).unwrap();
        let tags = variables.children()[1].clone();
        assert_eq!(tags.as_member().map(Member::key_name), Some("tags"));
        assert_eq!(tags.meta.get("description").and_then(Element::as_str), Some("Filter"));
        assert!(tags.attribute("typeAttributes").is_some());
    }

    #[test]
    fn test_parse_parameters_member() {
        let mut context = context();
        context.components_mut().define(
            "parameters",
            "Limit",
            parse_parameter_object(&mut Context::default(), parse_yaml("{name: limit, in: query}").unwrap())
                .into_value()
                .unwrap(),
        );
        let member = Member::new(
            Element::string("parameters"),
            parse_yaml("- {name: id, in: path}\n- $ref: '#/components/parameters/Limit'\n").unwrap(),
        );
        let result = parse_parameters(&mut context, "Path Item Object", member);
        let member = result.value().and_then(Element::as_member).unwrap();
        let names: Vec<_> = member.value.children().iter().filter_map(name).collect();
        assert_eq!(names, vec!["id", "limit"]);

        let member = Member::new(Element::string("parameters"), Element::string("id"));
        let result = parse_parameters(&mut context, "Path Item Object", member);
        assert_eq!(result.messages(), vec!["'Path Item Object' 'parameters' is not an array"]);
    }
}

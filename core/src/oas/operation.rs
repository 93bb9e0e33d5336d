#![deny(missing_docs)]

//! # Operation Objects
//!
//! Operations are parsed into validated objects first; the Path Item
//! production turns them into `transition` elements once the path-level
//! parameters they inherit are known.

use crate::annotations::type_mismatch;
use crate::combinators::{parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::{Element, Member};
use crate::oas::fields::{parse_copy, parse_string, set_title};
use crate::oas::parameter::{
    header_members, href_variables, located, name, parameters_of, parse_parameters,
    query_template, Location,
};
use crate::oas::paths::check_declared_in_path;
use crate::oas::reference::parse_reference_or;
use crate::parse_result::{ParseResult, Severity};

const NAME: &str = "Operation Object";
const RESPONSES: &str = "Responses Object";
const RESPONSE: &str = "Response Object";

const GRAMMAR: Grammar = Grammar::new(
    NAME,
    &["summary", "description", "operationId", "parameters", "responses"],
    &[
        "tags",
        "externalDocs",
        "requestBody",
        "callbacks",
        "deprecated",
        "security",
        "servers",
    ],
);
const RESPONSES_GRAMMAR: Grammar = Grammar::new(RESPONSES, &["default"], &[]).with_pattern(is_status_code);
const RESPONSE_GRAMMAR: Grammar = Grammar::new(RESPONSE, &["description"], &["headers", "content", "links"]);

/// HTTP methods that map to Operation Objects inside a Path Item.
pub const METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// Parses an Operation Object found under `path` into a validated object.
///
/// Path parameters declared on the operation must appear in `path`.
pub fn parse_operation_object(context: &mut Context, path: &str, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| parse_object(context, NAME, value, &[], parse_member)),
            step(|operation, _| {
                let declared = located(parameters_of(&operation), Location::Path);
                let errors = check_declared_in_path(path, &declared);
                if errors.is_empty() {
                    ParseResult::wrap(operation)
                } else {
                    errors
                }
            }),
        ],
    )
}

fn parse_member(member: Member, context: &mut Context) -> ParseResult {
    GRAMMAR.dispatch(member, context, |key, member, context| match key {
        "summary" | "operationId" => parse_string(NAME, member, false),
        "description" => parse_copy(context, NAME, member, false),
        "parameters" => parse_parameters(context, NAME, member).isolate(),
        _ => parse_responses_member(context, member).isolate(),
    })
}

fn parse_responses_member(context: &mut Context, member: Member) -> ParseResult {
    if !member.value.is_object() {
        return type_mismatch(NAME, &member, "object", Severity::Warning);
    }
    parse_responses_object(context, member.value)
}

/// Parses a Responses Object into an object of status code → `httpResponse`.
///
/// A response that fails is dropped; the others are kept.
pub fn parse_responses_object(context: &mut Context, element: Element) -> ParseResult {
    parse_object(context, RESPONSES, element, &[], |member, context| {
        RESPONSES_GRAMMAR.dispatch(member, context, |status, member, context| {
            let result = parse_reference_or(context, "responses", member.value, false, parse_response_object);
            let result: ParseResult = result
                .into_iter()
                .map(|mut e| {
                    if !e.is_annotation() {
                        e.set_attribute("statusCode", Element::string(status));
                    }
                    e
                })
                .collect();
            result.isolate()
        })
    })
}

/// Parses a Response Object into an `httpResponse`.
pub fn parse_response_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, RESPONSE, value, &["description"], |member, context| {
                    RESPONSE_GRAMMAR.dispatch(member, context, |_, member, context| {
                        parse_copy(context, RESPONSE, member, true)
                    })
                })
            }),
            step(|response, context| {
                let mut http_response = context.locate(Element::new("httpResponse"), &response);
                if let Some(copy) = response.get("description") {
                    http_response.push(copy.clone());
                }
                http_response
            }),
        ],
    )
}

fn is_status_code(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() == 3
        && (b'1'..=b'5').contains(&bytes[0])
        && (bytes[1..].iter().all(u8::is_ascii_digit) || &bytes[1..] == b"XX")
}

/// Builds the `transition` for a validated operation.
///
/// `inherited` holds the validated path-level parameters. Operation
/// parameters override inherited ones with the same name and location;
/// operation headers come first and win over inherited headers.
pub fn build_transition(
    context: &Context,
    path: &str,
    method: &str,
    operation: &Element,
    inherited: &[Element],
) -> Element {
    let mut transition = context.locate(Element::new("transition"), operation);
    set_title(context, &mut transition, operation.get("summary"));
    if let Some(id) = operation.get("operationId") {
        transition.set_meta("id", id.clone());
    }
    if let Some(copy) = operation.get("description") {
        transition.push(copy.clone());
    }

    let own = parameters_of(operation);
    let own_path = located(own, Location::Path);
    let own_query = located(own, Location::Query);
    if !own_path.is_empty() || !own_query.is_empty() {
        let inherited_query = located(inherited, Location::Query)
            .into_iter()
            .filter(|p| !own_query.iter().any(|o| name(o) == name(p)));
        let query = inherited_query.chain(own_query.iter().copied());
        transition.set_attribute(
            "href",
            Element::string(format!("{}{}", path, query_template(query))),
        );
        if let Some(variables) = href_variables(context, own_path.iter().chain(&own_query).copied()) {
            transition.set_attribute("hrefVariables", variables);
        }
    }

    let headers = merge_headers(
        header_members(context, located(own, Location::Header)),
        header_members(context, located(inherited, Location::Header)),
    );
    let mut request = Element::new("httpRequest");
    request.set_attribute("method", Element::string(method.to_ascii_uppercase()));
    if !headers.is_empty() {
        request.set_attribute("headers", Element::container("httpHeaders", headers));
    }

    let responses: Vec<Element> = operation
        .get("responses")
        .map(|r| r.members().map(|m| m.value.clone()).collect())
        .unwrap_or_default();
    if responses.is_empty() {
        transition.push(Element::container("httpTransaction", vec![request]));
    } else {
        for response in responses {
            transition.push(Element::container(
                "httpTransaction",
                vec![request.clone(), response],
            ));
        }
    }
    transition
}

/// Concatenates header members, dropping inherited headers whose name
/// (case-insensitively) is already declared by `own`.
pub fn merge_headers(own: Vec<Element>, inherited: Vec<Element>) -> Vec<Element> {
    let header_name = |h: &Element| {
        h.as_member()
            .map(|m| m.key_name().to_ascii_lowercase())
            .unwrap_or_default()
    };
    let declared: Vec<String> = own.iter().map(header_name).collect();
    let mut merged = own;
    merged.extend(
        inherited
            .into_iter()
            .filter(|h| !declared.contains(&header_name(h))),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseOptions;
    use crate::loader::parse_yaml;
    use pretty_assertions::assert_eq;

    fn context() -> Context {
        Context::new(ParseOptions::default())
    }

    fn header(name: &str, value: &str) -> Element {
        Element::member(Element::string(name), Element::string(value))
    }

    #[test]
    fn test_operation_to_transition() {
        let mut context = context();
        let element = parse_yaml(
            "summary: Show user\noperationId: showUser\ndescription: Returns one user\ntags: [users]\n\
             parameters:\n  - {name: id, in: path, required: true}\n  - {name: fields, in: query}\n\
             responses:\n  '200': {description: OK}\n  default: {description: Error}\n",
        )
        .unwrap();
        let result = parse_operation_object(&mut context, "/users/{id}", element);
        assert_eq!(
            result.messages(),
            vec!["'Operation Object' contains unsupported key 'tags'"]
        );

        let operation = result.value().unwrap();
        let transition = build_transition(&context, "/users/{id}", "get", operation, &[]);
        assert_eq!(transition.title(), Some("Show user"));
        assert_eq!(transition.id(), Some("showUser"));
        assert_eq!(
            transition.attribute("href").and_then(Element::as_str),
            Some("/users/{id}{?fields}")
        );
        assert_eq!(transition.attribute("hrefVariables").unwrap().children().len(), 2);

        let transactions: Vec<_> = transition
            .children()
            .iter()
            .filter(|c| c.kind == "httpTransaction")
            .collect();
        assert_eq!(transactions.len(), 2);
        let request = &transactions[0].children()[0];
        assert_eq!(request.attribute("method").and_then(Element::as_str), Some("GET"));
        let response = &transactions[1].children()[1];
        assert_eq!(
            response.attribute("statusCode").and_then(Element::as_str),
            Some("default")
        );
        assert_eq!(response.children()[0].text(), Some("Error"));
    }

    #[test]
    fn test_operation_path_parameter_must_be_in_path() {
        let mut context = context();
        let element = parse_yaml("parameters:\n  - {name: id, in: path}\n").unwrap();
        let result = parse_operation_object(&mut context, "/users", element);
        assert_eq!(
            result.messages(),
            vec!["Path '/users' is missing path variable 'id'. Add '{id}' to the path"]
        );
        assert!(result.has_errors());
    }

    #[test]
    fn test_response_requires_description() {
        let mut context = context();
        let result = parse_responses_object(
            &mut context,
            parse_yaml("'200': {description: OK}\n'404': {content: {}}\n").unwrap(),
        );
        assert_eq!(
            result.messages(),
            vec!["'Response Object' is missing required property 'description'"]
        );
        assert!(result.has_errors());
        let keys: Vec<_> = result.value().unwrap().members().map(Member::key_name).collect();
        assert_eq!(keys, vec!["200"]);
    }

    #[test]
    fn test_responses_keys() {
        let mut context = context();
        let result = parse_responses_object(
            &mut context,
            parse_yaml("'2XX': {description: ok}\nx-ext: 1\n'600': {description: bad}\n").unwrap(),
        );
        let responses = result.value().unwrap();
        assert_eq!(responses.members().count(), 1);
        assert_eq!(
            result.messages(),
            vec!["'Responses Object' contains invalid key '600'"]
        );
    }

    #[test]
    fn test_response_reference_keeps_status() {
        let mut context = context();
        let shared = parse_response_object(&mut context, parse_yaml("description: Missing").unwrap())
            .into_value()
            .unwrap();
        context.components_mut().define("responses", "NotFound", shared);

        let result = parse_responses_object(
            &mut context,
            parse_yaml("'404': {$ref: '#/components/responses/NotFound'}\n").unwrap(),
        );
        let response = result.value().unwrap().get("404").unwrap();
        assert_eq!(response.kind, "httpResponse");
        assert_eq!(response.attribute("statusCode").and_then(Element::as_str), Some("404"));
    }

    #[test]
    fn test_merge_headers_prefers_operation() {
        let merged = merge_headers(
            vec![header("Accept", "application/json")],
            vec![header("accept", "text/plain"), header("X-Trace", "")],
        );
        let names: Vec<_> = merged
            .iter()
            .filter_map(|h| h.as_member().map(Member::key_name))
            .collect();
        assert_eq!(names, vec!["Accept", "X-Trace"]);
    }
}

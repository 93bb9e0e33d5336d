#![deny(missing_docs)]

//! # Path Item Object
//!
//! Builds one `resource` per path. Path-level parameters are checked against
//! the path template in both directions, folded into the resource href
//! (`/users/{id}{?limit,tags*}`) and inherited by every operation.
//!
//! A failing `parameters`, `servers` or operation member is dropped on its
//! own; the resource is still built from the members that parsed.

use crate::annotations::error;
use crate::combinators::{parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::{Element, Member};
use crate::oas::fields::{parse_copy, parse_string, set_title};
use crate::oas::operation::{build_transition, parse_operation_object, METHODS};
use crate::oas::parameter::{
    href_variables, located, name, parameters_of, parse_parameters, query_template, Location,
};
use crate::oas::paths::{check_declared_in_path, path_variables};
use crate::oas::server::parse_servers;
use crate::parse_result::ParseResult;

const NAME: &str = "Path Item Object";

const GRAMMAR: Grammar = Grammar::new(
    NAME,
    &[
        "summary",
        "description",
        "parameters",
        "servers",
        "get",
        "put",
        "post",
        "delete",
        "options",
        "head",
        "patch",
        "trace",
    ],
    &["$ref"],
);

/// Parses the Path Item Object found at `path` into a `resource`.
pub fn parse_path_item_object(context: &mut Context, path: &str, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, NAME, value, &[], |member, context| {
                    parse_member(context, path, member)
                })
            }),
            step(|item, _| {
                let errors = check_path_variables(path, &item);
                if errors.is_empty() {
                    ParseResult::wrap(item)
                } else {
                    errors
                }
            }),
            step(|item, context| build_resource(context, path, &item)),
        ],
    )
}

fn parse_member(context: &mut Context, path: &str, member: Member) -> ParseResult {
    GRAMMAR.dispatch(member, context, |key, member, context| match key {
        "summary" => parse_string(NAME, member, false),
        "description" => parse_copy(context, NAME, member, false),
        "parameters" => parse_parameters(context, NAME, member).isolate(),
        "servers" => parse_servers(context, NAME, member).isolate(),
        _ => parse_operation_object(context, path, member.value).isolate(),
    })
}

fn operations(item: &Element) -> impl Iterator<Item = &Member> {
    item.members()
        .filter(|m| METHODS.iter().any(|method| m.key_str() == Some(*method)))
}

/// Both directions of the path template check.
///
/// A `{name}` placeholder counts as declared when the path item declares it,
/// or when every operation does.
fn check_path_variables(path: &str, item: &Element) -> ParseResult {
    let declared = located(parameters_of(item), Location::Path);
    let mut errors = check_declared_in_path(path, &declared);

    for variable in path_variables(path) {
        let at_path_level = declared.iter().any(|p| name(p) == Some(variable));
        let mut operations = operations(item).peekable();
        let in_every_operation = operations.peek().is_some()
            && operations.all(|operation| {
                located(parameters_of(&operation.value), Location::Path)
                    .iter()
                    .any(|p| name(p) == Some(variable))
            });

        if !at_path_level && !in_every_operation {
            errors.push(error(
                format!(
                    "Path '{}' contains variable '{}' which is not declared in the parameters section of the '{}'",
                    path, variable, NAME
                ),
                item,
            ));
        }
    }
    errors
}

fn build_resource(context: &Context, path: &str, item: &Element) -> Element {
    let parameters = parameters_of(item);
    let path_parameters = located(parameters, Location::Path);
    let query = located(parameters, Location::Query);

    let mut resource = context.locate(Element::new("resource"), item);
    set_title(context, &mut resource, item.get("summary"));
    resource.set_attribute(
        "href",
        Element::string(format!("{}{}", path, query_template(query.iter().copied()))),
    );
    if let Some(variables) = href_variables(context, path_parameters.iter().chain(&query).copied()) {
        resource.set_attribute("hrefVariables", variables);
    }

    if let Some(copy) = item.get("description") {
        resource.push(copy.clone());
    }
    if let Some(hosts) = item.get("servers") {
        resource.push(hosts.clone());
    }
    for operation in operations(item) {
        resource.push(build_transition(
            context,
            path,
            operation.key_name(),
            &operation.value,
            parameters,
        ));
    }
    resource
}

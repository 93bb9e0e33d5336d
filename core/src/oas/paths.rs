#![deny(missing_docs)]

//! # Paths Object
//!
//! Paths Object, plus the `{name}` template checks shared with Path Item and
//! Operation Objects. A path item that fails is dropped without taking the
//! other paths with it.

use crate::annotations::error;
use crate::combinators::{parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::Element;
use crate::oas::parameter::name;
use crate::oas::path_item::parse_path_item_object;
use crate::parse_result::ParseResult;
use regex::Regex;
use std::sync::OnceLock;

const NAME: &str = "Paths Object";

const GRAMMAR: Grammar = Grammar::new(NAME, &[], &[]).with_pattern(is_path);

fn is_path(key: &str) -> bool {
    key.starts_with('/')
}

/// Parses a Paths Object into an array of `resource` elements, one per path.
pub fn parse_paths_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, NAME, value, &[], |member, context| {
                    GRAMMAR.dispatch(member, context, |path, member, context| {
                        parse_path_item_object(context, path, member.value).isolate()
                    })
                })
            }),
            step(|paths, context| {
                let source_map = context.source_map_of(&paths);
                Element::array(paths.into_members().into_iter().map(|m| m.value))
                    .with_source_map(source_map)
            }),
        ],
    )
}

/// Variable names of a path template (`/users/{id}` → `["id"]`), first
/// occurrence order, without duplicates.
pub fn path_variables(path: &str) -> Vec<&str> {
    static VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
    let re = VARIABLE_RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("Invalid regex"));

    let mut variables: Vec<&str> = Vec::new();
    for capture in re.captures_iter(path) {
        if let Some(variable) = capture.get(1).map(|m| m.as_str()) {
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        }
    }
    variables
}

/// One error per path parameter whose `{name}` does not appear in `path`.
pub fn check_declared_in_path(path: &str, parameters: &[&Element]) -> ParseResult {
    let variables = path_variables(path);
    parameters
        .iter()
        .filter_map(|parameter| {
            let variable = name(parameter)?;
            if variables.iter().any(|v| *v == variable) {
                return None;
            }
            let origin = parameter.get("name").unwrap_or(*parameter);
            Some(error(
                format!(
                    "Path '{}' is missing path variable '{}'. Add '{{{}}}' to the path",
                    path, variable, variable
                ),
                origin,
            ))
        })
        .collect()
}

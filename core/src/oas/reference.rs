#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Resolves `{ "$ref": "#/components/<kind>/<id>" }` against the component
//! registry held by the `Context`. Only local references to reusable
//! components are supported; every failed check is a terminal error.

use crate::annotations::{error, unsupported_key_warning};
use crate::combinators::{parse_object, pipe_parse_result, step};
use crate::context::{ComponentEntry, Context};
use crate::element::Element;
use crate::parse_result::ParseResult;
use tracing::debug;

const NAME: &str = "Reference Object";
const COMPONENTS_PREFIX: &str = "#/components/";

/// Whether `element` is a Reference Object (an object with a `$ref` key).
pub fn is_reference(element: &Element) -> bool {
    element.is_object() && element.has_key("$ref")
}

/// Parses `element` as a reference when it has a `$ref` key, otherwise hands
/// it to `parser`.
pub fn parse_reference_or<F>(
    context: &mut Context,
    component: &str,
    element: Element,
    placeholder: bool,
    parser: F,
) -> ParseResult
where
    F: FnOnce(&mut Context, Element) -> ParseResult,
{
    if is_reference(&element) {
        parse_reference_object(context, component, element, placeholder)
    } else {
        parser(context, element)
    }
}

/// Parses a Reference Object and resolves its `$ref`.
///
/// Keys next to `$ref` are reported as unsupported and ignored.
pub fn parse_reference_object(
    context: &mut Context,
    component: &str,
    element: Element,
    placeholder: bool,
) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, NAME, value, &["$ref"], |member, _| {
                    if member.key_str() == Some("$ref") {
                        ParseResult::wrap(member.into_element())
                    } else {
                        unsupported_key_warning(NAME, &member)
                    }
                })
            }),
            step(|object, context| match object.get("$ref") {
                Some(reference) => resolve_reference(context, component, reference, placeholder),
                None => ParseResult::new(),
            }),
        ],
    )
}

/// Resolves a `$ref` value expected to point at `#/components/<component>/<id>`.
///
/// With `placeholder` set, success yields an element named after the
/// component id instead of the component value; schemas use this so that
/// recursive structures are not embedded.
pub fn resolve_reference(
    context: &Context,
    component: &str,
    reference: &Element,
    placeholder: bool,
) -> ParseResult {
    let fail = |message: String| ParseResult::wrap(error(message, reference));

    let Some(path) = reference.as_str() else {
        return fail(format!("'{}' '$ref' is not a string", NAME));
    };

    if !path.starts_with(COMPONENTS_PREFIX) {
        return fail(format!(
            "'{}' only local references to '#/components' within the same document are supported",
            NAME
        ));
    }

    let segments: Vec<&str> = path.split('/').collect();
    let kind = segments.get(2).copied().unwrap_or_default();
    if kind != component {
        return fail(format!(
            "'{}' only references to '{}' are permitted from this location",
            NAME, component
        ));
    }

    if segments.len() != 4 {
        return fail(format!(
            "'{}' only references to a reusable component inside '#/components/{}' are supported",
            NAME, component
        ));
    }
    let id = segments[3];

    let Some(registry) = context.state.components.as_ref() else {
        return fail("'#/components' is not defined".to_string());
    };

    if !registry.has_kind(kind) {
        return fail(format!("'#/components/{}' is not defined", kind));
    }

    match (registry.get(kind, id), placeholder) {
        (Some(_), true) => {
            debug!(reference = path, "resolved reference to placeholder");
            ParseResult::wrap(context.locate(Element::new(id), reference))
        }
        (Some(ComponentEntry::Defined(value)), false) => {
            debug!(reference = path, "resolved reference to component value");
            ParseResult::wrap(value.clone())
        }
        _ => fail(format!("'{}' is not defined", path)),
    }
}

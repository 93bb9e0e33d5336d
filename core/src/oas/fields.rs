#![deny(missing_docs)]

//! # Field Parsers
//!
//! Scalar field parsers shared by the grammar productions.
//!
//! Each parser takes a member, validates the value type and returns the member
//! (or a converted member) as a one-value result, or a type mismatch.

use crate::annotations::type_mismatch;
use crate::context::Context;
use crate::element::{Content, Element, Member};
use crate::parse_result::{ParseResult, Severity};

/// Error for required fields, warning otherwise.
pub(crate) fn severity(required: bool) -> Severity {
    if required {
        Severity::Error
    } else {
        Severity::Warning
    }
}

/// Keeps the member if its value is a string.
pub(crate) fn parse_string(name: &str, member: Member, required: bool) -> ParseResult {
    if member.value.as_str().is_some() {
        ParseResult::wrap(member.into_element())
    } else {
        type_mismatch(name, &member, "string", severity(required))
    }
}

/// Keeps the member if its value is a boolean.
pub(crate) fn parse_boolean(name: &str, member: Member, required: bool) -> ParseResult {
    if member.value.as_bool().is_some() {
        ParseResult::wrap(member.into_element())
    } else {
        type_mismatch(name, &member, "boolean", severity(required))
    }
}

/// Converts a string member value into a `copy` element.
pub(crate) fn parse_copy(context: &Context, name: &str, member: Member, required: bool) -> ParseResult {
    let Some(text) = member.value.as_str() else {
        return type_mismatch(name, &member, "string", severity(required));
    };
    let copy = context.locate(copy(text), &member.value);
    ParseResult::wrap(Element::member(member.key, copy))
}

/// Creates a `copy` element.
pub(crate) fn copy(text: &str) -> Element {
    Element::new("copy").with_content(Content::String(text.to_string()))
}

/// The string value of `key` in a parsed object.
pub(crate) fn string_of<'a>(object: &'a Element, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Element::as_str)
}

/// The boolean value of `key` in a parsed object, `false` when absent.
pub(crate) fn flag_of(object: &Element, key: &str) -> bool {
    object.get(key).and_then(Element::as_bool).unwrap_or(false)
}

/// Sets the `title` meta from a string element, keeping its source map.
pub(crate) fn set_title(context: &Context, target: &mut Element, title: Option<&Element>) {
    if let Some(title) = title.filter(|t| t.as_str().is_some()) {
        let value = context.locate(title.clone(), title);
        target.set_meta("title", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseOptions;

    fn member(key: &str, value: Element) -> Member {
        Member::new(Element::string(key), value)
    }

    #[test]
    fn test_parse_string() {
        let result = parse_string("Info Object", member("title", Element::string("A")), true);
        assert!(result.value().unwrap().is_member());

        let result = parse_string("Info Object", member("title", Element::number(3)), true);
        assert_eq!(result.messages(), vec!["'Info Object' 'title' is not a string"]);
        assert!(result.has_errors());
    }

    #[test]
    fn test_parse_boolean_optional_warns() {
        let result = parse_boolean("Parameter Object", member("required", Element::string("yes")), false);
        assert_eq!(
            result.messages(),
            vec!["'Parameter Object' 'required' is not a boolean"]
        );
        assert!(!result.has_errors());
    }

    #[test]
    fn test_parse_copy() {
        let context = Context::new(ParseOptions::default());
        let result = parse_copy(&context, "Info Object", member("description", Element::string("Hi")), false);
        let value = result.into_value().and_then(Element::into_member).unwrap();
        assert_eq!(value.value.kind, "copy");
        assert_eq!(value.value.text(), Some("Hi"));
    }
}

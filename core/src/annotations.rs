#![deny(missing_docs)]

//! # Annotation Factories
//!
//! Constructors for diagnostic elements. Every factory copies the source map
//! of the offending node so diagnostics stay locatable in the original text.

use crate::element::{Content, Element, Member, SourceMap, ANNOTATION};
use crate::parse_result::{ParseResult, Severity};

/// Creates an annotation element.
pub fn annotation(
    severity: Severity,
    message: impl Into<String>,
    source_map: Option<SourceMap>,
) -> Element {
    Element::new(ANNOTATION)
        .with_class(severity.class())
        .with_content(Content::String(message.into()))
        .with_source_map(source_map)
}

/// Creates an error annotation located at `origin`.
pub fn error(message: impl Into<String>, origin: &Element) -> Element {
    annotation(Severity::Error, message, origin.source_map.clone())
}

/// Creates a warning annotation located at `origin`.
pub fn warning(message: impl Into<String>, origin: &Element) -> Element {
    annotation(Severity::Warning, message, origin.source_map.clone())
}

/// Checks that `object` has every key in `required_keys`.
///
/// Emits one error per missing key, in declaration order, and nothing else.
/// With no key missing the object is passed through unchanged.
pub fn required_keys_check(name: &str, required_keys: &[&str], object: Element) -> ParseResult {
    let missing: ParseResult = required_keys
        .iter()
        .filter(|key| !object.has_key(key))
        .map(|key| {
            error(
                format!("'{}' is missing required property '{}'", name, key),
                &object,
            )
        })
        .collect();

    if missing.is_empty() {
        ParseResult::wrap(object)
    } else {
        missing
    }
}

/// Warning for a key the grammar knows but does not implement.
pub fn unsupported_key_warning(name: &str, member: &Member) -> ParseResult {
    ParseResult::wrap(warning(
        format!("'{}' contains unsupported key '{}'", name, member.key_name()),
        &member.key,
    ))
}

/// Warning for a key the grammar does not recognise.
pub fn invalid_key_warning(name: &str, member: &Member) -> ParseResult {
    ParseResult::wrap(warning(
        format!("'{}' contains invalid key '{}'", name, member.key_name()),
        &member.key,
    ))
}

/// Diagnostic for a member whose value has the wrong type.
///
/// Callers pass `Severity::Error` for required fields.
pub fn type_mismatch(
    name: &str,
    member: &Member,
    expected: &str,
    severity: Severity,
) -> ParseResult {
    ParseResult::wrap(annotation(
        severity,
        format!("'{}' '{}' is not {}", name, member.key_name(), with_article(expected)),
        member.value.source_map.clone(),
    ))
}

fn with_article(noun: &str) -> String {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {}", noun),
        _ => format!("a {}", noun),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> Element {
        Element::object(vec![Member::new(
            Element::string("title"),
            Element::string("My API"),
        )])
        .with_source_map(Some(SourceMap::span(0, 17)))
    }

    #[test]
    fn test_required_keys_reports_each_missing_key() {
        let result = required_keys_check("Info Object", &["title", "version", "x"], info());
        assert_eq!(
            result.messages(),
            vec![
                "'Info Object' is missing required property 'version'",
                "'Info Object' is missing required property 'x'",
            ]
        );
        assert_eq!(result.values().count(), 0);
        let first = result.errors().next().unwrap();
        assert_eq!(first.source_map, Some(SourceMap::span(0, 17)));
    }

    #[test]
    fn test_required_keys_passes_object_through() {
        let result = required_keys_check("Info Object", &["title"], info());
        assert_eq!(result.value(), Some(&info()));
        assert_eq!(result.annotations().count(), 0);
    }

    #[test]
    fn test_key_warnings_use_key_source_map() {
        let member = Member::new(
            Element::string("invalid").with_source_map(Some(SourceMap::span(5, 7))),
            Element::boolean(true),
        );
        let result = invalid_key_warning("Info Object", &member);
        let warning = result.warnings().next().unwrap();
        assert_eq!(warning.text(), Some("'Info Object' contains invalid key 'invalid'"));
        assert_eq!(warning.source_map, Some(SourceMap::span(5, 7)));

        let result = unsupported_key_warning("Path Item Object", &member);
        assert_eq!(
            result.messages(),
            vec!["'Path Item Object' contains unsupported key 'invalid'"]
        );
    }

    #[test]
    fn test_type_mismatch_severity_and_article() {
        let member = Member::new(Element::string("parameters"), Element::boolean(true));
        let result = type_mismatch("Path Item Object", &member, "array", Severity::Warning);
        assert_eq!(
            result.messages(),
            vec!["'Path Item Object' 'parameters' is not an array"]
        );
        assert!(!result.has_errors());

        let member = Member::new(Element::string("title"), Element::number(1));
        let result = type_mismatch("Info Object", &member, "string", Severity::Error);
        assert_eq!(result.messages(), vec!["'Info Object' 'title' is not a string"]);
        assert!(result.has_errors());
    }
}

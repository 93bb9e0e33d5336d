#![deny(missing_docs)]

//! # Parse Results
//!
//! An ordered mix of value elements and annotation elements.
//!
//! A result carrying an error has no usable value: any values next to the
//! error exist only for context and container builders discard them.
//!
//! Errors are scoped. Productions that assemble resources drop a failed
//! member with [`ParseResult::isolate`] instead of failing themselves. The
//! member's errors are then *settled*: they stay in the output as errors, but
//! no longer invalidate the enclosing values.

use crate::element::{Element, ANNOTATION};
use serde_json::{json, Value as JsonValue};

/// Severity class of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Invalidates the value being parsed.
    Error,
    /// Informational; never discards a value.
    Warning,
}

impl Severity {
    /// The class name carried by annotations of this severity.
    pub fn class(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Ordered container of values and annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    elements: Vec<Element>,
}

impl ParseResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result holding a single value.
    pub fn wrap(value: Element) -> Self {
        Self {
            elements: vec![value],
        }
    }

    /// Creates a result from elements in order.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Appends an element (value or annotation).
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// All elements in order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Consumes the result, returning all elements in order.
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Non-annotation elements in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| !e.is_annotation())
    }

    /// Annotations in encounter order.
    pub fn annotations(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_annotation())
    }

    /// Annotations classed `error`.
    pub fn errors(&self) -> impl Iterator<Item = &Element> {
        self.with_severity(Severity::Error)
    }

    /// Annotations classed `warning`.
    pub fn warnings(&self) -> impl Iterator<Item = &Element> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Element> {
        self.annotations()
            .filter(move |e| e.has_class(severity.class()))
    }

    /// Whether any error annotation is present, settled or not.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Whether an unsettled error invalidates the values of this result.
    pub fn failed(&self) -> bool {
        self.errors().any(|e| !e.settled)
    }

    /// Confines a failure to the member this result was parsed from.
    ///
    /// A failed result loses its values and its errors become settled, so the
    /// enclosing object drops the member and survives. A result that did not
    /// fail is returned unchanged.
    pub fn isolate(self) -> Self {
        if !self.failed() {
            return self;
        }
        self.into_annotations()
            .into_iter()
            .map(|mut annotation| {
                annotation.settled = true;
                annotation
            })
            .collect()
    }

    /// Whether there are neither values nor annotations.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The first value, unless the result failed.
    pub fn value(&self) -> Option<&Element> {
        if self.failed() {
            return None;
        }
        self.values().next()
    }

    /// Messages of all annotations, for tests and logs.
    pub fn messages(&self) -> Vec<&str> {
        self.annotations().filter_map(Element::text).collect()
    }

    /// Concatenates `other` after `self`.
    pub fn merge(mut self, other: ParseResult) -> Self {
        self.elements.extend(other.elements);
        self
    }

    /// Splits into `(values, annotations)`, each in order.
    pub fn partition(self) -> (Vec<Element>, Vec<Element>) {
        self.elements
            .into_iter()
            .partition(|e| e.kind != ANNOTATION)
    }

    /// Consumes the result, returning the first value unless the result failed.
    pub fn into_value(self) -> Option<Element> {
        if self.failed() {
            return None;
        }
        self.elements.into_iter().find(|e| !e.is_annotation())
    }

    /// Keeps only the annotations.
    pub fn into_annotations(self) -> ParseResult {
        Self::from_elements(self.partition().1)
    }

    /// Serializes into a refract `parseResult` element.
    pub fn to_refract(&self) -> JsonValue {
        let content: Vec<JsonValue> = self.elements.iter().map(Element::to_refract).collect();
        json!({ "element": "parseResult", "content": content })
    }
}

impl From<Element> for ParseResult {
    fn from(element: Element) -> Self {
        Self::wrap(element)
    }
}

impl FromIterator<Element> for ParseResult {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::from_elements(iter.into_iter().collect())
    }
}

impl Extend<Element> for ParseResult {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl IntoIterator for ParseResult {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

#![deny(missing_docs)]

//! # Traversal Combinators
//!
//! - **pipe_parse_result**: sequential steps, stopping at the first error while
//!   carrying every annotation forward.
//! - **parse_object / parse_array**: map each member or item through a
//!   transform and reassemble, all-or-nothing on errors.
//! - **Grammar**: the ordered per-member dispatch shared by every production
//!   (known key, extension, unsupported key, invalid key).

use crate::annotations::{invalid_key_warning, required_keys_check, unsupported_key_warning, warning};
use crate::context::Context;
use crate::element::{Element, Member, ARRAY, OBJECT};
use crate::parse_result::ParseResult;
use tracing::trace;

/// A pipeline step: consumes the primary value, returns the next result.
pub type Step<'s> = Box<dyn FnOnce(Element, &mut Context) -> ParseResult + 's>;

/// Boxes a closure returning anything convertible into a `ParseResult`.
pub fn step<'s, F, R>(f: F) -> Step<'s>
where
    F: FnOnce(Element, &mut Context) -> R + 's,
    R: Into<ParseResult>,
{
    Box::new(move |value, context| f(value, context).into())
}

/// Runs `steps` in order over `value`.
///
/// Each step receives the first non-annotation value of the accumulated
/// result. Its output comes first in the new accumulator, followed by the
/// annotations collected so far. Once the accumulator holds an unsettled
/// error no further step runs. If a step leaves no value, the pipeline ends there.
pub fn pipe_parse_result(context: &mut Context, value: Element, steps: Vec<Step<'_>>) -> ParseResult {
    let mut accumulator = ParseResult::wrap(value);

    for (index, step) in steps.into_iter().enumerate() {
        if accumulator.failed() {
            trace!(step = index, "pipeline stopped on error");
            break;
        }

        let (values, annotations) = accumulator.partition();
        let previous = ParseResult::from_elements(annotations);
        let Some(primary) = values.into_iter().next() else {
            accumulator = previous;
            break;
        };

        accumulator = step(primary, context).merge(previous);
    }

    accumulator
}

/// Parses an object member by member.
///
/// A non-object subject yields a single warning and no value. Missing
/// `required_keys` yield one error each and stop before member traversal.
/// Otherwise `transform` runs on every member in order; bare values it returns
/// are re-keyed with the original member key, and empty results drop the
/// member. Any unsettled error across the members discards the object,
/// leaving only the annotations. Members dropped through
/// [`ParseResult::isolate`] do not count.
pub fn parse_object<F>(
    context: &mut Context,
    name: &str,
    element: Element,
    required_keys: &[&str],
    mut transform: F,
) -> ParseResult
where
    F: FnMut(Member, &mut Context) -> ParseResult,
{
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, _| expect_kind(name, value, OBJECT)),
            step(|value, _| required_keys_check(name, required_keys, value)),
            step(|value, context| map_members(context, value, &mut transform)),
        ],
    )
}

/// Parses an array item by item, with the same all-or-nothing rule as
/// [`parse_object`]. Empty item results drop the item.
pub fn parse_array<F>(context: &mut Context, name: &str, element: Element, mut transform: F) -> ParseResult
where
    F: FnMut(Element, &mut Context) -> ParseResult,
{
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, _| expect_kind(name, value, ARRAY)),
            step(|value, context| {
                let source_map = context.source_map_of(&value);
                let mut items = Vec::new();
                let mut annotations = Vec::new();
                for item in value.into_children() {
                    let (values, found) = transform(item, context).partition();
                    items.extend(values);
                    annotations.extend(found);
                }
                assemble(
                    Element::array(items).with_source_map(source_map),
                    annotations,
                )
            }),
        ],
    )
}

fn expect_kind(name: &str, value: Element, kind: &str) -> ParseResult {
    if value.kind == kind {
        return ParseResult::wrap(value);
    }
    let noun = if kind == ARRAY { "an array" } else { "an object" };
    ParseResult::wrap(warning(format!("'{}' is not {}", name, noun), &value))
}

fn map_members<F>(context: &mut Context, object: Element, transform: &mut F) -> ParseResult
where
    F: FnMut(Member, &mut Context) -> ParseResult,
{
    let source_map = context.source_map_of(&object);
    let mut members = Vec::new();
    let mut annotations = Vec::new();

    for member in object.into_members() {
        let key = member.key.clone();
        for element in transform(member, context) {
            if element.is_annotation() {
                annotations.push(element);
            } else if element.is_member() {
                members.push(element);
            } else {
                members.push(Element::member(key.clone(), element));
            }
        }
    }

    assemble(
        Element::container(OBJECT, members).with_source_map(source_map),
        annotations,
    )
}

fn assemble(value: Element, annotations: Vec<Element>) -> ParseResult {
    let annotations = ParseResult::from_elements(annotations);
    if annotations.failed() {
        return annotations;
    }
    ParseResult::wrap(value).merge(annotations)
}

/// Classification of an object member, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Handled by the production.
    Known,
    /// Vendor extension (`x-*`), dropped silently.
    Extension,
    /// Recognised but not implemented.
    Unsupported,
    /// Not recognised.
    Invalid,
}

/// Key table of one grammar production.
#[derive(Clone, Copy)]
pub struct Grammar {
    /// Name used in diagnostics, e.g. `Info Object`.
    pub name: &'static str,
    /// Fixed keys handled by the production.
    pub known: &'static [&'static str],
    /// Keys recognised but not implemented.
    pub unsupported: &'static [&'static str],
    /// Patterned keys handled by the production (paths, status codes, ...).
    pub pattern: Option<fn(&str) -> bool>,
}

impl Grammar {
    /// A production with fixed keys only.
    pub const fn new(
        name: &'static str,
        known: &'static [&'static str],
        unsupported: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            known,
            unsupported,
            pattern: None,
        }
    }

    /// Adds a predicate for patterned keys.
    pub const fn with_pattern(mut self, pattern: fn(&str) -> bool) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Classifies a member. Known keys win over every fallback.
    pub fn classify(&self, member: &Member) -> MemberKind {
        let Some(key) = member.key_str() else {
            return MemberKind::Invalid;
        };
        if self.known.iter().any(|k| *k == key) || self.pattern.is_some_and(|matches| matches(key)) {
            MemberKind::Known
        } else if is_extension(key) {
            MemberKind::Extension
        } else if self.unsupported.iter().any(|k| *k == key) {
            MemberKind::Unsupported
        } else {
            MemberKind::Invalid
        }
    }

    /// Routes a member to `known` or to the matching fallback.
    ///
    /// The result of a known-key handler is returned as-is, even when it fails.
    pub fn dispatch<F>(&self, member: Member, context: &mut Context, known: F) -> ParseResult
    where
        F: FnOnce(&str, Member, &mut Context) -> ParseResult,
    {
        match self.classify(&member) {
            MemberKind::Known => {
                let key = member.key_name().to_string();
                known(&key, member, context)
            }
            MemberKind::Extension => ParseResult::new(),
            MemberKind::Unsupported => unsupported_key_warning(self.name, &member),
            MemberKind::Invalid => invalid_key_warning(self.name, &member),
        }
    }
}

/// Vendor extension keys start with `x-`.
pub fn is_extension(key: &str) -> bool {
    key.starts_with("x-")
}

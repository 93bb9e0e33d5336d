#![deny(missing_docs)]

//! # Parse Context
//!
//! Per-document environment threaded by `&mut` through every grammar
//! production: the parse options and the mutable component registry used for
//! `$ref` resolution. One `Context` belongs to exactly one document parse.

use crate::element::{Element, SourceMap};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// Keep source maps on value elements of the result.
    #[serde(default)]
    pub generate_source_map: bool,
}

/// A registered component. Schemas are declared before they are defined so
/// that placeholders can point at them while they are being parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEntry {
    /// Identifier known, value not parsed yet.
    Declared,
    /// Parsed value.
    Defined(Element),
}

/// Components registered under `#/components/<kind>/<id>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentRegistry {
    kinds: IndexMap<String, IndexMap<String, ComponentEntry>>,
}

impl ComponentRegistry {
    /// Registers a component kind with no entries yet.
    pub fn add_kind(&mut self, kind: &str) {
        self.kinds.entry(kind.to_string()).or_default();
    }

    /// Declares an identifier without a value.
    pub fn declare(&mut self, kind: &str, id: &str) {
        self.kinds
            .entry(kind.to_string())
            .or_default()
            .entry(id.to_string())
            .or_insert(ComponentEntry::Declared);
    }

    /// Defines (or redefines) a component value.
    pub fn define(&mut self, kind: &str, id: &str, value: Element) {
        self.kinds
            .entry(kind.to_string())
            .or_default()
            .insert(id.to_string(), ComponentEntry::Defined(value));
    }

    /// Removes an identifier, e.g. when its value failed to parse.
    pub fn forget(&mut self, kind: &str, id: &str) {
        if let Some(entries) = self.kinds.get_mut(kind) {
            entries.shift_remove(id);
        }
    }

    /// Whether the kind exists.
    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Looks up an entry.
    pub fn get(&self, kind: &str, id: &str) -> Option<&ComponentEntry> {
        self.kinds.get(kind).and_then(|entries| entries.get(id))
    }

    /// Defined values of a kind in registration order.
    pub fn defined(&self, kind: &str) -> impl Iterator<Item = (&str, &Element)> {
        self.kinds
            .get(kind)
            .into_iter()
            .flat_map(|entries| entries.iter())
            .filter_map(|(id, entry)| match entry {
                ComponentEntry::Defined(value) => Some((id.as_str(), value)),
                ComponentEntry::Declared => None,
            })
    }
}

/// Mutable per-document state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Component registry; `None` until a `components` object is seen.
    pub components: Option<ComponentRegistry>,
    /// `(major, minor, patch)` of the document's `openapi` field.
    pub openapi_version: Option<(u64, u64, u64)>,
}

/// Parse-time environment.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Options for this parse.
    pub options: ParseOptions,
    /// Mutable state shared by all productions of this document.
    pub state: State,
}

impl Context {
    /// Creates a context for one document parse.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            state: State::default(),
        }
    }

    /// The component registry, created on first use.
    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        self.state.components.get_or_insert_with(ComponentRegistry::default)
    }

    /// Copies `origin`'s source map onto a freshly built value element.
    pub fn locate(&self, mut element: Element, origin: &Element) -> Element {
        element.source_map = self.source_map_of(origin);
        element
    }

    /// The source map of `origin` if source maps are generated.
    pub fn source_map_of(&self, origin: &Element) -> Option<SourceMap> {
        if self.options.generate_source_map {
            origin.source_map.clone()
        } else {
            None
        }
    }
}

#![deny(missing_docs)]

//! # Element Model
//!
//! Tagged tree nodes in the API Elements (refract) shape.
//!
//! Every node has a `kind` tag, an ordered set of classes, `meta` and
//! `attributes` maps, an optional source map and a content slot. Objects hold
//! `member` elements; a member pairs a key element with a value element.

pub mod refract;

use indexmap::IndexMap;

/// Kind tag of annotation elements.
pub const ANNOTATION: &str = "annotation";
/// Kind tag of member elements.
pub const MEMBER: &str = "member";
/// Kind tag of object elements.
pub const OBJECT: &str = "object";
/// Kind tag of array elements.
pub const ARRAY: &str = "array";
/// Kind tag of string elements.
pub const STRING: &str = "string";

/// Provenance of an element: `(offset, length)` pairs into the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap(pub Vec<(usize, usize)>);

impl SourceMap {
    /// Creates a source map covering a single span.
    pub fn span(offset: usize, length: usize) -> Self {
        Self(vec![(offset, length)])
    }

    /// Returns the `(offset, length)` pairs.
    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.0
    }
}

/// The content slot of an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    /// No content (`null` elements, placeholders, empty containers).
    #[default]
    Empty,
    /// Scalar string.
    String(String),
    /// Scalar number.
    Number(serde_json::Number),
    /// Scalar boolean.
    Boolean(bool),
    /// Ordered children.
    Elements(Vec<Element>),
    /// Key/value pair of a `member` element.
    Member(Box<Member>),
}

/// A key/value pair, the unit processed inside object traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The key, typically a string element.
    pub key: Element,
    /// The value.
    pub value: Element,
}

impl Member {
    /// Creates a new member.
    pub fn new(key: Element, value: Element) -> Self {
        Self { key, value }
    }

    /// Returns the key as a string slice, if it is a string element.
    pub fn key_str(&self) -> Option<&str> {
        self.key.as_str()
    }

    /// Returns the key text for messages; non-string keys render as empty.
    pub fn key_name(&self) -> &str {
        self.key_str().unwrap_or_default()
    }

    /// Wraps this member into a `member` element.
    pub fn into_element(self) -> Element {
        Element::new(MEMBER).with_content(Content::Member(Box::new(self)))
    }
}

/// A tagged tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Kind tag (`string`, `object`, `member`, `annotation`, `resource`, ...).
    pub kind: String,
    /// Ordered set of classes (`api`, `error`, `warning`, `host`, ...).
    pub classes: Vec<String>,
    /// Meta data (`title`, `id`, `description`).
    pub meta: IndexMap<String, Element>,
    /// Attributes (`version`, `href`, `method`, ...).
    pub attributes: IndexMap<String, Element>,
    /// Provenance in the original source text.
    pub source_map: Option<SourceMap>,
    /// Content slot.
    pub content: Content,
    /// Error already accounted for by dropping the member it was raised in.
    pub(crate) settled: bool,
}

impl Element {
    /// Creates an empty element of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            classes: Vec::new(),
            meta: IndexMap::new(),
            attributes: IndexMap::new(),
            source_map: None,
            content: Content::Empty,
            settled: false,
        }
    }

    /// Creates a string element.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(STRING).with_content(Content::String(value.into()))
    }

    /// Creates a number element.
    pub fn number(value: impl Into<serde_json::Number>) -> Self {
        Self::new("number").with_content(Content::Number(value.into()))
    }

    /// Creates a boolean element.
    pub fn boolean(value: bool) -> Self {
        Self::new("boolean").with_content(Content::Boolean(value))
    }

    /// Creates a null element.
    pub fn null() -> Self {
        Self::new("null")
    }

    /// Creates an object element from members.
    pub fn object(members: impl IntoIterator<Item = Member>) -> Self {
        Self::container(OBJECT, members.into_iter().map(Member::into_element).collect())
    }

    /// Creates an array element from items.
    pub fn array(items: impl IntoIterator<Item = Element>) -> Self {
        Self::container(ARRAY, items.into_iter().collect())
    }

    /// Creates an element of any kind holding child elements.
    pub fn container(kind: impl Into<String>, children: Vec<Element>) -> Self {
        Self::new(kind).with_content(Content::Elements(children))
    }

    /// Creates a `member` element.
    pub fn member(key: Element, value: Element) -> Self {
        Member::new(key, value).into_element()
    }

    /// Replaces the content.
    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    /// Adds a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Attaches a source map.
    pub fn with_source_map(mut self, source_map: Option<SourceMap>) -> Self {
        self.source_map = source_map;
        self
    }

    /// Adds a class unless already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Whether the element carries the class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Whether this is an annotation.
    pub fn is_annotation(&self) -> bool {
        self.kind == ANNOTATION
    }

    /// Whether this is an object.
    pub fn is_object(&self) -> bool {
        self.kind == OBJECT
    }

    /// Whether this is an array.
    pub fn is_array(&self) -> bool {
        self.kind == ARRAY
    }

    /// Whether this is a member.
    pub fn is_member(&self) -> bool {
        self.kind == MEMBER
    }

    /// String content, if this is a string element.
    pub fn as_str(&self) -> Option<&str> {
        match (&self.content, self.kind.as_str()) {
            (Content::String(s), STRING) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean element.
    pub fn as_bool(&self) -> Option<bool> {
        match &self.content {
            Content::Boolean(b) if self.kind == "boolean" => Some(*b),
            _ => None,
        }
    }

    /// Text content of any element holding a string (annotations, copy).
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::String(s) => Some(s),
            _ => None,
        }
    }

    /// The member payload, if this is a member element.
    pub fn as_member(&self) -> Option<&Member> {
        match &self.content {
            Content::Member(m) => Some(m),
            _ => None,
        }
    }

    /// Consumes the element, returning its member payload.
    pub fn into_member(self) -> Option<Member> {
        match self.content {
            Content::Member(m) => Some(*m),
            _ => None,
        }
    }

    /// Child elements (empty for scalars).
    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Elements(children) => children,
            _ => &[],
        }
    }

    /// Mutable access to child elements, switching empty content to a sequence.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        if matches!(self.content, Content::Empty) {
            self.content = Content::Elements(Vec::new());
        }
        match &mut self.content {
            Content::Elements(children) => Some(children),
            _ => None,
        }
    }

    /// Appends a child element.
    pub fn push(&mut self, child: Element) {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
    }

    /// Consumes the element, returning its children.
    pub fn into_children(self) -> Vec<Element> {
        match self.content {
            Content::Elements(children) => children,
            _ => Vec::new(),
        }
    }

    /// Members of an object element, in order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.children().iter().filter_map(Element::as_member)
    }

    /// Consumes an object element, returning its members.
    pub fn into_members(self) -> Vec<Member> {
        self.into_children()
            .into_iter()
            .filter_map(Element::into_member)
            .collect()
    }

    /// Looks up the member with the given string key.
    pub fn get_member(&self, key: &str) -> Option<&Member> {
        self.members().find(|m| m.key_str() == Some(key))
    }

    /// Looks up a member value by string key.
    pub fn get(&self, key: &str) -> Option<&Element> {
        self.get_member(key).map(|m| &m.value)
    }

    /// Whether an object has a member with the given key.
    pub fn has_key(&self, key: &str) -> bool {
        self.get_member(key).is_some()
    }

    /// Sets a meta entry.
    pub fn set_meta(&mut self, name: &str, value: Element) {
        self.meta.insert(name.to_string(), value);
    }

    /// Sets an attribute.
    pub fn set_attribute(&mut self, name: &str, value: Element) {
        self.attributes.insert(name.to_string(), value);
    }

    /// Reads an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Element> {
        self.attributes.get(name)
    }

    /// The `title` meta as text.
    pub fn title(&self) -> Option<&str> {
        self.meta.get("title").and_then(Element::as_str)
    }

    /// The `id` meta as text.
    pub fn id(&self) -> Option<&str> {
        self.meta.get("id").and_then(Element::as_str)
    }

    /// Removes source maps from this element and everything below it.
    pub fn strip_source_maps(&mut self) {
        self.source_map = None;
        for value in self.meta.values_mut().chain(self.attributes.values_mut()) {
            value.strip_source_maps();
        }
        match &mut self.content {
            Content::Elements(children) => {
                children.iter_mut().for_each(Element::strip_source_maps)
            }
            Content::Member(member) => {
                member.key.strip_source_maps();
                member.value.strip_source_maps();
            }
            _ => {}
        }
    }
}

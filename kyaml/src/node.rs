// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The parsed document tree and its query API.
//!
//! A document is a tree of [`Node`]s. Subtrees reached through an alias are
//! shared with the anchored node, so children are held in
//! [`Rc`]s.
//!
//! # Queries
//!
//! Paths are slices of [`PathStep`]s, most easily written with [`path!`]:
//!
//! ```
//! use kyaml::path;
//!
//! let doc = kyaml::parse("servers:\n  - name: alpha\n    port: 8080\n").unwrap();
//! assert_eq!(doc.leaf_value(path!["servers", 0, "name"]).unwrap(), "alpha");
//! assert!(doc.has_leaf(path!["servers", 0, "port"]));
//! assert!(!doc.has(path!["servers", 1]));
//! assert_eq!(doc.value(path!["servers", 0, "port"]).unwrap().scalar_as::<u16>().unwrap(), 8080);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use derive_more::{Display, From};

use crate::error::QueryError;

/// Tag for null values.
pub const NULL_TAG: &str = "!!null";
/// Tag for booleans.
pub const BOOL_TAG: &str = "!!bool";
/// Tag for integers.
pub const INT_TAG: &str = "!!int";
/// Tag for floating point numbers.
pub const FLOAT_TAG: &str = "!!float";
/// Tag for strings.
pub const STR_TAG: &str = "!!str";
/// Tag for base64 encoded binary data.
pub const BINARY_TAG: &str = "!!binary";

static NO_PROPERTIES: BTreeSet<String> = BTreeSet::new();

/// The three kinds of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    #[display("scalar")]
    Scalar,
    #[display("sequence")]
    Sequence,
    #[display("mapping")]
    Mapping,
}

/// A node of a parsed document.
///
/// Mapping keys are the text of the key node. Entry order is not preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A scalar with the properties (tags) written on it.
    Scalar { value: String, properties: BTreeSet<String> },
    /// A sequence of nodes.
    Sequence(Vec<Rc<Node>>),
    /// A mapping from key text to node.
    Mapping(HashMap<String, Rc<Node>>),
}

/// One step of a query path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From)]
pub enum PathStep<'a> {
    /// An index into a sequence.
    Index(usize),
    /// A key of a mapping.
    Key(&'a str),
}

impl From<i32> for PathStep<'_> {
    /// Negative indices never match.
    fn from(index: i32) -> Self {
        Self::Index(usize::try_from(index).unwrap_or(usize::MAX))
    }
}

/// Build a query path: `path!["key", 0, "nested"]`.
#[macro_export]
macro_rules! path {
    ($($step:expr),* $(,)?) => {
        &[$($crate::PathStep::from($step)),*][..]
    };
}

impl Node {
    /// A scalar without properties.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar {
            value: value.into(),
            properties: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar { .. } => NodeKind::Scalar,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Mapping(_) => NodeKind::Mapping,
        }
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar { .. })
    }

    fn mismatch(&self, expected: NodeKind) -> QueryError {
        QueryError::TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }

    /// The text of a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] for collections.
    pub fn as_scalar(&self) -> Result<&str, QueryError> {
        match self {
            Self::Scalar { value, .. } => Ok(value),
            _ => Err(self.mismatch(NodeKind::Scalar)),
        }
    }

    /// The items of a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] if this is not a sequence.
    pub fn as_sequence(&self) -> Result<&[Rc<Self>], QueryError> {
        match self {
            Self::Sequence(items) => Ok(items),
            _ => Err(self.mismatch(NodeKind::Sequence)),
        }
    }

    /// The entries of a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] if this is not a mapping.
    pub fn as_mapping(&self) -> Result<&HashMap<String, Rc<Self>>, QueryError> {
        match self {
            Self::Mapping(entries) => Ok(entries),
            _ => Err(self.mismatch(NodeKind::Mapping)),
        }
    }

    /// Item `index` of a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] if this is not a sequence and
    /// [`QueryError::IndexOutOfRange`] if there is no such item.
    pub fn get(&self, index: usize) -> Result<&Self, QueryError> {
        self.as_sequence()?
            .get(index)
            .map(AsRef::as_ref)
            .ok_or(QueryError::IndexOutOfRange(index))
    }

    /// The value stored under `key` in a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] if this is not a mapping and
    /// [`QueryError::KeyNotFound`] if the key is absent.
    pub fn get_key(&self, key: &str) -> Result<&Self, QueryError> {
        self.as_mapping()?
            .get(key)
            .map(AsRef::as_ref)
            .ok_or_else(|| QueryError::KeyNotFound(key.to_owned()))
    }

    /// Number of children; 0 for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar { .. } => 0,
            Self::Sequence(items) => items.len(),
            Self::Mapping(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The properties of a scalar. Collections have none.
    #[must_use]
    pub fn properties(&self) -> &BTreeSet<String> {
        match self {
            Self::Scalar { properties, .. } => properties,
            Self::Sequence(_) | Self::Mapping(_) => &NO_PROPERTIES,
        }
    }

    #[must_use]
    pub fn has_property(&self, property: &str) -> bool {
        self.properties().contains(property)
    }

    fn step(&self, step: PathStep<'_>) -> Result<&Self, QueryError> {
        match step {
            PathStep::Index(index) => self.get(index),
            PathStep::Key(key) => self.get_key(key),
        }
    }

    /// Follow `path` from this node.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] when a step does not fit the node
    /// it is applied to, and [`QueryError::KeyNotFound`] or
    /// [`QueryError::IndexOutOfRange`] when the child does not exist.
    pub fn value(&self, path: &[PathStep<'_>]) -> Result<&Self, QueryError> {
        path.iter().try_fold(self, |node, step| node.step(*step))
    }

    /// Returns `true` if `path` leads to a node.
    #[must_use]
    pub fn has(&self, path: &[PathStep<'_>]) -> bool {
        self.value(path).is_ok()
    }

    /// The text of the scalar at `path`.
    ///
    /// # Errors
    ///
    /// As for [`Node::value`], plus [`QueryError::TypeMismatch`] if the node
    /// found is not a scalar.
    pub fn leaf_value(&self, path: &[PathStep<'_>]) -> Result<&str, QueryError> {
        self.value(path)?.as_scalar()
    }

    /// Returns `true` if `path` leads to a scalar.
    #[must_use]
    pub fn has_leaf(&self, path: &[PathStep<'_>]) -> bool {
        self.value(path).is_ok_and(Self::is_scalar)
    }

    /// Convert the text of a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TypeMismatch`] for collections.
    pub fn scalar_as<T: FromScalar>(&self) -> Result<T, QueryError> {
        let text = self.as_scalar()?;
        Ok(T::from_scalar(self.properties(), text))
    }

    /// Walk the tree depth first. Mapping entries are visited in key order.
    pub fn accept(&self, visitor: &mut dyn NodeVisitor) {
        match self {
            Self::Scalar { value, properties } => visitor.visit_scalar(value, properties),
            Self::Sequence(items) => {
                visitor.visit_sequence(items);
                for (index, item) in items.iter().enumerate() {
                    visitor.visit_index(index);
                    item.accept(visitor);
                }
                visitor.end_sequence(items);
            }
            Self::Mapping(entries) => {
                visitor.visit_mapping(entries);
                let mut keys: Vec<&String> = entries.keys().collect();
                keys.sort();
                for key in keys {
                    if let Some(value) = entries.get(key) {
                        visitor.visit_key(key);
                        value.accept(visitor);
                    }
                }
                visitor.end_mapping(entries);
            }
        }
    }
}

/// Callbacks for [`Node::accept`]. All methods default to doing nothing.
pub trait NodeVisitor {
    fn visit_scalar(&mut self, _value: &str, _properties: &BTreeSet<String>) {}

    /// Called before the items of a sequence.
    fn visit_sequence(&mut self, _items: &[Rc<Node>]) {}

    /// Called before the entries of a mapping.
    fn visit_mapping(&mut self, _entries: &HashMap<String, Rc<Node>>) {}

    /// Called before each sequence item.
    fn visit_index(&mut self, _index: usize) {}

    /// Called before each mapping value.
    fn visit_key(&mut self, _key: &str) {}

    fn end_sequence(&mut self, _items: &[Rc<Node>]) {}

    fn end_mapping(&mut self, _entries: &HashMap<String, Rc<Node>>) {}
}

/// Writes the compact one-line form used by `Display`.
struct Printer<'a, 'f> {
    out: &'a mut fmt::Formatter<'f>,
    needs_comma: bool,
    result: fmt::Result,
}

impl Printer<'_, '_> {
    fn write(&mut self, text: &str) {
        if self.result.is_ok() {
            self.result = self.out.write_str(text);
        }
    }

    fn comma(&mut self) {
        if self.needs_comma {
            self.write(", ");
        }
    }
}

impl NodeVisitor for Printer<'_, '_> {
    fn visit_scalar(&mut self, value: &str, _properties: &BTreeSet<String>) {
        self.write(value);
        self.needs_comma = true;
    }

    fn visit_sequence(&mut self, _items: &[Rc<Node>]) {
        self.write("[");
        self.needs_comma = false;
    }

    fn visit_mapping(&mut self, _entries: &HashMap<String, Rc<Node>>) {
        self.write("{");
        self.needs_comma = false;
    }

    fn visit_index(&mut self, _index: usize) {
        self.comma();
        self.needs_comma = false;
    }

    fn visit_key(&mut self, key: &str) {
        self.comma();
        self.write(key);
        self.write(": ");
        self.needs_comma = false;
    }

    fn end_sequence(&mut self, _items: &[Rc<Node>]) {
        self.write("]");
        self.needs_comma = true;
    }

    fn end_mapping(&mut self, _entries: &HashMap<String, Rc<Node>>) {
        self.write("}");
        self.needs_comma = true;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer {
            out: f,
            needs_comma: false,
            result: Ok(()),
        };
        self.accept(&mut printer);
        printer.result
    }
}

// ============================================================================
// Scalar conversion
// ============================================================================

/// Conversion from scalar text. Conversions never fail; text that does not
/// fit the target type yields a default.
pub trait FromScalar: Sized {
    fn from_scalar(properties: &BTreeSet<String>, text: &str) -> Self;
}

impl FromScalar for String {
    fn from_scalar(_properties: &BTreeSet<String>, text: &str) -> Self {
        text.to_owned()
    }
}

/// The leading integer of `text`, after whitespace. Missing digits give 0.
fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['-', '+']));
    let digits = text
        .get(sign_len..)
        .map_or(0, |rest| rest.chars().take_while(char::is_ascii_digit).count());
    text.get(..sign_len + digits)
        .and_then(|number| number.parse().ok())
        .unwrap_or_default()
}

impl FromScalar for bool {
    /// `true`, `yes`, `t`, `y` and `false`, `no`, `f`, `n` in any case and
    /// ignoring non-alphanumerics. Anything else is read as an integer.
    fn from_scalar(_properties: &BTreeSet<String>, text: &str) -> Self {
        let sanitized: String = text
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        if ["true", "yes", "t", "y"].iter().any(|key| sanitized.starts_with(key)) {
            return true;
        }
        if ["false", "no", "f", "n"].iter().any(|key| sanitized.starts_with(key)) {
            return false;
        }
        leading_integer(text) != 0
    }
}

impl FromScalar for Vec<u8> {
    /// Standard base64. Characters outside the alphabet (line breaks,
    /// indentation) are skipped; undecodable text gives an empty vector.
    fn from_scalar(_properties: &BTreeSet<String>, text: &str) -> Self {
        let sanitized: String = text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
            .collect();
        STANDARD.decode(sanitized).unwrap_or_default()
    }
}

macro_rules! impl_from_scalar_parse {
    ($($ty:ty),+) => {
        $(
            impl FromScalar for $ty {
                fn from_scalar(_properties: &BTreeSet<String>, text: &str) -> Self {
                    text.trim().parse().unwrap_or_default()
                }
            }
        )+
    };
}

impl_from_scalar_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(text: &str) -> Rc<Node> {
        Rc::new(Node::scalar(text))
    }

    fn sample() -> Node {
        let mut entries = HashMap::new();
        entries.insert("name".to_owned(), scalar("klaas"));
        entries.insert(
            "items".to_owned(),
            Rc::new(Node::Sequence(vec![scalar("one"), scalar("two")])),
        );
        Node::Mapping(entries)
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::Scalar.to_string(), "scalar");
        assert_eq!(NodeKind::Sequence.to_string(), "sequence");
        assert_eq!(NodeKind::Mapping.to_string(), "mapping");
    }

    #[test]
    fn test_value_queries() {
        let doc = sample();
        assert_eq!(doc.leaf_value(path!["name"]), Ok("klaas"));
        assert_eq!(doc.leaf_value(path!["items", 1]), Ok("two"));
        assert_eq!(doc.value(path![]).map(Node::kind), Ok(NodeKind::Mapping));
        assert_eq!(
            doc.value(path!["missing"]),
            Err(QueryError::KeyNotFound("missing".to_owned()))
        );
        assert_eq!(doc.value(path!["items", 2]), Err(QueryError::IndexOutOfRange(2)));
        assert_eq!(
            doc.value(path![0]),
            Err(QueryError::TypeMismatch {
                expected: NodeKind::Sequence,
                actual: NodeKind::Mapping
            })
        );
        assert_eq!(
            doc.leaf_value(path!["items"]),
            Err(QueryError::TypeMismatch {
                expected: NodeKind::Scalar,
                actual: NodeKind::Sequence
            })
        );
    }

    #[test]
    fn test_has_never_errors() {
        let doc = sample();
        assert!(doc.has(path!["items", 0]));
        assert!(doc.has(path!["items"]));
        assert!(!doc.has(path!["items", 5]));
        assert!(!doc.has(path!["name", 0]));
        assert!(!doc.has(path![0, "x"]));
        assert!(!doc.has(path!["items", -1]));
        assert!(doc.has_leaf(path!["name"]));
        assert!(!doc.has_leaf(path!["items"]));
    }

    #[test]
    fn test_properties() {
        let mut node = Node::scalar("5");
        if let Node::Scalar { properties, .. } = &mut node {
            properties.insert(INT_TAG.to_owned());
        }
        assert!(node.has_property(INT_TAG));
        assert!(!node.has_property(STR_TAG));
        assert!(sample().properties().is_empty());
    }

    #[test]
    fn test_bool_conversion() {
        let cases = [
            ("true", true),
            ("Yes", true),
            (" y ", true),
            ("T", true),
            ("FALSE", false),
            ("no", false),
            ("n", false),
            ("1", true),
            ("0", false),
            ("42", true),
            ("maybe", false),
            ("", false),
        ];
        for (text, expected) in cases {
            assert_eq!(Node::scalar(text).scalar_as::<bool>(), Ok(expected), "{text:?}");
        }
    }

    #[test]
    fn test_numeric_conversion() {
        assert_eq!(Node::scalar(" 42 ").scalar_as::<i32>(), Ok(42));
        assert_eq!(Node::scalar("-7").scalar_as::<i64>(), Ok(-7));
        assert_eq!(Node::scalar("2.5").scalar_as::<f64>(), Ok(2.5));
        assert_eq!(Node::scalar("abc").scalar_as::<u8>(), Ok(0));
        assert_eq!(Node::scalar("300").scalar_as::<u8>(), Ok(0));
        assert!(sample().scalar_as::<i32>().is_err());
    }

    #[test]
    fn test_binary_conversion() {
        assert_eq!(
            Node::scalar("aGVs\n  bG8=\n").scalar_as::<Vec<u8>>(),
            Ok(b"hello".to_vec())
        );
        assert_eq!(Node::scalar("!!!").scalar_as::<Vec<u8>>(), Ok(Vec::new()));
        assert_eq!(Node::scalar("abc").scalar_as::<Vec<u8>>(), Ok(Vec::new()));
    }

    #[test]
    fn test_printer() {
        assert_eq!(Node::scalar("plain").to_string(), "plain");
        assert_eq!(sample().to_string(), "{items: [one, two], name: klaas}");
        let nested = Node::Sequence(vec![
            Rc::new(Node::Sequence(vec![])),
            scalar("x"),
            Rc::new(Node::Mapping(HashMap::new())),
        ]);
        assert_eq!(nested.to_string(), "[[], x, {}]");
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl NodeVisitor for Recorder {
        fn visit_scalar(&mut self, value: &str, _properties: &BTreeSet<String>) {
            self.0.push(format!("scalar {value}"));
        }

        fn visit_index(&mut self, index: usize) {
            self.0.push(format!("index {index}"));
        }

        fn visit_key(&mut self, key: &str) {
            self.0.push(format!("key {key}"));
        }

        fn end_sequence(&mut self, items: &[Rc<Node>]) {
            self.0.push(format!("end sequence of {}", items.len()));
        }
    }

    #[test]
    fn test_visitor_order() {
        let mut recorder = Recorder::default();
        sample().accept(&mut recorder);
        assert_eq!(
            recorder.0,
            [
                "key items",
                "index 0",
                "scalar one",
                "index 1",
                "scalar two",
                "end sequence of 2",
                "key name",
                "scalar klaas"
            ]
        );
    }
}

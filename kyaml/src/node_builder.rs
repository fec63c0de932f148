// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Builds a [`Node`] tree from grammar events.
//!
//! Collections under construction, pending mapping keys, and pending anchors
//! and tags live on a stack. Each completed node is first decorated with the
//! tags waiting for it, then registered under the anchors waiting for it, and
//! finally attached to whatever is below: a sequence, a mapping (as a key) or
//! a mapping key (as its value).

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::builder::DocumentBuilder;
use crate::error::ErrorKind;
use crate::node::Node;

#[derive(Debug)]
enum Item {
    Sequence(Vec<Rc<Node>>),
    Mapping(HashMap<String, Rc<Node>>),
    MappingKey(String),
    Anchor(String),
    Properties(BTreeSet<String>),
    Resolved(Rc<Node>),
}

/// A [`DocumentBuilder`] producing a [`Node`] tree.
#[derive(Debug, Default)]
pub struct NodeBuilder {
    stack: Vec<Item>,
    anchors: HashMap<String, Rc<Node>>,
    errors: Vec<ErrorKind>,
}

impl NodeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish the document.
    ///
    /// # Errors
    ///
    /// Returns the first content error recorded while building, such as an
    /// alias to an unknown anchor.
    pub fn build(mut self) -> Result<Rc<Node>, ErrorKind> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        match self.stack.pop() {
            None => Ok(Rc::new(Node::scalar(""))),
            Some(Item::Resolved(node)) if self.stack.is_empty() => Ok(node),
            Some(item) => {
                log::trace!("unfinished document, top of stack is {item:?}");
                Err(ErrorKind::Grammar("incomplete document structure".to_owned()))
            }
        }
    }

    fn resolve(&mut self, mut node: Rc<Node>) {
        let mut anchors = Vec::new();
        while matches!(self.stack.last(), Some(Item::Anchor(_) | Item::Properties(_))) {
            match self.stack.pop() {
                Some(Item::Anchor(name)) => anchors.push(name),
                Some(Item::Properties(properties)) => node = with_properties(node, properties),
                _ => {}
            }
        }
        for name in anchors {
            self.anchors.insert(name, Rc::clone(&node));
        }
        self.attach(node);
    }

    fn attach(&mut self, node: Rc<Node>) {
        match self.stack.pop() {
            None => self.stack.push(Item::Resolved(node)),
            Some(Item::Sequence(mut items)) => {
                items.push(node);
                self.stack.push(Item::Sequence(items));
            }
            Some(Item::Mapping(entries)) => {
                let key = key_text(&node);
                self.stack.push(Item::Mapping(entries));
                self.stack.push(Item::MappingKey(key));
            }
            Some(Item::MappingKey(key)) => {
                if let Some(Item::Mapping(entries)) = self.stack.last_mut() {
                    entries.entry(key).or_insert(node);
                } else {
                    log::trace!("mapping key '{key}' outside of a mapping");
                }
            }
            Some(Item::Resolved(previous)) => {
                log::trace!("ignoring node after the document root");
                self.stack.push(Item::Resolved(previous));
            }
            Some(item @ (Item::Anchor(_) | Item::Properties(_))) => {
                log::trace!("unexpected pending {item:?}");
                self.stack.push(item);
            }
        }
    }
}

/// The mapping key for `node`: scalar text, or the printed form of a collection.
fn key_text(node: &Node) -> String {
    match node {
        Node::Scalar { value, .. } => value.clone(),
        Node::Sequence(_) | Node::Mapping(_) => node.to_string(),
    }
}

/// Tags are kept on scalars only.
fn with_properties(mut node: Rc<Node>, extra: BTreeSet<String>) -> Rc<Node> {
    if let Node::Scalar { properties, .. } = Rc::make_mut(&mut node) {
        properties.extend(extra);
    } else {
        log::trace!("dropping tags {extra:?} on a collection");
    }
    node
}

impl DocumentBuilder for NodeBuilder {
    fn start_sequence(&mut self) {
        self.stack.push(Item::Sequence(Vec::new()));
    }

    fn end_sequence(&mut self) {
        match self.stack.pop() {
            Some(Item::Sequence(items)) => self.resolve(Rc::new(Node::Sequence(items))),
            other => {
                log::trace!("end of sequence without a start, top of stack is {other:?}");
                self.stack.extend(other);
            }
        }
    }

    fn start_mapping(&mut self) {
        self.stack.push(Item::Mapping(HashMap::new()));
    }

    fn end_mapping(&mut self) {
        if let Some(Item::MappingKey(key)) = self.stack.last() {
            log::trace!("dropping mapping key '{key}' without a value");
            self.stack.pop();
        }
        match self.stack.pop() {
            Some(Item::Mapping(entries)) => self.resolve(Rc::new(Node::Mapping(entries))),
            other => {
                log::trace!("end of mapping without a start, top of stack is {other:?}");
                self.stack.extend(other);
            }
        }
    }

    fn add_scalar(&mut self, value: &str) {
        self.resolve(Rc::new(Node::scalar(value)));
    }

    fn add_anchor(&mut self, name: &str) {
        self.stack.push(Item::Anchor(name.to_owned()));
    }

    fn add_alias(&mut self, name: &str) {
        while let Some(Item::Anchor(anchor)) = self.stack.last() {
            log::trace!("ignoring anchor '{anchor}' on alias '{name}'");
            self.stack.pop();
        }
        match self.anchors.get(name) {
            Some(node) => {
                let node = Rc::clone(node);
                self.resolve(node);
            }
            None => {
                log::warn!("unknown alias '{name}'");
                self.errors.push(ErrorKind::UnknownAlias(name.to_owned()));
                // Keep the structure balanced so later events still line up.
                self.resolve(Rc::new(Node::scalar("")));
            }
        }
    }

    fn add_property(&mut self, property: &str) {
        if let Some(Item::Properties(properties)) = self.stack.last_mut() {
            properties.insert(property.to_owned());
        } else {
            self.stack.push(Item::Properties(BTreeSet::from([property.to_owned()])));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Event;
    use crate::node::{INT_TAG, STR_TAG};
    use crate::path;

    fn build(events: &[Event]) -> Result<Rc<Node>, ErrorKind> {
        let mut builder = NodeBuilder::new();
        for event in events {
            event.apply(&mut builder);
        }
        builder.build()
    }

    fn scalar(text: &str) -> Event {
        Event::Scalar(text.to_owned())
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(build(&[]).unwrap().as_scalar(), Ok(""));
    }

    #[test]
    fn test_nested_collections() {
        let doc = build(&[
            Event::StartMapping,
            scalar("list"),
            Event::StartSequence,
            scalar("a"),
            Event::StartMapping,
            scalar("k"),
            scalar("v"),
            Event::EndMapping,
            Event::EndSequence,
            scalar("name"),
            scalar("x"),
            Event::EndMapping,
        ])
        .unwrap();
        assert_eq!(doc.leaf_value(path!["list", 0]), Ok("a"));
        assert_eq!(doc.leaf_value(path!["list", 1, "k"]), Ok("v"));
        assert_eq!(doc.leaf_value(path!["name"]), Ok("x"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_first_key_wins() {
        let doc = build(&[
            Event::StartMapping,
            scalar("a"),
            scalar("1"),
            scalar("a"),
            scalar("2"),
            Event::EndMapping,
        ])
        .unwrap();
        assert_eq!(doc.leaf_value(path!["a"]), Ok("1"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_collection_key_uses_printed_form() {
        let doc = build(&[
            Event::StartMapping,
            Event::StartSequence,
            scalar("a"),
            scalar("b"),
            Event::EndSequence,
            scalar("v"),
            Event::EndMapping,
        ])
        .unwrap();
        assert_eq!(doc.leaf_value(path!["[a, b]"]), Ok("v"));
    }

    #[test]
    fn test_anchor_and_alias_share_node() {
        let doc = build(&[
            Event::StartSequence,
            Event::Anchor("x".to_owned()),
            Event::StartMapping,
            scalar("k"),
            scalar("v"),
            Event::EndMapping,
            Event::Alias("x".to_owned()),
            Event::EndSequence,
        ])
        .unwrap();
        let [first, second] = doc.as_sequence().unwrap() else {
            panic!("expected two items in {doc}");
        };
        assert!(Rc::ptr_eq(first, second));
    }

    #[test]
    fn test_anchor_redefinition() {
        let doc = build(&[
            Event::StartSequence,
            Event::Anchor("x".to_owned()),
            scalar("first"),
            Event::Alias("x".to_owned()),
            Event::Anchor("x".to_owned()),
            scalar("second"),
            Event::Alias("x".to_owned()),
            Event::EndSequence,
        ])
        .unwrap();
        assert_eq!(doc.to_string(), "[first, first, second, second]");
    }

    #[test]
    fn test_unknown_alias() {
        let result = build(&[Event::StartSequence, Event::Alias("nope".to_owned()), Event::EndSequence]);
        assert_eq!(result, Err(ErrorKind::UnknownAlias("nope".to_owned())));
    }

    #[test]
    fn test_properties_attach_to_next_scalar() {
        let doc = build(&[
            Event::StartSequence,
            Event::Property(INT_TAG.to_owned()),
            Event::Anchor("n".to_owned()),
            scalar("5"),
            scalar("plain"),
            Event::Alias("n".to_owned()),
            Event::EndSequence,
        ])
        .unwrap();
        assert!(doc.value(path![0]).unwrap().has_property(INT_TAG));
        assert!(doc.value(path![1]).unwrap().properties().is_empty());
        assert!(doc.value(path![2]).unwrap().has_property(INT_TAG));
    }

    #[test]
    fn test_properties_on_collection_are_dropped() {
        let doc = build(&[
            Event::Property(STR_TAG.to_owned()),
            Event::StartSequence,
            scalar("a"),
            Event::EndSequence,
        ])
        .unwrap();
        assert_eq!(doc.to_string(), "[a]");
        assert!(doc.properties().is_empty());
    }

    #[test]
    fn test_anchor_on_alias_is_ignored() {
        let doc = build(&[
            Event::StartSequence,
            Event::Anchor("a".to_owned()),
            scalar("one"),
            Event::Anchor("b".to_owned()),
            Event::Alias("a".to_owned()),
            Event::Alias("b".to_owned()),
            Event::EndSequence,
        ]);
        assert_eq!(doc, Err(ErrorKind::UnknownAlias("b".to_owned())));
    }
}

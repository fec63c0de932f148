// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The event protocol between the grammar and whoever builds the document.
//!
//! Productions report what they recognize through [`DocumentBuilder`]. All
//! callbacks default to doing nothing so a builder only implements the events
//! it cares about.

/// Receiver of the structure recognized by the grammar.
pub trait DocumentBuilder {
    fn start_sequence(&mut self) {}
    fn end_sequence(&mut self) {}
    fn start_mapping(&mut self) {}
    fn end_mapping(&mut self) {}
    /// A complete scalar value.
    fn add_scalar(&mut self, _value: &str) {}
    /// `&name`, applying to the next node.
    fn add_anchor(&mut self, _name: &str) {}
    /// `*name`, a reference to an earlier anchored node.
    fn add_alias(&mut self, _name: &str) {}
    /// A single character of scalar content.
    fn add_atom(&mut self, _atom: char) {}
    /// A tag, applying to the next node.
    fn add_property(&mut self, _property: &str) {}
}

/// A recorded builder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartSequence,
    EndSequence,
    StartMapping,
    EndMapping,
    Scalar(String),
    Anchor(String),
    Alias(String),
    Atom(char),
    Property(String),
}

impl Event {
    /// Send this event to `builder`.
    pub fn apply(&self, builder: &mut dyn DocumentBuilder) {
        match self {
            Self::StartSequence => builder.start_sequence(),
            Self::EndSequence => builder.end_sequence(),
            Self::StartMapping => builder.start_mapping(),
            Self::EndMapping => builder.end_mapping(),
            Self::Scalar(value) => builder.add_scalar(value),
            Self::Anchor(name) => builder.add_anchor(name),
            Self::Alias(name) => builder.add_alias(name),
            Self::Atom(atom) => builder.add_atom(*atom),
            Self::Property(property) => builder.add_property(property),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBuilder;

impl DocumentBuilder for NullBuilder {}

/// Records events so they can be replayed once the producer commits.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayBuilder {
    events: Vec<Event>,
}

impl ReplayBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Forward all recorded events to `target`, in order.
    pub fn replay(&self, target: &mut dyn DocumentBuilder) {
        for event in &self.events {
            event.apply(target);
        }
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DocumentBuilder for ReplayBuilder {
    fn start_sequence(&mut self) {
        self.events.push(Event::StartSequence);
    }

    fn end_sequence(&mut self) {
        self.events.push(Event::EndSequence);
    }

    fn start_mapping(&mut self) {
        self.events.push(Event::StartMapping);
    }

    fn end_mapping(&mut self) {
        self.events.push(Event::EndMapping);
    }

    fn add_scalar(&mut self, value: &str) {
        self.events.push(Event::Scalar(value.to_owned()));
    }

    fn add_anchor(&mut self, name: &str) {
        self.events.push(Event::Anchor(name.to_owned()));
    }

    fn add_alias(&mut self, name: &str) {
        self.events.push(Event::Alias(name.to_owned()));
    }

    fn add_atom(&mut self, atom: char) {
        self.events.push(Event::Atom(atom));
    }

    fn add_property(&mut self, property: &str) {
        self.events.push(Event::Property(property.to_owned()));
    }
}

/// Collects atoms into a string, ignoring everything else.
///
/// Scalar productions run their content through a `TextBuilder` and report
/// the collected text as a single scalar.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextBuilder {
    text: String,
}

impl TextBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { text: String::new() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl DocumentBuilder for TextBuilder {
    fn add_atom(&mut self, atom: char) {
        self.text.push(atom);
    }
}

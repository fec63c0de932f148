// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! A YAML 1.2 parser written directly from the grammar productions.
//!
//! Every numbered production of the YAML 1.2 grammar is a function in
//! [`grammar`], built from the combinators in [`clause`]. Productions read
//! and scope the grammar parameters (indentation, block/flow context,
//! chomping) through a [`Context`] and report what they recognize to a
//! [`DocumentBuilder`]. A failed production leaves stream and state exactly
//! as it found them, so alternatives can be tried freely.
//!
//! # Example
//!
//! ```
//! use kyaml::{Parser, path};
//!
//! let input = "
//! name: kyaml
//! tags: [yaml, parser]
//! ---
//! second: document
//! ";
//!
//! let mut parser = Parser::from_str(input);
//! let first = parser.parse().unwrap().unwrap();
//! assert_eq!(first.leaf_value(path!["name"]).unwrap(), "kyaml");
//! assert_eq!(first.leaf_value(path!["tags", 1]).unwrap(), "parser");
//!
//! let second = parser.parse().unwrap().unwrap();
//! assert!(second.has_leaf(path!["second"]));
//! assert!(parser.parse().unwrap().is_none());
//! ```

pub mod builder;
pub mod clause;
pub mod context;
mod error;
pub mod grammar;
mod node;
mod node_builder;
mod parser;
mod span;
pub mod stream;

pub use builder::{DocumentBuilder, Event, NullBuilder, ReplayBuilder, TextBuilder};
pub use clause::Clause;
pub use context::{BlockFlow, Chomp, Context, State};
pub use error::{ErrorKind, ParseError, QueryError};
pub use node::{
    BINARY_TAG, BOOL_TAG, FLOAT_TAG, FromScalar, INT_TAG, NULL_TAG, Node, NodeKind, NodeVisitor, PathStep, STR_TAG,
};
pub use node_builder::NodeBuilder;
pub use parser::{PEEK_WIDTH, Parser, parse, parse_all, validate};
pub use span::Span;
pub use stream::{CharStream, EncodingError, Mark};

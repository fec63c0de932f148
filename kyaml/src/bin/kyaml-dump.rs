// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Reads YAML from stdin and prints every document as an indented tree.

use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use kyaml::{Node, Parser};

/// Collections that fit on one line: scalars and empty collections.
fn inline(node: &Node) -> Option<String> {
    match node {
        Node::Scalar { value, .. } => Some(value.replace('\n', "\\n")),
        Node::Sequence(_) | Node::Mapping(_) if node.is_empty() => Some(node.to_string()),
        Node::Sequence(_) | Node::Mapping(_) => None,
    }
}

fn dump(node: &Node, depth: usize, out: &mut String) -> std::fmt::Result {
    let pad = "  ".repeat(depth);
    match node {
        Node::Sequence(items) if !items.is_empty() => {
            for item in items {
                match inline(item) {
                    Some(text) => writeln!(out, "{pad}- {text}")?,
                    None => {
                        writeln!(out, "{pad}-")?;
                        dump(item, depth + 1, out)?;
                    }
                }
            }
        }
        Node::Mapping(entries) if !entries.is_empty() => {
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            for key in keys {
                let Some(value) = entries.get(key) else { continue };
                match inline(value) {
                    Some(text) => writeln!(out, "{pad}{key}: {text}")?,
                    None => {
                        writeln!(out, "{pad}{key}:")?;
                        dump(value, depth + 1, out)?;
                    }
                }
            }
        }
        _ => writeln!(out, "{pad}{}", inline(node).unwrap_or_default())?,
    }
    Ok(())
}

fn run() -> Result<String, String> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input).map_err(|err| err.to_string())?;

    let mut out = String::new();
    for (index, document) in Parser::from_bytes(&input).enumerate() {
        let document = document.map_err(|err| err.to_string())?;
        if index > 0 {
            out.push_str("---\n");
        }
        dump(&document, 0, &mut out).map_err(|err| err.to_string())?;
    }
    Ok(out)
}

fn main() -> ExitCode {
    match run() {
        Ok(text) => {
            if io::stdout().lock().write_all(text.as_bytes()).is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            log::debug!("{message}");
            // stderr carries a fixed marker only; details go to the log.
            let _ = io::stderr().lock().write_all(b"error\n");
            ExitCode::FAILURE
        }
    }
}

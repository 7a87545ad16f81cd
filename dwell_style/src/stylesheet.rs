// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line-oriented stylesheet parsing into a [`StyleTree`].
//!
//! A stylesheet is a sequence of class blocks:
//!
//! ```text
//! // Comments take a whole line.
//! base
//! {
//!     AnimationDuration = 0.2
//! }
//!
//! keyboard : base {
//!     KeyboardKeySelectionDuration = 1.5
//!     MarkColor = 0x00FF0080
//! }
//! ```
//!
//! Spaces and tabs are insignificant anywhere, including inside values.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use tracing::debug;

use crate::error::StyleError;
use crate::key::{Assignment, PropertyKey};
use crate::tree::{BASE_STYLE_CLASS, StyleTree};

/// What went wrong while parsing a stylesheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StylesheetErrorKind {
    /// A class header was not followed by `{`.
    ExpectedOpenBrace,
    /// A `}` appeared outside of a class block.
    UnexpectedCloseBrace,
    /// The input ended inside a class block.
    MissingCloseBrace,
    /// A class header with an empty class or parent name.
    MalformedHeader,
    /// A line inside a block that is not `key=value`.
    MalformedProperty(String),
    /// The tree rejected a class or a value.
    Style(StyleError),
}

/// Error returned by [`parse_stylesheet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StylesheetError {
    /// One-based line number of the offending line.
    pub line: usize,
    /// The failure.
    pub kind: StylesheetErrorKind,
}

impl fmt::Display for StylesheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stylesheet line {}: ", self.line)?;
        match &self.kind {
            StylesheetErrorKind::ExpectedOpenBrace => f.write_str("`{` expected but not found"),
            StylesheetErrorKind::UnexpectedCloseBrace => f.write_str("`}` outside of a class"),
            StylesheetErrorKind::MissingCloseBrace => f.write_str("`}` expected but not found"),
            StylesheetErrorKind::MalformedHeader => f.write_str("malformed class header"),
            StylesheetErrorKind::MalformedProperty(line) => {
                write!(f, "cannot parse property line `{line}`")
            }
            StylesheetErrorKind::Style(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for StylesheetError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            StylesheetErrorKind::Style(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Outer,
    NameRead,
    Inner,
}

/// One class block, checked against the tree but not applied yet.
#[derive(Debug)]
struct Block {
    line: usize,
    name: String,
    parent: Option<String>,
    assignments: Vec<Assignment>,
}

/// Parses `source` into `tree` and returns the number of class blocks read.
///
/// Classes missing from the tree are added under their named parent, or under
/// `base`. Blocks for existing classes update their values. The whole sheet is
/// checked before anything is applied, so on error the tree is unchanged.
pub fn parse_stylesheet(tree: &mut StyleTree, source: &str) -> Result<usize, StylesheetError> {
    let blocks = read_blocks(tree, source)?;
    let count = blocks.len();
    for block in blocks {
        let class = match tree.fetch_style_class(&block.name) {
            Some(class) => class,
            None => tree
                .add_style_class(&block.name, block.parent.as_deref())
                .map_err(|err| StylesheetError {
                    line: block.line,
                    kind: StylesheetErrorKind::Style(err),
                })?,
        };
        for assignment in block.assignments {
            class.assign(assignment);
        }
    }
    Ok(count)
}

fn read_blocks(tree: &StyleTree, source: &str) -> Result<Vec<Block>, StylesheetError> {
    let mut state = State::Outer;
    let mut blocks: Vec<Block> = Vec::new();
    // Classes this sheet adds, with their effective parent.
    let mut added: HashMap<String, String> = HashMap::new();
    let mut last_line = 0;

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;
        last_line = line_number;
        let line: String = raw.chars().filter(|c| !matches!(c, ' ' | '\t' | '\r')).collect();
        let fail = |kind| StylesheetError {
            line: line_number,
            kind,
        };
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        match state {
            State::Outer => {
                if line == "}" {
                    return Err(fail(StylesheetErrorKind::UnexpectedCloseBrace));
                }
                let (header, opened) = match line.strip_suffix('{') {
                    Some(header) => (header, true),
                    None => (line.as_str(), false),
                };
                let (name, parent) = match header.split_once(':') {
                    Some((name, parent)) => (name, Some(parent)),
                    None => (header, None),
                };
                if name.is_empty() || parent.is_some_and(str::is_empty) {
                    return Err(fail(StylesheetErrorKind::MalformedHeader));
                }
                check_class(tree, &mut added, name, parent)
                    .map_err(|err| fail(StylesheetErrorKind::Style(err)))?;
                debug!(class = name, line = line_number, "stylesheet class block");
                blocks.push(Block {
                    line: line_number,
                    name: name.into(),
                    parent: parent.map(String::from),
                    assignments: Vec::new(),
                });
                state = if opened { State::Inner } else { State::NameRead };
            }
            State::NameRead => {
                if line != "{" {
                    return Err(fail(StylesheetErrorKind::ExpectedOpenBrace));
                }
                state = State::Inner;
            }
            State::Inner => {
                if line == "}" {
                    state = State::Outer;
                    continue;
                }
                let Some((key, value)) = line.split_once('=') else {
                    return Err(fail(StylesheetErrorKind::MalformedProperty(line.clone())));
                };
                let assignment = PropertyKey::from_name(key)
                    .ok_or_else(|| StyleError::UnknownProperty(key.into()))
                    .and_then(|key| key.parse_assignment(value))
                    .map_err(|err| fail(StylesheetErrorKind::Style(err)))?;
                if let Some(block) = blocks.last_mut() {
                    block.assignments.push(assignment);
                }
            }
        }
    }

    match state {
        State::Outer => Ok(blocks),
        State::NameRead => Err(StylesheetError {
            line: last_line,
            kind: StylesheetErrorKind::ExpectedOpenBrace,
        }),
        State::Inner => Err(StylesheetError {
            line: last_line,
            kind: StylesheetErrorKind::MissingCloseBrace,
        }),
    }
}

/// Checks a class header against the tree and the classes added before it.
fn check_class(
    tree: &StyleTree,
    added: &mut HashMap<String, String>,
    name: &str,
    parent: Option<&str>,
) -> Result<(), StyleError> {
    let current = if let Some(existing) = tree.fetch_style_class(name) {
        existing
            .parent()
            .map_or_else(String::new, |p| String::from(p.name()))
    } else if let Some(current) = added.get(name) {
        current.clone()
    } else {
        let parent = parent.unwrap_or(BASE_STYLE_CLASS);
        if tree.fetch_style_class(parent).is_none() && !added.contains_key(parent) {
            return Err(StyleError::UnknownParent(parent.into()));
        }
        added.insert(name.into(), parent.into());
        return Ok(());
    };
    match parent {
        Some(requested) if requested != current => Err(StyleError::ParentMismatch {
            class: name.into(),
            existing: current,
            requested: requested.into(),
        }),
        _ => Ok(()),
    }
}

/// Lists every key name a stylesheet accepts, for tooling and diagnostics.
#[must_use]
pub fn property_names() -> Vec<&'static str> {
    PropertyKey::all().map(PropertyKey::name).collect()
}

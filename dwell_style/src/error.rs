// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use alloc::string::String;
use core::fmt;

use crate::key::PropertyKey;

/// Error returned when a style tree or class cannot be configured as asked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleError {
    /// No class with this name exists in the tree.
    UnknownClass(String),
    /// The named parent class does not exist.
    UnknownParent(String),
    /// A class with this name already exists.
    DuplicateClass(String),
    /// An existing class was redeclared under a different parent.
    ParentMismatch {
        /// The class being redeclared.
        class: String,
        /// The parent it actually has.
        existing: String,
        /// The parent named by the redeclaration.
        requested: String,
    },
    /// No property with this name exists.
    UnknownProperty(String),
    /// The textual value could not be parsed for the key.
    MalformedValue {
        /// The key being set.
        key: PropertyKey,
        /// The rejected text.
        value: String,
    },
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownClass(name) => write!(f, "unknown style class `{name}`"),
            Self::UnknownParent(name) => write!(f, "unknown parent style class `{name}`"),
            Self::DuplicateClass(name) => write!(f, "style class `{name}` already exists"),
            Self::ParentMismatch {
                class,
                existing,
                requested,
            } => write!(
                f,
                "style class `{class}` has parent `{existing}`, cannot redeclare it under `{requested}`"
            ),
            Self::UnknownProperty(name) => write!(f, "unknown style property `{name}`"),
            Self::MalformedValue { key, value } => {
                write!(f, "malformed value `{value}` for style property `{key}`")
            }
        }
    }
}

impl core::error::Error for StyleError {}

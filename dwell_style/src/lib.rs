// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dwell Style: a style class cascade for gaze-driven widgets.
//!
//! Every widget reads its timing, color, and sound settings from a
//! [`StyleClass`]. Classes form a tree. A class either owns a property cell or
//! shares the cell of the closest ancestor that owns it, so a change at any
//! node is visible to all descendants that have not overridden the key.
//!
//! ## Cascade
//!
//! ```rust
//! use dwell_style::{FloatProperty, StyleTree};
//!
//! let mut tree = StyleTree::new();
//! let child = tree.add_style_class("child", None).unwrap();
//!
//! child.set_value(FloatProperty::AnimationDuration, 0.5);
//!
//! // Created after the override, still sees it.
//! let grandchild = tree.add_style_class("grandchild", Some("child")).unwrap();
//!
//! assert_eq!(tree.root().get_value(FloatProperty::AnimationDuration), 0.1);
//! assert_eq!(grandchild.get_value(FloatProperty::AnimationDuration), 0.5);
//! ```
//!
//! Values are coerced by a per-key constraint when stored. Durations cannot go
//! negative, alphas stay within `[0, 1]`:
//!
//! ```rust
//! use dwell_style::{FloatProperty, StyleClassBuilder};
//!
//! let root = StyleClassBuilder::new().build();
//! root.set_value(FloatProperty::DimAlpha, 3.0);
//! assert_eq!(root.get_value(FloatProperty::DimAlpha), 1.0);
//! ```
//!
//! ## Stylesheets
//!
//! [`parse_stylesheet`] fills a [`StyleTree`] from text:
//!
//! ```rust
//! use dwell_style::{ColorProperty, StyleTree, parse_stylesheet};
//!
//! let mut tree = StyleTree::new();
//! parse_stylesheet(&mut tree, "
//!     editor : base
//!     {
//!         FontColor = FF0000FF
//!     }
//! ").unwrap();
//!
//! let editor = tree.instantiate_style_class("editor");
//! assert_eq!(editor.get_value(ColorProperty::FontColor).components, [1.0, 0.0, 0.0, 1.0]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Handles are reference counted and
//! single threaded.

#![no_std]

extern crate alloc;

mod class;
mod error;
mod key;
mod property;
mod stylesheet;
mod tree;

pub use class::{StyleClass, StyleClassBuilder};
pub use error::StyleError;
pub use key::{ColorProperty, FloatProperty, PropertyKey, StringProperty, StyleKey};
pub use property::{
    Constraint, StyleClassId, StyleProperty, at_least, clamped, unconstrained, unit_color,
};
pub use stylesheet::{StylesheetError, StylesheetErrorKind, parse_stylesheet, property_names};
pub use tree::{BASE_STYLE_CLASS, StyleTree};

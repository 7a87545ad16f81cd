// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dwell Flow: flow text layout for gaze-driven widgets.
//!
//! A [`TextFlow`] breaks its content into [`FlowEntity`]s (words, marks, and
//! space runs) and fills them greedily into lines of a fixed width. Each
//! entity consists of one or more [`FlowPart`]s; a word that is wider than the
//! flow is bisected into parts that fit, and any entity may continue on the
//! next line.
//!
//! Spaces at the start and end of a line collapse to zero width. With
//! [`Alignment::Justify`] the remaining spaces stretch so that every line but
//! the last of a paragraph spans the full width:
//!
//! ```rust
//! use dwell_flow::{Alignment, FixedAdvanceFont, FlowParams, TextFlow};
//!
//! let params = FlowParams::new().with_alignment(Alignment::Justify);
//! let mut flow = TextFlow::new(FixedAdvanceFont::new(10.0, 20.0), params, "aa bb cc dd");
//! flow.transform_and_size(0, 0, 75, 100).unwrap();
//!
//! // "aa bb" fills the first line, its space grows from 10 to 35 pixels.
//! let first_space = flow.flow_entity(1).unwrap();
//! assert_eq!(first_space.parts()[0].width(), 35.0);
//! assert_eq!(flow.flow_entity(3).unwrap().y(), 0);
//! assert_eq!(flow.flow_entity(4).unwrap().y(), 20);
//! ```
//!
//! Glyph metrics come from a [`GlyphProvider`]. [`FixedAdvanceFont`] is a
//! deterministic provider for grids and tests; with the `skrifa` feature,
//! `SkrifaFont` reads metrics from font files.
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library.
//! - `libm`: Float math through `libm` for `no_std` targets.
//! - `skrifa`: Enable `SkrifaFont`.

#![no_std]

extern crate alloc;

mod entity;
mod flow;
mod glyph;
mod layout;
#[cfg(feature = "skrifa")]
mod skrifa_font;

pub use entity::{FlowEntity, FlowEntityKind, FlowPart, LetterOffsets, MARKS};
pub use flow::TextFlow;
pub use glyph::{FixedAdvanceFont, FontSize, GlyphMetrics, GlyphProvider};
pub use layout::{
    Alignment, FlowLayout, FlowParams, FlowPosition, LayoutError, VerticalAlignment, layout,
};
#[cfg(feature = "skrifa")]
pub use skrifa_font::SkrifaFont;

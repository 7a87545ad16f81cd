// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dwell Text Edit: a caret over flow text, and a gaze-driven text edit.
//!
//! [`TextCursor`] addresses the laid-out entities of a
//! [`TextFlow`](dwell_flow::TextFlow) by entity, part, and letter. It moves
//! over letters and words, inserts and deletes at the caret, and finds its
//! place again after the flow was laid out anew.
//!
//! ```rust
//! use dwell_flow::{FixedAdvanceFont, FlowParams, TextFlow};
//! use dwell_text_edit::TextCursor;
//!
//! let mut flow = TextFlow::new(FixedAdvanceFont::new(10.0, 20.0), FlowParams::new(), "ab cd");
//! flow.transform_and_size(0, 0, 200, 100).unwrap();
//!
//! let mut cursor = TextCursor::new();
//! cursor.move_to_start(&flow);
//! cursor.move_words(&flow, 1);
//! cursor.insert(&mut flow, "e").unwrap();
//! assert_eq!(flow.text(), "ab cde");
//! assert_eq!(cursor.active_entity_content(&flow), "cde");
//! ```
//!
//! [`TextEdit`] combines a flow, a cursor, and a
//! [`StyleClass`](dwell_style::StyleClass) into a widget core that activates
//! words under the gaze, scrolls, and reports what to draw.
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library.
//! - `libm`: Float math through `libm` for `no_std` targets.

#![no_std]

extern crate alloc;

mod cursor;
mod edit;
mod lerp;

pub use cursor::TextCursor;
pub use edit::{CURSOR_PULSE_DURATION, CURSOR_RELATIVE_WIDTH, GazeInput, TextEdit};
pub use lerp::LerpValue;

// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gaze-driven text edit.

use alloc::string::String;
use alloc::vec::Vec;
use core::f32::consts::TAU;

use dwell_flow::{
    Alignment, FlowEntityKind, FlowParams, FontSize, GlyphProvider, TextFlow, VerticalAlignment,
};
use dwell_style::{ColorProperty, FloatProperty, StyleClass};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `cos`
use kurbo::{Point, Rect};
use peniko::Color;
use tracing::warn;

use crate::cursor::TextCursor;
use crate::lerp::LerpValue;

/// Seconds for one full pulse of the caret.
pub const CURSOR_PULSE_DURATION: f32 = 1.0;

/// Caret width relative to the width of a space.
pub const CURSOR_RELATIVE_WIDTH: f64 = 0.1;

/// Gaze sample for one frame, in the coordinates of the embedder.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GazeInput {
    /// Horizontal gaze coordinate.
    pub gaze_x: f64,
    /// Vertical gaze coordinate.
    pub gaze_y: f64,
}

impl GazeInput {
    /// Creates a gaze sample.
    #[must_use]
    pub const fn new(gaze_x: f64, gaze_y: f64) -> Self {
        Self { gaze_x, gaze_y }
    }
}

/// A text edit that activates words by gaze and scrolls while looked at.
///
/// The text is justified and grows below the rectangle; looking below the
/// centre scrolls down and looking above scrolls up. Timing and colors are
/// read from the style class every frame.
///
/// Relayout failures never escape: they are logged and the previous state
/// stays in place.
///
/// ```rust
/// use dwell_flow::{FixedAdvanceFont, FontSize};
/// use dwell_style::StyleTree;
/// use dwell_text_edit::{GazeInput, TextEdit};
///
/// let tree = StyleTree::new();
/// let style = tree.instantiate_style_class("base");
/// let mut edit = TextEdit::new(FixedAdvanceFont::new(10.0, 20.0), FontSize::Medium, style, "ab cd");
/// edit.transform_and_size(0, 0, 200, 100);
/// assert_eq!(edit.active_entity_content(), "cd");
///
/// // Looking at the first word activates it.
/// edit.update(0.016, &GazeInput::new(5.0, 5.0));
/// assert_eq!(edit.active_entity_content(), "ab");
/// ```
pub struct TextEdit<G> {
    flow: TextFlow<G>,
    cursor: TextCursor,
    style: StyleClass,
    cursor_pulse: f32,
    active_entity_fading: f32,
    text_flow_y_offset: LerpValue,
}

impl<G: GlyphProvider> TextEdit<G> {
    /// Creates a text edit with `text`. Call
    /// [`transform_and_size`](Self::transform_and_size) to lay it out.
    pub fn new(glyphs: G, font_size: FontSize, style: StyleClass, text: &str) -> Self {
        let params = FlowParams::new()
            .with_font_size(font_size)
            .with_alignment(Alignment::Justify)
            .with_vertical_alignment(VerticalAlignment::Top)
            .with_overflow_height(true);
        Self {
            flow: TextFlow::new(glyphs, params, text),
            cursor: TextCursor::new(),
            style,
            cursor_pulse: 0.0,
            active_entity_fading: 0.0,
            text_flow_y_offset: LerpValue::default(),
        }
    }

    /// Moves and resizes the edit. The caret goes to the end of the content.
    pub fn transform_and_size(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if let Err(err) = self.flow.transform_and_size(x, y, width, height) {
            warn!(%err, x, y, width, height, "text edit keeps its previous layout");
            return;
        }
        self.cursor.clear();
        self.move_cursor_to_end();
    }

    /// Advances animations by `tpf` seconds and reacts to the gaze.
    pub fn update(&mut self, tpf: f32, input: &GazeInput) {
        self.cursor_pulse = (self.cursor_pulse + tpf * TAU / CURSOR_PULSE_DURATION) % TAU;

        if self.cursor.active_entity(&self.flow).is_some() {
            let duration = self.style.get_value(FloatProperty::AnimationDuration);
            self.active_entity_fading = (self.active_entity_fading + tpf).min(duration);
        }

        let gaze = Point::new(input.gaze_x, input.gaze_y);
        let height = f64::from(self.flow.height());
        if !self.flow.rect().contains(gaze) || self.flow.flow_height() <= 0 || height <= 0.0 {
            return;
        }

        let flow_x = gaze.x - f64::from(self.flow.x());
        let flow_y = gaze.y - f64::from(self.flow.y());
        let previous_offset = self.text_flow_y_offset();

        // Distance from the centre in [-0.5, 0.5], normalised by the content.
        let mut speed = (flow_y - height / 2.0) / height;
        let content_height = self.scrollable_height();
        if content_height > 0.0 {
            speed *= height / content_height;
        }
        let multiplier = self.style.get_value(FloatProperty::TextEditScrollSpeedMultiplier);
        self.text_flow_y_offset.update(to_f32(speed) * tpf * multiplier);

        let content_y =
            flow_y + f64::from(previous_offset) - f64::from(self.flow.vertical_offset());
        let target = self
            .flow
            .flow_entity_at(flow_x, content_y)
            .filter(|entity| entity.kind() != FlowEntityKind::Space)
            .map(|entity| entity.index());
        if let Some(index) = target {
            if self.cursor.active_entity(&self.flow) != Some(index) {
                self.cursor.set_entity(&self.flow, index, true);
                self.activated();
            }
        }
    }

    /// Replaces the content and moves the caret to its end.
    pub fn set_content(&mut self, text: &str) {
        match self.flow.set_content(text) {
            Ok(()) => self.move_cursor_to_end(),
            Err(err) => warn!(%err, "text edit rejected new content"),
        }
    }

    /// Inserts `text` at the caret, or at the front without one.
    ///
    /// Returns the number of characters inserted.
    pub fn add_content_at_cursor(&mut self, text: &str) -> usize {
        let before = self.cursor.active_entity(&self.flow);
        let result = if self.cursor.position(&self.flow).is_some() {
            self.cursor.insert(&mut self.flow, text)
        } else {
            self.flow.insert_content(0, text).inspect(|&count| {
                self.cursor.set_content_index(&self.flow, count);
            })
        };
        match result {
            Ok(count) => {
                self.track(before);
                count
            }
            Err(err) => {
                warn!(%err, "text edit rejected inserted content");
                0
            }
        }
    }

    /// Deletes letters next to the caret, see [`TextCursor::delete`].
    ///
    /// Returns the number of characters erased.
    pub fn delete_content_at_cursor(&mut self, count: isize) -> usize {
        let before = self.cursor.active_entity(&self.flow);
        match self.cursor.delete(&mut self.flow, count) {
            Ok(erased) => {
                self.track(before);
                erased
            }
            Err(err) => {
                warn!(%err, "text edit rejected deletion");
                0
            }
        }
    }

    /// Moves the caret over `count` letters, rightward if positive.
    pub fn move_cursor_over_letters(&mut self, count: isize) {
        let before = self.cursor.active_entity(&self.flow);
        self.cursor.move_letters(&self.flow, count);
        self.track(before);
    }

    /// Moves the caret over `count` words, rightward if positive.
    pub fn move_cursor_over_words(&mut self, count: isize) {
        let before = self.cursor.active_entity(&self.flow);
        self.cursor.move_words(&self.flow, count);
        self.track(before);
    }

    /// Moves the caret in front of the content.
    pub fn move_cursor_to_start(&mut self) {
        self.cursor.move_to_start(&self.flow);
        self.activated();
    }

    /// Moves the caret behind the content.
    pub fn move_cursor_to_end(&mut self) {
        self.cursor.move_to_end(&self.flow);
        self.activated();
    }
}

impl<G> TextEdit<G> {
    /// The underlying flow.
    #[must_use]
    pub fn flow(&self) -> &TextFlow<G> {
        &self.flow
    }

    /// The caret.
    #[must_use]
    pub fn cursor(&self) -> &TextCursor {
        &self.cursor
    }

    /// The style class.
    #[must_use]
    pub fn style(&self) -> &StyleClass {
        &self.style
    }

    /// The whole content.
    #[must_use]
    pub fn content(&self) -> String {
        self.flow.text()
    }

    /// The content of the active entity, or an empty string.
    #[must_use]
    pub fn active_entity_content(&self) -> String {
        self.cursor.active_entity_content(&self.flow)
    }

    /// Scroll offset of the content in pixels.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "scroll offsets are whole pixels"
    )]
    pub fn text_flow_y_offset(&self) -> i32 {
        let overflow = (self.scrollable_height() - f64::from(self.flow.height())).max(0.0);
        (f64::from(self.text_flow_y_offset.value()) * overflow) as i32
    }

    /// The caret rectangle in the coordinates of the embedder.
    ///
    /// Without an active entity the caret sits at the top left corner.
    #[must_use]
    pub fn caret_rect(&self) -> Rect {
        let local = self
            .cursor
            .position(&self.flow)
            .and_then(|position| self.flow.caret_point(position))
            .unwrap_or(Point::ZERO);
        let origin = self.to_embedder(local);
        let width = (CURSOR_RELATIVE_WIDTH * self.flow.space_width()).max(1.0);
        Rect::from_origin_size(origin, (width, self.flow.line_height()))
    }

    /// Highlight rectangles behind each placed part of the active entity.
    ///
    /// They are grown by the width of a space.
    #[must_use]
    pub fn active_entity_rects(&self) -> Vec<Rect> {
        let Some(entity) = self
            .cursor
            .active_entity(&self.flow)
            .and_then(|index| self.flow.flow_entity(index))
        else {
            return Vec::new();
        };
        let grow = self.flow.space_width() / 2.0;
        entity
            .parts()
            .iter()
            .filter(|part| part.is_placed())
            .map(|part| {
                let local = part.rect(self.flow.line_height());
                let origin = self.to_embedder(local.origin());
                Rect::from_origin_size(origin, local.size()).inflate(grow, grow)
            })
            .collect()
    }

    /// Opacity of the pulsing caret in `[0, 1]`.
    #[must_use]
    pub fn caret_alpha(&self) -> f32 {
        self.cursor_pulse.cos() * 0.5 + 0.5
    }

    /// Opacity of the active entity highlight in `[0, 1]`.
    #[must_use]
    pub fn active_entity_alpha(&self) -> f32 {
        let duration = self.style.get_value(FloatProperty::AnimationDuration);
        if duration > 0.0 {
            (self.active_entity_fading / duration).min(1.0)
        } else {
            1.0
        }
    }

    /// Color of the text.
    #[must_use]
    pub fn font_color(&self) -> Color {
        self.style.get_value(ColorProperty::FontColor)
    }

    /// Color of the active entity highlight.
    #[must_use]
    pub fn mark_color(&self) -> Color {
        self.style.get_value(ColorProperty::MarkColor)
    }

    /// Height that can be scrolled through, with one line extra so that
    /// descenders on the last line stay visible.
    fn scrollable_height(&self) -> f64 {
        f64::from(self.flow.flow_height()) + self.flow.line_height()
    }

    fn to_embedder(&self, local: Point) -> Point {
        Point::new(
            f64::from(self.flow.x()) + local.x,
            f64::from(self.flow.y()) + f64::from(self.flow.vertical_offset()) + local.y
                - f64::from(self.text_flow_y_offset()),
        )
    }

    /// Restarts the highlight fade and shows the caret at full strength.
    fn activated(&mut self) {
        self.active_entity_fading = 0.0;
        self.cursor_pulse = 0.0;
    }

    fn track(&mut self, before: Option<usize>) {
        if self.cursor.active_entity(&self.flow) != before {
            self.activated();
        }
    }
}

impl<G> core::fmt::Debug for TextEdit<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextEdit")
            .field("flow", &self.flow)
            .field("cursor", &self.cursor)
            .field("style", &self.style.name())
            .field("text_flow_y_offset", &self.text_flow_y_offset)
            .finish_non_exhaustive()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "scroll speeds are small and only need f32 precision"
)]
fn to_f32(value: f64) -> f32 {
    value as f32
}

// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text flow container.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ceil`
use kurbo::{Point, Rect};
use tracing::debug;

use crate::entity::FlowEntity;
use crate::glyph::GlyphProvider;
use crate::layout::{
    Alignment, FlowLayout, FlowParams, FlowPosition, LayoutError, VerticalAlignment, layout,
};

/// Content laid out into a rectangle.
///
/// Every change of content or size lays the flow out again. A change that
/// cannot be laid out is rejected as a whole: the previous content, size, and
/// layout stay in place and the error is returned.
///
/// A flow starts out with a zero-sized rectangle and no layout. Call
/// [`transform_and_size`](Self::transform_and_size) before reading entities.
/// Until the first layout succeeds, content and parameter changes are stored
/// as they are and laid out by the next `transform_and_size`.
///
/// ```rust
/// use dwell_flow::{FixedAdvanceFont, FlowEntityKind, FlowParams, TextFlow};
///
/// let mut flow = TextFlow::new(FixedAdvanceFont::new(10.0, 20.0), FlowParams::new(), "ab cd");
/// flow.transform_and_size(0, 0, 200, 100).unwrap();
///
/// let kinds: Vec<_> = flow.layout().entities().iter().map(|e| e.kind()).collect();
/// assert_eq!(kinds, [FlowEntityKind::Word, FlowEntityKind::Space, FlowEntityKind::Word]);
/// assert_eq!(flow.content(0, flow.content_len()), "ab cd");
/// ```
pub struct TextFlow<G> {
    glyphs: G,
    params: FlowParams,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    content: Vec<char>,
    layout: FlowLayout,
    generation: u64,
}

impl<G: GlyphProvider> TextFlow<G> {
    /// Creates a flow holding `text`. Line endings are normalised to `'\n'`.
    pub fn new(glyphs: G, params: FlowParams, text: &str) -> Self {
        Self {
            glyphs,
            params,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            content: normalize(text),
            layout: FlowLayout::default(),
            generation: 0,
        }
    }

    /// Moves and resizes the flow and lays it out again.
    pub fn transform_and_size(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), LayoutError> {
        self.commit(None, width, height)?;
        self.x = x;
        self.y = y;
        Ok(())
    }

    /// Replaces the whole content.
    pub fn set_content(&mut self, text: &str) -> Result<(), LayoutError> {
        self.replace_content(normalize(text))
    }

    /// Inserts `text` in front of character `index`, clamped to the content.
    ///
    /// Returns the number of characters inserted.
    pub fn insert_content(&mut self, index: usize, text: &str) -> Result<usize, LayoutError> {
        let inserted = normalize(text);
        let count = inserted.len();
        let index = index.min(self.content.len());
        let mut content = Vec::with_capacity(self.content.len() + count);
        content.extend_from_slice(&self.content[..index]);
        content.extend(inserted);
        content.extend_from_slice(&self.content[index..]);
        self.replace_content(content)?;
        Ok(count)
    }

    /// Erases `count` characters starting at `index`, clamped to the content.
    ///
    /// Returns the number of characters erased.
    pub fn erase_content(&mut self, index: usize, count: usize) -> Result<usize, LayoutError> {
        let start = index.min(self.content.len());
        let end = start.saturating_add(count).min(self.content.len());
        if start == end {
            return Ok(0);
        }
        let mut content = self.content.clone();
        content.drain(start..end);
        self.replace_content(content)?;
        Ok(end - start)
    }

    /// Changes the parameters and lays the flow out again.
    pub fn set_params(&mut self, params: FlowParams) -> Result<(), LayoutError> {
        let previous = core::mem::replace(&mut self.params, params);
        if self.generation == 0 {
            return Ok(());
        }
        self.commit(None, self.width, self.height).inspect_err(|_| {
            self.params = previous;
        })
    }

    fn replace_content(&mut self, content: Vec<char>) -> Result<(), LayoutError> {
        if self.generation == 0 {
            // Not laid out yet; there is no size to check the content against.
            self.content = content;
            return Ok(());
        }
        self.commit(Some(content), self.width, self.height)
    }

    fn commit(
        &mut self,
        content: Option<Vec<char>>,
        width: i32,
        height: i32,
    ) -> Result<(), LayoutError> {
        let chars = content.as_deref().unwrap_or(&self.content);
        let result = layout(chars, &self.params, width, height, &self.glyphs);
        let layout = match result {
            Ok(layout) => layout,
            Err(err) => {
                debug!(%err, width, height, "relayout rejected");
                return Err(err);
            }
        };
        if let Some(content) = content {
            self.content = content;
        }
        self.width = width;
        self.height = height;
        self.layout = layout;
        self.generation += 1;
        debug!(
            entities = self.layout.entities().len(),
            flow_width = self.layout.flow_width(),
            flow_height = self.layout.flow_height(),
            generation = self.generation,
            "text flow laid out"
        );
        Ok(())
    }
}

impl<G> TextFlow<G> {
    /// The current layout.
    #[must_use]
    #[inline]
    pub fn layout(&self) -> &FlowLayout {
        &self.layout
    }

    /// Counts successful layouts. Starts at `0` before the first one.
    #[must_use]
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The parameters.
    #[must_use]
    #[inline]
    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    /// The glyph provider.
    #[must_use]
    #[inline]
    pub fn glyphs(&self) -> &G {
        &self.glyphs
    }

    /// The flow rectangle in the coordinates of the embedder.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    /// Left edge.
    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Width budget.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height budget.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of characters.
    #[must_use]
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// Whole content as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.content.iter().collect()
    }

    /// Up to `count` characters from `start`, clamped to the content.
    #[must_use]
    pub fn content(&self, start: usize, count: usize) -> String {
        let start = start.min(self.content.len());
        let end = start.saturating_add(count).min(self.content.len());
        self.content[start..end].iter().collect()
    }

    /// Number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.layout.entities().len()
    }

    /// Returns the entity at `index`.
    #[must_use]
    pub fn flow_entity(&self, index: usize) -> Option<&FlowEntity> {
        self.layout.entities().get(index)
    }

    /// Returns the entity under a flow-local point.
    #[must_use]
    pub fn flow_entity_at(&self, x: f64, y: f64) -> Option<&FlowEntity> {
        let index = self.layout.entity_at(x, y)?;
        self.flow_entity(index)
    }

    /// Width of the longest line.
    #[must_use]
    pub fn flow_width(&self) -> i32 {
        self.layout.flow_width()
    }

    /// Height of all lines.
    #[must_use]
    pub fn flow_height(&self) -> i32 {
        self.layout.flow_height()
    }

    /// Scaled line height.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.layout.line_height()
    }

    /// Natural width of a space.
    #[must_use]
    pub fn space_width(&self) -> f64 {
        self.layout.space_width()
    }

    /// Offset from the top of the rectangle to the first line.
    #[must_use]
    pub fn vertical_offset(&self) -> i32 {
        let free = self.height - self.layout.flow_height();
        match self.params.vertical_alignment {
            VerticalAlignment::Top => 0,
            VerticalAlignment::Center => (free / 2).max(0),
            VerticalAlignment::Bottom => free.max(0),
        }
    }

    /// See [`FlowLayout::content_index`].
    #[must_use]
    pub fn content_index(&self, position: FlowPosition) -> Option<usize> {
        self.layout.content_index(position)
    }

    /// See [`FlowLayout::locate`].
    #[must_use]
    pub fn locate(&self, index: usize) -> Option<FlowPosition> {
        self.layout.locate(index)
    }

    /// Flow-local top of the caret drawn at `position`.
    ///
    /// A caret behind a paragraph break sits at the start of the next line.
    #[must_use]
    pub fn caret_point(&self, position: FlowPosition) -> Option<Point> {
        let entity = self.flow_entity(position.entity)?;
        let part = entity.part(position.part)?;
        if entity.is_paragraph_break() && position.letter >= 0 {
            if let Some(next) = self.flow_entity(position.entity + 1) {
                if next.is_placed() {
                    return Some(Point::new(f64::from(next.x()), f64::from(next.y())));
                }
            }
            let x = match self.params.alignment {
                Alignment::Left | Alignment::Justify => 0.0,
                Alignment::Center => f64::from(self.width) / 2.0,
                Alignment::Right => f64::from(self.width),
            };
            let line = part.line() + 1;
            return Some(Point::new(x, (line as f64 * self.line_height()).ceil()));
        }
        let offset = usize::try_from(position.letter + 1).ok()?;
        let dx = *part.letter_offsets().get(offset)?;
        Some(Point::new(f64::from(part.x()) + dx, f64::from(part.y())))
    }
}

impl<G> core::fmt::Debug for TextFlow<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextFlow")
            .field("params", &self.params)
            .field("rect", &self.rect())
            .field("content_len", &self.content.len())
            .field("entities", &self.layout.entities().len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Converts `"\r\n"` and lone `'\r'` to `'\n'`.
fn normalize(text: &str) -> Vec<char> {
    let mut chars = Vec::with_capacity(text.len());
    let mut iter = text.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\r' {
            if iter.peek() == Some(&'\n') {
                iter.next();
            }
            chars.push('\n');
        } else {
            chars.push(ch);
        }
    }
    chars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::FixedAdvanceFont;

    fn flow(text: &str, width: i32) -> TextFlow<FixedAdvanceFont> {
        let mut flow = TextFlow::new(FixedAdvanceFont::new(10.0, 20.0), FlowParams::new(), text);
        flow.transform_and_size(5, 7, width, 200).unwrap();
        flow
    }

    #[test]
    fn line_endings_are_normalised() {
        assert_eq!(normalize("a\r\nb\rc\n"), ['a', '\n', 'b', '\n', 'c', '\n']);
    }

    #[test]
    fn content_is_clamped() {
        let flow = flow("hello", 100);
        assert_eq!(flow.content(1, 3), "ell");
        assert_eq!(flow.content(3, 100), "lo");
        assert_eq!(flow.content(10, 1), "");
        assert_eq!(flow.rect(), Rect::new(5.0, 7.0, 105.0, 207.0));
    }

    #[test]
    fn insert_and_erase() {
        let mut flow = flow("ab cd", 200);
        assert_eq!(flow.insert_content(2, "x"), Ok(1));
        assert_eq!(flow.text(), "abx cd");
        assert_eq!(flow.erase_content(0, 2), Ok(2));
        assert_eq!(flow.text(), "x cd");
        assert_eq!(flow.erase_content(3, 10), Ok(1));
        assert_eq!(flow.text(), "x c");
        assert_eq!(flow.erase_content(9, 1), Ok(0));
        assert_eq!(flow.insert_content(99, "!"), Ok(1));
        assert_eq!(flow.text(), "x c!");
    }

    #[test]
    fn vertical_alignment_offsets() {
        let mut flow = flow("ab", 100);
        assert_eq!(flow.vertical_offset(), 0);
        let params = flow.params().with_vertical_alignment(VerticalAlignment::Center);
        flow.set_params(params).unwrap();
        assert_eq!(flow.vertical_offset(), 90);
        let params = flow.params().with_vertical_alignment(VerticalAlignment::Bottom);
        flow.set_params(params).unwrap();
        assert_eq!(flow.vertical_offset(), 180);
    }

    #[test]
    fn caret_points() {
        let flow = flow("ab\ncd", 100);
        // ab, break, cd
        assert_eq!(
            flow.caret_point(FlowPosition::new(0, 0, -1)),
            Some(Point::new(0.0, 0.0))
        );
        assert_eq!(
            flow.caret_point(FlowPosition::new(0, 0, 1)),
            Some(Point::new(20.0, 0.0))
        );
        assert_eq!(
            flow.caret_point(FlowPosition::new(1, 0, 0)),
            Some(Point::new(0.0, 20.0))
        );
        assert_eq!(
            flow.caret_point(FlowPosition::new(2, 0, 0)),
            Some(Point::new(10.0, 20.0))
        );
    }

    #[test]
    fn hit_testing() {
        let flow = flow("ab cd", 200);
        assert_eq!(flow.flow_entity_at(5.0, 5.0).map(FlowEntity::index), Some(0));
        assert_eq!(flow.flow_entity_at(25.0, 5.0).map(FlowEntity::index), Some(1));
        assert_eq!(flow.flow_entity_at(45.0, 19.0).map(FlowEntity::index), Some(2));
        assert!(flow.flow_entity_at(45.0, 25.0).is_none());
        assert!(flow.flow_entity_at(120.0, 5.0).is_none());
    }
}

// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line filling of flow entities.
//!
//! Layout runs in three passes:
//!
//! 1. Content is split into paragraphs at `'\n'` and each paragraph into
//!    entities. Words wider than the flow are bisected into parts that fit.
//! 2. Lines are filled part by part. A part that does not fit ends the line
//!    and the rest of its entity continues on the next one.
//! 3. Spaces at the edges of a line collapse to zero width, the remaining
//!    spaces take the justified or natural width, and parts get positions.

use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ceil`
use smallvec::{SmallVec, smallvec};
use tracing::warn;

use crate::entity::{FlowEntity, FlowEntityKind, FlowPart, LetterOffsets};
use crate::glyph::{FontSize, GlyphProvider};

/// Horizontal alignment of lines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Lines start at the left edge.
    #[default]
    Left,
    /// Lines end at the right edge.
    Right,
    /// Lines are centered.
    Center,
    /// Spaces stretch so that lines fill the width, except the last line of
    /// each paragraph.
    Justify,
}

/// Vertical placement of the laid-out text inside the flow rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// Text starts at the top.
    #[default]
    Top,
    /// Text is centered vertically.
    Center,
    /// Text ends at the bottom.
    Bottom,
}

/// Parameters of a text flow.
///
/// ```rust
/// use dwell_flow::{Alignment, FlowParams, FontSize};
///
/// let params = FlowParams::new()
///     .with_font_size(FontSize::Small)
///     .with_alignment(Alignment::Justify)
///     .with_overflow_height(true);
/// assert_eq!(params.scale, 1.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowParams {
    /// Size tier passed to the glyph provider.
    pub font_size: FontSize,
    /// Horizontal line alignment.
    pub alignment: Alignment,
    /// Vertical placement inside the flow rectangle.
    pub vertical_alignment: VerticalAlignment,
    /// Factor applied to every glyph advance and to the line height.
    pub scale: f64,
    /// Whether lines may continue below the height budget.
    pub overflow_height: bool,
}

impl FlowParams {
    /// Medium, left aligned, top aligned, unscaled, clipped at the height.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            font_size: FontSize::Medium,
            alignment: Alignment::Left,
            vertical_alignment: VerticalAlignment::Top,
            scale: 1.0,
            overflow_height: false,
        }
    }

    /// Sets the font size tier.
    #[must_use]
    pub const fn with_font_size(mut self, font_size: FontSize) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the horizontal alignment.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the vertical alignment.
    #[must_use]
    pub const fn with_vertical_alignment(mut self, vertical_alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = vertical_alignment;
        self
    }

    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Allows lines below the height budget.
    #[must_use]
    pub const fn with_overflow_height(mut self, overflow_height: bool) -> Self {
        self.overflow_height = overflow_height;
        self
    }
}

impl Default for FlowParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned when content cannot be laid out in the given width.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A single character of a word is wider than the flow.
    GlyphTooWide {
        /// Content index of the character.
        index: usize,
        /// Width budget in pixels.
        width: i32,
    },
    /// A line could not take even its first part, e.g. a mark or a space
    /// wider than the flow.
    LineOverflow {
        /// Content index of the first character that did not fit.
        index: usize,
        /// Width budget in pixels.
        width: i32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlyphTooWide { index, width } => write!(
                f,
                "character at {index} is wider than the flow width of {width}px"
            ),
            Self::LineOverflow { index, width } => write!(
                f,
                "no part starting at character {index} fits into a line of {width}px"
            ),
        }
    }
}

impl core::error::Error for LayoutError {}

/// A caret position inside the entities of a layout.
///
/// `letter` is the index of the letter the caret sits behind, or `-1` for
/// the position in front of the first letter of the part.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlowPosition {
    /// Entity index.
    pub entity: usize,
    /// Part index within the entity.
    pub part: usize,
    /// Letter index within the part, `-1` for in front of it.
    pub letter: isize,
}

impl FlowPosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(entity: usize, part: usize, letter: isize) -> Self {
        Self {
            entity,
            part,
            letter,
        }
    }
}

/// Result of laying out content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowLayout {
    entities: Vec<FlowEntity>,
    flow_width: i32,
    flow_height: i32,
    line_count: usize,
    space_width: f64,
    line_height: f64,
    content_len: usize,
}

impl FlowLayout {
    /// The entities in content order.
    #[must_use]
    #[inline]
    pub fn entities(&self) -> &[FlowEntity] {
        &self.entities
    }

    /// Width of the longest line, rounded up.
    #[must_use]
    #[inline]
    pub fn flow_width(&self) -> i32 {
        self.flow_width
    }

    /// Height of all placed lines, rounded up.
    #[must_use]
    #[inline]
    pub fn flow_height(&self) -> i32 {
        self.flow_height
    }

    /// Number of placed lines.
    #[must_use]
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Natural width of a space.
    #[must_use]
    #[inline]
    pub fn space_width(&self) -> f64 {
        self.space_width
    }

    /// Scaled line height.
    #[must_use]
    #[inline]
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Number of characters laid out.
    #[must_use]
    #[inline]
    pub fn content_len(&self) -> usize {
        self.content_len
    }

    /// Returns the index of the entity whose placed part contains the point.
    ///
    /// Coordinates are flow local. Collapsed spaces are never hit.
    #[must_use]
    pub fn entity_at(&self, x: f64, y: f64) -> Option<usize> {
        let point = kurbo::Point::new(x, y);
        self.entities
            .iter()
            .find(|entity| {
                entity
                    .parts
                    .iter()
                    .any(|part| part.placed && part.rect(self.line_height).contains(point))
            })
            .map(FlowEntity::index)
    }

    /// Converts a position into the content index of the caret.
    ///
    /// The caret index counts the characters in front of the caret. Returns
    /// `None` for positions outside of the entities.
    #[must_use]
    pub fn content_index(&self, position: FlowPosition) -> Option<usize> {
        let entity = self.entities.get(position.entity)?;
        let part = entity.parts.get(position.part)?;
        let letter = usize::try_from(position.letter + 1).ok()?;
        if letter > part.letter_count() {
            return None;
        }
        Some(entity.part_content_start(position.part) + letter)
    }

    /// Converts a caret content index into a position.
    ///
    /// Index `0` is in front of the first letter. Any other index resolves to
    /// the position right behind character `index - 1`. Returns `None` if
    /// there are no entities or the index is past the content.
    #[must_use]
    pub fn locate(&self, index: usize) -> Option<FlowPosition> {
        if self.entities.is_empty() || index > self.content_len {
            return None;
        }
        if index == 0 {
            return Some(FlowPosition::new(0, 0, -1));
        }
        let behind = index - 1;
        let entity = self
            .entities
            .partition_point(|entity| entity.content_start <= behind)
            .checked_sub(1)?;
        let mut start = self.entities[entity].content_start;
        for (part_index, part) in self.entities[entity].parts.iter().enumerate() {
            let count = part.letter_count();
            if behind < start + count {
                let letter = isize::try_from(behind - start).ok()?;
                return Some(FlowPosition::new(entity, part_index, letter));
            }
            start += count;
        }
        None
    }
}

/// Lays out `content` into lines of at most `width` pixels.
///
/// Lines are produced while they fit into `height`, or without limit if
/// [`FlowParams::overflow_height`] is set. Entities beyond the last line keep
/// position `(0, 0)` and are not placed.
pub fn layout<G: GlyphProvider + ?Sized>(
    content: &[char],
    params: &FlowParams,
    width: i32,
    height: i32,
    glyphs: &G,
) -> Result<FlowLayout, LayoutError> {
    let measure = Measure::new(glyphs, params);
    let space_width = measure.advance(' ');
    let line_height = glyphs.line_height(params.font_size) * params.scale;

    let (mut entities, paragraphs) = segment(content, width, space_width, &measure)?;

    let mut filler = LineFiller {
        entities: &mut entities,
        params,
        width,
        height,
        space_width,
        line_height,
        line_count: 0,
        flow_width: 0,
    };
    for paragraph in paragraphs {
        filler.fill_paragraph(paragraph)?;
    }
    let line_count = filler.line_count;
    let flow_width = filler.flow_width;

    Ok(FlowLayout {
        entities,
        flow_width,
        flow_height: to_pixels(line_count as f64 * line_height).max(0),
        line_count,
        space_width,
        line_height,
        content_len: content.len(),
    })
}

/// Scaled glyph advances.
struct Measure<'a, G: ?Sized> {
    glyphs: &'a G,
    font_size: FontSize,
    scale: f64,
}

impl<'a, G: GlyphProvider + ?Sized> Measure<'a, G> {
    fn new(glyphs: &'a G, params: &FlowParams) -> Self {
        Self {
            glyphs,
            font_size: params.font_size,
            scale: params.scale,
        }
    }

    fn advance(&self, ch: char) -> f64 {
        match self.glyphs.glyph(self.font_size, ch) {
            Some(glyph) => glyph.advance * self.scale,
            None => {
                warn!(?ch, font_size = ?self.font_size, "glyph missing, using zero width");
                0.0
            }
        }
    }
}

fn offsets_from(advances: &[f64]) -> LetterOffsets {
    let mut offsets = LetterOffsets::with_capacity(advances.len() + 1);
    let mut pen = 0.0;
    offsets.push(pen);
    for advance in advances {
        pen += advance;
        offsets.push(pen);
    }
    offsets
}

/// Splits content into entities. Returns the entities and the entity range
/// of each paragraph.
fn segment<G: GlyphProvider + ?Sized>(
    content: &[char],
    width: i32,
    space_width: f64,
    measure: &Measure<'_, G>,
) -> Result<(Vec<FlowEntity>, Vec<Range<usize>>), LayoutError> {
    let mut entities = Vec::new();
    let mut paragraphs = Vec::new();
    let mut advances: Vec<f64> = Vec::new();
    let mut index = 0;

    loop {
        let first = entities.len();
        let paragraph_end = content[index..]
            .iter()
            .position(|&ch| ch == '\n')
            .map_or(content.len(), |offset| index + offset);

        while index < paragraph_end {
            let kind = FlowEntityKind::classify(content[index]);
            let mut entity = FlowEntity::new(kind, entities.len(), index);
            let run_end = match kind {
                FlowEntityKind::Mark => index + 1,
                FlowEntityKind::Word | FlowEntityKind::Space => content[index..paragraph_end]
                    .iter()
                    .position(|&ch| FlowEntityKind::classify(ch) != kind)
                    .map_or(paragraph_end, |offset| index + offset),
            };
            match kind {
                FlowEntityKind::Space => {
                    for _ in index..run_end {
                        entity.parts.push(FlowPart::new(smallvec![0.0, space_width]));
                    }
                }
                FlowEntityKind::Mark => {
                    let advance = measure.advance(content[index]);
                    entity.parts.push(FlowPart::new(smallvec![0.0, advance]));
                }
                FlowEntityKind::Word => {
                    advances.clear();
                    advances.extend(content[index..run_end].iter().map(|&ch| measure.advance(ch)));
                    for range in fit_word(&advances, width).map_err(|offset| {
                        LayoutError::GlyphTooWide {
                            index: index + offset,
                            width,
                        }
                    })? {
                        entity.parts.push(FlowPart::new(offsets_from(&advances[range])));
                    }
                }
            }
            entities.push(entity);
            index = run_end;
        }

        if paragraph_end == content.len() {
            paragraphs.push(first..entities.len());
            break;
        }

        let mut paragraph_break =
            FlowEntity::new(FlowEntityKind::Space, entities.len(), paragraph_end);
        paragraph_break.paragraph_break = true;
        let mut part = FlowPart::new(smallvec![0.0, 0.0]);
        part.collapsed = true;
        paragraph_break.parts.push(part);
        entities.push(paragraph_break);
        paragraphs.push(first..entities.len());
        index = paragraph_end + 1;
    }

    Ok((entities, paragraphs))
}

/// Bisects a word until every piece fits into `width`.
///
/// On failure returns the offset of the character that is too wide on its
/// own.
fn fit_word(advances: &[f64], width: i32) -> Result<Vec<Range<usize>>, usize> {
    let max = f64::from(width);
    let mut fitted = Vec::new();
    let mut pending: SmallVec<[Range<usize>; 16]> = smallvec![0..advances.len()];
    while let Some(range) = pending.pop() {
        let piece: f64 = advances[range.clone()].iter().sum();
        if piece <= max {
            fitted.push(range);
            continue;
        }
        if range.len() == 1 {
            return Err(range.start);
        }
        let middle = range.start + range.len() / 2;
        pending.push(middle..range.end);
        pending.push(range.start..middle);
    }
    Ok(fitted)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates of a flow fit into i32"
)]
fn to_pixels(value: f64) -> i32 {
    value.ceil() as i32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pen positions are truncated to whole pixels"
)]
fn truncate(value: f64) -> i32 {
    value as i32
}

struct LineFiller<'a> {
    entities: &'a mut [FlowEntity],
    params: &'a FlowParams,
    width: i32,
    height: i32,
    space_width: f64,
    line_height: f64,
    line_count: usize,
    flow_width: i32,
}

/// Entities of one line. Parts run from `initial_part` in the first entity
/// to `end_part` in the last one.
struct Line {
    entities: SmallVec<[usize; 16]>,
    initial_part: usize,
    end_part: usize,
}

impl Line {
    fn part_range(&self, position: usize, part_count: usize) -> Range<usize> {
        let start = if position == 0 { self.initial_part } else { 0 };
        let end = if position + 1 == self.entities.len() {
            self.end_part + 1
        } else {
            part_count
        };
        start..end
    }
}

impl LineFiller<'_> {
    fn has_room_for_line(&self) -> bool {
        self.params.overflow_height
            || (self.line_count + 1) as f64 * self.line_height <= f64::from(self.height)
    }

    fn fill_paragraph(&mut self, paragraph: Range<usize>) -> Result<(), LayoutError> {
        let width = f64::from(self.width);
        let mut entity = paragraph.start;
        let mut next_part = 0;
        let mut has_next = entity < paragraph.end;

        while has_next && self.has_room_for_line() {
            let mut line = Line {
                entities: SmallVec::new(),
                initial_part: next_part,
                end_part: 0,
            };
            let mut line_width = 0.0;
            let mut space_left = line_width < width;

            while has_next && space_left {
                let current = &self.entities[entity];
                let part_count = current.parts.len();
                let mut part = if line.entities.is_empty() {
                    line.initial_part
                } else {
                    0
                };
                let mut added = false;
                while part < part_count && line_width + current.parts[part].width <= width {
                    added = true;
                    line_width += current.parts[part].width;
                    line.end_part = part;
                    part += 1;
                }
                let current_index = entity;
                if part == part_count {
                    next_part = 0;
                    entity += 1;
                } else {
                    next_part = part;
                    space_left = false;
                }
                if added {
                    line.entities.push(current_index);
                }
                has_next = entity < paragraph.end;
            }

            if line.entities.is_empty() {
                return Err(LayoutError::LineOverflow {
                    index: self.entities[entity].part_content_start(next_part),
                    width: self.width,
                });
            }

            self.flow_width = self.flow_width.max(to_pixels(line_width));
            self.collapse_edges(&line);
            self.place_line(&line, has_next);
            self.line_count += 1;
        }
        Ok(())
    }

    fn collapse_edges(&mut self, line: &Line) {
        let count = line.entities.len();
        let front = line.entities[0];
        if self.entities[front].kind == FlowEntityKind::Space {
            let range = line.part_range(0, self.entities[front].parts.len());
            for part in &mut self.entities[front].parts[range] {
                part.collapsed = true;
            }
        }
        if count > 1 {
            let mut back = count - 1;
            // Spaces in front of a paragraph break end the line as well.
            if self.entities[line.entities[back]].paragraph_break && back > 1 {
                back -= 1;
            }
            for position in back..count {
                let index = line.entities[position];
                if self.entities[index].kind != FlowEntityKind::Space {
                    continue;
                }
                let range = line.part_range(position, self.entities[index].parts.len());
                for part in &mut self.entities[index].parts[range] {
                    part.collapsed = true;
                }
            }
        }
    }

    fn place_line(&mut self, line: &Line, has_next: bool) {
        let mut non_space_width = 0.0;
        let mut drawn_spaces = 0_usize;
        for (position, &index) in line.entities.iter().enumerate() {
            let entity = &self.entities[index];
            let range = line.part_range(position, entity.parts.len());
            for part in &entity.parts[range] {
                match entity.kind {
                    FlowEntityKind::Space if !part.collapsed => drawn_spaces += 1,
                    FlowEntityKind::Space => {}
                    FlowEntityKind::Word | FlowEntityKind::Mark => non_space_width += part.width,
                }
            }
        }

        let width = f64::from(self.width);
        let mut space = self.space_width;
        if self.params.alignment == Alignment::Justify
            && has_next
            && line.entities.len() > 1
            && drawn_spaces > 0
        {
            space = (width - non_space_width) / drawn_spaces as f64;
        }
        let line_width = non_space_width + drawn_spaces as f64 * space;
        let x_offset = match self.params.alignment {
            Alignment::Left | Alignment::Justify => 0.0,
            Alignment::Right => width - line_width,
            Alignment::Center => (width - line_width) / 2.0,
        };

        let y = to_pixels(self.line_count as f64 * self.line_height);
        let mut pen = x_offset;
        for (position, &index) in line.entities.iter().enumerate() {
            let entity = &mut self.entities[index];
            if !entity.placed {
                entity.x = truncate(pen);
                entity.y = y;
                entity.placed = true;
            }
            let kind = entity.kind;
            let range = line.part_range(position, entity.parts.len());
            for part in &mut entity.parts[range] {
                if kind == FlowEntityKind::Space {
                    part.width = if part.collapsed { 0.0 } else { space };
                    part.offsets = smallvec![0.0, part.width];
                }
                part.x = truncate(pen);
                part.y = y;
                part.line = self.line_count;
                part.placed = true;
                pen += part.width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::glyph::FixedAdvanceFont;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn bisection_keeps_order() {
        let advances = [10.0; 7];
        let ranges = fit_word(&advances, 30).unwrap();
        assert_eq!(ranges, vec![0..3, 3..5, 5..7]);
        assert_eq!(fit_word(&[10.0, 50.0], 30), Err(1));
    }

    #[test]
    fn single_line_positions() {
        let font = FixedAdvanceFont::new(10.0, 20.0);
        let params = FlowParams::new();
        let layout = layout(&chars("ab, cd"), &params, 200, 100, &font).unwrap();
        let kinds: Vec<_> = layout.entities().iter().map(FlowEntity::kind).collect();
        assert_eq!(
            kinds,
            [
                FlowEntityKind::Word,
                FlowEntityKind::Mark,
                FlowEntityKind::Space,
                FlowEntityKind::Word
            ]
        );
        let xs: Vec<_> = layout.entities().iter().map(FlowEntity::x).collect();
        assert_eq!(xs, [0, 20, 30, 40]);
        assert_eq!(layout.flow_width(), 60);
        assert_eq!(layout.flow_height(), 20);
        assert_eq!(layout.line_count(), 1);
    }

    #[test]
    fn right_and_center_offsets() {
        let font = FixedAdvanceFont::new(10.0, 20.0);
        let right = FlowParams::new().with_alignment(Alignment::Right);
        let layout_right = layout(&chars("ab"), &right, 100, 100, &font).unwrap();
        assert_eq!(layout_right.entities()[0].x(), 80);
        let center = FlowParams::new().with_alignment(Alignment::Center);
        let layout_center = layout(&chars("ab"), &center, 100, 100, &font).unwrap();
        assert_eq!(layout_center.entities()[0].x(), 40);
    }

    #[test]
    fn height_budget_stops_lines() {
        let font = FixedAdvanceFont::new(10.0, 20.0);
        let params = FlowParams::new();
        // Three lines of "aaa" in a 40px wide flow, only two fit into 50px.
        let layout = layout(&chars("aaa aaa aaa"), &params, 40, 50, &font).unwrap();
        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.flow_height(), 40);
        let last = layout.entities().last().unwrap();
        assert!(!last.is_placed());
        assert_eq!((last.x(), last.y()), (0, 0));

        let params = params.with_overflow_height(true);
        let layout = super::layout(&chars("aaa aaa aaa"), &params, 40, 50, &font).unwrap();
        assert_eq!(layout.line_count(), 3);
        assert_eq!(layout.flow_height(), 60);
    }

    #[test]
    fn locate_and_content_index() {
        let font = FixedAdvanceFont::new(10.0, 20.0);
        let layout = layout(&chars("ab cd"), &FlowParams::new(), 200, 100, &font).unwrap();
        assert_eq!(layout.locate(0), Some(FlowPosition::new(0, 0, -1)));
        assert_eq!(layout.locate(2), Some(FlowPosition::new(0, 0, 1)));
        assert_eq!(layout.locate(3), Some(FlowPosition::new(1, 0, 0)));
        assert_eq!(layout.locate(5), Some(FlowPosition::new(2, 0, 1)));
        assert_eq!(layout.locate(6), None);
        for index in 0..=5 {
            let position = layout.locate(index).unwrap();
            assert_eq!(layout.content_index(position), Some(index));
        }
        assert_eq!(layout.content_index(FlowPosition::new(0, 0, 2)), None);
        assert_eq!(layout.content_index(FlowPosition::new(3, 0, 0)), None);
    }

    #[test]
    fn scale_applies_to_advances_and_line_height() {
        let font = FixedAdvanceFont::new(10.0, 20.0);
        let params = FlowParams::new().with_scale(0.5);
        let layout = layout(&chars("ab cd"), &params, 200, 100, &font).unwrap();
        assert_eq!(layout.space_width(), 5.0);
        assert_eq!(layout.line_height(), 10.0);
        assert_eq!(layout.entities()[2].x(), 15);
    }
}

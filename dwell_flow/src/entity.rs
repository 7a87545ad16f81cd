// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Laid-out words, marks, and spaces.

use alloc::vec::Vec;

use kurbo::Rect;
use smallvec::SmallVec;

/// Horizontal letter offsets of a part, starting at `0`.
pub type LetterOffsets = SmallVec<[f64; 8]>;

/// Classification of a run of content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FlowEntityKind {
    /// A maximal run of letters that are neither marks nor whitespace.
    Word,
    /// A single punctuation character.
    Mark,
    /// A run of whitespace, one part per character.
    Space,
}

/// Punctuation that forms its own single-letter entity.
pub const MARKS: [char; 13] = ['.', ':', ',', ';', '-', '_', '?', '!', '/', '\\', '´', '¸', '"'];

impl FlowEntityKind {
    /// Classifies a single character. `'\n'` is handled by the layout.
    #[must_use]
    pub fn classify(ch: char) -> Self {
        if ch.is_whitespace() {
            Self::Space
        } else if MARKS.contains(&ch) {
            Self::Mark
        } else {
            Self::Word
        }
    }
}

/// A horizontal piece of an entity that sits on a single line.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowPart {
    pub(crate) width: f64,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) line: usize,
    pub(crate) offsets: LetterOffsets,
    pub(crate) collapsed: bool,
    pub(crate) placed: bool,
}

impl FlowPart {
    pub(crate) fn new(offsets: LetterOffsets) -> Self {
        let width = offsets.last().copied().unwrap_or(0.0);
        Self {
            width,
            x: 0,
            y: 0,
            line: 0,
            offsets,
            collapsed: false,
            placed: false,
        }
    }

    /// Width in pixels. Collapsed spaces are `0` wide.
    #[must_use]
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Left edge in flow-local pixels.
    #[must_use]
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Top edge in flow-local pixels.
    #[must_use]
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Zero-based line this part was placed on.
    #[must_use]
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Number of characters in this part.
    #[must_use]
    #[inline]
    pub fn letter_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Offsets of each letter boundary relative to [`x`](Self::x).
    ///
    /// There are `letter_count() + 1` entries; the first is `0` and the last
    /// is the width.
    #[must_use]
    #[inline]
    pub fn letter_offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Whether this space was collapsed at a line edge.
    #[must_use]
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether the part fell inside the height budget and got a position.
    #[must_use]
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// The rectangle covered by this part for a given line height.
    #[must_use]
    pub fn rect(&self, line_height: f64) -> Rect {
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        Rect::new(x, y, x + self.width, y + line_height)
    }
}

/// A word, mark, or space run and its parts.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEntity {
    pub(crate) kind: FlowEntityKind,
    pub(crate) index: usize,
    pub(crate) content_start: usize,
    pub(crate) parts: Vec<FlowPart>,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) placed: bool,
    pub(crate) paragraph_break: bool,
}

impl FlowEntity {
    pub(crate) fn new(kind: FlowEntityKind, index: usize, content_start: usize) -> Self {
        Self {
            kind,
            index,
            content_start,
            parts: Vec::new(),
            x: 0,
            y: 0,
            placed: false,
            paragraph_break: false,
        }
    }

    /// The classification of this entity.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> FlowEntityKind {
        self.kind
    }

    /// Position of this entity in the flow.
    #[must_use]
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the first character of this entity in the content.
    #[must_use]
    #[inline]
    pub fn content_start(&self) -> usize {
        self.content_start
    }

    /// Index one past the last character of this entity in the content.
    #[must_use]
    pub fn content_end(&self) -> usize {
        self.content_start + self.letter_count()
    }

    /// Total number of characters over all parts.
    #[must_use]
    pub fn letter_count(&self) -> usize {
        self.parts.iter().map(FlowPart::letter_count).sum()
    }

    /// The parts in reading order. Never empty.
    #[must_use]
    #[inline]
    pub fn parts(&self) -> &[FlowPart] {
        &self.parts
    }

    /// Returns the part at `index`.
    #[must_use]
    pub fn part(&self, index: usize) -> Option<&FlowPart> {
        self.parts.get(index)
    }

    /// Content index of the first character of part `part`.
    #[must_use]
    pub fn part_content_start(&self, part: usize) -> usize {
        self.content_start
            + self.parts[..part.min(self.parts.len())]
                .iter()
                .map(FlowPart::letter_count)
                .sum::<usize>()
    }

    /// Left edge of the first part in flow-local pixels.
    #[must_use]
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Top edge of the first part in flow-local pixels.
    #[must_use]
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Whether any part got a position.
    #[must_use]
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Whether this is the zero-width entity standing for a `'\n'`.
    #[must_use]
    #[inline]
    pub fn is_paragraph_break(&self) -> bool {
        self.paragraph_break
    }
}

// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph metrics providers.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;

use kurbo::Rect;

/// Font size tier of a text flow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontSize {
    /// Headings.
    Tall,
    /// Body text.
    #[default]
    Medium,
    /// Annotations.
    Small,
    /// Keyboard key captions.
    Keyboard,
}

/// Metrics of a single glyph at a given size tier, in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal pen advance.
    pub advance: f64,
    /// Ink bounds relative to the pen position on the baseline.
    pub bounds: Rect,
}

/// Source of glyph metrics for layout.
///
/// Layout only needs advances and a line height. Rendering is left to the
/// embedder.
pub trait GlyphProvider {
    /// Returns the metrics of `ch`, or `None` if the font has no glyph for it.
    fn glyph(&self, size: FontSize, ch: char) -> Option<GlyphMetrics>;

    /// Returns the distance between two baselines.
    fn line_height(&self, size: FontSize) -> f64;
}

impl<T: GlyphProvider + ?Sized> GlyphProvider for &T {
    fn glyph(&self, size: FontSize, ch: char) -> Option<GlyphMetrics> {
        (**self).glyph(size, ch)
    }

    fn line_height(&self, size: FontSize) -> f64 {
        (**self).line_height(size)
    }
}

impl<T: GlyphProvider + ?Sized> GlyphProvider for Rc<T> {
    fn glyph(&self, size: FontSize, ch: char) -> Option<GlyphMetrics> {
        (**self).glyph(size, ch)
    }

    fn line_height(&self, size: FontSize) -> f64 {
        (**self).line_height(size)
    }
}

/// A deterministic font where every glyph has the same advance.
///
/// Individual characters can get their own advance or be marked missing.
/// The metrics do not depend on the size tier.
///
/// ```rust
/// use dwell_flow::{FixedAdvanceFont, FontSize, GlyphProvider};
///
/// let font = FixedAdvanceFont::new(10.0, 20.0).with_advance('i', 4.0).without('€');
///
/// assert_eq!(font.glyph(FontSize::Medium, 'a').unwrap().advance, 10.0);
/// assert_eq!(font.glyph(FontSize::Medium, 'i').unwrap().advance, 4.0);
/// assert!(font.glyph(FontSize::Medium, '€').is_none());
/// assert_eq!(font.line_height(FontSize::Tall), 20.0);
/// ```
#[derive(Clone, Debug)]
pub struct FixedAdvanceFont {
    advance: f64,
    line_height: f64,
    overrides: BTreeMap<char, f64>,
    missing: BTreeSet<char>,
}

impl FixedAdvanceFont {
    /// Creates a font with a uniform advance and line height.
    #[must_use]
    pub fn new(advance: f64, line_height: f64) -> Self {
        Self {
            advance,
            line_height,
            overrides: BTreeMap::new(),
            missing: BTreeSet::new(),
        }
    }

    /// Gives `ch` its own advance.
    #[must_use]
    pub fn with_advance(mut self, ch: char, advance: f64) -> Self {
        self.missing.remove(&ch);
        self.overrides.insert(ch, advance);
        self
    }

    /// Marks `ch` as missing from the font.
    #[must_use]
    pub fn without(mut self, ch: char) -> Self {
        self.overrides.remove(&ch);
        self.missing.insert(ch);
        self
    }
}

impl GlyphProvider for FixedAdvanceFont {
    fn glyph(&self, _size: FontSize, ch: char) -> Option<GlyphMetrics> {
        if self.missing.contains(&ch) {
            return None;
        }
        let advance = self.overrides.get(&ch).copied().unwrap_or(self.advance);
        Some(GlyphMetrics {
            advance,
            bounds: Rect::new(0.0, -self.line_height, advance, 0.0),
        })
    }

    fn line_height(&self, _size: FontSize) -> f64 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_through_references() {
        let font = Rc::new(FixedAdvanceFont::new(8.0, 16.0));
        let by_ref: &dyn GlyphProvider = &font;
        assert_eq!(by_ref.line_height(FontSize::Small), 16.0);
        let nested = &&font;
        assert_eq!(nested.glyph(FontSize::Small, 'x').unwrap().advance, 8.0);
    }

    #[test]
    fn override_then_remove() {
        let font = FixedAdvanceFont::new(8.0, 16.0)
            .without('x')
            .with_advance('x', 2.0);
        assert_eq!(font.glyph(FontSize::Medium, 'x').unwrap().advance, 2.0);
        let font = font.without('x');
        assert!(font.glyph(FontSize::Medium, 'x').is_none());
    }
}

// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph metrics from font data through `skrifa`.

use kurbo::Rect;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics as OutlineMetrics;
use skrifa::raw::ReadError;
use skrifa::{FontRef, MetadataProvider};

use crate::glyph::{FontSize, GlyphMetrics, GlyphProvider};

/// A [`GlyphProvider`] reading advances and vertical metrics from a font.
///
/// Each [`FontSize`] tier maps to a pixel size. Metrics use the default
/// variation location and no hinting.
#[derive(Clone)]
pub struct SkrifaFont<'a> {
    font: FontRef<'a>,
    pixel_sizes: [f32; 4],
}

impl<'a> SkrifaFont<'a> {
    /// Parses `data` as a font file or the first font of a collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Ok(Self {
            font: FontRef::new(data)?,
            pixel_sizes: [48.0, 32.0, 24.0, 40.0],
        })
    }

    /// Sets the pixel size used for `size`.
    #[must_use]
    pub fn with_pixel_size(mut self, size: FontSize, px: f32) -> Self {
        self.pixel_sizes[tier(size)] = px;
        self
    }

    /// Returns the pixel size used for `size`.
    #[must_use]
    pub fn pixel_size(&self, size: FontSize) -> f32 {
        self.pixel_sizes[tier(size)]
    }
}

fn tier(size: FontSize) -> usize {
    match size {
        FontSize::Tall => 0,
        FontSize::Medium => 1,
        FontSize::Small => 2,
        FontSize::Keyboard => 3,
    }
}

impl GlyphProvider for SkrifaFont<'_> {
    fn glyph(&self, size: FontSize, ch: char) -> Option<GlyphMetrics> {
        let gid = self.font.charmap().map(ch)?;
        let metrics = OutlineMetrics::new(
            &self.font,
            Size::new(self.pixel_size(size)),
            LocationRef::default(),
        );
        let advance = f64::from(metrics.advance_width(gid)?);
        let bounds = metrics
            .bounds(gid)
            .map(|b| {
                // Font space is y-up.
                Rect::new(
                    f64::from(b.x_min),
                    -f64::from(b.y_max),
                    f64::from(b.x_max),
                    -f64::from(b.y_min),
                )
            })
            .unwrap_or(Rect::ZERO);
        Some(GlyphMetrics { advance, bounds })
    }

    fn line_height(&self, size: FontSize) -> f64 {
        let metrics = self
            .font
            .metrics(Size::new(self.pixel_size(size)), LocationRef::default());
        f64::from(metrics.ascent - metrics.descent + metrics.leading)
    }
}

impl core::fmt::Debug for SkrifaFont<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SkrifaFont")
            .field("pixel_sizes", &self.pixel_sizes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlowParams, TextFlow};

    const MONO: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSansMono.ttf");

    #[test]
    fn rejects_data_that_is_not_a_font() {
        assert!(SkrifaFont::new(&[]).is_err());
        assert!(SkrifaFont::new(b"not a font").is_err());
    }

    #[test]
    fn pixel_sizes_per_tier() {
        let font = SkrifaFont::new(MONO)
            .unwrap()
            .with_pixel_size(FontSize::Small, 12.0);
        assert_eq!(font.pixel_size(FontSize::Small), 12.0);
        assert_eq!(font.pixel_size(FontSize::Medium), 32.0);
        assert_eq!(font.pixel_size(FontSize::Tall), 48.0);
        assert_eq!(font.pixel_size(FontSize::Keyboard), 40.0);
    }

    #[test]
    fn monospace_advances() {
        let font = SkrifaFont::new(MONO).unwrap();
        // 1233 units on a 2048 unit em.
        let a = font.glyph(FontSize::Medium, 'a').unwrap();
        assert_eq!(a.advance, 1233.0 * 32.0 / 2048.0);
        assert_eq!(font.glyph(FontSize::Medium, 'W').unwrap().advance, a.advance);
        assert!(a.bounds.width() > 0.0);
        assert!(a.bounds.y0 < 0.0, "glyph bounds are y-down");

        let tall = font.glyph(FontSize::Tall, 'a').unwrap();
        assert_eq!(tall.advance, a.advance * 1.5);

        assert!(font.glyph(FontSize::Medium, '\u{FFFF}').is_none());
    }

    #[test]
    fn line_height_scales_with_pixel_size() {
        let font = SkrifaFont::new(MONO).unwrap();
        let medium = font.line_height(FontSize::Medium);
        assert!(medium > 32.0 && medium < 48.0, "line height {medium}");
        let font = font.with_pixel_size(FontSize::Medium, 64.0);
        assert_eq!(font.line_height(FontSize::Medium), medium * 2.0);
    }

    #[test]
    fn lays_out_a_flow() {
        let font = SkrifaFont::new(MONO).unwrap();
        let line_height = font.line_height(FontSize::Medium);
        let mut flow = TextFlow::new(font, FlowParams::new(), "ab cd");
        flow.transform_and_size(0, 0, 400, 200).unwrap();
        assert_eq!(flow.entity_count(), 3);
        assert_eq!(flow.line_height(), line_height);
        assert_eq!(flow.layout().line_count(), 1);
    }
}

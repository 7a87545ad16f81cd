// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A scalar that is moved by deltas and kept inside a closed range.
///
/// The text edit uses one in `[0, 1]` for its relative scroll offset.
///
/// ```rust
/// use dwell_text_edit::LerpValue;
///
/// let mut value = LerpValue::new(0.0, 0.0, 1.0);
/// value.update(0.25);
/// assert_eq!(value.value(), 0.25);
/// value.update(5.0);
/// assert_eq!(value.value(), 1.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LerpValue {
    value: f32,
    min: f32,
    max: f32,
}

impl LerpValue {
    /// Creates a value clamped to `[min, max]`.
    ///
    /// The bounds are swapped if given in the wrong order. A NaN bound leaves
    /// that side open, and a NaN value starts out as `0` clamped.
    #[must_use]
    pub fn new(value: f32, min: f32, max: f32) -> Self {
        let min = if min.is_nan() { f32::NEG_INFINITY } else { min };
        let max = if max.is_nan() { f32::INFINITY } else { max };
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mut lerp = Self {
            value: 0.0_f32.clamp(min, max),
            min,
            max,
        };
        lerp.set_value(value);
        lerp
    }

    /// Adds `delta` and clamps. Returns the new value.
    ///
    /// A NaN result leaves the value unchanged.
    pub fn update(&mut self, delta: f32) -> f32 {
        self.set_value(self.value + delta);
        self.value
    }

    /// Sets the value, clamped. NaN is ignored.
    pub fn set_value(&mut self, value: f32) {
        if !value.is_nan() {
            self.value = value.clamp(self.min, self.max);
        }
    }

    /// The current value.
    #[must_use]
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Lower bound.
    #[must_use]
    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }
}

impl Default for LerpValue {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

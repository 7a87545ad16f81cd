// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property keys, their textual names, defaults, and constraints.

use alloc::string::String;
use core::fmt;

use peniko::Color;

use crate::error::StyleError;
use crate::property::{Constraint, at_least, clamped, unconstrained, unit_color};

/// Float-valued properties: durations in seconds, amounts, and multipliers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloatProperty {
    /// Duration of generic element animations.
    AnimationDuration,
    /// Time until a sensor is fully penetrated by the gaze.
    SensorPenetrationIncreaseDuration,
    /// Time until a sensor recovers after the gaze left.
    SensorPenetrationDecreaseDuration,
    /// Dwell time until a button triggers.
    ButtonThresholdIncreaseDuration,
    /// Time until a partially filled button threshold decays.
    ButtonThresholdDecreaseDuration,
    /// Duration of the pressing animation of a button.
    ButtonPressingDuration,
    /// Penetration amount a sensor reports on interaction, in `[0, 1]`.
    SensorInteractionPenetrationAmount,
    /// Time until an element is fully dimmed.
    DimIncreaseDuration,
    /// Time until dimming is gone.
    DimDecreaseDuration,
    /// Opacity of the dim overlay, in `[0, 1]`.
    DimAlpha,
    /// Duration of a flash.
    FlashDuration,
    /// Maximal relative growth of adaptively scaled elements.
    MaximalAdaptiveScaleIncrease,
    /// Time until adaptive scaling reaches its maximum.
    AdaptiveScaleIncreaseDuration,
    /// Time until adaptive scaling is gone.
    AdaptiveScaleDecreaseDuration,
    /// Speed multiplier for keyboard zooming.
    KeyboardZoomSpeedMultiplier,
    /// Dwell time until a key is selected.
    KeyboardKeySelectionDuration,
    /// Speed multiplier for scrolling flows.
    FlowSpeedMultiplier,
    /// Speed multiplier for gaze scrolling inside a text edit.
    TextEditScrollSpeedMultiplier,
    /// Duration of a key press on the experimental predictive keyboard.
    FutureKeyboardPressDuration,
    /// Delay before a predictive keyboard key can trigger again.
    FutureKeyboardRetriggerDelay,
    /// Dwell time until a predictive keyboard key triggers.
    FutureKeyboardThresholdDuration,
    /// Threshold multiplier of the repeat key.
    FutureKeyboardRepeatKeyThresholdMultiplier,
    /// Threshold multiplier of the space key.
    FutureKeyboardSpaceKeyThresholdMultiplier,
    /// Threshold multiplier of the backspace key.
    FutureKeyboardBackspaceKeyThresholdMultiplier,
    /// Threshold multiplier of the suggestion line.
    FutureKeyboardSuggestionLineThresholdMultiplier,
}

impl FloatProperty {
    /// Every float property, in declaration order.
    pub const ALL: [Self; 25] = [
        Self::AnimationDuration,
        Self::SensorPenetrationIncreaseDuration,
        Self::SensorPenetrationDecreaseDuration,
        Self::ButtonThresholdIncreaseDuration,
        Self::ButtonThresholdDecreaseDuration,
        Self::ButtonPressingDuration,
        Self::SensorInteractionPenetrationAmount,
        Self::DimIncreaseDuration,
        Self::DimDecreaseDuration,
        Self::DimAlpha,
        Self::FlashDuration,
        Self::MaximalAdaptiveScaleIncrease,
        Self::AdaptiveScaleIncreaseDuration,
        Self::AdaptiveScaleDecreaseDuration,
        Self::KeyboardZoomSpeedMultiplier,
        Self::KeyboardKeySelectionDuration,
        Self::FlowSpeedMultiplier,
        Self::TextEditScrollSpeedMultiplier,
        Self::FutureKeyboardPressDuration,
        Self::FutureKeyboardRetriggerDelay,
        Self::FutureKeyboardThresholdDuration,
        Self::FutureKeyboardRepeatKeyThresholdMultiplier,
        Self::FutureKeyboardSpaceKeyThresholdMultiplier,
        Self::FutureKeyboardBackspaceKeyThresholdMultiplier,
        Self::FutureKeyboardSuggestionLineThresholdMultiplier,
    ];

    /// Returns the name used in stylesheets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AnimationDuration => "AnimationDuration",
            Self::SensorPenetrationIncreaseDuration => "SensorPenetrationIncreaseDuration",
            Self::SensorPenetrationDecreaseDuration => "SensorPenetrationDecreaseDuration",
            Self::ButtonThresholdIncreaseDuration => "ButtonThresholdIncreaseDuration",
            Self::ButtonThresholdDecreaseDuration => "ButtonThresholdDecreaseDuration",
            Self::ButtonPressingDuration => "ButtonPressingDuration",
            Self::SensorInteractionPenetrationAmount => "SensorInteractionPenetrationAmount",
            Self::DimIncreaseDuration => "DimIncreaseDuration",
            Self::DimDecreaseDuration => "DimDecreaseDuration",
            Self::DimAlpha => "DimAlpha",
            Self::FlashDuration => "FlashDuration",
            Self::MaximalAdaptiveScaleIncrease => "MaximalAdaptiveScaleIncrease",
            Self::AdaptiveScaleIncreaseDuration => "AdaptiveScaleIncreaseDuration",
            Self::AdaptiveScaleDecreaseDuration => "AdaptiveScaleDecreaseDuration",
            Self::KeyboardZoomSpeedMultiplier => "KeyboardZoomSpeedMultiplier",
            Self::KeyboardKeySelectionDuration => "KeyboardKeySelectionDuration",
            Self::FlowSpeedMultiplier => "FlowSpeedMultiplier",
            Self::TextEditScrollSpeedMultiplier => "TextEditScrollSpeedMultiplier",
            Self::FutureKeyboardPressDuration => "FutureKeyboardPressDuration",
            Self::FutureKeyboardRetriggerDelay => "FutureKeyboardRetriggerDelay",
            Self::FutureKeyboardThresholdDuration => "FutureKeyboardThresholdDuration",
            Self::FutureKeyboardRepeatKeyThresholdMultiplier => "FutureKeyboardRepeatKeyThresholdMultiplier",
            Self::FutureKeyboardSpaceKeyThresholdMultiplier => "FutureKeyboardSpaceKeyThresholdMultiplier",
            Self::FutureKeyboardBackspaceKeyThresholdMultiplier => "FutureKeyboardBackspaceKeyThresholdMultiplier",
            Self::FutureKeyboardSuggestionLineThresholdMultiplier => "FutureKeyboardSuggestionLineThresholdMultiplier",
        }
    }

    /// Returns the value used when no class in the tree says otherwise.
    #[must_use]
    pub const fn default_value(self) -> f32 {
        match self {
            Self::AnimationDuration => 0.1,
            Self::SensorPenetrationIncreaseDuration => 3.0,
            Self::SensorPenetrationDecreaseDuration => 1.5,
            Self::ButtonThresholdIncreaseDuration => 1.0,
            Self::ButtonThresholdDecreaseDuration => 2.0,
            Self::ButtonPressingDuration => 0.3,
            Self::SensorInteractionPenetrationAmount => 0.5,
            Self::DimIncreaseDuration => 1.5,
            Self::DimDecreaseDuration => 0.25,
            Self::DimAlpha => 0.5,
            Self::FlashDuration => 2.0,
            Self::MaximalAdaptiveScaleIncrease => 0.5,
            Self::AdaptiveScaleIncreaseDuration => 1.0,
            Self::AdaptiveScaleDecreaseDuration => 1.0,
            Self::KeyboardZoomSpeedMultiplier => 1.0,
            Self::KeyboardKeySelectionDuration => 1.25,
            Self::FlowSpeedMultiplier => 1.0,
            Self::TextEditScrollSpeedMultiplier => 1.0,
            Self::FutureKeyboardPressDuration => 0.5,
            Self::FutureKeyboardRetriggerDelay => 0.5,
            Self::FutureKeyboardThresholdDuration => 1.0,
            Self::FutureKeyboardRepeatKeyThresholdMultiplier => 1.0,
            Self::FutureKeyboardSpaceKeyThresholdMultiplier => 1.0,
            Self::FutureKeyboardBackspaceKeyThresholdMultiplier => 1.0,
            Self::FutureKeyboardSuggestionLineThresholdMultiplier => 1.0,
        }
    }

    /// Returns the constraint a root class installs for this key.
    #[must_use]
    pub fn default_constraint(self) -> Constraint<f32> {
        match self {
            Self::SensorInteractionPenetrationAmount | Self::DimAlpha => clamped(0.0, 1.0),
            _ => at_least(0.0),
        }
    }
}

/// Color-valued properties.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorProperty {
    /// Main element color.
    Color,
    /// Background fill.
    BackgroundColor,
    /// Highlight overlay.
    HighlightColor,
    /// Separators in grids and stacks.
    SeparatorColor,
    /// Selection overlay.
    SelectionColor,
    /// Icon tint.
    IconColor,
    /// Text color.
    FontColor,
    /// Dim overlay color.
    DimColor,
    /// Flash overlay color.
    FlashColor,
    /// Marking, e.g. the active entity of a text edit.
    MarkColor,
    /// Picking feedback.
    PickColor,
    /// Dwell threshold indicator.
    ThresholdColor,
}

impl ColorProperty {
    /// Every color property, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Color,
        Self::BackgroundColor,
        Self::HighlightColor,
        Self::SeparatorColor,
        Self::SelectionColor,
        Self::IconColor,
        Self::FontColor,
        Self::DimColor,
        Self::FlashColor,
        Self::MarkColor,
        Self::PickColor,
        Self::ThresholdColor,
    ];

    /// Returns the name used in stylesheets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::BackgroundColor => "BackgroundColor",
            Self::HighlightColor => "HighlightColor",
            Self::SeparatorColor => "SeparatorColor",
            Self::SelectionColor => "SelectionColor",
            Self::IconColor => "IconColor",
            Self::FontColor => "FontColor",
            Self::DimColor => "DimColor",
            Self::FlashColor => "FlashColor",
            Self::MarkColor => "MarkColor",
            Self::PickColor => "PickColor",
            Self::ThresholdColor => "ThresholdColor",
        }
    }

    /// Returns the value used when no class in the tree says otherwise.
    #[must_use]
    pub const fn default_value(self) -> Color {
        let components = match self {
            Self::Color => [0.6, 0.6, 0.6, 1.0],
            Self::BackgroundColor => [0.0, 0.0, 0.0, 1.0],
            Self::HighlightColor => [1.0, 1.0, 0.0, 0.5],
            Self::SeparatorColor => [0.2, 0.2, 0.2, 1.0],
            Self::SelectionColor => [0.0, 1.0, 1.0, 0.5],
            Self::IconColor | Self::FontColor => [1.0, 1.0, 1.0, 1.0],
            Self::DimColor => [0.1, 0.1, 0.1, 0.75],
            Self::FlashColor => [1.0, 0.5, 0.0, 0.75],
            Self::MarkColor => [0.0, 0.5, 1.0, 0.5],
            Self::PickColor => [0.2, 1.0, 0.0, 0.5],
            Self::ThresholdColor => [0.0, 1.0, 1.0, 0.5],
        };
        Color::new(components)
    }

    /// Returns the constraint a root class installs for this key.
    #[must_use]
    pub fn default_constraint(self) -> Constraint<Color> {
        unit_color()
    }
}

/// String-valued properties, such as sound resource paths.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StringProperty {
    /// Played when a button is hit.
    SoundButtonHit,
    /// Played when a switch goes down.
    SoundButtonDown,
    /// Played when a key is pressed.
    SoundKeyPress,
}

impl StringProperty {
    /// Every string property, in declaration order.
    pub const ALL: [Self; 3] = [Self::SoundButtonHit, Self::SoundButtonDown, Self::SoundKeyPress];

    /// Returns the name used in stylesheets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SoundButtonHit => "SoundButtonHit",
            Self::SoundButtonDown => "SoundButtonDown",
            Self::SoundKeyPress => "SoundKeyPress",
        }
    }
}

/// Any property key, regardless of its value type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKey {
    /// A float property.
    Float(FloatProperty),
    /// A color property.
    Color(ColorProperty),
    /// A string property.
    String(StringProperty),
}

impl PropertyKey {
    /// Iterates over every key of every family.
    pub fn all() -> impl Iterator<Item = Self> {
        FloatProperty::ALL
            .into_iter()
            .map(Self::Float)
            .chain(ColorProperty::ALL.into_iter().map(Self::Color))
            .chain(StringProperty::ALL.into_iter().map(Self::String))
    }

    /// Looks a key up by its stylesheet name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|key| key.name() == name)
    }

    /// Parses `text` as a value for this key without storing it anywhere.
    pub(crate) fn parse_assignment(self, text: &str) -> Result<Assignment, StyleError> {
        let malformed = || StyleError::MalformedValue {
            key: self,
            value: text.into(),
        };
        Ok(match self {
            Self::Float(key) => Assignment::Float(key, parse_float(text).ok_or_else(malformed)?),
            Self::Color(key) => Assignment::Color(key, parse_color(text).ok_or_else(malformed)?),
            Self::String(key) => Assignment::String(key, String::from(text)),
        })
    }

    /// Returns the name used in stylesheets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float(key) => key.name(),
            Self::Color(key) => key.name(),
            Self::String(key) => key.name(),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<FloatProperty> for PropertyKey {
    fn from(key: FloatProperty) -> Self {
        Self::Float(key)
    }
}

impl From<ColorProperty> for PropertyKey {
    fn from(key: ColorProperty) -> Self {
        Self::Color(key)
    }
}

impl From<StringProperty> for PropertyKey {
    fn from(key: StringProperty) -> Self {
        Self::String(key)
    }
}

/// A typed key family.
///
/// Ties each key type to its value type so that
/// [`StyleClass::get_value`](crate::StyleClass::get_value) and
/// [`StyleClass::set_value`](crate::StyleClass::set_value) are checked at
/// compile time.
pub trait StyleKey: Copy + Into<PropertyKey> {
    /// The value stored for keys of this family.
    type Value: Clone + fmt::Debug + 'static;

    /// Value of the static default table.
    fn default_value(self) -> Self::Value;

    /// Constraint installed by a root class.
    fn default_constraint(self) -> Constraint<Self::Value>;
}

impl StyleKey for FloatProperty {
    type Value = f32;

    fn default_value(self) -> f32 {
        Self::default_value(self)
    }

    fn default_constraint(self) -> Constraint<f32> {
        Self::default_constraint(self)
    }
}

impl StyleKey for ColorProperty {
    type Value = Color;

    fn default_value(self) -> Color {
        Self::default_value(self)
    }

    fn default_constraint(self) -> Constraint<Color> {
        Self::default_constraint(self)
    }
}

impl StyleKey for StringProperty {
    type Value = String;

    fn default_value(self) -> String {
        String::new()
    }

    fn default_constraint(self) -> Constraint<String> {
        unconstrained()
    }
}

/// A key paired with an already parsed value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Assignment {
    Float(FloatProperty, f32),
    Color(ColorProperty, Color),
    String(StringProperty, String),
}

/// Parses a float as written in stylesheets.
pub(crate) fn parse_float(text: &str) -> Option<f32> {
    text.trim().parse().ok()
}

/// Parses `RRGGBBAA` or `RRGGBB` hex, optionally prefixed by `#` or `0x`.
pub(crate) fn parse_color(text: &str) -> Option<Color> {
    let text = text.trim();
    let hex = text
        .strip_prefix('#')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgba = match hex.len() {
        8 => u32::from_str_radix(hex, 16).ok()?,
        6 => (u32::from_str_radix(hex, 16).ok()? << 8) | 0xFF,
        _ => return None,
    };
    let [r, g, b, a] = rgba.to_be_bytes();
    Some(Color::from_rgba8(r, g, b, a))
}

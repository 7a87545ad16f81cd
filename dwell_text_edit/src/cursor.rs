// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caret addressing over the entities of a text flow.

use alloc::string::String;

use dwell_flow::{FlowEntity, FlowEntityKind, FlowPosition, GlyphProvider, LayoutError, TextFlow};
use tracing::{debug, trace};

/// A caret over a [`TextFlow`].
///
/// The cursor does not borrow the flow; every operation takes it as an
/// argument. Positions are ordered so that letter `-1` only appears at the
/// start of the flow and at the start of a continuation part. Anywhere else
/// "in front of an entity" is written as "behind the previous entity".
///
/// The cursor remembers the layout generation it was resolved against and
/// the content index of the caret. When the flow has been laid out again in
/// the meantime, the caret is found again by that content index. If the
/// index no longer exists, the caret moves to the start of the flow.
///
/// Without a position, navigation, insertion, and deletion do nothing.
///
/// ```rust
/// use dwell_flow::{FixedAdvanceFont, FlowParams, FlowPosition, TextFlow};
/// use dwell_text_edit::TextCursor;
///
/// let mut flow = TextFlow::new(FixedAdvanceFont::new(10.0, 20.0), FlowParams::new(), "ab cd");
/// flow.transform_and_size(0, 0, 200, 100).unwrap();
///
/// let mut cursor = TextCursor::new();
/// cursor.move_to_end(&flow);
/// assert_eq!(cursor.position(&flow), Some(FlowPosition::new(2, 0, 1)));
///
/// cursor.move_letters(&flow, -3);
/// assert_eq!(cursor.content_index(&flow), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextCursor {
    position: Option<FlowPosition>,
    index: usize,
    generation: u64,
}

impl TextCursor {
    /// Creates a cursor without a position.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: None,
            index: 0,
            generation: 0,
        }
    }

    /// The caret position, resolved against the current layout of `flow`.
    #[must_use]
    pub fn position<G>(&self, flow: &TextFlow<G>) -> Option<FlowPosition> {
        self.resolve(flow).map(|(position, _)| position)
    }

    /// Number of characters in front of the caret.
    #[must_use]
    pub fn content_index<G>(&self, flow: &TextFlow<G>) -> Option<usize> {
        self.resolve(flow).map(|(_, index)| index)
    }

    /// Index of the entity the caret is in.
    #[must_use]
    pub fn active_entity<G>(&self, flow: &TextFlow<G>) -> Option<usize> {
        self.position(flow).map(|position| position.entity)
    }

    /// The content of the active entity, or an empty string.
    #[must_use]
    pub fn active_entity_content<G>(&self, flow: &TextFlow<G>) -> String {
        self.active_entity(flow)
            .and_then(|index| flow.flow_entity(index))
            .map(|entity| flow.content(entity.content_start(), entity.letter_count()))
            .unwrap_or_default()
    }

    /// Moves over `count` letters, rightward if positive.
    ///
    /// A rightward step does not come to rest right behind a collapsed space
    /// as long as it can go further, so the caret never hides at the edge of
    /// a line. Paragraph breaks are real stops. Leftward steps stop
    /// everywhere.
    pub fn move_letters<G>(&mut self, flow: &TextFlow<G>, count: isize) {
        self.sync(flow);
        let Some(mut position) = self.position else {
            return;
        };
        let entities = flow.layout().entities();
        for _ in 0..count.unsigned_abs() {
            let next = if count > 0 {
                step_right(entities, position).map(|mut next| {
                    while behind_collapsed_space(entities, next) {
                        match step_right(entities, next) {
                            Some(further) => next = further,
                            None => break,
                        }
                    }
                    next
                })
            } else {
                step_left(entities, position)
            };
            match next {
                Some(next) => position = next,
                None => break,
            }
        }
        self.place(flow, Some(position));
    }

    /// Moves to the end of the `count`th next or previous word.
    ///
    /// The search starts at the entity after or before the active one, so
    /// the word the caret is in never counts. Spaces and marks are skipped.
    /// At either end of the flow the remaining steps are dropped.
    pub fn move_words<G>(&mut self, flow: &TextFlow<G>, count: isize) {
        self.sync(flow);
        let Some(mut position) = self.position else {
            return;
        };
        let entities = flow.layout().entities();
        for _ in 0..count.unsigned_abs() {
            let target = if count > 0 {
                (position.entity + 1..entities.len())
                    .find(|&index| entities[index].kind() == FlowEntityKind::Word)
            } else {
                (0..position.entity)
                    .rev()
                    .find(|&index| entities[index].kind() == FlowEntityKind::Word)
            };
            match target.and_then(|index| end_of(entities, index)) {
                Some(end) => position = end,
                None => break,
            }
        }
        self.place(flow, Some(position));
    }

    /// Moves in front of the first letter of the flow.
    pub fn move_to_start<G>(&mut self, flow: &TextFlow<G>) {
        let start = (flow.entity_count() > 0).then_some(FlowPosition::new(0, 0, -1));
        self.place(flow, start);
    }

    /// Moves behind the last letter of the flow.
    pub fn move_to_end<G>(&mut self, flow: &TextFlow<G>) {
        let entities = flow.layout().entities();
        let end = entities
            .len()
            .checked_sub(1)
            .and_then(|last| end_of(entities, last));
        self.place(flow, end);
    }

    /// Activates the entity under a flow-local point and moves to its end.
    ///
    /// Spaces are not valid targets. Returns whether the cursor moved.
    pub fn set_from_point<G>(&mut self, flow: &TextFlow<G>, x: f64, y: f64) -> bool {
        match flow.flow_entity_at(x, y) {
            Some(entity) if entity.kind() != FlowEntityKind::Space => {
                let index = entity.index();
                self.set_entity(flow, index, true)
            }
            _ => false,
        }
    }

    /// Activates entity `index`, with the caret behind or in front of it.
    ///
    /// In front of any entity but the first is the same place as behind the
    /// previous one, and is stored that way. Returns `false` if there is no
    /// such entity.
    pub fn set_entity<G>(&mut self, flow: &TextFlow<G>, index: usize, at_end: bool) -> bool {
        let entities = flow.layout().entities();
        if index >= entities.len() {
            return false;
        }
        let position = if at_end {
            end_of(entities, index)
        } else if index == 0 {
            Some(FlowPosition::new(0, 0, -1))
        } else {
            end_of(entities, index - 1)
        };
        self.place(flow, position);
        true
    }

    /// Moves the caret so that `index` characters are in front of it.
    ///
    /// Returns `false` and leaves the cursor alone if the index is outside of
    /// the content.
    pub fn set_content_index<G>(&mut self, flow: &TextFlow<G>, index: usize) -> bool {
        match flow.locate(index) {
            Some(position) => {
                self.place(flow, Some(position));
                true
            }
            None => false,
        }
    }

    /// Inserts `text` at the caret and moves behind it.
    ///
    /// Returns the number of characters inserted. Does nothing without a
    /// position. If the flow cannot lay out the new content it keeps the old
    /// one and the cursor stays where it was.
    pub fn insert<G: GlyphProvider>(
        &mut self,
        flow: &mut TextFlow<G>,
        text: &str,
    ) -> Result<usize, LayoutError> {
        self.sync(flow);
        if self.position.is_none() {
            return Ok(0);
        }
        let inserted = flow.insert_content(self.index, text)?;
        self.index += inserted;
        self.relocate(flow);
        Ok(inserted)
    }

    /// Deletes `count` letters next to the caret.
    ///
    /// A positive count erases in front of the caret like a backspace, a
    /// negative count erases behind it. Both stop at the edges of the
    /// content. Returns the number of characters erased.
    pub fn delete<G: GlyphProvider>(
        &mut self,
        flow: &mut TextFlow<G>,
        count: isize,
    ) -> Result<usize, LayoutError> {
        self.sync(flow);
        if self.position.is_none() || count == 0 {
            return Ok(0);
        }
        let amount = count.unsigned_abs();
        let start = if count > 0 {
            self.index.saturating_sub(amount)
        } else {
            self.index
        };
        let length = if count > 0 {
            self.index - start
        } else {
            amount
        };
        let erased = flow.erase_content(start, length)?;
        if erased > 0 {
            self.index = start;
            self.relocate(flow);
        }
        Ok(erased)
    }

    /// Forgets the position.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn resolve<G>(&self, flow: &TextFlow<G>) -> Option<(FlowPosition, usize)> {
        let position = self.position?;
        if self.generation == flow.generation() {
            return Some((position, self.index));
        }
        match flow.locate(self.index) {
            Some(position) => Some((position, self.index)),
            None => flow.locate(0).map(|start| (start, 0)),
        }
    }

    fn sync<G>(&mut self, flow: &TextFlow<G>) {
        if self.generation == flow.generation() {
            return;
        }
        let resolved = self.resolve(flow);
        if self.position.is_some() {
            match resolved {
                Some((_, index)) if index == self.index => {
                    trace!(index, generation = flow.generation(), "cursor re-resolved");
                }
                Some(_) => debug!(index = self.index, "cursor re-anchored to start of flow"),
                None => debug!("cursor lost its position in an empty flow"),
            }
        }
        self.position = resolved.map(|(position, _)| position);
        self.index = resolved.map_or(0, |(_, index)| index);
        self.generation = flow.generation();
    }

    fn place<G>(&mut self, flow: &TextFlow<G>, position: Option<FlowPosition>) {
        self.position = position;
        self.index = position
            .and_then(|position| flow.content_index(position))
            .unwrap_or(0);
        self.generation = flow.generation();
    }

    fn relocate<G>(&mut self, flow: &TextFlow<G>) {
        self.position = flow.locate(self.index);
        self.generation = flow.generation();
    }
}

/// Behind the last letter of entity `index`.
fn end_of(entities: &[FlowEntity], index: usize) -> Option<FlowPosition> {
    let entity = entities.get(index)?;
    let part = entity.parts().len().checked_sub(1)?;
    let letter = isize::try_from(entity.parts()[part].letter_count()).ok()? - 1;
    Some(FlowPosition::new(index, part, letter))
}

fn step_right(entities: &[FlowEntity], position: FlowPosition) -> Option<FlowPosition> {
    let entity = entities.get(position.entity)?;
    let part = entity.part(position.part)?;
    let letter = position.letter + 1;
    if usize::try_from(letter).is_ok_and(|letter| letter < part.letter_count()) {
        return Some(FlowPosition { letter, ..position });
    }
    if position.part + 1 < entity.parts().len() {
        return Some(FlowPosition::new(position.entity, position.part + 1, -1));
    }
    let next = position.entity + 1;
    (next < entities.len()).then_some(FlowPosition::new(next, 0, 0))
}

fn step_left(entities: &[FlowEntity], position: FlowPosition) -> Option<FlowPosition> {
    let FlowPosition {
        entity,
        part,
        letter,
    } = position;
    if letter > 0 {
        return Some(FlowPosition::new(entity, part, letter - 1));
    }
    if letter == 0 {
        if part > 0 || entity == 0 {
            return Some(FlowPosition::new(entity, part, -1));
        }
        return end_of(entities, entity - 1);
    }
    if part > 0 {
        let previous = entities.get(entity)?.part(part - 1)?;
        let letter = isize::try_from(previous.letter_count()).ok()? - 1;
        return Some(FlowPosition::new(entity, part - 1, letter));
    }
    // Only reachable for (0, 0, -1).
    None
}

/// Whether the letter in front of the caret is a collapsed space.
fn behind_collapsed_space(entities: &[FlowEntity], position: FlowPosition) -> bool {
    let Some(entity) = entities.get(position.entity) else {
        return false;
    };
    if entity.is_paragraph_break() {
        return false;
    }
    let part = if position.letter >= 0 {
        position.part
    } else if let Some(part) = position.part.checked_sub(1) {
        part
    } else {
        return false;
    };
    entity.part(part).is_some_and(|part| part.is_collapsed())
}

#[cfg(test)]
mod tests {
    use dwell_flow::{FixedAdvanceFont, FlowParams};

    use super::*;

    fn flow(text: &str, width: i32) -> TextFlow<FixedAdvanceFont> {
        let mut flow = TextFlow::new(FixedAdvanceFont::new(10.0, 20.0), FlowParams::new(), text);
        flow.transform_and_size(0, 0, width, 400).unwrap();
        flow
    }

    #[test]
    fn steps_cross_parts_and_entities() {
        // "abcdefghij" splits into two parts of five letters at width 50.
        let flow = flow("abcdefghij k", 50);
        let entities = flow.layout().entities();
        assert_eq!(entities[0].parts().len(), 2);

        let end_of_first = FlowPosition::new(0, 0, 4);
        assert_eq!(
            step_right(entities, end_of_first),
            Some(FlowPosition::new(0, 1, -1))
        );
        assert_eq!(
            step_left(entities, FlowPosition::new(0, 1, -1)),
            Some(end_of_first)
        );
        assert_eq!(
            step_right(entities, FlowPosition::new(0, 1, 4)),
            Some(FlowPosition::new(1, 0, 0))
        );
        assert_eq!(
            step_left(entities, FlowPosition::new(1, 0, 0)),
            Some(FlowPosition::new(0, 1, 4))
        );
        assert_eq!(step_left(entities, FlowPosition::new(0, 0, -1)), None);
        assert_eq!(step_right(entities, FlowPosition::new(2, 0, 0)), None);
    }

    #[test]
    fn end_positions() {
        let flow = flow("ab cd", 200);
        let entities = flow.layout().entities();
        assert_eq!(end_of(entities, 0), Some(FlowPosition::new(0, 0, 1)));
        assert_eq!(end_of(entities, 1), Some(FlowPosition::new(1, 0, 0)));
        assert_eq!(end_of(entities, 3), None);
    }

    #[test]
    fn collapsed_space_detection() {
        // The space ends the first line and collapses.
        let flow = flow("ab cd", 30);
        let entities = flow.layout().entities();
        assert!(behind_collapsed_space(entities, FlowPosition::new(1, 0, 0)));
        assert!(!behind_collapsed_space(entities, FlowPosition::new(0, 0, 1)));
        assert!(!behind_collapsed_space(entities, FlowPosition::new(0, 0, -1)));
    }

    #[test]
    fn paragraph_breaks_are_not_skipped() {
        let flow = flow("ab\ncd", 200);
        let entities = flow.layout().entities();
        assert!(!behind_collapsed_space(entities, FlowPosition::new(1, 0, 0)));
    }

    #[test]
    fn stale_cursor_resolves_without_mutation() {
        let mut flow = flow("hello world", 200);
        let mut cursor = TextCursor::new();
        cursor.move_to_end(&flow);
        flow.set_content("hi").unwrap();
        assert_eq!(cursor.position(&flow), Some(FlowPosition::new(0, 0, -1)));
        assert_eq!(cursor.content_index(&flow), Some(0));
    }
}

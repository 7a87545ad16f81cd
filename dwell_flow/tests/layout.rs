// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `dwell_flow` layout through the `TextFlow` container.
//!
//! These cover entity segmentation, line filling, justification, word
//! splitting, and the all-or-nothing behavior of relayout.

use std::collections::BTreeMap;

use dwell_flow::{
    Alignment, FixedAdvanceFont, FlowEntityKind, FlowParams, LayoutError, TextFlow,
};

fn font() -> FixedAdvanceFont {
    FixedAdvanceFont::new(10.0, 20.0)
}

fn flow_with(text: &str, params: FlowParams, width: i32) -> TextFlow<FixedAdvanceFont> {
    let mut flow = TextFlow::new(font(), params, text);
    flow.transform_and_size(0, 0, width, 400).unwrap();
    flow
}

fn kinds(flow: &TextFlow<FixedAdvanceFont>) -> Vec<FlowEntityKind> {
    flow.layout().entities().iter().map(|e| e.kind()).collect()
}

#[test]
fn words_spaces_and_marks() {
    let flow = flow_with("ab cd", FlowParams::new(), 200);
    assert_eq!(
        kinds(&flow),
        [
            FlowEntityKind::Word,
            FlowEntityKind::Space,
            FlowEntityKind::Word
        ]
    );

    let flow = flow_with("Hi, you!", FlowParams::new(), 200);
    assert_eq!(
        kinds(&flow),
        [
            FlowEntityKind::Word,
            FlowEntityKind::Mark,
            FlowEntityKind::Space,
            FlowEntityKind::Word,
            FlowEntityKind::Mark
        ]
    );

    // Marks never merge into runs.
    let flow = flow_with("...", FlowParams::new(), 200);
    assert_eq!(flow.entity_count(), 3);
}

#[test]
fn long_word_is_split_into_fitting_parts() {
    let word = "supercalifragilisticexpialidocious";
    let flow = flow_with(word, FlowParams::new(), 100);
    assert_eq!(flow.entity_count(), 1);

    let entity = flow.flow_entity(0).unwrap();
    assert_eq!(entity.kind(), FlowEntityKind::Word);
    assert!(entity.parts().len() > 1);
    assert!(entity.parts().iter().all(|part| part.width() <= 100.0));
    assert_eq!(entity.letter_count(), word.chars().count());

    let counts: Vec<_> = entity.parts().iter().map(|p| p.letter_count()).collect();
    assert_eq!(counts, [8, 9, 8, 9]);
    let ys: Vec<_> = entity.parts().iter().map(|p| p.y()).collect();
    assert_eq!(ys, [0, 20, 40, 60]);
    assert_eq!(entity.y(), 0);
}

#[test]
fn split_word_continues_on_the_same_line_as_followers() {
    // The second half of the word shares its line with the next word.
    let flow = flow_with("abcdefghij kl", FlowParams::new(), 80);
    let word = flow.flow_entity(0).unwrap();
    assert_eq!(word.parts().len(), 2);
    assert_eq!(word.parts()[1].y(), 20);
    let last = flow.flow_entity(2).unwrap();
    assert_eq!((last.x(), last.y()), (60, 20));
}

#[test]
fn layout_is_idempotent() {
    let text = "The quick brown fox jumps over the lazy dog.\nAnd again, twice.";
    let params = FlowParams::new().with_alignment(Alignment::Justify);
    let mut flow = flow_with(text, params, 170);
    let first = flow.layout().clone();
    flow.transform_and_size(0, 0, 170, 400).unwrap();
    assert_eq!(flow.layout(), &first);
    assert_eq!(flow.generation(), 2);
}

#[test]
fn letter_counts_cover_the_content() {
    let text = "Hello  world.\nSecond paragraph, here\n\nend\n";
    let flow = flow_with(text, FlowParams::new(), 90);
    let total: usize = flow
        .layout()
        .entities()
        .iter()
        .map(|e| e.letter_count())
        .sum();
    assert_eq!(total, flow.content_len());
    assert_eq!(flow.content(0, flow.content_len()), text);

    let mut rebuilt = String::new();
    for entity in flow.layout().entities() {
        rebuilt.push_str(&flow.content(entity.content_start(), entity.letter_count()));
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn justified_lines_span_the_width() {
    let text = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor";
    let width = 150;
    let params = FlowParams::new().with_alignment(Alignment::Justify);
    let flow = flow_with(text, params, width);

    let mut line_widths: BTreeMap<usize, f64> = BTreeMap::new();
    let mut stretched: BTreeMap<usize, bool> = BTreeMap::new();
    for entity in flow.layout().entities() {
        for part in entity.parts() {
            *line_widths.entry(part.line()).or_default() += part.width();
            if entity.kind() == FlowEntityKind::Space && !part.is_collapsed() {
                stretched.insert(part.line(), true);
            }
        }
    }
    let last_line = flow.layout().line_count() - 1;
    let mut checked = 0;
    for (line, sum) in &line_widths {
        if *line == last_line || !stretched.get(line).copied().unwrap_or(false) {
            continue;
        }
        assert!(
            (sum - f64::from(width)).abs() <= 1.0,
            "line {line} is {sum}px wide"
        );
        checked += 1;
    }
    assert!(checked >= 2, "expected several justified lines");
}

#[test]
fn last_line_of_paragraph_is_not_justified() {
    let params = FlowParams::new().with_alignment(Alignment::Justify);
    let flow = flow_with("aa bb cc\ndd ee", params, 60);
    // "aa bb" stretched, "cc" alone, "dd ee" is a last line.
    let space = flow.flow_entity(1).unwrap();
    assert_eq!(space.parts()[0].width(), 20.0);
    let space = flow.flow_entity(7).unwrap();
    assert_eq!(space.kind(), FlowEntityKind::Space);
    assert_eq!(space.parts()[0].width(), 10.0);
}

#[test]
fn edge_spaces_collapse() {
    let flow = flow_with("  ab  ", FlowParams::new(), 200);
    let front = flow.flow_entity(0).unwrap();
    assert!(front.parts().iter().all(|p| p.is_collapsed() && p.width() == 0.0));
    assert_eq!(flow.flow_entity(1).unwrap().x(), 0);
    let back = flow.flow_entity(2).unwrap();
    assert!(back.parts().iter().all(|p| p.is_collapsed()));
    // Collapsed spaces still hold their letters.
    assert_eq!(back.letter_count(), 2);
}

#[test]
fn right_alignment_ignores_trailing_spaces() {
    let params = FlowParams::new().with_alignment(Alignment::Right);
    let flow = flow_with("ab cd ef", params, 60);
    // Line one is "ab cd " with a collapsed trailing space.
    assert_eq!(flow.flow_entity(0).unwrap().x(), 10);
    assert_eq!(flow.flow_entity(2).unwrap().x(), 40);
    assert_eq!(flow.flow_entity(4).unwrap().x(), 40);
}

#[test]
fn paragraphs_start_new_lines() {
    let flow = flow_with("ab\n\ncd", FlowParams::new(), 200);
    let entities = flow.layout().entities();
    assert_eq!(entities.len(), 4);
    assert!(entities[1].is_paragraph_break());
    assert!(entities[2].is_paragraph_break());
    assert_eq!(entities[1].parts()[0].width(), 0.0);
    assert_eq!(entities[3].y(), 40);
    assert_eq!(flow.flow_height(), 60);
    assert_eq!(flow.layout().line_count(), 3);
}

#[test]
fn empty_content() {
    let flow = flow_with("", FlowParams::new(), 200);
    assert_eq!(flow.entity_count(), 0);
    assert_eq!(flow.flow_height(), 0);
    assert_eq!(flow.flow_width(), 0);
    assert_eq!(flow.locate(0), None);
}

#[test]
fn failed_relayout_keeps_previous_state() {
    let font = font().with_advance('W', 30.0);
    let mut flow = TextFlow::new(font, FlowParams::new(), "ab cd");
    flow.transform_and_size(0, 0, 25, 400).unwrap();
    let before = flow.layout().clone();

    assert_eq!(
        flow.set_content("W"),
        Err(LayoutError::GlyphTooWide { index: 0, width: 25 })
    );
    assert_eq!(flow.text(), "ab cd");
    assert_eq!(flow.layout(), &before);
    assert_eq!(flow.generation(), 1);

    assert_eq!(
        flow.transform_and_size(10, 10, 5, 400),
        Err(LayoutError::GlyphTooWide { index: 0, width: 5 })
    );
    assert_eq!(flow.width(), 25);
    assert_eq!(flow.x(), 0);
    assert_eq!(flow.layout(), &before);

    assert!(flow.insert_content(2, "W").is_err());
    assert_eq!(flow.text(), "ab cd");
}

#[test]
fn oversized_mark_fails_instead_of_looping() {
    let font = font().with_advance('.', 50.0);
    let mut flow = TextFlow::new(font, FlowParams::new(), "a.");
    assert_eq!(
        flow.transform_and_size(0, 0, 30, 400),
        Err(LayoutError::LineOverflow { index: 1, width: 30 })
    );
    assert_eq!(flow.generation(), 0);
}

#[test]
fn content_set_before_first_layout_is_kept() {
    let mut flow = TextFlow::new(font(), FlowParams::new(), "");
    assert_eq!(flow.set_content("hello"), Ok(()));
    assert_eq!(flow.insert_content(5, " world"), Ok(6));
    assert_eq!(flow.erase_content(0, 1), Ok(1));
    let params = FlowParams::new().with_alignment(Alignment::Right);
    assert_eq!(flow.set_params(params), Ok(()));
    assert_eq!(flow.text(), "ello world");
    assert_eq!(flow.generation(), 0);
    assert_eq!(flow.entity_count(), 0);

    flow.transform_and_size(0, 0, 300, 100).unwrap();
    assert_eq!(flow.generation(), 1);
    assert_eq!(flow.text(), "ello world");
    assert_eq!(flow.params().alignment, Alignment::Right);
    assert_eq!(
        kinds(&flow),
        [FlowEntityKind::Word, FlowEntityKind::Space, FlowEntityKind::Word]
    );
}

#[test]
fn missing_glyphs_are_zero_wide() {
    let font = font().without('x');
    let mut flow = TextFlow::new(font, FlowParams::new(), "axb");
    flow.transform_and_size(0, 0, 100, 100).unwrap();
    let word = flow.flow_entity(0).unwrap();
    assert_eq!(word.parts()[0].width(), 20.0);
    assert_eq!(word.parts()[0].letter_offsets(), &[0.0, 10.0, 10.0, 20.0]);
}

#[test]
fn hit_test_skips_unplaced_entities() {
    let mut flow = TextFlow::new(font(), FlowParams::new(), "aaa aaa aaa");
    flow.transform_and_size(0, 0, 40, 30).unwrap();
    // Only one line fits; the others are not placed at (0, 0).
    assert_eq!(flow.flow_entity_at(5.0, 5.0).map(|e| e.index()), Some(0));
    assert!(flow.flow_entity_at(5.0, 25.0).is_none());
    assert!(!flow.flow_entity(4).unwrap().is_placed());
    assert_eq!(flow.layout().line_count(), 1);
}

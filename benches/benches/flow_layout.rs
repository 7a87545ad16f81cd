// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `dwell_flow` layout and `dwell_text_edit` caret movement.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use dwell_flow::{Alignment, FixedAdvanceFont, FlowParams, TextFlow, layout};
use dwell_text_edit::TextCursor;

const PARAGRAPH: &str = "Lorem ipsum dolor sit amet, consetetur sadipscing elitr, sed diam \
    nonumy eirmod tempor invidunt ut labore et dolore magna aliquyam erat, sed diam voluptua. \
    At vero eos et accusam et justo duo dolores et ea rebum. Stet clita kasd gubergren, no sea \
    takimata sanctus est Lorem ipsum dolor sit amet.";

fn text(paragraphs: usize) -> Vec<char> {
    let mut text = String::new();
    for i in 0..paragraphs {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(PARAGRAPH);
    }
    text.chars().collect()
}

fn bench_layout(c: &mut Criterion) {
    let font = FixedAdvanceFont::new(9.0, 18.0);
    let content = text(16);
    let mut group = c.benchmark_group("flow/layout");
    group.throughput(Throughput::Elements(content.len() as u64));

    for width in [120, 480, 1_920] {
        for (name, alignment) in [("left", Alignment::Left), ("justify", Alignment::Justify)] {
            let params = FlowParams::new()
                .with_alignment(alignment)
                .with_overflow_height(true);
            group.bench_with_input(BenchmarkId::new(name, width), &width, |b, &width| {
                b.iter(|| black_box(layout(&content, &params, width, 0, &font)));
            });
        }
    }

    // Words wider than the flow are bisected.
    let long_words: Vec<char> = "pneumonoultramicroscopicsilicovolcanoconiosis "
        .repeat(64)
        .chars()
        .collect();
    let params = FlowParams::new().with_overflow_height(true);
    group.bench_function("split_words", |b| {
        b.iter(|| black_box(layout(&long_words, &params, 90, 0, &font)));
    });

    group.finish();
}

fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("flow/edit");
    let params = FlowParams::new().with_alignment(Alignment::Justify);
    let content: String = text(4).into_iter().collect();

    group.bench_function("insert_at_caret", |b| {
        b.iter_batched(
            || {
                let mut flow = TextFlow::new(FixedAdvanceFont::new(9.0, 18.0), params, &content);
                flow.transform_and_size(0, 0, 480, 1_000).expect("benchmark text fits");
                let mut cursor = TextCursor::new();
                cursor.move_to_start(&flow);
                cursor.move_words(&flow, 20);
                (flow, cursor)
            },
            |(mut flow, mut cursor)| {
                black_box(cursor.insert(&mut flow, "x").ok());
                black_box((flow, cursor));
            },
            BatchSize::SmallInput,
        );
    });

    let mut flow = TextFlow::new(FixedAdvanceFont::new(9.0, 18.0), params, &content);
    flow.transform_and_size(0, 0, 480, 1_000).expect("benchmark text fits");
    group.bench_function("walk_letters", |b| {
        b.iter(|| {
            let mut cursor = TextCursor::new();
            cursor.move_to_start(&flow);
            cursor.move_letters(&flow, isize::MAX);
            black_box(cursor.content_index(&flow))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_layout, bench_edit);
criterion_main!(benches);

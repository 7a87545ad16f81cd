// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `dwell_style` propagation, lookup, and stylesheet parsing.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dwell_style::{
    ColorProperty, FloatProperty, StyleClass, StyleClassBuilder, StyleTree, parse_stylesheet,
};
use peniko::Color;

/// Root plus a single chain of `depth` classes. Returns the root, the first
/// child, and the leaf.
fn chain(depth: usize) -> (StyleClass, StyleClass, StyleClass) {
    let root = StyleClassBuilder::new().build();
    let first = root.add_child(true, "c0");
    let mut leaf = first.clone();
    for i in 1..depth {
        leaf = leaf.add_child(true, format!("c{i}"));
    }
    (root, first, leaf)
}

/// Root plus one child with `width` children of its own.
fn fan(width: usize) -> (StyleClass, StyleClass) {
    let root = StyleClassBuilder::new().build();
    let hub = root.add_child(true, "hub");
    for i in 0..width {
        hub.add_child(true, format!("leaf{i}"));
    }
    (root, hub)
}

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("style/propagate");

    for depth in [16_usize, 256, 2_048] {
        group.bench_with_input(BenchmarkId::new("deep", depth), &depth, |b, &depth| {
            b.iter_batched(
                || chain(depth),
                |(root, first, leaf)| {
                    first.set_value(FloatProperty::AnimationDuration, 0.5);
                    black_box(leaf.get_value(FloatProperty::AnimationDuration));
                    black_box(root);
                },
                BatchSize::SmallInput,
            );
        });
    }

    for width in [16_usize, 256, 2_048] {
        group.bench_with_input(BenchmarkId::new("wide", width), &width, |b, &width| {
            b.iter_batched(
                || fan(width),
                |(root, hub)| {
                    hub.set_value(ColorProperty::FontColor, Color::new([1.0, 0.0, 0.0, 1.0]));
                    black_box((root, hub));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("owned_in_place", |b| {
        let (_root, first, _leaf) = chain(256);
        first.set_value(FloatProperty::DimAlpha, 0.25);
        b.iter(|| first.set_value(FloatProperty::DimAlpha, black_box(0.75)));
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("style/lookup");
    let (_root, _first, leaf) = chain(256);

    group.bench_function("get_value/float", |b| {
        b.iter(|| black_box(leaf.get_value(FloatProperty::TextEditScrollSpeedMultiplier)));
    });
    group.bench_function("get_value/color", |b| {
        b.iter(|| black_box(leaf.get_value(ColorProperty::MarkColor)));
    });

    let mut tree = StyleTree::new();
    for i in 0..256 {
        let parent = (i > 0).then(|| format!("class{}", i - 1));
        let name = format!("class{i}");
        tree.add_style_class(&name, parent.as_deref()).expect("fresh class names");
    }
    group.bench_function("fetch_style_class", |b| {
        b.iter(|| black_box(tree.fetch_style_class("class200")));
    });

    group.finish();
}

fn bench_stylesheet(c: &mut Criterion) {
    let mut source = String::new();
    for i in 0..64 {
        source.push_str(&format!(
            "class{i}\n{{\n    AnimationDuration = 0.{i}\n    FontColor = 0x{i:02X}{i:02X}FFFF\n}}\n"
        ));
    }

    c.bench_function("style/parse_stylesheet", |b| {
        b.iter_batched(
            StyleTree::new,
            |mut tree| {
                black_box(parse_stylesheet(&mut tree, &source).ok());
                black_box(tree);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_propagation, bench_lookup, bench_stylesheet);
criterion_main!(benches);

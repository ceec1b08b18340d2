// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Vec2;
use understory_sortable::config::AnimationTiming;
use understory_sortable::doc::{Document, Element, ElementId};
use understory_sortable::easing::Easing;
use understory_sortable::gesture::Gesture;
use understory_sortable::{Sortable, SortableConfig};

const ROW: f64 = 40.0;

fn gen_list(n: usize) -> (Document, Vec<ElementId>) {
    let mut doc = Document::new();
    let ul = doc.append(doc.root_id(), Element::new("ul").size(200.0, ROW * n as f64));
    let rows = (0..n)
        .map(|_| doc.append(ul, Element::new("li").size(200.0, ROW)))
        .collect();
    (doc, rows)
}

/// Drag the first row to the bottom one pixel-row at a time, then release.
fn sweep(
    config: SortableConfig<ElementId>,
    (mut doc, rows): (Document, Vec<ElementId>),
    step: f64,
) -> usize {
    let mut sortable = Sortable::new(config);
    sortable.on_gesture(&mut doc, Gesture::Start { target: rows[0] });
    let end = ROW * rows.len() as f64;
    let mut dy = 0.0;
    while dy < end {
        dy += step;
        sortable.on_gesture(
            &mut doc,
            Gesture::Move {
                delta: Vec2::new(0.0, dy),
            },
        );
        // Let animations complete between moves so every neighbor is a valid target.
        for ticket in doc.finish_all() {
            sortable.animation_finished(&mut doc, ticket);
        }
    }
    sortable.on_gesture(&mut doc, Gesture::End);
    doc.order_changes().len()
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_sweep");
    for &n in &[8usize, 64, 256] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("plain_n{}", n), |b| {
            b.iter_batched(
                || gen_list(n),
                |list| black_box(sweep(SortableConfig::default(), list, 10.0)),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("animated_n{}", n), |b| {
            let config = SortableConfig::default().with_animation(AnimationTiming::new(
                Duration::from_millis(200),
                Easing::EaseOut,
            ));
            b.iter_batched(
                || gen_list(n),
                |list| black_box(sweep(config.clone(), list, 10.0)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sweep);
criterion_main!(benches);

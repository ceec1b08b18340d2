// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_sortable::geometry::{first_hit, hit_test};

fn gen_rows(n: usize, height: f64) -> Vec<(usize, Rect)> {
    (0..n)
        .map(|i| {
            let y0 = i as f64 * height;
            (i, Rect::new(0.0, y0, 200.0, y0 + height))
        })
        .collect()
}

fn gen_grid_cards(n: usize, cell: f64) -> Vec<(usize, Rect)> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push((y * n + x, Rect::new(x0, y0, x0 + cell, y0 + cell)));
        }
    }
    out
}

fn gen_overlapping_cards(n: usize, cell: f64, scale: f64) -> Vec<(usize, Rect)> {
    gen_grid_cards(n, cell)
        .into_iter()
        .map(|(i, r)| (i, Rect::from_origin_size(r.origin(), r.size() * scale)))
        .collect()
}

fn bench_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("rows");
    for &n in &[16usize, 256, 4096] {
        let rows = gen_rows(n, 40.0);
        // Probe near the end so the scan covers most rows.
        let probe = Rect::new(0.0, (n as f64 - 1.5) * 40.0, 200.0, (n as f64 - 0.5) * 40.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("first_hit_n{}", n), |b| {
            b.iter(|| black_box(first_hit(probe, rows.iter().copied())));
        });
        group.bench_function(format!("hit_test_n{}", n), |b| {
            b.iter(|| black_box(hit_test(probe, rows.iter().copied()).len()));
        });
    }
    group.finish();
}

fn bench_cards(c: &mut Criterion) {
    let mut group = c.benchmark_group("cards");
    let probe = Rect::new(300.0, 300.0, 400.0, 400.0);
    for &n in &[8usize, 32, 64] {
        let cards = gen_grid_cards(n, 100.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter(|| black_box(hit_test(probe, cards.iter().copied()).len()));
        });
    }
    let cards = gen_overlapping_cards(32, 100.0, 3.0);
    group.bench_function("overlap_n32", |b| {
        b.iter(|| black_box(hit_test(probe, cards.iter().copied()).len()));
    });
    group.finish();
}

criterion_group!(benches, bench_rows, bench_cards);
criterion_main!(benches);

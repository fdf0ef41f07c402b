//! Benchmarks for the stickerkit pipeline.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use stickerkit::{
    CellRect, ChromaKeyRemover, Colour, GridSpec, GridSplitter, Pipeline, PixelSurface,
    SheetComposer, SpillSuppressor,
};

/// A `cells x cells` sheet of `cell`-pixel stickers on the key colour, each
/// with a soft green fringe so spill suppression has work to do.
fn synthetic_sheet(cells: u32, cell: u32) -> PixelSurface {
    let mut sheet = PixelSurface::filled(cells * cell, cells * cell, Colour::KEY_GREEN);
    for row in 0..cells {
        for col in 0..cells {
            let (x, y) = (col * cell, row * cell);
            let q = cell / 4;
            sheet.fill_rect(
                CellRect::new(x + q - 2, y + q - 2, cell / 2 + 4, cell / 2 + 4),
                Colour::rgb(90, 200, 90),
            );
            sheet.fill_rect(
                CellRect::new(x + q, y + q, cell / 2, cell / 2),
                Colour::rgb((row * 40) as u8, 60, (col * 40) as u8),
            );
        }
    }
    sheet
}

// -- Cleaning benchmarks --

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");
    let sheet = synthetic_sheet(4, 256);
    let remover = ChromaKeyRemover::default();
    let suppressor = SpillSuppressor::default();

    group.bench_function("flood_fill_1024", |b| {
        b.iter_batched(
            || sheet.clone(),
            |mut s| remover.remove(black_box(&mut s)),
            BatchSize::LargeInput,
        )
    });

    let mut keyed = sheet.clone();
    remover.remove(&mut keyed);
    group.bench_function("spill_1024", |b| {
        b.iter_batched(
            || keyed.clone(),
            |mut s| suppressor.suppress(black_box(&mut s)),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

// -- Split / compose benchmarks --

fn bench_split_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_compose");
    let grid = GridSpec::new(4, 4).unwrap();
    let (clean, _) = Pipeline::default().clean(synthetic_sheet(4, 256));
    let splitter = GridSplitter::default();

    group.bench_function("split_4x4", |b| {
        b.iter(|| splitter.split_grid(black_box(&clean), grid).unwrap())
    });

    let stickers = splitter.split_grid(&clean, grid).unwrap();
    group.bench_function("compose_4x4", |b| {
        b.iter(|| {
            SheetComposer::new()
                .compose(black_box(&stickers), 4, 4)
                .unwrap()
        })
    });

    group.finish();
}

// -- End-to-end --

fn bench_process(c: &mut Criterion) {
    let sheet = synthetic_sheet(4, 256);
    let pipeline = Pipeline::default();
    let grid = GridSpec::new(4, 4).unwrap();

    c.bench_function("process_1024_4x4", |b| {
        b.iter_batched(
            || sheet.clone(),
            |s| pipeline.process(black_box(s), grid).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_clean, bench_split_compose, bench_process);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use modmul_threadart::*;

fn bench_full_sequence_n200(c: &mut Criterion) {
    c.bench_function("all chords N=200 k=7", |b| {
        b.iter(|| {
            generate_all_chords(black_box(200), black_box(7))
                .unwrap()
                .collect::<Vec<Chord>>()
        })
    });
}

fn bench_cycle_count(c: &mut Criterion) {
    c.bench_function("cycle count N=200 k=49", |b| {
        b.iter(|| compute_cycle_count(black_box(200), black_box(49)))
    });
}

fn bench_frame_view(c: &mut Criterion) {
    c.bench_function("frame view N=200 k=7 m=100", |b| {
        b.iter(|| frame_view(black_box(200), black_box(7), black_box(100)))
    });
}

fn bench_nodes(c: &mut Criterion) {
    c.bench_function("nodes N=200", |b| {
        b.iter(|| generate_nodes(black_box(200)))
    });
}

fn bench_render_svg(c: &mut Criterion) {
    let opts = RenderOptions::default();
    c.bench_function("render svg N=200 k=7 complete", |b| {
        b.iter(|| render_svg(black_box(200), black_box(7), black_box(200), &opts))
    });
}

fn bench_sweep_ui_grid(c: &mut Criterion) {
    c.bench_function("sweep [2,200]x[1,50] sequential", |b| {
        b.iter(|| sweep_grid(black_box(2), black_box(200), black_box(1), black_box(50), |_, _| {}))
    });
}

fn bench_sweep_ui_grid_parallel(c: &mut Criterion) {
    c.bench_function("sweep [2,200]x[1,50] parallel", |b| {
        b.iter(|| {
            sweep_grid_parallel(black_box(2), black_box(200), black_box(1), black_box(50), |_, _| {})
        })
    });
}

criterion_group!(
    benches,
    bench_full_sequence_n200,
    bench_cycle_count,
    bench_frame_view,
    bench_nodes,
    bench_render_svg,
    bench_sweep_ui_grid,
    bench_sweep_ui_grid_parallel,
);
criterion_main!(benches);

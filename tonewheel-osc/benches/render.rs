//! Render-cycle benchmarks.
//!
//! Run with: cargo bench -p tonewheel-osc
//!
//! Reference deadlines at 48kHz:
//!   - 64 samples  = 1.33ms
//!   - 256 samples = 5.33ms

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tonewheel_osc::{Oscillator, OscParams, ParamId};

const BLOCK_SIZES: &[usize] = &[16, 64, 256];

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("osc/render");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0_i32; size];

        // Default registration, low note: no foldback
        let mut osc = Oscillator::platform();
        let low = OscParams::from_note(48, 0);
        group.bench_with_input(BenchmarkId::new("default_low", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&low), black_box(&mut buffer)));
        });

        // Every drawbar out, high note: foldback on most partials
        let mut osc = Oscillator::platform();
        while !osc.accepts_parameters() {
            osc.set_parameter(0, 0);
        }
        for p in ParamId::ALL.iter().filter(|p| p.drawbar_slot().is_some()) {
            osc.set_parameter(p.index(), 8);
        }
        let high = OscParams::from_note(96, 0);
        group.bench_with_input(BenchmarkId::new("full_high", size), &size, |b, _| {
            b.iter(|| {
                osc.note_on(&high);
                osc.render(black_box(&high), black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);

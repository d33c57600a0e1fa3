//! Benchmarks for the FM pluck tone.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pentatone::dsp::{NoiseSource, SeededNoise};
use pentatone::synth::FmPluck;

use crate::{NOTE_LENGTHS, SAMPLE_RATE};

pub fn bench_fm(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/fm");

    let grain = SeededNoise::new(3).table(1_000).unwrap();
    let tone = FmPluck::default();

    for &length in NOTE_LENGTHS {
        group.bench_with_input(BenchmarkId::new("pluck", length), &length, |b, &length| {
            b.iter(|| tone.render(black_box(392.0), length, SAMPLE_RATE, &grain))
        });

        // Shimmer and grain switched off: bare carrier/modulator pair
        let bare = FmPluck {
            shimmer_gain: 0.0,
            grain_gain: 0.0,
            ..FmPluck::default()
        };
        group.bench_with_input(BenchmarkId::new("bare_fm", length), &length, |b, &length| {
            b.iter(|| bare.render(black_box(392.0), length, SAMPLE_RATE, &grain))
        });
    }

    group.finish();
}

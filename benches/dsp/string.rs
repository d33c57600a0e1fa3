//! Benchmarks for the felt piano string path.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pentatone::dsp::SeededNoise;
use pentatone::synth::{delay_length, KarplusStrong, NoiseExcitation};

use crate::{NOTE_LENGTHS, SAMPLE_RATE};

pub fn bench_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/string");

    // Low and high end of the note table
    for frequency in [261.63f32, 466.16] {
        let period = delay_length(frequency, SAMPLE_RATE).unwrap();

        group.bench_with_input(
            BenchmarkId::new("excitation", period),
            &period,
            |b, &period| {
                let shaper = NoiseExcitation::default();
                let mut noise = SeededNoise::new(7);
                b.iter(|| shaper.generate(black_box(period), &mut noise).unwrap())
            },
        );

        let excitation = NoiseExcitation::default()
            .generate(period, &mut SeededNoise::new(7))
            .unwrap();
        let string = KarplusStrong::default();

        for &length in NOTE_LENGTHS {
            group.bench_with_input(
                BenchmarkId::new(format!("karplus_strong_{}hz", frequency as u32), length),
                &length,
                |b, &length| b.iter(|| string.render(black_box(&excitation), length).unwrap()),
            );
        }
    }

    group.finish();
}

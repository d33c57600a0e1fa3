//! Benchmarks for ambience and tap reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pentatone::dsp::Transform;
use pentatone::effects::{Ambience, EffectTap, TapReverb};
use pentatone::Frame;

use crate::NOTE_LENGTHS;

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/effects");

    let ambience = Ambience::new(vec![EffectTap::new(441, 0.1), EffectTap::new(1_014, 0.05)]);
    let reverb = TapReverb::new(8_820, 0.6, 8);

    for &length in NOTE_LENGTHS {
        // Impulse followed by a quiet tail
        let mono: Vec<f32> = (0..length)
            .map(|i| {
                if i < 10 {
                    1.0 - i as f32 / 10.0
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();
        let stereo: Vec<Frame> = mono.iter().map(|&s| [s, -s]).collect();

        group.bench_with_input(BenchmarkId::new("ambience", length), &length, |b, _| {
            b.iter(|| ambience.apply(black_box(&mono)))
        });

        group.bench_with_input(BenchmarkId::new("tap_reverb", length), &length, |b, _| {
            b.iter(|| reverb.apply(black_box(&stereo)))
        });
    }

    group.finish();
}

//! Benchmarks for 16-bit PCM encoding.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pentatone::io::PcmEncoder;
use pentatone::Frame;

use crate::{NOTE_LENGTHS, SAMPLE_RATE};

pub fn bench_pcm(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pcm");

    let encoder = PcmEncoder::new(0.6, SAMPLE_RATE);

    for &length in NOTE_LENGTHS {
        // Swings past full scale so the clip path is exercised too
        let signal: Vec<Frame> = (0..length)
            .map(|i| {
                let s = (i as f32 * 0.01).sin() * 2.0;
                [s, -s]
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("encode", length), &length, |b, _| {
            b.iter(|| encoder.encode(black_box(&signal)))
        });
    }

    group.finish();
}

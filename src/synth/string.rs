//! Karplus-Strong string model.

/*
Karplus-Strong
==============

A string is modelled as one period of its waveform circulating in a delay
line. Each trip around, the waveform passes through a gentle low-pass and a
loss factor, so high harmonics fade first and the whole note dies away.

  excitation ──→ [ delay line, N samples ] ──┬──→ output
                      ↑                      │
                      └── × decay ←── LPF ←──┘

Vocabulary
----------

  period N      Delay-line length in samples. Sets the pitch:
                    f ≈ sample_rate / (N + 0.5)

  smoothing s   Blend between the current tap and the previous one:
                    filtered = s·x[n] + (1 - s)·x[n-1]
                At s = 0.5 this is the classic two-point average. The
                average itself delays by half a sample, hence the +0.5.

  decay d       Per-trip loss. 0.992 rings for several seconds at middle C.


Tuning
------

Solving the pitch relation for N and truncating:

    N = floor(sample_rate / f - 0.5)

At 44.1 kHz, C4 (261.63 Hz) gives N = 168. A frequency so high that N < 1
has no delay line to live in, and is rejected before anything is allocated.


The Loop
--------

The output starts as a copy of the excitation itself (samples 0..N), then
each further sample comes from one step of:

    delayed  = line[ptr]
    filtered = s·delayed + (1 - s)·prev
    new      = filtered · d
    line[ptr] = new
    prev     = delayed          (the raw tap, not the filtered output)
    ptr      = (ptr + 1) mod N
    emit new
*/

use tracing::debug;

use crate::dsp::delay::DelayLine;
use crate::error::{Result, SynthError};
use crate::MonoSignal;

/// Delay-line length for `frequency`, compensating the filter's half-sample delay.
pub fn delay_length(frequency: f32, sample_rate: u32) -> Result<usize> {
    let invalid = || SynthError::InvalidFrequency {
        frequency,
        sample_rate,
    };

    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(invalid());
    }

    let period = (sample_rate as f64 / frequency as f64 - 0.5).floor();
    if period < 1.0 {
        return Err(invalid());
    }

    Ok(period as usize)
}

#[derive(Debug, Clone, Copy)]
pub struct KarplusStrong {
    /// Per-sample loss factor, in (0, 1).
    pub decay: f32,
    /// Weight of the current tap in the loop filter, in (0, 1).
    pub smoothing: f32,
}

impl Default for KarplusStrong {
    fn default() -> Self {
        Self {
            decay: 0.992,
            smoothing: 0.5,
        }
    }
}

impl KarplusStrong {
    pub fn new(decay: f32, smoothing: f32) -> Self {
        Self { decay, smoothing }
    }

    /// Recirculate `excitation` until the output is `length` samples long.
    ///
    /// The delay line takes the excitation's length as its period. If
    /// `length` is shorter than the excitation the output is truncated to it.
    pub fn render(&self, excitation: &[f32], length: usize) -> Result<MonoSignal> {
        let mut line = DelayLine::from_samples(excitation.to_vec())?;

        let mut output = Vec::with_capacity(length.max(excitation.len()));
        output.extend_from_slice(excitation);
        output.truncate(length);

        let s = self.smoothing;
        let d = self.decay;
        let mut prev = 0.0f32;

        while output.len() < length {
            let delayed = line.read();
            let filtered = s * delayed + (1.0 - s) * prev;
            let value = filtered * d;

            line.write(value);
            prev = delayed;
            line.advance();

            output.push(value);
        }

        debug!(period = line.capacity(), length, "string rendered");
        Ok(output)
    }
}

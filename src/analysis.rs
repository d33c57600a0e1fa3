//! Offline measurements of rendered notes.

/*
Analysis
========

A handful of measurements for checking that a note behaves: how loud it is,
how it decays, and what pitch it lands on.

Vocabulary
----------

  peak          Largest absolute sample value.

  RMS           Root mean square over a window: sqrt(mean(x²)). Tracks
                perceived loudness far better than peak.

  windowed RMS  RMS of consecutive, non-overlapping windows. A decaying
                note gives a falling sequence.

  FFT bin       With an N-point FFT at sample rate fs, bin k covers
                frequency k · fs / N. At 44.1 kHz and N = 16384 a bin is
                ~2.7 Hz wide.


Pitch Estimate
--------------

We take a Hann-windowed FFT of a stretch of the note, find the strongest
bin, and refine it by fitting a parabola through that bin and its two
neighbours (on log magnitude). The vertex offset `p` is

    p = ½ · (a - c) / (a - 2b + c)

where a, b, c are the log magnitudes left of, at, and right of the peak.
This gets well under a bin of error for a clean tone.
*/

use std::f32::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};

use crate::Frame;

pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum: f64 = signal.iter().map(|&x| (x as f64) * (x as f64)).sum();
    (sum / signal.len() as f64).sqrt() as f32
}

/// RMS of each complete `window`-sample block.
pub fn windowed_rms(signal: &[f32], window: usize) -> Vec<f32> {
    if window == 0 {
        return Vec::new();
    }
    signal.chunks_exact(window).map(rms).collect()
}

/// Average of the two channels.
pub fn mid(signal: &[Frame]) -> Vec<f32> {
    signal.iter().map(|&[l, r]| 0.5 * (l + r)).collect()
}

/// Dominant frequency of `signal` in Hz, or `None` if it is silent or too
/// short to analyse (fewer than 64 samples).
pub fn estimate_pitch(signal: &[f32], sample_rate: u32) -> Option<f32> {
    if signal.len() < 64 {
        return None;
    }

    let n = signal.len().next_power_of_two().min(1 << 16);
    let used = signal.len().min(n);

    let mut buffer: Vec<Complex<f32>> = signal[..used]
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let hann = 0.5 - 0.5 * (2.0 * PI * i as f32 / (used - 1) as f32).cos();
            Complex::new(x * hann, 0.0)
        })
        .collect();
    buffer.resize(n, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f32>::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    let magnitudes: Vec<f32> = buffer[..n / 2].iter().map(|c| c.norm()).collect();

    // Skip DC
    let (bin, &strongest) = magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.total_cmp(b.1))?;
    if strongest <= f32::EPSILON {
        return None;
    }

    let offset = if bin + 1 < magnitudes.len() {
        let a = magnitudes[bin - 1].max(1e-12).ln();
        let b = strongest.ln();
        let c = magnitudes[bin + 1].max(1e-12).ln();
        let denom = a - 2.0 * b + c;
        if denom.abs() > f32::EPSILON {
            0.5 * (a - c) / denom
        } else {
            0.0
        }
    } else {
        0.0
    };

    Some((bin as f32 + offset) * sample_rate as f32 / n as f32)
}

/// Headline numbers for one rendered note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSummary {
    pub frames: usize,
    pub peak: f32,
    /// RMS of the final 100 ms.
    pub tail_rms: f32,
    pub pitch: Option<f32>,
}

impl NoteSummary {
    pub fn of(signal: &[Frame], sample_rate: u32) -> Self {
        let mono = mid(signal);
        let tail = (sample_rate as usize / 10).min(mono.len());

        // Skip the first 50 ms so the attack transient does not dominate
        let body_start = (sample_rate as usize / 20).min(mono.len());
        let body_end = (body_start + (1 << 15)).min(mono.len());

        Self {
            frames: signal.len(),
            peak: peak(&mono),
            tail_rms: rms(&mono[mono.len() - tail..]),
            pitch: estimate_pitch(&mono[body_start..body_end], sample_rate),
        }
    }
}

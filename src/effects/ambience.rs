//! Ambience - Small Room Early Reflections
//!
//! The first few reflections off nearby walls arrive 5-30 ms after the direct
//! sound. They are too close to hear as echoes; instead they make a dry,
//! close-miked source sound like it is sitting in a room.
//!
//! ```text
//! Input ──┬─────────────────────────────→ (+) ──→ Output
//!         ├──→ [delay 10ms] ──→ × 0.10 ──→ ↑
//!         └──→ [delay 23ms] ──→ × 0.05 ──→ ↑
//! ```
//!
//! Each tap adds a scaled copy of the *input* at its delay. The output grows
//! by the longest delay so the last reflection is not cut off.

use crate::dsp::filter::Transform;
use crate::effects::EffectTap;
use crate::MonoSignal;

#[derive(Debug, Clone, Default)]
pub struct Ambience {
    taps: Vec<EffectTap>,
}

impl Ambience {
    pub fn new(taps: Vec<EffectTap>) -> Self {
        Self { taps }
    }

    pub fn taps(&self) -> &[EffectTap] {
        &self.taps
    }

    /// Samples added past the end of the input.
    pub fn tail_len(&self) -> usize {
        self.taps.iter().map(|t| t.delay_samples).max().unwrap_or(0)
    }
}

impl Transform<f32> for Ambience {
    fn apply(&self, input: &[f32]) -> MonoSignal {
        let mut output = vec![0.0f32; input.len() + self.tail_len()];
        output[..input.len()].copy_from_slice(input);

        for tap in &self.taps {
            for (out, &dry) in output[tap.delay_samples..].iter_mut().zip(input) {
                *out += dry * tap.gain;
            }
        }

        output
    }
}

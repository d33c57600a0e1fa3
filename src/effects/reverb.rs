//! Reverb - Echo Tail via a Bank of Delayed Taps
//!
//! A long, spacious tail is built from evenly spaced echoes that get quieter
//! with each step, with a little of each channel bled into the other so the
//! tail spreads across the stereo field.
//!
//! # Tap Bank Architecture
//!
//! ```text
//!            ┌──→ dry ──────────────────────────────────┐
//!            ├──→ [delay 1·D] ──→ × r¹ ──→ [cross-feed] ─┤
//! Input ─────┼──→ [delay 2·D] ──→ × r² ──→ [cross-feed] ─┼──→ (+) ──→ Output
//!            ├──→   ...                                  │
//!            └──→ [delay 7·D] ──→ × r⁷ ──→ [cross-feed] ─┘
//! ```
//!
//! Every tap reads the **dry** input. Nothing is fed back: the tail is a sum
//! of independently delayed copies, so it ends exactly `D · (taps - 1)`
//! samples after the input does. Making it recursive would change the sound.
//!
//! ## Cross-Feed
//!
//! Each echo is mixed across channels before it lands:
//!
//! ```text
//! out_L[i + k·D] += (0.7·L[i] + 0.3·R[i]) · r^k
//! out_R[i + k·D] += (0.7·R[i] + 0.3·L[i]) · r^k
//! ```
//!
//! # Parameters
//!
//! - **Base delay** `D`: spacing between echoes (200 ms by default)
//! - **Decay per step** `r`: level of each echo relative to the one before
//! - **Tap count**: including the dry tap at zero delay
//! - **Cross-feed**: share of the opposite channel in each echo

use crate::dsp::filter::Transform;
use crate::effects::EffectTap;
use crate::{Frame, StereoSignal};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapReverb {
    pub base_delay: usize,
    pub decay_per_step: f32,
    pub tap_count: usize,
    pub cross_feed: f32,
}

impl TapReverb {
    pub fn new(base_delay: usize, decay_per_step: f32, tap_count: usize) -> Self {
        Self {
            base_delay,
            decay_per_step,
            tap_count,
            cross_feed: 0.3,
        }
    }

    pub fn with_cross_feed(mut self, cross_feed: f32) -> Self {
        self.cross_feed = cross_feed;
        self
    }

    /// The wet taps, `k = 1 .. tap_count`.
    pub fn taps(&self) -> impl Iterator<Item = EffectTap> + '_ {
        (1..self.tap_count).map(move |k| {
            EffectTap::new(self.base_delay * k, self.decay_per_step.powi(k as i32))
        })
    }

    /// Samples added past the end of the input.
    pub fn tail_len(&self) -> usize {
        self.base_delay * self.tap_count.saturating_sub(1)
    }
}

impl Transform<Frame> for TapReverb {
    fn apply(&self, input: &[Frame]) -> StereoSignal {
        let mut output = vec![[0.0f32; 2]; input.len() + self.tail_len()];
        output[..input.len()].copy_from_slice(input);

        let direct = 1.0 - self.cross_feed;
        let cross = self.cross_feed;

        for tap in self.taps() {
            for (out, &[l, r]) in output[tap.delay_samples..].iter_mut().zip(input) {
                out[0] += (l * direct + r * cross) * tap.gain;
                out[1] += (r * direct + l * cross) * tap.gain;
            }
        }

        output
    }
}

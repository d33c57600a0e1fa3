//! Spatial effects applied to a finished note.
//!
//! Both effects are banks of independent delayed copies of the dry signal.
//! They extend the buffer to make room for the last echo and never feed
//! their own output back in.

/// Two-tap early reflections for the felt piano.
pub mod ambience;
/// Eight-tap cross-fed echo tail for the FM pluck.
pub mod reverb;

use serde::{Deserialize, Serialize};

pub use ambience::Ambience;
pub use reverb::TapReverb;

/// One delayed, attenuated copy of the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectTap {
    pub delay_samples: usize,
    pub gain: f32,
}

impl EffectTap {
    pub fn new(delay_samples: usize, gain: f32) -> Self {
        Self { delay_samples, gain }
    }
}

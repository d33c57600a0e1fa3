//! Low-level DSP primitives used by the note generators and effects.
//!
//! Everything here is deterministic given its inputs: randomness only enters
//! through a [`noise::NoiseSource`] supplied by the caller, and envelopes are
//! pure functions of the sample index.

/// Fixed-capacity circular buffer for one period of a string.
pub mod delay;
/// Stateless amplitude envelopes.
pub mod envelope;
/// Sequence-to-sequence transforms (moving average, repetition).
pub mod filter;
/// Injectable noise sources and wrap-around noise tables.
pub mod noise;
/// Phase-accurate sine evaluation.
pub mod oscillator;

pub use delay::DelayLine;
pub use filter::{MovingAverage, Transform};
pub use noise::{NoiseSource, NoiseTable, SeededNoise};

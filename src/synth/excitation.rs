//! Felt-hammer excitation burst.
//!
//! A plucked string is excited with raw white noise, which gives a bright,
//! scratchy attack. A felt hammer is softer: it pushes the string with a
//! rounded force pulse. We approximate that by smoothing a noise burst with
//! a moving average several times over, using a window a quarter of the
//! burst long, until it looks like a low, uneven hill.

use tracing::debug;

use crate::dsp::filter::{MovingAverage, Transform};
use crate::dsp::noise::NoiseSource;
use crate::error::Result;
use crate::MonoSignal;

#[derive(Debug, Clone, Copy)]
pub struct NoiseExcitation {
    /// Number of moving-average passes over the raw noise.
    pub passes: usize,
}

impl Default for NoiseExcitation {
    fn default() -> Self {
        Self { passes: 3 }
    }
}

impl NoiseExcitation {
    pub fn new(passes: usize) -> Self {
        Self { passes }
    }

    /// Smoothing window for a burst of `len` samples.
    pub fn window(len: usize) -> usize {
        len / 4
    }

    /// Produce a burst of exactly `len` samples.
    ///
    /// Fails with `DegenerateFilterWindow` when `len < 4`, before any noise
    /// is drawn.
    pub fn generate<N: NoiseSource>(&self, len: usize, noise: &mut N) -> Result<MonoSignal> {
        let smoother = MovingAverage::new(Self::window(len))?.repeat(self.passes);

        let raw = noise.burst(len);
        let burst = smoother.apply(&raw);

        debug!(len, window = Self::window(len), passes = self.passes, "shaped excitation");
        Ok(burst)
    }
}

use crate::error::{Result, SynthError};

/// Circular buffer with a single read/write pointer.
///
/// Capacity is fixed at construction and never zero. The pointer always
/// stays in `0..capacity`, so reads and writes at the pointer are in range.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    pos: usize,
}

impl DelayLine {
    /// Load the line with an initial waveform (e.g. an excitation burst).
    pub fn from_samples(samples: Vec<f32>) -> Result<Self> {
        if samples.is_empty() {
            return Err(SynthError::EmptyDelayLine);
        }

        Ok(Self {
            buffer: samples,
            pos: 0,
        })
    }

    #[inline]
    pub fn read(&self) -> f32 {
        self.buffer[self.pos]
    }

    #[inline]
    pub fn write(&mut self, value: f32) {
        self.buffer[self.pos] = value;
    }

    /// Step the pointer forward, wrapping at capacity. Returns the new position.
    #[inline]
    pub fn advance(&mut self) -> usize {
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        self.pos
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

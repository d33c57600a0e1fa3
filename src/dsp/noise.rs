//! Noise sources.

/*
Deterministic Noise
===================

Both voices need randomness: the felt piano shapes its hammer strike from a
burst of white noise, and the FM pluck layers a short grain of noise over
its attack. Neither draws from a process-wide generator. Instead the caller
hands in a `NoiseSource`, so a fixed seed reproduces a note bit for bit.

Vocabulary
----------

  uniform noise   Independent samples drawn evenly from [-1.0, +1.0].
                  Spectrally flat ("white").

  noise table     A short pre-drawn run of uniform noise, read with
                  wrap-around. Lets a generator index noise by sample
                  position instead of drawing per sample:

                      table[i % table.len()]

                  With a 1000-entry table at 44.1 kHz the pattern repeats
                  every ~23 ms, which is fine for a fading texture layer.
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SynthError};

/// A supplier of uniform noise in `[-1.0, 1.0]`.
pub trait NoiseSource {
    fn next_uniform(&mut self) -> f32;

    /// Draw `len` independent samples.
    fn burst(&mut self, len: usize) -> Vec<f32> {
        (0..len).map(|_| self.next_uniform()).collect()
    }

    /// Draw a wrap-around table of `len` samples.
    fn table(&mut self, len: usize) -> Result<NoiseTable> {
        NoiseTable::new(self.burst(len))
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn next_uniform(&mut self) -> f32 {
        (**self).next_uniform()
    }
}

/// Seedable pseudo-random source.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy; output differs run to run.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn next_uniform(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Fixed sequence of noise values indexed with wrap-around.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseTable {
    values: Vec<f32>,
}

impl NoiseTable {
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.is_empty() {
            return Err(SynthError::config("noise table must not be empty"));
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn at(&self, index: usize) -> f32 {
        self.values[index % self.values.len()]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replay the table as a source, cycling from the start.
    pub fn replay(&self) -> Replay<'_> {
        Replay {
            table: self,
            pos: 0,
        }
    }
}

/// Cycles through a [`NoiseTable`]; used to inject known "noise" in tests.
pub struct Replay<'a> {
    table: &'a NoiseTable,
    pos: usize,
}

impl NoiseSource for Replay<'_> {
    fn next_uniform(&mut self) -> f32 {
        let value = self.table.at(self.pos);
        self.pos += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let a = SeededNoise::new(7).burst(256);
        let b = SeededNoise::new(7).burst(256);
        let c = SeededNoise::new(8).burst(256);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_uniform_range() {
        let mut noise = SeededNoise::new(1);
        for _ in 0..10_000 {
            let s = noise.next_uniform();
            assert!((-1.0..=1.0).contains(&s), "sample out of range: {s}");
        }
    }

    #[test]
    fn test_table_wraps() {
        let table = NoiseTable::new(vec![0.1, 0.2, 0.3]).unwrap();
        assert_eq!(table.at(0), 0.1);
        assert_eq!(table.at(4), 0.2);
        assert_eq!(table.at(3_000), 0.1);
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(NoiseTable::new(Vec::new()).is_err());
        assert!(SeededNoise::new(0).table(0).is_err());
    }

    #[test]
    fn test_replay_cycles() {
        let table = NoiseTable::new(vec![1.0, -1.0]).unwrap();
        let mut replay = table.replay();
        assert_eq!(replay.burst(5), vec![1.0, -1.0, 1.0, -1.0, 1.0]);
    }
}

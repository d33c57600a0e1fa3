//! Offline sequence-to-sequence transforms.

/*
Transforms
==========

A `Transform` takes a whole signal and returns a new one. Nothing streams:
every note is rendered completely in memory, so effects are free to grow
the buffer (a reverb tail is longer than its input) and to look at any
input sample they like.

Two building blocks cover the hammer smoothing:

  MovingAverage   Box filter over the trailing `window` samples.
  Repeat          Run the same transform N times in sequence.

  let hammer = MovingAverage::new(42)?.repeat(3);   // soft "hill" shape

The effects (`Ambience`, `TapReverb`) implement the same trait.


Moving Average
--------------

Each output sample is the mean of the current input sample and up to
`window - 1` samples before it:

    y[i] = mean(x[max(0, i - window + 1) ..= i])

Near the start there is not a full window of history, so the segment
shrinks instead of reading before index 0. The first output is just x[0],
the second is the mean of x[0] and x[1], and so on until the window fills.

Run once, this is a gentle low-pass. Run three times, the impulse response
becomes a smooth bell (box * box * box), which turns a burst of white
noise into the rounded onset of a felt hammer.

A window of zero would divide by zero, so it is rejected at construction.
*/

use crate::error::{Result, SynthError};

/// A pure transform from one signal to another.
pub trait Transform<T> {
    fn apply(&self, input: &[T]) -> Vec<T>;

    /// Apply this transform `passes` times in sequence.
    fn repeat(self, passes: usize) -> Repeat<Self>
    where
        Self: Sized,
    {
        Repeat { inner: self, passes }
    }
}

/// Trailing box filter with a shrinking window at the start of the signal.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Result<Self> {
        if window < 1 {
            return Err(SynthError::DegenerateFilterWindow { window });
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Transform<f32> for MovingAverage {
    fn apply(&self, input: &[f32]) -> Vec<f32> {
        let mut output = Vec::with_capacity(input.len());
        let mut sum = 0.0f64;

        for (i, &sample) in input.iter().enumerate() {
            sum += sample as f64;
            if i >= self.window {
                sum -= input[i - self.window] as f64;
            }
            let count = (i + 1).min(self.window);
            output.push((sum / count as f64) as f32);
        }

        output
    }
}

/// The same transform applied several times, each pass reading the last.
#[derive(Debug, Clone)]
pub struct Repeat<F> {
    inner: F,
    passes: usize,
}

impl<T: Clone, F: Transform<T>> Transform<T> for Repeat<F> {
    fn apply(&self, input: &[T]) -> Vec<T> {
        let mut signal = input.to_vec();
        for _ in 0..self.passes {
            signal = self.inner.apply(&signal);
        }
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct O(n·w) reference: mean of the trailing segment.
    fn naive_average(input: &[f32], window: usize) -> Vec<f32> {
        (0..input.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(window);
                let segment = &input[start..=i];
                segment.iter().sum::<f32>() / segment.len() as f32
            })
            .collect()
    }

    #[test]
    fn test_zero_window_is_rejected() {
        assert!(matches!(
            MovingAverage::new(0),
            Err(SynthError::DegenerateFilterWindow { window: 0 })
        ));
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let input = vec![0.3, -0.7, 0.1, 0.9];
        let output = MovingAverage::new(1).unwrap().apply(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_matches_trailing_segment_mean() {
        let input: Vec<f32> = (0..200).map(|i| ((i * 37) % 17) as f32 / 8.0 - 1.0).collect();
        let fast = MovingAverage::new(13).unwrap().apply(&input);
        let slow = naive_average(&input, 13);

        assert_eq!(fast.len(), input.len());
        for (i, (a, b)) in fast.iter().zip(&slow).enumerate() {
            assert!((a - b).abs() < 1e-5, "mismatch at {i}: {a} vs {b}");
        }
    }

    #[test]
    fn test_shrinking_window_at_start() {
        let output = MovingAverage::new(4).unwrap().apply(&[4.0, 0.0, 2.0, 2.0, 8.0]);
        assert_eq!(output[0], 4.0);
        assert_eq!(output[1], 2.0);
        assert_eq!(output[2], 2.0);
        assert_eq!(output[3], 2.0);
        assert_eq!(output[4], 3.0);
    }

    #[test]
    fn test_repeat_reads_previous_pass() {
        let input = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let once = MovingAverage::new(2).unwrap();
        let twice = once.apply(&once.apply(&input));
        let repeated = MovingAverage::new(2).unwrap().repeat(2).apply(&input);
        assert_eq!(repeated, twice);
    }

    #[test]
    fn test_repeated_smoothing_lowers_roughness() {
        let input: Vec<f32> = (0..128).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let smoothed = MovingAverage::new(8).unwrap().repeat(3).apply(&input);

        let roughness = |s: &[f32]| s.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f32>();
        assert!(roughness(&smoothed) < roughness(&input) * 0.1);
    }
}

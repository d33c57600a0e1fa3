//! Key-mechanism thump.
//!
//! A felt piano is close-miked, so you hear the action as well as the string:
//! a dull, very short knock at the moment of the strike. It is rendered as a
//! low sine whose amplitude falls off exponentially per *sample*, and summed
//! under the start of the string output.

use serde::{Deserialize, Serialize};

use crate::dsp::envelope::exp_decay;
use crate::dsp::oscillator::{sample_time, sine};
use crate::MonoSignal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thump {
    /// Sine frequency in Hz.
    pub frequency: f32,
    /// Burst length in samples.
    pub length: usize,
    /// Decay per sample: level = exp(-decay_rate · i).
    pub decay_rate: f32,
    pub gain: f32,
}

impl Default for Thump {
    fn default() -> Self {
        Self {
            frequency: 50.0,
            length: 1_000,
            decay_rate: 0.01,
            gain: 0.15,
        }
    }
}

impl Thump {
    pub fn render(&self, sample_rate: u32) -> MonoSignal {
        (0..self.length)
            .map(|i| {
                let t = sample_time(i, sample_rate);
                let env = exp_decay(self.decay_rate as f64, i as f64);
                (sine(self.frequency as f64, t, 0.0) * env * self.gain as f64) as f32
            })
            .collect()
    }

    /// Add the burst onto the start of `signal`, never past its end.
    pub fn mix_into(&self, signal: &mut [f32], sample_rate: u32) {
        let burst = self.render(sample_rate);
        for (out, thump) in signal.iter_mut().zip(burst) {
            *out += thump;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_shape() {
        let thump = Thump::default();
        let burst = thump.render(44_100);

        assert_eq!(burst.len(), 1_000);
        assert_eq!(burst[0], 0.0, "sine starts at zero phase");
        assert!(burst.iter().all(|s| s.abs() <= 0.15));

        // exp(-0.01 · 999) is about 4.6e-5 of the gain
        assert!(burst[999].abs() < 1e-5);
    }

    #[test]
    fn test_mix_is_additive() {
        let thump = Thump::default();
        let burst = thump.render(44_100);

        let mut signal = vec![0.25f32; 1_500];
        thump.mix_into(&mut signal, 44_100);

        for i in 0..1_000 {
            assert!((signal[i] - (0.25 + burst[i])).abs() < 1e-7);
        }
        assert!(signal[1_000..].iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_mix_into_short_signal() {
        let thump = Thump::default();
        let mut signal = vec![0.0f32; 10];
        thump.mix_into(&mut signal, 44_100);

        assert_eq!(signal, thump.render(44_100)[..10].to_vec());
    }
}

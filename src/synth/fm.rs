//! Two-operator FM pluck with shimmer and grain layers.

/*
FM Pluck
========

Frequency modulation bends the phase of a carrier sine with a second sine,
the modulator. With the modulator at twice the carrier frequency the
sidebands land on harmonics of the carrier, giving a bell-like, slightly
hollow pluck.

    modulator = sin(2π · f_mod · t) · index
    carrier   = sin(2π · f_c · t + modulator)

Vocabulary
----------

  modulation index   How far the modulator pushes the carrier's phase.
                     0 is a pure sine; 3 is bright and glassy.

  ratio              f_mod / f_c. Integer ratios stay harmonic.

  shimmer            Two plain sines very slightly detuned from the carrier,
                     one per channel. Their gain swells on a slow sine
                     (sin(0.5·t)), so they wash in as the note rings.

  grain              A burst of table noise at the very start, fading
                     linearly to nothing over a fixed window. Adds breath
                     to the attack.


Timbre Follows Loudness
-----------------------

The modulation index is driven by the *envelope value*, not by time:

    index = start · env + end · (1 - env)

At full level the pluck is bright (index → start); as it fades it mellows
toward `end`. Because both come from the same number they move in lock-step,
the way a real plucked string loses its upper partials as it quiets.


Stereo
------

The right carrier runs a small constant phase offset ahead of the left,
and each channel gets its own shimmer detune. The grain is identical in
both channels.

    L = carrier(φ=0)   + shimmer_L · g_s + grain
    R = carrier(φ=off) + shimmer_R · g_s + grain

Both channels are finally scaled by `env · volume`.
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dsp::envelope::PluckEnvelope;
use crate::dsp::noise::NoiseTable;
use crate::dsp::oscillator::{sample_time, sine};
use crate::StereoSignal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmPluck {
    /// Modulator frequency as a multiple of the carrier.
    pub mod_ratio: f32,
    pub mod_index_start: f32,
    pub mod_index_end: f32,
    /// Envelope decay rate per second.
    pub decay_rate: f32,
    pub attack_samples: usize,
    /// Right-channel carrier phase offset in radians.
    pub stereo_phase: f32,
    /// Shimmer detune ratios, `(left, right)`.
    pub shimmer_ratios: (f32, f32),
    pub shimmer_gain: f32,
    /// Rate (rad/s) of the slow sine that swells the shimmer in.
    pub shimmer_rate: f32,
    pub grain_gain: f32,
    pub grain_window: usize,
    /// Master volume applied with the envelope.
    pub volume: f32,
}

impl Default for FmPluck {
    fn default() -> Self {
        Self {
            mod_ratio: 2.0,
            mod_index_start: 3.0,
            mod_index_end: 0.5,
            decay_rate: 3.0,
            attack_samples: 200,
            stereo_phase: 0.05,
            shimmer_ratios: (1.002, 0.998),
            shimmer_gain: 0.3,
            shimmer_rate: 0.5,
            grain_gain: 0.1,
            grain_window: 20_000,
            volume: 0.5,
        }
    }
}

impl FmPluck {
    /// Render `length` stereo frames at `frequency`.
    ///
    /// Output depends only on the arguments; the same `grain` table yields
    /// bit-identical frames.
    pub fn render(
        &self,
        frequency: f32,
        length: usize,
        sample_rate: u32,
        grain: &NoiseTable,
    ) -> StereoSignal {
        let envelope = PluckEnvelope::new(self.decay_rate as f64, self.attack_samples, sample_rate);

        let f_c = frequency as f64;
        let f_mod = f_c * self.mod_ratio as f64;
        let index_start = self.mod_index_start as f64;
        let index_end = self.mod_index_end as f64;
        let phase = self.stereo_phase as f64;
        let (ratio_l, ratio_r) = (self.shimmer_ratios.0 as f64, self.shimmer_ratios.1 as f64);
        let volume = self.volume as f64;

        let mut frames = Vec::with_capacity(length);

        for i in 0..length {
            let t = sample_time(i, sample_rate);
            let env = envelope.level(i);

            let index = index_start * env + index_end * (1.0 - env);
            let modulator = sine(f_mod, t, 0.0) * index;

            let mut left = sine(f_c, t, modulator);
            let mut right = sine(f_c, t, modulator + phase);

            let shimmer = (t * self.shimmer_rate as f64).sin() * self.shimmer_gain as f64 * env;
            left += sine(f_c * ratio_l, t, 0.0) * shimmer;
            right += sine(f_c * ratio_r, t, 0.0) * shimmer;

            if i < self.grain_window {
                let fade = 1.0 - i as f64 / self.grain_window as f64;
                let n = grain.at(i) as f64 * fade * self.grain_gain as f64;
                left += n;
                right += n;
            }

            let level = env * volume;
            frames.push([(left * level) as f32, (right * level) as f32]);
        }

        debug!(frequency, length, "fm pluck rendered");
        frames
    }
}

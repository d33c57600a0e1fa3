/*
Stateless Envelopes
===================

Every envelope in this crate is a pure function of the sample index. There
is no stage machine and nothing to reset between notes: ask for the level at
sample `i` and you get the same answer every time.

Vocabulary
----------

  level         Envelope output, 0.0 to 1.0. Multiplies the signal.

  decay rate    `k` in exp(-k·x). With `x` in seconds, the level falls to
                1/e after 1/k seconds. With `x` in samples, after 1/k
                samples.

  attack        Linear ramp from 0.0 to 1.0 over a fixed number of samples,
                then held at 1.0. Keeps the onset from clicking.


Pluck Shape
-----------

The FM voice multiplies the two:

    level(i) = exp(-k · i / sample_rate) · min(1, i / attack_samples)

  Level
    1.0 ┐  ╱╲
        │ ╱  ╲
        │╱    ╲___
    0.0 └──────────────────→ samples
        attack  exponential decay

Because the attack ramp starts at exactly zero, sample 0 is always silent.
*/

/// `exp(-rate · x)`.
#[inline]
pub fn exp_decay(rate: f64, x: f64) -> f64 {
    (-rate * x).exp()
}

/// Linear ramp reaching 1.0 at `attack_samples`, held afterwards.
#[inline]
pub fn linear_attack(index: usize, attack_samples: usize) -> f64 {
    if attack_samples == 0 {
        return 1.0;
    }
    (index as f64 / attack_samples as f64).min(1.0)
}

/// Linear attack into an exponential decay, evaluated per sample.
#[derive(Debug, Clone, Copy)]
pub struct PluckEnvelope {
    pub decay_rate: f64,
    pub attack_samples: usize,
    pub sample_rate: u32,
}

impl PluckEnvelope {
    pub fn new(decay_rate: f64, attack_samples: usize, sample_rate: u32) -> Self {
        Self {
            decay_rate,
            attack_samples,
            sample_rate,
        }
    }

    #[inline]
    pub fn level(&self, index: usize) -> f64 {
        let t = index as f64 / self.sample_rate as f64;
        exp_decay(self.decay_rate, t) * linear_attack(index, self.attack_samples)
    }
}

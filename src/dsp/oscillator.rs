use std::f64::consts::TAU;

/// `sin(2π·frequency·t + phase)`.
///
/// Phases are computed in `f64`: a 5 second note at 466 Hz reaches ~14 600
/// radians, where `f32` would lose about a milliradian per sample.
#[inline]
pub fn sine(frequency: f64, t: f64, phase: f64) -> f64 {
    (TAU * frequency * t + phase).sin()
}

/// Time in seconds of sample `index`.
#[inline]
pub fn sample_time(index: usize, sample_rate: u32) -> f64 {
    index as f64 / sample_rate as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000;
        let frequency = 440.0;

        // Quarter period of 440 Hz lands on the peak
        let t = 1.0 / (4.0 * frequency);
        assert!((sine(frequency, t, 0.0) - 1.0).abs() < 1e-12);

        let sample_index = 12;
        let expected = (TAU * frequency * sample_index as f64 / sample_rate as f64).sin();
        let actual = sine(frequency, sample_time(sample_index, sample_rate), 0.0);
        assert!((actual - expected).abs() < 1e-12, "expected {expected}, got {actual}");
    }

    #[test]
    fn phase_offset_shifts_waveform() {
        let shifted = sine(100.0, 0.0, std::f64::consts::FRAC_PI_2);
        assert!((shifted - 1.0).abs() < 1e-12);
    }
}

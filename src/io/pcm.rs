//! Float to 16-bit PCM conversion.
//!
//! Each sample is scaled by the note's amplitude, clipped to [-1, 1], then
//! multiplied by 32767 and truncated toward zero. Clipping happens before
//! the integer cast, so an overloaded sample lands on the rail instead of
//! wrapping around. Frames are packed little-endian, left then right.

use crate::Frame;

const FULL_SCALE: f32 = i16::MAX as f32;

/// Format metadata carried alongside the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    pub fn stereo16(sample_rate: u32) -> Self {
        Self {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }

    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// Interleaved little-endian 16-bit PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmStream {
    pub format: PcmFormat,
    pub data: Vec<u8>,
}

impl PcmStream {
    pub fn frames(&self) -> usize {
        self.data.len() / self.format.bytes_per_frame()
    }

    /// Decode back to interleaved samples.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.data
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PcmEncoder {
    /// Master scale applied before clipping.
    pub amplitude: f32,
    pub sample_rate: u32,
}

impl PcmEncoder {
    pub fn new(amplitude: f32, sample_rate: u32) -> Self {
        Self {
            amplitude,
            sample_rate,
        }
    }

    #[inline]
    pub fn quantize(&self, sample: f32) -> i16 {
        let clipped = (sample * self.amplitude).clamp(-1.0, 1.0);
        (clipped * FULL_SCALE) as i16
    }

    pub fn encode(&self, signal: &[Frame]) -> PcmStream {
        let format = PcmFormat::stereo16(self.sample_rate);
        let mut data = Vec::with_capacity(signal.len() * format.bytes_per_frame());

        for &[l, r] in signal {
            data.extend_from_slice(&self.quantize(l).to_le_bytes());
            data.extend_from_slice(&self.quantize(r).to_le_bytes());
        }

        PcmStream { format, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_scale_and_truncation() {
        let enc = PcmEncoder::new(1.0, 44_100);
        assert_eq!(enc.quantize(0.0), 0);
        assert_eq!(enc.quantize(1.0), 32_767);
        assert_eq!(enc.quantize(-1.0), -32_767);
        // 0.5 · 32767 = 16383.5, truncated toward zero
        assert_eq!(enc.quantize(0.5), 16_383);
        assert_eq!(enc.quantize(-0.5), -16_383);
    }

    #[test]
    fn test_overload_clips_to_rail() {
        let enc = PcmEncoder::new(1.0, 44_100);
        for s in [1.0001, 2.0, 1e9, f32::INFINITY] {
            assert_eq!(enc.quantize(s), i16::MAX, "{s} should clip high");
            assert_eq!(enc.quantize(-s), -i16::MAX, "{} should clip low", -s);
        }
    }

    #[test]
    fn test_amplitude_applies_before_clipping() {
        let enc = PcmEncoder::new(0.6, 44_100);
        // 1.5 · 0.6 = 0.9, inside the rails
        assert_eq!(enc.quantize(1.5), (0.9f32 * 32_767.0) as i16);
        assert_eq!(enc.quantize(10.0), i16::MAX);
    }

    #[test]
    fn test_interleaved_little_endian() {
        let enc = PcmEncoder::new(1.0, 22_050);
        let stream = enc.encode(&[[1.0, -1.0], [0.0, 0.5]]);

        assert_eq!(stream.format, PcmFormat::stereo16(22_050));
        assert_eq!(stream.frames(), 2);
        assert_eq!(
            stream.data,
            vec![0xFF, 0x7F, 0x01, 0x80, 0x00, 0x00, 0xFF, 0x3F]
        );
        assert_eq!(
            stream.samples().collect::<Vec<_>>(),
            vec![32_767, -32_767, 0, 16_383]
        );
    }
}

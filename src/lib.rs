pub mod analysis; // Offline signal inspection (RMS, peak, pitch)
pub mod config;
pub mod dsp;
pub mod effects; // Early reflections and tap reverb
pub mod error;
pub mod io;
pub mod render; // Voice pipelines and batch rendering
pub mod synth; // Note generators built on the dsp primitives

pub use config::{NoteTable, RenderConfig};
pub use error::{Result, SynthError};
pub use render::{
    batch_jobs, job_noise, render_batch, render_note, BatchReport, RenderedNote, Voice,
};

/// Mono signal: one sample per frame.
pub type MonoSignal = Vec<f32>;

/// One stereo frame, `[left, right]`.
pub type Frame = [f32; 2];

/// Stereo signal: channels are time-aligned by construction.
pub type StereoSignal = Vec<Frame>;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Duplicate a mono signal into both channels.
pub fn to_stereo(mono: &[f32]) -> StereoSignal {
    mono.iter().map(|&s| [s, s]).collect()
}

/// Convert a duration in milliseconds to whole samples (truncating).
pub(crate) fn ms_to_samples(ms: f32, sample_rate: u32) -> usize {
    (ms as f64 / 1000.0 * sample_rate as f64) as usize
}

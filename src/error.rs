//! Error type shared by the synthesis core and its I/O collaborators.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Error)]
pub enum SynthError {
    /// The delay line for this pitch would hold fewer than one sample.
    #[error(
        "frequency {frequency} Hz is not renderable at {sample_rate} Hz (delay line would be empty)"
    )]
    InvalidFrequency { frequency: f32, sample_rate: u32 },

    /// A circular buffer was asked to hold nothing.
    #[error("delay line must hold at least one sample")]
    EmptyDelayLine,

    /// A moving-average pass was asked to average over zero samples.
    #[error("smoothing window must be at least one sample, got {window}")]
    DegenerateFilterWindow { window: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),
}

impl SynthError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

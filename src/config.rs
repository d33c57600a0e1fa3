//! Render configuration.
//!
//! Every knob the renderer has lives here, with defaults that reproduce the
//! stock five-note set. A TOML file may override any subset of fields:
//!
//! ```toml
//! sample_rate = 48000
//!
//! [felt_piano]
//! decay = 0.995
//!
//! [[notes]]
//! name = "A4"
//! frequency = 440.0
//! ```
//!
//! Supplying `[[notes]]` replaces the whole note table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::effects::{Ambience, EffectTap, TapReverb};
use crate::error::{Result, SynthError};
use crate::synth::{FmPluck, Thump};
use crate::{ms_to_samples, DEFAULT_SAMPLE_RATE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub sample_rate: u32,
    pub notes: NoteTable,
    pub felt_piano: FeltPianoConfig,
    pub fm_pluck: FmPluckConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            notes: NoteTable::default(),
            felt_piano: FeltPianoConfig::default(),
            fm_pluck: FmPluckConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Whole samples in `seconds`, truncated.
    pub fn duration_samples(&self, seconds: f32) -> usize {
        (seconds as f64 * self.sample_rate as f64) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SynthError::config("sample_rate must be positive"));
        }
        if self.felt_piano.file_prefix == self.fm_pluck.file_prefix {
            return Err(SynthError::config(format!(
                "felt_piano and fm_pluck share file_prefix '{}'; output names would collide",
                self.felt_piano.file_prefix
            )));
        }
        self.notes.validate()?;
        self.felt_piano.validate()?;
        self.fm_pluck.validate()
    }
}

/// A named pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub frequency: f32,
}

impl Note {
    pub fn new(name: impl Into<String>, frequency: f32) -> Self {
        Self {
            name: name.into(),
            frequency,
        }
    }
}

/// Ordered note name → frequency mapping. Order gives each note its
/// 1-based index in output file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteTable(Vec<Note>);

impl Default for NoteTable {
    /// C minor pentatonic around middle C.
    fn default() -> Self {
        Self::from_pairs([
            ("C4", 261.63),
            ("Eb4", 311.13),
            ("F4", 349.23),
            ("G4", 392.00),
            ("Bb4", 466.16),
        ])
    }
}

impl NoteTable {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        Self(pairs.into_iter().map(|(n, f)| Note::new(n, f)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.0.iter().find(|n| n.name == name).map(|n| n.frequency)
    }

    /// Keep only the named notes, preserving table order.
    pub fn select(&self, names: &[String]) -> Result<Self> {
        if let Some(missing) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(SynthError::config(format!("unknown note '{missing}'")));
        }
        Ok(Self(
            self.0
                .iter()
                .filter(|n| names.contains(&n.name))
                .cloned()
                .collect(),
        ))
    }

    fn validate(&self) -> Result<()> {
        for note in &self.0 {
            if note.name.is_empty() {
                return Err(SynthError::config("note names must not be empty"));
            }
            if !note.frequency.is_finite() || note.frequency <= 0.0 {
                return Err(SynthError::config(format!(
                    "note '{}' has invalid frequency {}",
                    note.name, note.frequency
                )));
            }
        }
        Ok(())
    }
}

/// One early reflection, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapConfig {
    pub delay_ms: f32,
    pub gain: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeltPianoConfig {
    pub file_prefix: String,
    pub duration_seconds: f32,
    /// Encoder scale, applied before clipping.
    pub amplitude: f32,
    /// Per-sample string loss.
    pub decay: f32,
    /// Loop filter weight on the current tap.
    pub smoothing: f32,
    /// Moving-average passes over the hammer noise.
    pub smoothing_passes: usize,
    pub thump: Thump,
    pub ambience_taps: Vec<TapConfig>,
}

impl Default for FeltPianoConfig {
    fn default() -> Self {
        Self {
            file_prefix: "felt_piano".to_string(),
            duration_seconds: 5.0,
            amplitude: 0.6,
            decay: 0.992,
            smoothing: 0.5,
            smoothing_passes: 3,
            thump: Thump::default(),
            ambience_taps: vec![
                TapConfig {
                    delay_ms: 10.0,
                    gain: 0.1,
                },
                TapConfig {
                    delay_ms: 23.0,
                    gain: 0.05,
                },
            ],
        }
    }
}

impl FeltPianoConfig {
    pub fn ambience(&self, sample_rate: u32) -> Ambience {
        Ambience::new(
            self.ambience_taps
                .iter()
                .map(|t| EffectTap::new(ms_to_samples(t.delay_ms, sample_rate), t.gain))
                .collect(),
        )
    }

    fn validate(&self) -> Result<()> {
        check_duration("felt_piano", self.duration_seconds)?;
        check_unit("felt_piano.amplitude", self.amplitude)?;
        check_open_unit("felt_piano.decay", self.decay)?;
        check_open_unit("felt_piano.smoothing", self.smoothing)?;
        if self.ambience_taps.iter().any(|t| !(t.delay_ms >= 0.0) || !t.gain.is_finite()) {
            return Err(SynthError::config(
                "felt_piano.ambience_taps need non-negative delays and finite gains",
            ));
        }
        Ok(())
    }
}

/// Tap reverb settings, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbConfig {
    pub base_delay_ms: f32,
    pub decay_per_step: f32,
    /// Taps including the dry one.
    pub tap_count: usize,
    pub cross_feed: f32,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 200.0,
            decay_per_step: 0.6,
            tap_count: 8,
            cross_feed: 0.3,
        }
    }
}

impl ReverbConfig {
    pub fn reverb(&self, sample_rate: u32) -> TapReverb {
        TapReverb::new(
            ms_to_samples(self.base_delay_ms, sample_rate),
            self.decay_per_step,
            self.tap_count,
        )
        .with_cross_feed(self.cross_feed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmPluckConfig {
    pub file_prefix: String,
    /// Length of the dry tone; the reverb extends it.
    pub duration_seconds: f32,
    /// Encoder scale, applied before clipping.
    pub amplitude: f32,
    /// Entries in the grain noise table, drawn fresh per note.
    pub noise_table_len: usize,
    pub tone: FmPluck,
    pub reverb: ReverbConfig,
}

impl Default for FmPluckConfig {
    fn default() -> Self {
        Self {
            file_prefix: "note".to_string(),
            duration_seconds: 2.5,
            amplitude: 1.0,
            noise_table_len: 1_000,
            tone: FmPluck::default(),
            reverb: ReverbConfig::default(),
        }
    }
}

impl FmPluckConfig {
    fn validate(&self) -> Result<()> {
        check_duration("fm_pluck", self.duration_seconds)?;
        check_unit("fm_pluck.amplitude", self.amplitude)?;
        check_unit("fm_pluck.tone.volume", self.tone.volume)?;
        if self.noise_table_len == 0 {
            return Err(SynthError::config("fm_pluck.noise_table_len must be at least 1"));
        }
        if self.tone.attack_samples == 0 || self.tone.grain_window == 0 {
            return Err(SynthError::config(
                "fm_pluck.tone attack_samples and grain_window must be at least 1",
            ));
        }
        if self.reverb.tap_count == 0 {
            return Err(SynthError::config("fm_pluck.reverb.tap_count must be at least 1"));
        }
        check_unit("fm_pluck.reverb.cross_feed", self.reverb.cross_feed)?;
        if !(self.reverb.base_delay_ms >= 0.0) {
            return Err(SynthError::config("fm_pluck.reverb.base_delay_ms must be non-negative"));
        }
        Ok(())
    }
}

fn check_duration(voice: &str, seconds: f32) -> Result<()> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(())
    } else {
        Err(SynthError::config(format!(
            "{voice}.duration_seconds must be positive, got {seconds}"
        )))
    }
}

/// Closed range [0, 1].
fn check_unit(field: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SynthError::config(format!("{field} must be in [0, 1], got {value}")))
    }
}

/// Open range (0, 1).
fn check_open_unit(field: &str, value: f32) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SynthError::config(format!("{field} must be in (0, 1), got {value}")))
    }
}

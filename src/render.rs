//! Voice pipelines and batch rendering.
//!
//! ```text
//! felt piano:  noise ─→ excitation ─→ string ─→ (+ thump) ─→ ambience ─→ mono→stereo
//! fm pluck:    noise table ─→ fm tone ─→ tap reverb
//! ```
//!
//! [`render_note`] is pure apart from the noise it draws: it returns the
//! finished stereo signal and leaves encoding and storage to the caller.
//! [`render_batch`] renders every (voice, note) pair in parallel and hands
//! each result to a [`NoteSink`].

use std::fmt;
use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Note, RenderConfig};
use crate::dsp::filter::Transform;
use crate::dsp::noise::{NoiseSource, SeededNoise};
use crate::error::{Result, SynthError};
use crate::io::pcm::{PcmEncoder, PcmStream};
use crate::io::sink::NoteSink;
use crate::synth::{delay_length, KarplusStrong, NoiseExcitation};
use crate::{to_stereo, MonoSignal, StereoSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Voice {
    FeltPiano,
    FmPluck,
}

impl Voice {
    pub const ALL: [Voice; 2] = [Voice::FeltPiano, Voice::FmPluck];

    pub fn file_prefix(self, config: &RenderConfig) -> &str {
        match self {
            Voice::FeltPiano => &config.felt_piano.file_prefix,
            Voice::FmPluck => &config.fm_pluck.file_prefix,
        }
    }

    /// Encoder scale for this voice.
    pub fn amplitude(self, config: &RenderConfig) -> f32 {
        match self {
            Voice::FeltPiano => config.felt_piano.amplitude,
            Voice::FmPluck => config.fm_pluck.amplitude,
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Voice::FeltPiano => f.write_str("felt-piano"),
            Voice::FmPluck => f.write_str("fm-pluck"),
        }
    }
}

/// A finished note, ready to encode.
#[derive(Debug, Clone)]
pub struct RenderedNote {
    pub voice: Voice,
    pub signal: StereoSignal,
    pub amplitude: f32,
    pub sample_rate: u32,
}

impl RenderedNote {
    pub fn frames(&self) -> usize {
        self.signal.len()
    }

    pub fn encode(&self) -> PcmStream {
        PcmEncoder::new(self.amplitude, self.sample_rate).encode(&self.signal)
    }
}

/// Intermediate signals of the felt piano, before ambience.
#[derive(Debug, Clone)]
pub struct FeltPianoStages {
    /// Smoothed hammer burst; its length is the string period.
    pub excitation: MonoSignal,
    /// Raw string model output.
    pub string: MonoSignal,
    /// String with the thump mixed under its onset.
    pub dry: MonoSignal,
}

/// Run the felt piano up to (not including) the ambience.
pub fn felt_piano_stages<N: NoiseSource>(
    config: &RenderConfig,
    frequency: f32,
    noise: &mut N,
) -> Result<FeltPianoStages> {
    let piano = &config.felt_piano;
    let sample_rate = config.sample_rate;

    let period = delay_length(frequency, sample_rate)?;
    let length = config.duration_samples(piano.duration_seconds);
    debug!(frequency, period, length, "felt piano");

    let excitation = NoiseExcitation::new(piano.smoothing_passes).generate(period, noise)?;
    let string = KarplusStrong::new(piano.decay, piano.smoothing).render(&excitation, length)?;

    // The thump lands only on the seeded excitation segment of the output
    let mut dry = string.clone();
    let onset = excitation.len().min(dry.len());
    piano.thump.mix_into(&mut dry[..onset], sample_rate);

    Ok(FeltPianoStages {
        excitation,
        string,
        dry,
    })
}

fn render_felt_piano<N: NoiseSource>(
    config: &RenderConfig,
    frequency: f32,
    noise: &mut N,
) -> Result<StereoSignal> {
    let stages = felt_piano_stages(config, frequency, noise)?;
    let wet = config.felt_piano.ambience(config.sample_rate).apply(&stages.dry);
    Ok(to_stereo(&wet))
}

fn render_fm_pluck<N: NoiseSource>(
    config: &RenderConfig,
    frequency: f32,
    noise: &mut N,
) -> Result<StereoSignal> {
    let fm = &config.fm_pluck;
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(SynthError::InvalidFrequency {
            frequency,
            sample_rate: config.sample_rate,
        });
    }

    let grain = noise.table(fm.noise_table_len)?;
    let length = config.duration_samples(fm.duration_seconds);
    let tone = fm.tone.render(frequency, length, config.sample_rate, &grain);

    Ok(fm.reverb.reverb(config.sample_rate).apply(&tone))
}

/// Render one note entirely in memory.
pub fn render_note<N: NoiseSource>(
    config: &RenderConfig,
    voice: Voice,
    frequency: f32,
    noise: &mut N,
) -> Result<RenderedNote> {
    let signal = match voice {
        Voice::FeltPiano => render_felt_piano(config, frequency, noise)?,
        Voice::FmPluck => render_fm_pluck(config, frequency, noise)?,
    };

    Ok(RenderedNote {
        voice,
        signal,
        amplitude: voice.amplitude(config),
        sample_rate: config.sample_rate,
    })
}

/// File stem for the `index`-th note (0-based) of `voice`, e.g. `felt_piano_1_C4`.
pub fn note_file_stem(config: &RenderConfig, voice: Voice, index: usize, note: &Note) -> String {
    format!("{}_{}_{}", voice.file_prefix(config), index + 1, note.name)
}

/// Every (voice, note) pair in batch order: voices outer, notes inner.
/// Each carries the note's 0-based table index.
pub fn batch_jobs<'a>(
    config: &'a RenderConfig,
    voices: &[Voice],
) -> Vec<(Voice, usize, &'a Note)> {
    voices
        .iter()
        .flat_map(|&voice| {
            config
                .notes
                .iter()
                .enumerate()
                .map(move |(index, note)| (voice, index, note))
        })
        .collect()
}

/// Noise source for batch job `job`: `seed + job` when seeded, fresh entropy
/// otherwise.
pub fn job_noise(seed: Option<u64>, job: usize) -> SeededNoise {
    match seed {
        Some(seed) => SeededNoise::new(seed.wrapping_add(job as u64)),
        None => SeededNoise::from_entropy(),
    }
}

/// A note that could not be rendered or written.
#[derive(Debug)]
pub struct NoteFailure {
    pub voice: Voice,
    pub note: String,
    pub error: SynthError,
}

impl fmt::Display for NoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.voice, self.note, self.error)
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<NoteFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} note(s) written, {} failed",
            self.written.len(),
            self.failures.len()
        );
        for failure in &self.failures {
            text.push_str("\n  ");
            text.push_str(&failure.to_string());
        }
        text
    }
}

/// Render and store every note of the table for each voice.
///
/// Notes are independent: each draws from its own noise source and a
/// failure only drops that note. With `seed` set, job `k` (voices outer,
/// notes inner) is seeded with `seed + k`, so reruns are bit-identical.
pub fn render_batch<S: NoteSink>(
    config: &RenderConfig,
    voices: &[Voice],
    sink: &S,
    seed: Option<u64>,
) -> BatchReport {
    let jobs = batch_jobs(config, voices);

    info!(jobs = jobs.len(), "rendering batch");

    let results: Vec<(Voice, &Note, Result<PathBuf>)> = jobs
        .par_iter()
        .enumerate()
        .map(|(k, &(voice, index, note))| {
            let mut noise = job_noise(seed, k);
            let stem = note_file_stem(config, voice, index, note);

            let result = render_note(config, voice, note.frequency, &mut noise)
                .and_then(|rendered| sink.write(&stem, &rendered.encode()));
            (voice, note, result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (voice, note, result) in results {
        match result {
            Ok(path) => report.written.push(path),
            Err(error) => {
                warn!(%voice, note = %note.name, %error, "note failed");
                report.failures.push(NoteFailure {
                    voice,
                    note: note.name.clone(),
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoteTable;
    use crate::io::sink::MemorySink;

    fn short_config() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.felt_piano.duration_seconds = 0.1;
        config.fm_pluck.duration_seconds = 0.1;
        config.fm_pluck.reverb.base_delay_ms = 10.0;
        config
    }

    #[test]
    fn test_felt_piano_frame_count() {
        let config = short_config();
        let note =
            render_note(&config, Voice::FeltPiano, 261.63, &mut SeededNoise::new(1)).unwrap();

        // 0.1 s of string plus the 23 ms reflection tail
        assert_eq!(note.frames(), 4_410 + 1_014);
        assert!(note.signal.iter().all(|[l, r]| l == r), "felt piano is centred mono");
        assert_eq!(note.amplitude, 0.6);
    }

    #[test]
    fn test_fm_pluck_frame_count() {
        let config = short_config();
        let note = render_note(&config, Voice::FmPluck, 392.0, &mut SeededNoise::new(1)).unwrap();

        // 10 ms base delay, 7 wet taps
        assert_eq!(note.frames(), 4_410 + 441 * 7);
        assert_eq!(note.amplitude, 1.0);
    }

    #[test]
    fn test_thump_only_touches_excitation_segment() {
        let config = short_config();
        let stages = felt_piano_stages(&config, 261.63, &mut SeededNoise::new(4)).unwrap();
        let period = stages.excitation.len();

        assert_eq!(period, 168);
        assert_eq!(&stages.string[..period], stages.excitation.as_slice());
        assert_ne!(&stages.dry[..period], &stages.string[..period]);
        assert_eq!(&stages.dry[period..], &stages.string[period..]);
    }

    #[test]
    fn test_invalid_frequency_is_reported() {
        let config = short_config();
        for voice in Voice::ALL {
            let err = render_note(&config, voice, -5.0, &mut SeededNoise::new(0)).unwrap_err();
            assert!(matches!(err, SynthError::InvalidFrequency { .. }), "{voice}: {err}");
        }
        let err = render_note(&config, Voice::FeltPiano, 40_000.0, &mut SeededNoise::new(0))
            .unwrap_err();
        assert!(matches!(err, SynthError::InvalidFrequency { .. }));
    }

    #[test]
    fn test_batch_names_and_isolates_failures() {
        let mut config = short_config();
        config.notes = NoteTable::from_pairs([("C4", 261.63), ("Zip", 20_000.0), ("G4", 392.0)]);

        let sink = MemorySink::new();
        let report = render_batch(&config, &[Voice::FeltPiano], &sink, Some(9));

        // 44100 / 20000 - 0.5 = 1.7 → one-sample period, too short to smooth
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].note, "Zip");
        assert!(matches!(
            report.failures[0].error,
            SynthError::DegenerateFilterWindow { .. }
        ));
        assert!(!report.is_success());
        assert!(report.summary().contains("felt-piano Zip"));

        let names: Vec<String> = sink.into_notes().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["felt_piano_1_C4", "felt_piano_3_G4"]);
    }

    #[test]
    fn test_job_noise_matches_batch_output() {
        let config = short_config();
        let sink = MemorySink::new();
        assert!(render_batch(&config, &Voice::ALL, &sink, Some(5)).is_success());
        let written = sink.into_notes();

        let jobs = batch_jobs(&config, &Voice::ALL);
        assert_eq!(jobs.len(), 10);
        for (k, &(voice, index, note)) in jobs.iter().enumerate() {
            let stem = note_file_stem(&config, voice, index, note);
            let pcm = render_note(&config, voice, note.frequency, &mut job_noise(Some(5), k))
                .unwrap()
                .encode();

            let (_, stored) = written.iter().find(|(name, _)| *name == stem).unwrap();
            assert_eq!(stored, &pcm, "job {k} ({stem}) differs from the batch render");
        }
    }

    #[test]
    fn test_seeded_batch_is_reproducible() {
        let config = short_config();
        let voices = Voice::ALL;

        let first = MemorySink::new();
        let second = MemorySink::new();
        assert!(render_batch(&config, &voices, &first, Some(42)).is_success());
        assert!(render_batch(&config, &voices, &second, Some(42)).is_success());

        let first = first.into_notes();
        assert_eq!(first.len(), 10);
        assert_eq!(first, second.into_notes());
    }
}

//! Destinations for encoded notes.
//!
//! The synthesis core never touches the filesystem; a finished [`PcmStream`]
//! is handed to a [`NoteSink`] under a file stem like `felt_piano_1_C4`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use hound::WavWriter;
use tracing::{debug, info};

use crate::error::Result;
use crate::io::pcm::PcmStream;

/// Receives one complete note at a time. Implementations must accept
/// concurrent calls with distinct names.
pub trait NoteSink: Sync {
    /// Store `pcm` under `name`, returning where it went.
    fn write(&self, name: &str, pcm: &PcmStream) -> Result<PathBuf>;
}

/// Writes each note as `<dir>/<name>.wav`.
///
/// The directory is created on first write if missing. Each file is written
/// to a `.wav.part` sibling and renamed into place once finalized, so a
/// failed write never leaves a truncated `.wav` behind.
#[derive(Debug, Clone)]
pub struct WavDirectorySink {
    dir: PathBuf,
}

impl WavDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.wav"))
    }

    fn write_wav(path: &Path, pcm: &PcmStream) -> Result<()> {
        let mut writer = WavWriter::create(path, pcm.format.wav_spec())?;
        for sample in pcm.samples() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

impl NoteSink for WavDirectorySink {
    fn write(&self, name: &str, pcm: &PcmStream) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(name);
        let partial = path.with_extension("wav.part");

        let written = Self::write_wav(&partial, pcm)
            .and_then(|()| fs::rename(&partial, &path).map_err(Into::into));
        if let Err(err) = written {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }

        info!(path = %path.display(), frames = pcm.frames(), "wrote note");
        Ok(path)
    }
}

/// Keeps notes in memory instead of writing files.
#[derive(Debug, Default)]
pub struct MemorySink {
    notes: Mutex<Vec<(String, PcmStream)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything written so far, sorted by name.
    pub fn into_notes(self) -> Vec<(String, PcmStream)> {
        let mut notes = self.notes.into_inner().unwrap_or_else(|e| e.into_inner());
        notes.sort_by(|a, b| a.0.cmp(&b.0));
        notes
    }
}

impl NoteSink for MemorySink {
    fn write(&self, name: &str, pcm: &PcmStream) -> Result<PathBuf> {
        debug!(name, frames = pcm.frames(), "kept note in memory");
        self.notes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((name.to_string(), pcm.clone()));
        Ok(PathBuf::from(name))
    }
}

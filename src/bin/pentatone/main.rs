//! pentatone - render the note set to WAV files
//!
//! Run with: cargo run -- render --out sounds

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use pentatone::analysis::NoteSummary;
use pentatone::io::WavDirectorySink;
use pentatone::{batch_jobs, job_noise, render_batch, render_note, RenderConfig, Voice};

/// Synthesize felt-piano and FM pluck notes without any recorded samples
#[derive(Parser)]
#[command(name = "pentatone")]
#[command(version)]
struct Cli {
    /// TOML file overriding the default configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every render stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VoiceArg {
    FeltPiano,
    FmPluck,
    All,
}

impl VoiceArg {
    fn voices(self) -> Vec<Voice> {
        match self {
            VoiceArg::FeltPiano => vec![Voice::FeltPiano],
            VoiceArg::FmPluck => vec![Voice::FmPluck],
            VoiceArg::All => Voice::ALL.to_vec(),
        }
    }
}

#[derive(clap::Args)]
struct Selection {
    /// Which voice(s) to render
    #[arg(long, value_enum, default_value = "all")]
    voice: VoiceArg,

    /// Only render these notes (repeatable); defaults to the whole table
    #[arg(short, long = "note")]
    notes: Vec<String>,

    /// Seed for the noise source; omit for a different take every run
    #[arg(long)]
    seed: Option<u64>,

    /// Override the dry duration of every voice, in seconds
    #[arg(long)]
    duration: Option<f32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render notes and write one WAV file per note
    Render {
        #[command(flatten)]
        selection: Selection,

        /// Output directory (created if missing)
        #[arg(short, long, default_value = "sounds")]
        out: PathBuf,
    },

    /// Render notes in memory and print a summary of each
    Inspect {
        #[command(flatten)]
        selection: Selection,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => RenderConfig::load(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => RenderConfig::default(),
    };

    match cli.command {
        Commands::Render { selection, out } => render(config, &selection, out),
        Commands::Inspect { selection } => inspect(config, &selection),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn apply_selection(mut config: RenderConfig, selection: &Selection) -> EyreResult<RenderConfig> {
    if !selection.notes.is_empty() {
        config.notes = config.notes.select(&selection.notes)?;
    }
    if let Some(seconds) = selection.duration {
        config.felt_piano.duration_seconds = seconds;
        config.fm_pluck.duration_seconds = seconds;
    }
    config.validate().wrap_err("invalid configuration")?;
    Ok(config)
}

fn render(config: RenderConfig, selection: &Selection, out: PathBuf) -> EyreResult<()> {
    let config = apply_selection(config, selection)?;
    let sink = WavDirectorySink::new(out);

    let report = render_batch(&config, &selection.voice.voices(), &sink, selection.seed);
    tracing::info!("{}", report.summary());

    if report.is_success() {
        Ok(())
    } else {
        Err(eyre!(
            "{} of {} notes failed",
            report.failures.len(),
            report.failures.len() + report.written.len()
        ))
    }
}

fn inspect(config: RenderConfig, selection: &Selection) -> EyreResult<()> {
    let config = apply_selection(config, selection)?;
    let jobs = batch_jobs(&config, &selection.voice.voices());

    println!(
        "{:<12} {:<6} {:>10} {:>8} {:>8} {:>10} {:>10}",
        "voice", "note", "target Hz", "frames", "peak", "tail rms", "pitch Hz"
    );

    // Same job order and seeding as `render`
    let mut failures = Vec::new();
    for (k, &(voice, _, note)) in jobs.iter().enumerate() {
        let mut noise = job_noise(selection.seed, k);
        let rendered = match render_note(&config, voice, note.frequency, &mut noise) {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::warn!(%voice, note = %note.name, %error, "note failed");
                println!(
                    "{:<12} {:<6} {:>10.2} failed: {error}",
                    voice.to_string(),
                    note.name,
                    note.frequency
                );
                failures.push(format!("{voice} {}", note.name));
                continue;
            }
        };
        let summary = NoteSummary::of(&rendered.signal, config.sample_rate);

        let pitch = summary
            .pitch
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:<6} {:>10.2} {:>8} {:>8.4} {:>10.6} {:>10}",
            voice.to_string(),
            note.name,
            note.frequency,
            summary.frames,
            summary.peak * rendered.amplitude,
            summary.tail_rms * rendered.amplitude,
            pitch
        );
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(eyre!(
            "{} of {} notes failed: {}",
            failures.len(),
            jobs.len(),
            failures.join(", ")
        ))
    }
}

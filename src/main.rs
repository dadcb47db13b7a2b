//! fluidrender - Renders a MIDI file to WAV with FluidSynth.
//!
//! # Usage
//!
//! ```bash
//! fluidrender instruments.yaml song.mid song.wav
//! RUST_LOG=debug fluidrender instruments.yaml song.mid song.wav
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use fluidrender::{render_score, FluidSynthApi};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fluidrender")]
#[command(about = "Render a MIDI file to WAV, one FluidSynth stem per instrument", long_about = None)]
struct Cli {
    /// Instrument map (YAML, or JSON with a .json extension)
    mapfile: PathBuf,

    /// MIDI file to render
    midifile: PathBuf,

    /// Output WAV file path
    outfile: PathBuf,
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    for path in [&cli.mapfile, &cli.midifile] {
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }
    }

    // Bind before reading anything so a missing library or symbol fails fast.
    let api = FluidSynthApi::load().context("Failed to bind FluidSynth")?;

    let summary = render_score(&api, &cli.mapfile, &cli.midifile, &cli.outfile)?;
    tracing::info!(
        "Wrote {} ({} stems, {} unmapped tracks skipped)",
        cli.outfile.display(),
        summary.stems,
        summary.skipped.len()
    );
    Ok(())
}

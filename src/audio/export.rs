//! Score export.
//!
//! Renders every mapped track of a MIDI file to its own stem, one engine
//! session per instrument, then mixes the stems into the output WAV file.

use crate::audio::mixer::{mix_stems, Stem};
use crate::audio::render::render_stem;
use crate::config::InstrumentMap;
use crate::fluid::FluidSynthApi;
use crate::midi::Score;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;

/// What [`render_score`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub stems: usize,
    /// Names of tracks with no entry in the instrument map.
    pub skipped: Vec<String>,
    pub frames: usize,
    pub sample_rate: u32,
}

/// Renders a MIDI file to a mixed WAV file.
///
/// Sessions run one after another. The output is written to a temporary file
/// next to `output` and renamed into place only after every stem rendered and
/// mixed, so a failure never leaves a partial output behind.
///
/// # Arguments
///
/// * `api` - Bound engine functions
/// * `map_path` - Instrument map file
/// * `score_path` - MIDI file to render
/// * `output_path` - Path for the output WAV file
///
/// # Errors
///
/// Returns error if:
/// - The map or the score cannot be loaded
/// - No track is mapped
/// - Any stem fails to render
/// - Mixing or writing the output fails
pub fn render_score<P1, P2, P3>(
    api: &Arc<FluidSynthApi>,
    map_path: P1,
    score_path: P2,
    output_path: P3,
) -> Result<RenderSummary>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    let (map_path, score_path, output_path) =
        (map_path.as_ref(), score_path.as_ref(), output_path.as_ref());

    let map = InstrumentMap::load(map_path)
        .with_context(|| format!("Failed to load instrument map: {}", map_path.display()))?;
    let soundfont = map.resolve_soundfont(map_path);
    let score = Score::load(score_path)
        .with_context(|| format!("Failed to load MIDI file: {}", score_path.display()))?;

    let workdir = tempfile::tempdir().context("Failed to create stem directory")?;
    let mut stems = Vec::new();
    let mut skipped = Vec::new();

    for pair in score.instrument_pairs() {
        let Some(instruments) = map.instruments_for(pair.name()) else {
            tracing::warn!("Skipping unmapped track {:?}", pair.name());
            skipped.push(pair.name().to_string());
            continue;
        };
        tracing::debug!(
            "Track {:?}: {} note-ons over {} ticks ({:.2} s)",
            pair.name(),
            pair.instrument().note_on_count(),
            pair.instrument().duration_ticks(),
            pair.duration_seconds()
        );

        for instrument in instruments {
            let path = workdir.path().join(format!("{}.wav", stems.len()));
            tracing::info!(
                "Rendering {:?} with bank {} preset {}",
                pair.name(),
                instrument.bank,
                instrument.preset
            );
            render_stem(api, &pair, &path, &soundfont, instrument)
                .with_context(|| format!("Failed to render track {:?}", pair.name()))?;
            stems.push(Stem {
                path,
                gain_db: instrument.gain,
                pan: instrument.pan,
            });
        }
    }

    if stems.is_empty() {
        bail!(
            "No track of {} is mapped in {}",
            score_path.display(),
            map_path.display()
        );
    }

    let output_dir = match output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".fluidrender-")
        .suffix(".wav")
        .tempfile_in(output_dir)
        .with_context(|| format!("Failed to create output in {}", output_dir.display()))?;

    let mix = mix_stems(&stems, staged.path())?;
    staged
        .persist(output_path)
        .with_context(|| format!("Failed to write output WAV file: {}", output_path.display()))?;

    Ok(RenderSummary {
        stems: mix.stems,
        skipped,
        frames: mix.frames,
        sample_rate: mix.sample_rate,
    })
}

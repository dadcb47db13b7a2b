//! Overlay mixing of rendered stems.
//!
//! Each stem gets its own gain and stereo pan, then all stems are summed
//! starting at frame zero. The result is as long as the longest stem and is
//! written as 16-bit stereo WAV.

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

/// A rendered stem and how to mix it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stem {
    pub path: PathBuf,
    /// Gain in dB.
    pub gain_db: f32,
    /// -1 (left) to 1 (right).
    pub pan: f32,
}

/// Result of a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixSummary {
    pub stems: usize,
    pub frames: usize,
    pub sample_rate: u32,
    /// Output samples that had to be clipped to the 16-bit range.
    pub clipped: usize,
}

/// Converts decibels to a linear amplitude factor.
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Left and right amplitude factors for a pan position.
///
/// The side the sound moves towards is boosted by up to 3 dB and the other
/// side is cut, down to silence at the extremes.
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let amount = pan.clamp(-1.0, 1.0).abs();
    let boost = 2f32.powf(amount / 2.0);
    let cut = 2.0 - 2f32.powf(amount);
    if pan < 0.0 {
        (boost, cut)
    } else {
        (cut, boost)
    }
}

/// Reads a stem as stereo frames in [-1, 1].
fn read_stem(path: &Path) -> Result<(u32, Vec<[f32; 2]>)> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open stem: {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<_, _>>(),
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>(),
        (format, bits) => bail!(
            "Unsupported sample format {:?}/{} bits in {}",
            format,
            bits,
            path.display()
        ),
    }
    .with_context(|| format!("Failed to read stem: {}", path.display()))?;

    let frames = match spec.channels {
        1 => samples.iter().map(|&s| [s, s]).collect(),
        2 => samples.chunks_exact(2).map(|f| [f[0], f[1]]).collect(),
        n => bail!("Unsupported channel count {} in {}", n, path.display()),
    };
    Ok((spec.sample_rate, frames))
}

/// Mixes stems into one WAV file.
///
/// # Arguments
///
/// * `stems` - Stems with their gain and pan
/// * `output` - Path for the output WAV file
///
/// # Returns
///
/// Length, rate and clipping of the written mix
///
/// # Errors
///
/// Returns error if:
/// - There are no stems
/// - A stem cannot be read or has an unsupported format
/// - Stems have different sample rates
/// - The output cannot be written
pub fn mix_stems(stems: &[Stem], output: &Path) -> Result<MixSummary> {
    if stems.is_empty() {
        bail!("No stems to mix");
    }

    let mut mix: Vec<[f32; 2]> = Vec::new();
    let mut sample_rate = None;

    for stem in stems {
        let (rate, frames) = read_stem(&stem.path)?;
        match sample_rate {
            None => sample_rate = Some(rate),
            Some(expected) if expected != rate => bail!(
                "Stem {} is {} Hz, expected {} Hz",
                stem.path.display(),
                rate,
                expected
            ),
            Some(_) => {}
        }

        if frames.len() > mix.len() {
            mix.resize(frames.len(), [0.0, 0.0]);
        }
        let gain = db_to_gain(stem.gain_db);
        let (left, right) = pan_gains(stem.pan);
        for (out, frame) in mix.iter_mut().zip(&frames) {
            out[0] += frame[0] * gain * left;
            out[1] += frame[1] * gain * right;
        }
    }

    let sample_rate = sample_rate.unwrap_or(44100);
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output, spec)
        .with_context(|| format!("Failed to create output WAV file: {}", output.display()))?;

    let mut clipped = 0;
    for frame in &mix {
        for &sample in frame {
            let scaled = (sample * 32768.0).round();
            if !(-32768.0..=32767.0).contains(&scaled) {
                clipped += 1;
            }
            writer.write_sample(scaled.clamp(-32768.0, 32767.0) as i16)?;
        }
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    let summary = MixSummary {
        stems: stems.len(),
        frames: mix.len(),
        sample_rate,
        clipped,
    };
    if clipped > 0 {
        tracing::warn!("{} samples clipped while mixing", clipped);
    }
    tracing::info!(
        "Mixed {} stems: {:.2} s at {} Hz",
        summary.stems,
        summary.frames as f64 / sample_rate as f64,
        sample_rate
    );
    Ok(summary)
}

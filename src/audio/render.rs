//! Offline rendering of one instrument track to a stem file.
//!
//! Rendering is driven by the sequencer's sample clock: every note-on is
//! scheduled up front at an absolute time, then the file renderer is advanced
//! block by block until the clock passes the end of the schedule.

use crate::config::InstrumentSpec;
use crate::fluid::{Event, FileRenderer, FluidSynthApi, Sequencer, Settings, Synth};
use crate::midi::{MessageKind, TrackPair};
use anyhow::{Context, Result};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

/// Silence before the first message, in seconds.
pub const LEAD_IN_SECONDS: f64 = 1.0;

/// Silence after the last message, in seconds.
pub const TAIL_SECONDS: f64 = 1.0;

/// Every note is played on this channel; one synth renders one instrument.
pub const RENDER_CHANNEL: i32 = 0;

/// One scheduled note-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Milliseconds from the start of the render.
    pub at_ms: u32,
    pub channel: i32,
    pub key: i16,
    pub velocity: i16,
}

/// Note-ons of one track in absolute time, and where rendering stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub end_ms: u32,
}

/// What one stem render did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemReport {
    pub notes: usize,
    pub blocks: u64,
    pub end_ms: u32,
    /// Sequencer clock when rendering stopped; never below `end_ms`.
    pub final_tick: u32,
}

/// Converts seconds to whole milliseconds, rounding halves to even.
fn to_ms(seconds: f64) -> u32 {
    (seconds * 1000.0).round_ties_even() as u32
}

/// Builds the absolute schedule for a track pair.
///
/// Elapsed time starts at [`LEAD_IN_SECONDS`] and grows by each merged
/// message's delta. Every note-on, including velocity 0, is scheduled on
/// [`RENDER_CHANNEL`] with its key shifted by `transpose` semitones. Rendering
/// ends [`TAIL_SECONDS`] after the last message.
///
/// # Arguments
///
/// * `pair` - Control track merged with the instrument track
/// * `transpose` - Semitones added to every key
pub fn build_schedule(pair: &TrackPair<'_>, transpose: i32) -> Schedule {
    let mut elapsed = LEAD_IN_SECONDS;
    let mut entries = Vec::new();

    for message in pair.messages() {
        elapsed += message.delta_seconds;
        if let MessageKind::NoteOn { key, velocity, .. } = message.kind {
            let key = (key as i32 + transpose).clamp(i16::MIN as i32, i16::MAX as i32);
            entries.push(ScheduleEntry {
                at_ms: to_ms(elapsed),
                channel: RENDER_CHANNEL,
                key: key as i16,
                velocity: velocity as i16,
            });
        }
    }

    Schedule {
        entries,
        end_ms: to_ms(elapsed + TAIL_SECONDS),
    }
}

/// Renders one instrument track to a stem file.
///
/// Builds a fresh settings/synth/sequencer/renderer set for this render
/// alone. All of it is released before returning, on success or failure,
/// and the stem file is complete once this returns `Ok`.
///
/// # Arguments
///
/// * `api` - Bound engine functions
/// * `pair` - Control track merged with the instrument track
/// * `output` - Stem file to write
/// * `soundfont` - SoundFont to load (without resetting presets)
/// * `instrument` - Bank, preset and transpose to render with
///
/// # Errors
///
/// Returns error if a path is not valid UTF-8 or any engine operation fails
pub fn render_stem(
    api: &Arc<FluidSynthApi>,
    pair: &TrackPair<'_>,
    output: &Path,
    soundfont: &Path,
    instrument: &InstrumentSpec,
) -> Result<StemReport> {
    let output_name = output
        .to_str()
        .with_context(|| format!("Stem path is not valid UTF-8: {}", output.display()))?;
    let soundfont_name = soundfont
        .to_str()
        .with_context(|| format!("SoundFont path is not valid UTF-8: {}", soundfont.display()))?;

    let settings = Settings::new(api)?;
    settings.set("audio.file.name", output_name)?;
    settings.set("player.timing-source", "sample")?;
    settings.set("synth.lock-memory", 0)?;

    let synth = Rc::new(Synth::new(Rc::new(settings))?);
    let font_id = synth
        .load_soundfont(soundfont_name, false)
        .with_context(|| format!("Failed to load SoundFont: {}", soundfont.display()))?;

    let mut sequencer = Sequencer::new(api)?;
    let dest = sequencer.register_synth(&synth)?;

    let event = Event::new(api)?;
    event.set_source(-1)?;
    event.set_dest(dest)?;

    let renderer = FileRenderer::new(Rc::clone(&synth))?;

    renderer
        .synth()
        .select_program(RENDER_CHANNEL, font_id, instrument.bank, instrument.preset)
        .with_context(|| {
            format!(
                "Failed to select bank {} preset {}",
                instrument.bank, instrument.preset
            )
        })?;

    let schedule = build_schedule(pair, instrument.tsp);
    for entry in &schedule.entries {
        event.note_on(entry.channel, entry.key, entry.velocity)?;
        sequencer.send_at(&event, entry.at_ms, true)?;
    }

    tracing::debug!(
        "Scheduled {} notes for {:?} on {} synth(s), rendering until {} ms",
        schedule.entries.len(),
        pair.name(),
        sequencer.registered(),
        schedule.end_ms
    );

    let mut blocks = 0u64;
    let mut tick = sequencer.tick()?;
    while tick < schedule.end_ms {
        renderer.process_block()?;
        blocks += 1;
        tick = sequencer.tick()?;
    }

    // Finalizes the file.
    drop(renderer);

    let report = StemReport {
        notes: schedule.entries.len(),
        blocks,
        end_ms: schedule.end_ms,
        final_tick: tick,
    };
    tracing::debug!("Rendered {:?} to {}: {:?}", pair.name(), output.display(), report);
    Ok(report)
}

//! Read access to Standard MIDI Files for rendering.
//!
//! A [`Score`] holds the owned messages of every track in a file. Rendering
//! consumes it one instrument at a time through a [`TrackPair`]: the score's
//! first (control) track merged with one instrument track, timed in seconds.

mod pair;
mod score;
mod track;


pub use pair::{TimedMessage, TrackPair};
pub use score::{Score, ScoreError};
pub use track::{MessageKind, Track, TrackMessage};

/// Tempo assumed until the first tempo message, in microseconds per beat
/// (120 BPM).
pub const DEFAULT_TEMPO_USEC: u32 = 500_000;

/// Converts a tick count to seconds.
///
/// # Arguments
///
/// * `ticks` - Number of ticks
/// * `ticks_per_beat` - The file's resolution
/// * `tempo_usec` - Tempo in microseconds per beat
///
/// # Returns
///
/// Duration in seconds
pub fn ticks_to_seconds(ticks: u32, ticks_per_beat: u16, tempo_usec: u32) -> f64 {
    let beats = ticks as f64 / ticks_per_beat as f64;
    beats * tempo_usec as f64 / 1_000_000.0
}

/// Converts microseconds per beat to beats per minute.
pub fn tempo_to_bpm(tempo_usec: u32) -> f64 {
    60_000_000.0 / tempo_usec as f64
}

//! The control track merged with one instrument track.

use super::track::{MessageKind, Track, TrackMessage};
use super::{ticks_to_seconds, DEFAULT_TEMPO_USEC};

/// A merged message with its delta time converted to seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedMessage {
    pub delta_ticks: u32,
    pub delta_seconds: f64,
    pub kind: MessageKind,
}

/// A two-track view of a score: the shared control track plus one instrument
/// track.
///
/// Messages are merged in time order. At equal ticks the control track's
/// messages come first, and each track keeps its own order. End-of-track
/// markers are folded into a single one at the end of the merged track.
#[derive(Debug, Clone, Copy)]
pub struct TrackPair<'a> {
    control: &'a Track,
    instrument: &'a Track,
    ticks_per_beat: u16,
}

impl<'a> TrackPair<'a> {
    pub fn new(control: &'a Track, instrument: &'a Track, ticks_per_beat: u16) -> Self {
        Self {
            control,
            instrument,
            ticks_per_beat,
        }
    }

    /// The instrument track's name.
    pub fn name(&self) -> &'a str {
        self.instrument.name()
    }

    pub fn instrument(&self) -> &'a Track {
        self.instrument
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// Both tracks merged into one, with tick deltas.
    pub fn merged(&self) -> Vec<TrackMessage> {
        let mut absolute: Vec<(u64, &TrackMessage)> = Vec::new();
        for track in [self.control, self.instrument] {
            let mut now = 0u64;
            for message in track.messages() {
                now += message.delta_ticks as u64;
                absolute.push((now, message));
            }
        }
        // Stable: equal ticks keep control-then-instrument order.
        absolute.sort_by_key(|(tick, _)| *tick);

        let mut merged = Vec::with_capacity(absolute.len() + 1);
        let mut previous = 0u64;
        let mut carried = 0u64;
        for (tick, message) in absolute {
            let delta = tick - previous;
            previous = tick;
            if message.kind == MessageKind::EndOfTrack {
                carried += delta;
                continue;
            }
            merged.push(TrackMessage::new(
                saturate(carried + delta),
                message.kind.clone(),
            ));
            carried = 0;
        }
        merged.push(TrackMessage::new(saturate(carried), MessageKind::EndOfTrack));
        merged
    }

    /// The merged messages with delta times in seconds.
    ///
    /// Each delta is converted with the tempo in effect before the message;
    /// a tempo message only affects the messages after it.
    pub fn messages(&self) -> Vec<TimedMessage> {
        let mut tempo = DEFAULT_TEMPO_USEC;
        self.merged()
            .into_iter()
            .map(|message| {
                let delta_seconds = ticks_to_seconds(message.delta_ticks, self.ticks_per_beat, tempo);
                if let MessageKind::Tempo(next) = message.kind {
                    tempo = next;
                }
                TimedMessage {
                    delta_ticks: message.delta_ticks,
                    delta_seconds,
                    kind: message.kind,
                }
            })
            .collect()
    }

    /// Total length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.messages().iter().map(|m| m.delta_seconds).sum()
    }
}

fn saturate(ticks: u64) -> u32 {
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

//! Owned MIDI track messages.
//!
//! Only the message kinds rendering cares about are kept in detail; anything
//! else becomes [`MessageKind::Other`] so that its delta time still counts.

use midly::{MetaMessage, MidiMessage, TrackEvent, TrackEventKind};

/// What a message does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// Note-on. A velocity of 0 means note-off by MIDI convention.
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    /// Tempo change in microseconds per beat.
    Tempo(u32),
    TrackName(String),
    EndOfTrack,
    Other,
}

/// One message with its delta time from the previous message on the track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMessage {
    pub delta_ticks: u32,
    pub kind: MessageKind,
}

impl TrackMessage {
    pub fn new(delta_ticks: u32, kind: MessageKind) -> Self {
        Self { delta_ticks, kind }
    }
}

impl From<&TrackEvent<'_>> for TrackMessage {
    fn from(event: &TrackEvent<'_>) -> Self {
        let kind = match event.kind {
            TrackEventKind::Midi { channel, message } => match message {
                MidiMessage::NoteOn { key, vel } => MessageKind::NoteOn {
                    channel: channel.as_int(),
                    key: key.as_int(),
                    velocity: vel.as_int(),
                },
                MidiMessage::NoteOff { key, vel } => MessageKind::NoteOff {
                    channel: channel.as_int(),
                    key: key.as_int(),
                    velocity: vel.as_int(),
                },
                _ => MessageKind::Other,
            },
            TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => MessageKind::Tempo(tempo.as_int()),
            TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                MessageKind::TrackName(String::from_utf8_lossy(name).into_owned())
            }
            TrackEventKind::Meta(MetaMessage::EndOfTrack) => MessageKind::EndOfTrack,
            _ => MessageKind::Other,
        };
        Self::new(event.delta.as_int(), kind)
    }
}

/// A track of a score: its name and its messages in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    name: String,
    messages: Vec<TrackMessage>,
}

impl Track {
    /// Creates a track, taking its name from the first track-name message.
    /// Unnamed tracks get an empty name.
    pub fn new(messages: Vec<TrackMessage>) -> Self {
        let name = messages
            .iter()
            .find_map(|message| match &message.kind {
                MessageKind::TrackName(name) => Some(name.clone()),
                _ => None,
            })
            .unwrap_or_default();
        Self { name, messages }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn messages(&self) -> &[TrackMessage] {
        &self.messages
    }

    /// Number of note-on messages, including velocity-0 ones.
    pub fn note_on_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| matches!(message.kind, MessageKind::NoteOn { .. }))
            .count()
    }

    /// Length of the track in ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.messages.iter().map(|m| m.delta_ticks as u64).sum()
    }
}

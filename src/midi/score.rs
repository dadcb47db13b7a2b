//! Standard MIDI File (SMF) loading.
//!
//! The whole file is parsed with `midly` and copied into owned [`Track`]s, so
//! a [`Score`] does not borrow the file's bytes.
//!
//! # Limitations
//!
//! - Only metrical (ticks per beat) timing is supported
//! - All SMF formats are read the same way: track 0 is the control track

use super::pair::TrackPair;
use super::track::{MessageKind, Track, TrackMessage};
use super::{tempo_to_bpm, DEFAULT_TEMPO_USEC};
use midly::{Smf, Timing};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a score.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("cannot read MIDI file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("MIDI parse error: {0}")]
    Parse(#[from] midly::Error),
    #[error("SMPTE timecode timing not supported")]
    SmpteTiming,
    #[error("MIDI file has a resolution of 0 ticks per beat")]
    ZeroResolution,
    #[error("MIDI file has no tracks")]
    Empty,
}

/// A parsed MIDI file.
#[derive(Debug, Clone)]
pub struct Score {
    ticks_per_beat: u16,
    tracks: Vec<Track>,
}

impl Score {
    /// Reads and parses a MIDI file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .mid or .midi file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, uses SMPTE timing
    /// or a zero resolution, or has no tracks
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ScoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let score = Self::parse(&data)?;
        tracing::debug!(
            "Loaded {:?}: {} tracks, {} ticks per beat, {:.1} BPM",
            path,
            score.tracks.len(),
            score.ticks_per_beat,
            tempo_to_bpm(score.initial_tempo())
        );
        Ok(score)
    }

    /// Parses a MIDI file from memory.
    pub fn parse(data: &[u8]) -> Result<Self, ScoreError> {
        let smf = Smf::parse(data)?;

        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(tpb) if tpb.as_int() == 0 => return Err(ScoreError::ZeroResolution),
            Timing::Metrical(tpb) => tpb.as_int(),
            Timing::Timecode(_, _) => return Err(ScoreError::SmpteTiming),
        };

        if smf.tracks.is_empty() {
            return Err(ScoreError::Empty);
        }

        let tracks = smf
            .tracks
            .iter()
            .map(|events| Track::new(events.iter().map(TrackMessage::from).collect()))
            .collect();

        Ok(Self {
            ticks_per_beat,
            tracks,
        })
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The first track, shared by every instrument render.
    pub fn control(&self) -> &Track {
        // Non-empty by construction.
        &self.tracks[0]
    }

    /// Tempo before the control track's first tempo change, in
    /// microseconds per beat.
    pub fn initial_tempo(&self) -> u32 {
        self.control()
            .messages()
            .iter()
            .take_while(|message| message.delta_ticks == 0)
            .find_map(|message| match message.kind {
                MessageKind::Tempo(tempo) => Some(tempo),
                _ => None,
            })
            .unwrap_or(DEFAULT_TEMPO_USEC)
    }

    /// One pair per track after the control track, in file order.
    pub fn instrument_pairs(&self) -> impl Iterator<Item = TrackPair<'_>> {
        self.tracks
            .iter()
            .skip(1)
            .map(move |instrument| TrackPair::new(self.control(), instrument, self.ticks_per_beat))
    }
}

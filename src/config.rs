//! Instrument map loading.
//!
//! The map names a SoundFont and assigns each MIDI track, by name, an ordered
//! list of instruments. Every instrument is rendered as its own stem:
//!
//! ```yaml
//! soundfont: FluidR3_GM.sf2
//! instruments:
//!   Piano:
//!     - { bank: 0, preset: 0 }
//!     - { bank: 0, preset: 48, tsp: 12, gain: -6, pan: 0.5 }
//! ```
//!
//! Files ending in `.json` are read as JSON; anything else as YAML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading an instrument map.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read instrument map {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed instrument map: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("malformed instrument map: {0}")]
    Json(#[from] serde_json::Error),
    #[error("track {track:?}: pan {pan} is outside [-1, 1]")]
    PanOutOfRange { track: String, pan: f32 },
    #[error("track {track:?}: gain {gain} is not a finite number")]
    NonFiniteGain { track: String, gain: f32 },
}

/// One instrument assigned to a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentSpec {
    pub bank: i32,
    pub preset: i32,
    /// Transpose in semitones.
    #[serde(default)]
    pub tsp: i32,
    /// Gain in dB applied when mixing.
    #[serde(default)]
    pub gain: f32,
    /// Stereo position from -1 (left) to 1 (right).
    #[serde(default)]
    pub pan: f32,
}

impl InstrumentSpec {
    pub fn new(bank: i32, preset: i32) -> Self {
        Self {
            bank,
            preset,
            tsp: 0,
            gain: 0.0,
            pan: 0.0,
        }
    }
}

/// The parsed instrument map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMap {
    /// SoundFont file, resolved with [`InstrumentMap::resolve_soundfont`].
    pub soundfont: PathBuf,
    /// Track name to instruments, in render order.
    #[serde(default)]
    pub instruments: BTreeMap<String, Vec<InstrumentSpec>>,
}

impl InstrumentMap {
    /// Reads, parses and validates an instrument map file.
    ///
    /// # Arguments
    ///
    /// * `path` - Map file; `.json` is parsed as JSON, anything else as YAML
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or an instrument
    /// fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let map = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };

        tracing::debug!(
            "Loaded instrument map {:?}: {} mapped tracks",
            path,
            map.instruments.len()
        );
        Ok(map)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let map: Self = serde_yaml::from_str(text)?;
        map.validate()?;
        Ok(map)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let map: Self = serde_json::from_str(text)?;
        map.validate()?;
        Ok(map)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (track, specs) in &self.instruments {
            for spec in specs {
                if !(-1.0..=1.0).contains(&spec.pan) {
                    return Err(ConfigError::PanOutOfRange {
                        track: track.clone(),
                        pan: spec.pan,
                    });
                }
                if !spec.gain.is_finite() {
                    return Err(ConfigError::NonFiniteGain {
                        track: track.clone(),
                        gain: spec.gain,
                    });
                }
            }
        }
        Ok(())
    }

    /// Instruments for a track, or `None` if the track is unmapped.
    pub fn instruments_for(&self, track: &str) -> Option<&[InstrumentSpec]> {
        self.instruments.get(track).map(Vec::as_slice)
    }

    /// Locates the SoundFont, searching the map file's directory and then
    /// the executable's directory for relative names.
    pub fn resolve_soundfont(&self, map_path: &Path) -> PathBuf {
        let mut dirs = Vec::new();
        if let Some(dir) = fs::canonicalize(map_path)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            dirs.push(dir);
        }
        if let Some(dir) = std::env::current_exe()
            .and_then(fs::canonicalize)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            dirs.push(dir);
        }
        find_file(&self.soundfont, &dirs)
    }
}

/// Finds a file by name.
///
/// Absolute paths and paths that already name a file are returned as they
/// are. Otherwise each directory in `dirs` is tried in order. If nothing
/// matches, the name is returned unchanged.
pub fn find_file(name: &Path, dirs: &[PathBuf]) -> PathBuf {
    if !name.is_absolute() && !name.is_file() {
        for dir in dirs {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return candidate;
            }
        }
    }
    name.to_path_buf()
}

//! Owned wrappers around FluidSynth handles.
//!
//! Each wrapper owns exactly one native handle and destroys it exactly once,
//! when the wrapper is dropped. Wrappers that need another resource to stay
//! alive hold it as an anchor (`Rc`), and always destroy their own handle
//! before releasing their anchors:
//!
//! ```text
//! FileRenderer ──▶ Synth ──▶ Settings
//! Sequencer ─────▶ Synth(s)
//! ```

mod api;
mod event;
mod handle;
mod renderer;
mod sequencer;
mod settings;
mod synth;

#[cfg(test)]
pub(crate) mod fake;

pub use api::FluidSynthApi;
pub use event::{Event, MidiEvent};
pub use renderer::FileRenderer;
pub use sequencer::Sequencer;
pub use settings::{SettingValue, Settings};
pub use synth::Synth;

use crate::native::MarshalError;
use thiserror::Error;

/// FluidSynth's generic failure code.
pub const FLUID_FAILED: i32 = -1;

/// Errors reported by wrapper operations.
///
/// `OutOfMemory` is raised when a native create call returns a null handle.
/// Every other variant corresponds to a failure code returned by one native
/// operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthError {
    #[error("out of memory creating {resource}")]
    OutOfMemory { resource: &'static str },
    #[error("setting {key:?} was rejected")]
    ConfigRejected { key: String },
    #[error("loading of soundfont {path:?} failed")]
    FontLoadFailed { path: String },
    #[error("program selection failed")]
    ProgramSelectFailed,
    #[error("bank selection failed")]
    BankSelectFailed,
    #[error("soundfont selection failed")]
    SfontSelectFailed,
    #[error("program change failed")]
    ProgramChangeFailed,
    #[error("controller event failed")]
    ControllerFailed,
    #[error("synth registration with sequencer failed")]
    RegisterFailed,
    #[error("failed to schedule event")]
    ScheduleFailed,
    #[error("failed to process block")]
    RenderBlockFailed,
    #[error("MIDI event {operation} was rejected")]
    MidiEventRejected { operation: &'static str },
    #[error(transparent)]
    Marshal(#[from] MarshalError),
}

/// Maps a FluidSynth status code to `Ok(())` or the given error.
fn check(status: i32, error: SynthError) -> Result<(), SynthError> {
    if status == 0 {
        Ok(())
    } else {
        Err(error)
    }
}

//! fluidrender - Renders multi-track MIDI files through FluidSynth.
//!
//! Every mapped track is rendered offline to its own stem by a dedicated
//! FluidSynth session, and the stems are mixed into one WAV file. The engine
//! is reached through bindings generated from a static table of declarations.

pub mod audio;
pub mod config;
pub mod fluid;
pub mod midi;
pub mod native;

// Re-export commonly used types
pub use audio::{render_score, RenderSummary};
pub use config::{InstrumentMap, InstrumentSpec};
pub use fluid::{FluidSynthApi, SynthError};
pub use midi::{Score, TrackPair};
pub use native::BindingError;

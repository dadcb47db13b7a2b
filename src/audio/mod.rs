//! Offline rendering and mixing.
//!
//! - [`render`]: schedules one instrument track and renders it to a stem
//! - [`mixer`]: applies gain and pan to stems and overlays them
//! - [`export`]: the whole score-to-WAV pipeline

pub mod export;
pub mod mixer;
pub mod render;

pub use export::{render_score, RenderSummary};
pub use mixer::{mix_stems, MixSummary, Stem};
pub use render::{build_schedule, render_stem, Schedule, ScheduleEntry, StemReport};

//! Offline rendering of a synth to an audio file.

use super::handle::OwnedHandle;
use super::synth::Synth;
use super::{check, SynthError};
use std::rc::Rc;

/// Owns a `fluid_file_renderer_t`.
///
/// The output file name, format and sample rate are read from the synth's
/// settings (`audio.file.*`, `synth.sample-rate`) when the renderer is
/// created. The file is complete once the renderer has been dropped.
pub struct FileRenderer {
    // Destroyed (and the file finalized) before the synth is released.
    handle: OwnedHandle,
    synth: Rc<Synth>,
}

impl FileRenderer {
    pub fn new(synth: Rc<Synth>) -> Result<Self, SynthError> {
        let api = synth.api();
        let handle = OwnedHandle::new(
            api,
            api.new_fluid_file_renderer(synth.handle())?,
            "file renderer",
            |api, handle| api.delete_fluid_file_renderer(handle),
        )?;
        Ok(Self { handle, synth })
    }

    /// Renders one block (`audio.period-size` frames) and writes it to the file.
    pub fn process_block(&self) -> Result<(), SynthError> {
        let status = self
            .handle
            .api()
            .fluid_file_renderer_process_block(self.handle.get())?;
        check(status, SynthError::RenderBlockFailed)
    }

    pub fn synth(&self) -> &Rc<Synth> {
        &self.synth
    }
}

//! Time-ordered event delivery to registered synths.

use super::event::Event;
use super::handle::OwnedHandle;
use super::synth::Synth;
use super::{check, FluidSynthApi, SynthError};
use std::rc::Rc;
use std::sync::Arc;

/// Owns a `fluid_sequencer_t` driven by the sample clock (no system timer).
///
/// Its tick counter, in milliseconds, only advances as audio is rendered by a
/// registered synth. Registered synths are anchored for the sequencer's
/// lifetime.
pub struct Sequencer {
    // Destroyed before the registered synths are released.
    handle: OwnedHandle,
    synths: Vec<Rc<Synth>>,
}

impl Sequencer {
    pub fn new(api: &Arc<FluidSynthApi>) -> Result<Self, SynthError> {
        let handle = OwnedHandle::new(
            api,
            api.new_fluid_sequencer2(0)?,
            "sequencer",
            |api, handle| api.delete_fluid_sequencer(handle),
        )?;
        Ok(Self {
            handle,
            synths: Vec::new(),
        })
    }

    /// Current time in milliseconds of rendered audio.
    pub fn tick(&self) -> Result<u32, SynthError> {
        Ok(self.handle.api().fluid_sequencer_get_tick(self.handle.get())?)
    }

    /// Registers a synth as a destination for scheduled events.
    ///
    /// # Returns
    ///
    /// The sequencer client id to use as an event's destination.
    ///
    /// # Errors
    ///
    /// `RegisterFailed` if the engine returns a negative id; the synth is not
    /// anchored in that case.
    pub fn register_synth(&mut self, synth: &Rc<Synth>) -> Result<i16, SynthError> {
        let id = self
            .handle
            .api()
            .fluid_sequencer_register_fluidsynth(self.handle.get(), synth.handle())?;
        if id < 0 {
            return Err(SynthError::RegisterFailed);
        }
        self.synths.push(Rc::clone(synth));
        Ok(id)
    }

    /// Schedules a copy of `event`.
    ///
    /// # Arguments
    ///
    /// * `event` - The configured event
    /// * `time` - Delivery time in milliseconds
    /// * `absolute` - If true, `time` is measured from the sequencer's start;
    ///   otherwise it is relative to the current tick
    pub fn send_at(&self, event: &Event, time: u32, absolute: bool) -> Result<(), SynthError> {
        let status = self.handle.api().fluid_sequencer_send_at(
            self.handle.get(),
            event.handle(),
            time,
            i32::from(absolute),
        )?;
        check(status, SynthError::ScheduleFailed)
    }

    /// Number of synths kept alive by this sequencer.
    pub fn registered(&self) -> usize {
        self.synths.len()
    }
}

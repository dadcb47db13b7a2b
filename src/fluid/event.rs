//! Sequencer events and raw MIDI events.

use super::handle::OwnedHandle;
use super::{check, FluidSynthApi, SynthError};
use crate::native::Handle;
use std::sync::Arc;

/// Owns a `fluid_event_t`, the unit of scheduling for a [`Sequencer`].
///
/// The sequencer copies an event when it is sent, so one `Event` can be
/// reconfigured and sent repeatedly.
///
/// [`Sequencer`]: super::Sequencer
pub struct Event {
    handle: OwnedHandle,
}

impl Event {
    pub fn new(api: &Arc<FluidSynthApi>) -> Result<Self, SynthError> {
        let handle = OwnedHandle::new(
            api,
            api.new_fluid_event()?,
            "event",
            |api, handle| api.delete_fluid_event(handle),
        )?;
        Ok(Self { handle })
    }

    /// Configures the event as a note-on.
    pub fn note_on(&self, channel: i32, key: i16, velocity: i16) -> Result<(), SynthError> {
        self.api()
            .fluid_event_noteon(self.handle.get(), channel, key, velocity)?;
        Ok(())
    }

    /// Configures the event as a pan change (0 = left, 64 = center, 127 = right).
    pub fn pan(&self, channel: i32, value: i16) -> Result<(), SynthError> {
        self.api()
            .fluid_event_pan(self.handle.get(), channel, value)?;
        Ok(())
    }

    /// Sequencer client that sent the event; -1 for none.
    pub fn source(&self) -> Result<i16, SynthError> {
        Ok(self.api().fluid_event_get_source(self.handle.get())?)
    }

    pub fn set_source(&self, source: i16) -> Result<(), SynthError> {
        self.api()
            .fluid_event_set_source(self.handle.get(), source)?;
        Ok(())
    }

    /// Sequencer client the event is delivered to.
    pub fn dest(&self) -> Result<i16, SynthError> {
        Ok(self.api().fluid_event_get_dest(self.handle.get())?)
    }

    pub fn set_dest(&self, dest: i16) -> Result<(), SynthError> {
        self.api().fluid_event_set_dest(self.handle.get(), dest)?;
        Ok(())
    }

    pub(crate) fn handle(&self) -> Handle {
        self.handle.get()
    }

    fn api(&self) -> &Arc<FluidSynthApi> {
        self.handle.api()
    }
}

/// Generates a getter/setter pair for one `fluid_midi_event_t` field.
macro_rules! midi_event_field {
    ($($(#[$doc:meta])* $get:ident / $set:ident => $native_get:ident, $native_set:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $get(&self) -> Result<i32, SynthError> {
                Ok(self.handle.api().$native_get(self.handle.get())?)
            }

            $(#[$doc])*
            pub fn $set(&self, value: i32) -> Result<(), SynthError> {
                let status = self.handle.api().$native_set(self.handle.get(), value)?;
                check(
                    status,
                    SynthError::MidiEventRejected {
                        operation: stringify!($set),
                    },
                )
            }
        )*
    };
}

/// Owns a `fluid_midi_event_t`, a raw MIDI message that can be dispatched
/// straight to a synth with [`Synth::handle_midi_event`].
///
/// [`Synth::handle_midi_event`]: super::Synth::handle_midi_event
pub struct MidiEvent {
    handle: OwnedHandle,
}

impl MidiEvent {
    pub fn new(api: &Arc<FluidSynthApi>) -> Result<Self, SynthError> {
        let handle = OwnedHandle::new(
            api,
            api.new_fluid_midi_event()?,
            "MIDI event",
            |api, handle| api.delete_fluid_midi_event(handle),
        )?;
        Ok(Self { handle })
    }

    midi_event_field! {
        /// MIDI status type (0x90 note-on, 0xB0 control change, ...).
        kind / set_kind => fluid_midi_event_get_type, fluid_midi_event_set_type;
        channel / set_channel => fluid_midi_event_get_channel, fluid_midi_event_set_channel;
        key / set_key => fluid_midi_event_get_key, fluid_midi_event_set_key;
        velocity / set_velocity => fluid_midi_event_get_velocity, fluid_midi_event_set_velocity;
        control / set_control => fluid_midi_event_get_control, fluid_midi_event_set_control;
        value / set_value => fluid_midi_event_get_value, fluid_midi_event_set_value;
        program / set_program => fluid_midi_event_get_program, fluid_midi_event_set_program;
        /// Pitch bend, 0..16383 with 8192 as center.
        pitch / set_pitch => fluid_midi_event_get_pitch, fluid_midi_event_set_pitch;
    }

    pub(crate) fn handle(&self) -> Handle {
        self.handle.get()
    }
}

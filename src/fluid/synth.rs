//! The synthesizer instance.

use super::event::MidiEvent;
use super::handle::OwnedHandle;
use super::settings::Settings;
use super::{check, FluidSynthApi, SynthError, FLUID_FAILED};
use crate::native::Handle;
use std::rc::Rc;
use std::sync::Arc;

/// Owns a `fluid_synth_t`.
///
/// The synth reads its configuration from the settings object for its whole
/// lifetime, so it anchors the [`Settings`] it was created from.
pub struct Synth {
    // Declared before the anchor: fields drop in order, so the synth is
    // destroyed before its settings can be.
    handle: OwnedHandle,
    settings: Rc<Settings>,
}

impl Synth {
    /// Creates a synthesizer configured by `settings`.
    ///
    /// # Arguments
    ///
    /// * `settings` - Configuration; kept alive until this synth is dropped
    ///
    /// # Errors
    ///
    /// `OutOfMemory` if the engine cannot create the synth.
    pub fn new(settings: Rc<Settings>) -> Result<Self, SynthError> {
        let api = settings.api();
        let handle = OwnedHandle::new(
            api,
            api.new_fluid_synth(settings.handle())?,
            "synth",
            |api, handle| api.delete_fluid_synth(handle),
        )?;
        Ok(Self { handle, settings })
    }

    /// Loads a SoundFont file.
    ///
    /// # Arguments
    ///
    /// * `path` - SoundFont file (.sf2/.sf3)
    /// * `reset_presets` - Whether to re-assign presets on all channels.
    ///   Pass `false` to leave existing channel programs untouched.
    ///
    /// # Returns
    ///
    /// The SoundFont id used by program and font selection.
    ///
    /// # Errors
    ///
    /// `FontLoadFailed` if the engine cannot load the file.
    pub fn load_soundfont(&self, path: &str, reset_presets: bool) -> Result<i32, SynthError> {
        let id = self.handle.api().fluid_synth_sfload(
            self.handle.get(),
            path,
            i32::from(reset_presets),
        )?;
        if id == FLUID_FAILED {
            return Err(SynthError::FontLoadFailed {
                path: path.to_string(),
            });
        }
        Ok(id)
    }

    /// Selects a preset by SoundFont id, bank and preset number.
    pub fn select_program(
        &self,
        channel: i32,
        font_id: i32,
        bank: i32,
        preset: i32,
    ) -> Result<(), SynthError> {
        let status = self.handle.api().fluid_synth_program_select(
            self.handle.get(),
            channel,
            font_id,
            bank,
            preset,
        )?;
        check(status, SynthError::ProgramSelectFailed)
    }

    pub fn select_bank(&self, channel: i32, bank: i32) -> Result<(), SynthError> {
        let status = self
            .handle
            .api()
            .fluid_synth_bank_select(self.handle.get(), channel, bank)?;
        check(status, SynthError::BankSelectFailed)
    }

    /// Selects a program by number within the channel's current bank.
    pub fn program_change(&self, channel: i32, program: i32) -> Result<(), SynthError> {
        let status =
            self.handle
                .api()
                .fluid_synth_program_change(self.handle.get(), channel, program)?;
        check(status, SynthError::ProgramChangeFailed)
    }

    pub fn select_soundfont(&self, channel: i32, font_id: i32) -> Result<(), SynthError> {
        let status = self
            .handle
            .api()
            .fluid_synth_sfont_select(self.handle.get(), channel, font_id)?;
        check(status, SynthError::SfontSelectFailed)
    }

    /// Sends a MIDI controller change.
    pub fn control_change(&self, channel: i32, controller: i32, value: i32) -> Result<(), SynthError> {
        let status =
            self.handle
                .api()
                .fluid_synth_cc(self.handle.get(), channel, controller, value)?;
        check(status, SynthError::ControllerFailed)
    }

    /// Dispatches a MIDI event to the synth immediately.
    pub fn handle_midi_event(&self, event: &MidiEvent) -> Result<(), SynthError> {
        let status = self
            .handle
            .api()
            .fluid_synth_handle_midi_event(self.handle.get(), event.handle())?;
        check(
            status,
            SynthError::MidiEventRejected {
                operation: "dispatch",
            },
        )
    }

    /// The settings this synth was created from.
    pub fn settings(&self) -> &Rc<Settings> {
        &self.settings
    }

    pub(crate) fn handle(&self) -> Handle {
        self.handle.get()
    }

    pub(crate) fn api(&self) -> &Arc<FluidSynthApi> {
        self.handle.api()
    }
}

//! Binding table for the FluidSynth C API.

use crate::native::{self, native_functions, BindingError, Handle, SymbolTable, Text};
use std::sync::Arc;

native_functions! {
    /// Every FluidSynth entry point the renderer uses, bound eagerly.
    ///
    /// Wrappers hold an `Arc` to this table; the table keeps the loaded
    /// library alive.
    pub struct FluidSynthApi {
        fn new_fluid_settings() -> Handle;
        fn delete_fluid_settings(settings: Handle);
        fn fluid_settings_setstr(settings: Handle, name: Text, val: Text) -> i32;
        fn fluid_settings_setint(settings: Handle, name: Text, val: i32) -> i32;

        fn new_fluid_synth(settings: Handle) -> Handle;
        fn delete_fluid_synth(synth: Handle);
        fn fluid_synth_sfload(synth: Handle, filename: Text, reset_presets: i32) -> i32;
        fn fluid_synth_program_select(synth: Handle, chan: i32, sfont_id: i32, bank_num: i32, preset_num: i32) -> i32;
        fn fluid_synth_bank_select(synth: Handle, chan: i32, bank: i32) -> i32;
        fn fluid_synth_program_change(synth: Handle, chan: i32, prognum: i32) -> i32;
        fn fluid_synth_sfont_select(synth: Handle, chan: i32, sfont_id: i32) -> i32;
        fn fluid_synth_cc(synth: Handle, chan: i32, num: i32, val: i32) -> i32;
        fn fluid_synth_handle_midi_event(synth: Handle, event: Handle) -> i32;

        fn new_fluid_file_renderer(synth: Handle) -> Handle;
        fn delete_fluid_file_renderer(dev: Handle);
        fn fluid_file_renderer_process_block(dev: Handle) -> i32;

        fn new_fluid_midi_event() -> Handle;
        fn delete_fluid_midi_event(evt: Handle);
        fn fluid_midi_event_get_type(evt: Handle) -> i32;
        fn fluid_midi_event_set_type(evt: Handle, kind: i32) -> i32;
        fn fluid_midi_event_get_channel(evt: Handle) -> i32;
        fn fluid_midi_event_set_channel(evt: Handle, chan: i32) -> i32;
        fn fluid_midi_event_get_key(evt: Handle) -> i32;
        fn fluid_midi_event_set_key(evt: Handle, key: i32) -> i32;
        fn fluid_midi_event_get_velocity(evt: Handle) -> i32;
        fn fluid_midi_event_set_velocity(evt: Handle, vel: i32) -> i32;
        fn fluid_midi_event_get_control(evt: Handle) -> i32;
        fn fluid_midi_event_set_control(evt: Handle, ctrl: i32) -> i32;
        fn fluid_midi_event_get_value(evt: Handle) -> i32;
        fn fluid_midi_event_set_value(evt: Handle, val: i32) -> i32;
        fn fluid_midi_event_get_program(evt: Handle) -> i32;
        fn fluid_midi_event_set_program(evt: Handle, val: i32) -> i32;
        fn fluid_midi_event_get_pitch(evt: Handle) -> i32;
        fn fluid_midi_event_set_pitch(evt: Handle, val: i32) -> i32;

        fn new_fluid_sequencer2(use_system_timer: i32) -> Handle;
        fn delete_fluid_sequencer(seq: Handle);
        fn fluid_sequencer_get_tick(seq: Handle) -> u32;
        fn fluid_sequencer_register_fluidsynth(seq: Handle, synth: Handle) -> i16;
        fn fluid_sequencer_send_at(seq: Handle, evt: Handle, time: u32, absolute: i32) -> i32;

        fn new_fluid_event() -> Handle;
        fn delete_fluid_event(evt: Handle);
        fn fluid_event_get_source(evt: Handle) -> i16;
        fn fluid_event_set_source(evt: Handle, src: i16);
        fn fluid_event_get_dest(evt: Handle) -> i16;
        fn fluid_event_set_dest(evt: Handle, dest: i16);
        fn fluid_event_noteon(evt: Handle, channel: i32, key: i16, vel: i16);
        fn fluid_event_pan(evt: Handle, channel: i32, val: i16);
    }
}

impl FluidSynthApi {
    /// Symbolic name of the shared library.
    pub const LIBRARY: &'static str = "fluidsynth";

    /// Loads the FluidSynth shared library and binds every function.
    ///
    /// # Errors
    ///
    /// Any [`BindingError`]: the library is missing, or it lacks one of the
    /// declared symbols.
    pub fn load() -> Result<Arc<Self>, BindingError> {
        let library = native::load_library(Self::LIBRARY)?;
        let symbols: Arc<dyn SymbolTable> = library;
        let api = Self::bind(symbols)?;
        tracing::info!(
            "Bound {} FluidSynth functions",
            Self::declarations().len()
        );
        Ok(Arc::new(api))
    }
}

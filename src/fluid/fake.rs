//! In-process stand-in for the FluidSynth library, used by unit tests.
//!
//! Every function of [`FluidSynthApi`] is implemented here as a real
//! `extern "C"` function and exported through [`FakeSymbols`], so tests go
//! through the same binding and marshaling path as the shared library. The
//! engine state is thread-local: each test thread sees its own engine.
//!
//! Beyond mimicking the return codes, the fake records what a test needs to
//! check: destroy order, scheduled events, program selections, and any use of
//! a handle after it was destroyed ("violations"). The file renderer writes a
//! real WAV file when destroyed, with a short tone for each delivered note-on.

use super::FluidSynthApi;
use crate::native::{Handle, SymbolTable};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::{c_char, c_void, CStr};
use std::sync::Arc;

/// Frames rendered per `fluid_file_renderer_process_block` call.
pub(crate) const BLOCK_FRAMES: u64 = 64;
pub(crate) const SAMPLE_RATE: u32 = 44100;
/// How long each note sounds in the rendered file, in frames.
const NOTE_FRAMES: u64 = SAMPLE_RATE as u64 / 2;

thread_local! {
    static ENGINE: RefCell<FakeEngine> = RefCell::new(FakeEngine::default());
}

/// A stored setting.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Setting {
    Str(String),
    Int(i32),
}

/// What a sequencer event has been configured as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Payload {
    #[default]
    Empty,
    NoteOn {
        channel: i32,
        key: i16,
        velocity: i16,
    },
    Pan {
        channel: i32,
        value: i16,
    },
}

/// One `fluid_sequencer_send_at` call, with absolute time resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scheduled {
    pub time: u32,
    pub absolute: bool,
    pub dest: i16,
    pub payload: Payload,
}

#[derive(Debug, Default, Clone, Copy)]
struct MidiFields {
    kind: i32,
    channel: i32,
    key: i32,
    velocity: i32,
    control: i32,
    value: i32,
    program: i32,
    pitch: i32,
}

enum Object {
    Settings(HashMap<String, Setting>),
    Synth {
        settings: usize,
        fonts: Vec<(String, i32)>,
        programs: HashMap<i32, (i32, i32, i32)>,
        dispatched: Vec<(i32, i32, i32)>,
    },
    Sequencer {
        /// (client id, synth address)
        clients: Vec<(i16, usize)>,
        /// (absolute ms, dest, payload)
        queue: Vec<(u32, i16, Payload)>,
        frames: u64,
    },
    Event {
        source: i16,
        dest: i16,
        payload: Payload,
    },
    MidiEvent(MidiFields),
    Renderer {
        synth: usize,
        path: Option<String>,
        frames: u64,
    },
}

/// Engine state for the current thread.
#[derive(Default)]
pub(crate) struct FakeEngine {
    objects: HashMap<usize, Object>,
    next_address: usize,
    next_client: i16,
    destroyed: Vec<usize>,
    destroy_counts: HashMap<usize, usize>,
    violations: Vec<String>,
    failing_creates: HashSet<&'static str>,
    failing_operations: HashSet<&'static str>,
    scheduled: Vec<Scheduled>,
}

impl FakeEngine {
    /// Makes the next create call for `resource` return a null handle.
    pub fn fail_create(&mut self, resource: &'static str) {
        self.failing_creates.insert(resource);
    }

    /// Makes every call of the named native function report failure.
    pub fn fail_operation(&mut self, function: &'static str) {
        self.failing_operations.insert(function);
    }

    /// Handles destroyed so far, in order.
    pub fn destroyed(&self) -> Vec<Handle> {
        self.destroyed.iter().map(|a| handle(*a)).collect()
    }

    pub fn destroy_count(&self, handle: Handle) -> usize {
        self.destroy_counts
            .get(&(handle.as_ptr() as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Uses of dead handles and out-of-order destruction.
    pub fn violations(&self) -> Vec<String> {
        self.violations.clone()
    }

    pub fn settings_values(&self, settings: Handle) -> HashMap<String, Setting> {
        match self.objects.get(&address(settings)) {
            Some(Object::Settings(values)) => values.clone(),
            _ => HashMap::new(),
        }
    }

    /// (path, reset_presets) per loaded font.
    pub fn loaded_fonts(&self, synth: Handle) -> Vec<(String, i32)> {
        match self.objects.get(&address(synth)) {
            Some(Object::Synth { fonts, .. }) => fonts.clone(),
            _ => Vec::new(),
        }
    }

    /// (font id, bank, preset) selected on a channel.
    pub fn program(&self, synth: Handle, channel: i32) -> Option<(i32, i32, i32)> {
        match self.objects.get(&address(synth)) {
            Some(Object::Synth { programs, .. }) => programs.get(&channel).copied(),
            _ => None,
        }
    }

    /// (type, channel, program) per dispatched MIDI event.
    pub fn dispatched(&self, synth: Handle) -> Vec<(i32, i32, i32)> {
        match self.objects.get(&address(synth)) {
            Some(Object::Synth { dispatched, .. }) => dispatched.clone(),
            _ => Vec::new(),
        }
    }

    pub fn event_payload(&self, event: Handle) -> Payload {
        match self.objects.get(&address(event)) {
            Some(Object::Event { payload, .. }) => *payload,
            _ => Payload::Empty,
        }
    }

    /// Every successful `send_at`, across all sequencers.
    pub fn scheduled(&self) -> Vec<Scheduled> {
        self.scheduled.clone()
    }

    fn create(&mut self, resource: &'static str, object: Object) -> Handle {
        if self.failing_creates.remove(resource) {
            return Handle::NULL;
        }
        self.next_address += 0x10;
        let address = 0x1000 + self.next_address;
        self.objects.insert(address, object);
        handle(address)
    }

    fn fails(&self, function: &'static str) -> bool {
        self.failing_operations.contains(function)
    }

    fn object(&mut self, handle: Handle, function: &str) -> Option<&mut Object> {
        let address = address(handle);
        if !self.objects.contains_key(&address) {
            self.violations
                .push(format!("{function} called with dead handle {address:#x}"));
        }
        self.objects.get_mut(&address)
    }

    fn destroy(&mut self, handle: Handle, function: &str) {
        let address = address(handle);
        *self.destroy_counts.entry(address).or_insert(0) += 1;

        let dependents = self
            .objects
            .iter()
            .filter(|(_, object)| match object {
                Object::Synth { settings, .. } => *settings == address,
                Object::Renderer { synth, .. } => *synth == address,
                Object::Sequencer { clients, .. } => {
                    clients.iter().any(|(_, synth)| *synth == address)
                }
                _ => false,
            })
            .count();
        if dependents > 0 {
            self.violations.push(format!(
                "{function} destroyed {address:#x} while {dependents} dependents are alive"
            ));
        }

        match self.objects.remove(&address) {
            Some(Object::Renderer {
                synth,
                path: Some(path),
                frames,
            }) => self.write_render(synth, &path, frames),
            Some(_) => {}
            None => self
                .violations
                .push(format!("{function} called with dead handle {address:#x}")),
        }
        self.destroyed.push(address);
    }

    fn advance(&mut self, renderer: Handle) -> i32 {
        let synth = match self.object(renderer, "fluid_file_renderer_process_block") {
            Some(Object::Renderer { synth, frames, .. }) => {
                *frames += BLOCK_FRAMES;
                *synth
            }
            _ => return -1,
        };
        if !self.objects.contains_key(&synth) {
            self.violations
                .push("process_block on a renderer whose synth is gone".to_string());
            return -1;
        }
        for object in self.objects.values_mut() {
            if let Object::Sequencer { clients, frames, .. } = object {
                if clients.iter().any(|(_, s)| *s == synth) {
                    *frames += BLOCK_FRAMES;
                }
            }
        }
        0
    }

    /// Writes the renderer's output: silence with a short decaying tone for
    /// every note-on routed to its synth.
    fn write_render(&mut self, synth: usize, path: &str, frames: u64) {
        let mut notes = Vec::new();
        for object in self.objects.values() {
            if let Object::Sequencer { clients, queue, .. } = object {
                for (time, dest, payload) in queue {
                    let routed = clients.iter().any(|(id, s)| id == dest && *s == synth);
                    if let (true, Payload::NoteOn { key, velocity, .. }) = (routed, payload) {
                        if *velocity > 0 {
                            notes.push((*time as u64 * SAMPLE_RATE as u64 / 1000, *key, *velocity));
                        }
                    }
                }
            }
        }

        let spec = WavSpec {
            channels: 2,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = match WavWriter::create(path, spec) {
            Ok(writer) => writer,
            Err(e) => {
                self.violations.push(format!("cannot write {path}: {e}"));
                return;
            }
        };
        for frame in 0..frames {
            let mut sample = 0.0f32;
            for (start, key, velocity) in &notes {
                if frame >= *start && frame < start + NOTE_FRAMES {
                    let t = (frame - start) as f32 / SAMPLE_RATE as f32;
                    let freq = 440.0 * 2f32.powf((*key as f32 - 69.0) / 12.0);
                    let amp = 0.25 * *velocity as f32 / 127.0 * (1.0 - t * 2.0);
                    sample += amp * (2.0 * std::f32::consts::PI * freq * t).sin();
                }
            }
            let value = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            if writer.write_sample(value).is_err() || writer.write_sample(value).is_err() {
                self.violations.push(format!("short write to {path}"));
                return;
            }
        }
        if let Err(e) = writer.finalize() {
            self.violations.push(format!("cannot finalize {path}: {e}"));
        }
    }
}

fn handle(address: usize) -> Handle {
    Handle::from_ptr(address as *mut c_void)
}

fn address(handle: Handle) -> usize {
    handle.as_ptr() as usize
}

fn text(ptr: *const c_char) -> String {
    // SAFETY: bindings always pass a valid null-terminated buffer.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

fn engine<R>(f: impl FnOnce(&mut FakeEngine) -> R) -> R {
    ENGINE.with(|engine| f(&mut engine.borrow_mut()))
}

/// Runs `f` against this thread's engine.
pub(crate) fn with_engine<R>(f: impl FnOnce(&mut FakeEngine) -> R) -> R {
    engine(f)
}

/// Resets this thread's engine and returns bindings to it.
pub(crate) fn api() -> Arc<FluidSynthApi> {
    engine(|engine| *engine = FakeEngine::default());
    match FluidSynthApi::bind(Arc::new(FakeSymbols::default())) {
        Ok(api) => Arc::new(api),
        Err(e) => panic!("fake engine is missing a binding: {e}"),
    }
}

/// Resolves FluidSynth symbol names to the fake implementations.
#[derive(Debug, Default)]
pub(crate) struct FakeSymbols {
    omit: Option<&'static str>,
}

impl FakeSymbols {
    /// A table that does not export `name`.
    pub fn without(name: &'static str) -> Self {
        Self { omit: Some(name) }
    }
}

macro_rules! exports {
    ($($name:ident),* $(,)?) => {
        fn export(name: &str) -> Option<*const c_void> {
            match name {
                $( stringify!($name) => Some($name as usize as *const c_void), )*
                _ => None,
            }
        }
    };
}

exports! {
    new_fluid_settings, delete_fluid_settings, fluid_settings_setstr, fluid_settings_setint,
    new_fluid_synth, delete_fluid_synth, fluid_synth_sfload, fluid_synth_program_select,
    fluid_synth_bank_select, fluid_synth_program_change, fluid_synth_sfont_select,
    fluid_synth_cc, fluid_synth_handle_midi_event,
    new_fluid_file_renderer, delete_fluid_file_renderer, fluid_file_renderer_process_block,
    new_fluid_midi_event, delete_fluid_midi_event,
    fluid_midi_event_get_type, fluid_midi_event_set_type,
    fluid_midi_event_get_channel, fluid_midi_event_set_channel,
    fluid_midi_event_get_key, fluid_midi_event_set_key,
    fluid_midi_event_get_velocity, fluid_midi_event_set_velocity,
    fluid_midi_event_get_control, fluid_midi_event_set_control,
    fluid_midi_event_get_value, fluid_midi_event_set_value,
    fluid_midi_event_get_program, fluid_midi_event_set_program,
    fluid_midi_event_get_pitch, fluid_midi_event_set_pitch,
    new_fluid_sequencer2, delete_fluid_sequencer, fluid_sequencer_get_tick,
    fluid_sequencer_register_fluidsynth, fluid_sequencer_send_at,
    new_fluid_event, delete_fluid_event, fluid_event_get_source, fluid_event_set_source,
    fluid_event_get_dest, fluid_event_set_dest, fluid_event_noteon, fluid_event_pan,
}

impl SymbolTable for FakeSymbols {
    fn resolve(&self, name: &str) -> Option<*const c_void> {
        if self.omit == Some(name) {
            return None;
        }
        export(name)
    }
}

// Settings

extern "C" fn new_fluid_settings() -> Handle {
    engine(|e| e.create("settings", Object::Settings(HashMap::new())))
}

extern "C" fn delete_fluid_settings(settings: Handle) {
    engine(|e| e.destroy(settings, "delete_fluid_settings"))
}

fn store_setting(settings: Handle, name: String, value: Setting, function: &'static str) -> i32 {
    engine(|e| {
        let known = ["audio.", "synth.", "player."]
            .iter()
            .any(|prefix| name.starts_with(prefix));
        if e.fails(function) || !known {
            return -1;
        }
        match e.object(settings, function) {
            Some(Object::Settings(values)) => {
                values.insert(name, value);
                0
            }
            _ => -1,
        }
    })
}

extern "C" fn fluid_settings_setstr(settings: Handle, name: *const c_char, val: *const c_char) -> i32 {
    store_setting(settings, text(name), Setting::Str(text(val)), "fluid_settings_setstr")
}

extern "C" fn fluid_settings_setint(settings: Handle, name: *const c_char, val: i32) -> i32 {
    store_setting(settings, text(name), Setting::Int(val), "fluid_settings_setint")
}

// Synth

extern "C" fn new_fluid_synth(settings: Handle) -> Handle {
    engine(|e| {
        if !matches!(e.object(settings, "new_fluid_synth"), Some(Object::Settings(_))) {
            return Handle::NULL;
        }
        e.create(
            "synth",
            Object::Synth {
                settings: address(settings),
                fonts: Vec::new(),
                programs: HashMap::new(),
                dispatched: Vec::new(),
            },
        )
    })
}

extern "C" fn delete_fluid_synth(synth: Handle) {
    engine(|e| e.destroy(synth, "delete_fluid_synth"))
}

extern "C" fn fluid_synth_sfload(synth: Handle, filename: *const c_char, reset_presets: i32) -> i32 {
    let filename = text(filename);
    engine(|e| {
        if filename.contains("missing") {
            return -1;
        }
        match e.object(synth, "fluid_synth_sfload") {
            Some(Object::Synth { fonts, .. }) => {
                fonts.push((filename, reset_presets));
                fonts.len() as i32
            }
            _ => -1,
        }
    })
}

extern "C" fn fluid_synth_program_select(
    synth: Handle,
    chan: i32,
    sfont_id: i32,
    bank_num: i32,
    preset_num: i32,
) -> i32 {
    engine(|e| {
        if e.fails("fluid_synth_program_select") {
            return -1;
        }
        match e.object(synth, "fluid_synth_program_select") {
            Some(Object::Synth {
                fonts, programs, ..
            }) if sfont_id >= 1 && sfont_id as usize <= fonts.len() => {
                programs.insert(chan, (sfont_id, bank_num, preset_num));
                0
            }
            _ => -1,
        }
    })
}

fn synth_status(synth: Handle, function: &'static str) -> i32 {
    engine(|e| {
        if e.fails(function) {
            return -1;
        }
        match e.object(synth, function) {
            Some(Object::Synth { .. }) => 0,
            _ => -1,
        }
    })
}

extern "C" fn fluid_synth_bank_select(synth: Handle, _chan: i32, _bank: i32) -> i32 {
    synth_status(synth, "fluid_synth_bank_select")
}

extern "C" fn fluid_synth_program_change(synth: Handle, _chan: i32, _prognum: i32) -> i32 {
    synth_status(synth, "fluid_synth_program_change")
}

extern "C" fn fluid_synth_sfont_select(synth: Handle, _chan: i32, _sfont_id: i32) -> i32 {
    synth_status(synth, "fluid_synth_sfont_select")
}

extern "C" fn fluid_synth_cc(synth: Handle, _chan: i32, _num: i32, _val: i32) -> i32 {
    synth_status(synth, "fluid_synth_cc")
}

extern "C" fn fluid_synth_handle_midi_event(synth: Handle, event: Handle) -> i32 {
    engine(|e| {
        let fields = match e.object(event, "fluid_synth_handle_midi_event") {
            Some(Object::MidiEvent(fields)) => *fields,
            _ => return -1,
        };
        match e.object(synth, "fluid_synth_handle_midi_event") {
            Some(Object::Synth { dispatched, .. }) => {
                dispatched.push((fields.kind, fields.channel, fields.program));
                0
            }
            _ => -1,
        }
    })
}

// File renderer

extern "C" fn new_fluid_file_renderer(synth: Handle) -> Handle {
    engine(|e| {
        let settings = match e.object(synth, "new_fluid_file_renderer") {
            Some(Object::Synth { settings, .. }) => *settings,
            _ => return Handle::NULL,
        };
        let path = match e.objects.get(&settings) {
            Some(Object::Settings(values)) => match values.get("audio.file.name") {
                Some(Setting::Str(path)) => Some(path.clone()),
                _ => None,
            },
            _ => None,
        };
        e.create(
            "file renderer",
            Object::Renderer {
                synth: address(synth),
                path,
                frames: 0,
            },
        )
    })
}

extern "C" fn delete_fluid_file_renderer(dev: Handle) {
    engine(|e| e.destroy(dev, "delete_fluid_file_renderer"))
}

extern "C" fn fluid_file_renderer_process_block(dev: Handle) -> i32 {
    engine(|e| {
        if e.fails("fluid_file_renderer_process_block") {
            return -1;
        }
        e.advance(dev)
    })
}

// MIDI events

extern "C" fn new_fluid_midi_event() -> Handle {
    engine(|e| e.create("MIDI event", Object::MidiEvent(MidiFields::default())))
}

extern "C" fn delete_fluid_midi_event(evt: Handle) {
    engine(|e| e.destroy(evt, "delete_fluid_midi_event"))
}

fn midi_get(evt: Handle, function: &'static str, field: fn(&MidiFields) -> i32) -> i32 {
    engine(|e| match e.object(evt, function) {
        Some(Object::MidiEvent(fields)) => field(fields),
        _ => -1,
    })
}

fn midi_set(evt: Handle, function: &'static str, set: impl FnOnce(&mut MidiFields)) -> i32 {
    engine(|e| {
        if e.fails(function) {
            return -1;
        }
        match e.object(evt, function) {
            Some(Object::MidiEvent(fields)) => {
                set(fields);
                0
            }
            _ => -1,
        }
    })
}

extern "C" fn fluid_midi_event_get_type(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_type", |f| f.kind)
}

extern "C" fn fluid_midi_event_set_type(evt: Handle, kind: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_type", |f| f.kind = kind)
}

extern "C" fn fluid_midi_event_get_channel(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_channel", |f| f.channel)
}

extern "C" fn fluid_midi_event_set_channel(evt: Handle, chan: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_channel", |f| f.channel = chan)
}

extern "C" fn fluid_midi_event_get_key(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_key", |f| f.key)
}

extern "C" fn fluid_midi_event_set_key(evt: Handle, key: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_key", |f| f.key = key)
}

extern "C" fn fluid_midi_event_get_velocity(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_velocity", |f| f.velocity)
}

extern "C" fn fluid_midi_event_set_velocity(evt: Handle, vel: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_velocity", |f| f.velocity = vel)
}

extern "C" fn fluid_midi_event_get_control(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_control", |f| f.control)
}

extern "C" fn fluid_midi_event_set_control(evt: Handle, ctrl: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_control", |f| f.control = ctrl)
}

extern "C" fn fluid_midi_event_get_value(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_value", |f| f.value)
}

extern "C" fn fluid_midi_event_set_value(evt: Handle, val: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_value", |f| f.value = val)
}

extern "C" fn fluid_midi_event_get_program(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_program", |f| f.program)
}

extern "C" fn fluid_midi_event_set_program(evt: Handle, val: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_program", |f| f.program = val)
}

extern "C" fn fluid_midi_event_get_pitch(evt: Handle) -> i32 {
    midi_get(evt, "fluid_midi_event_get_pitch", |f| f.pitch)
}

extern "C" fn fluid_midi_event_set_pitch(evt: Handle, val: i32) -> i32 {
    midi_set(evt, "fluid_midi_event_set_pitch", |f| f.pitch = val)
}

// Sequencer

extern "C" fn new_fluid_sequencer2(use_system_timer: i32) -> Handle {
    engine(|e| {
        if use_system_timer != 0 {
            e.violations
                .push("sequencer created with the system timer".to_string());
        }
        e.create(
            "sequencer",
            Object::Sequencer {
                clients: Vec::new(),
                queue: Vec::new(),
                frames: 0,
            },
        )
    })
}

extern "C" fn delete_fluid_sequencer(seq: Handle) {
    engine(|e| e.destroy(seq, "delete_fluid_sequencer"))
}

fn ticks(frames: u64) -> u32 {
    (frames * 1000 / SAMPLE_RATE as u64) as u32
}

extern "C" fn fluid_sequencer_get_tick(seq: Handle) -> u32 {
    engine(|e| match e.object(seq, "fluid_sequencer_get_tick") {
        Some(Object::Sequencer { frames, .. }) => ticks(*frames),
        _ => 0,
    })
}

extern "C" fn fluid_sequencer_register_fluidsynth(seq: Handle, synth: Handle) -> i16 {
    engine(|e| {
        if e.fails("fluid_sequencer_register_fluidsynth") {
            return -1;
        }
        if !matches!(e.object(synth, "fluid_sequencer_register_fluidsynth"), Some(Object::Synth { .. })) {
            return -1;
        }
        let id = e.next_client;
        match e.object(seq, "fluid_sequencer_register_fluidsynth") {
            Some(Object::Sequencer { clients, .. }) => {
                clients.push((id, address(synth)));
                e.next_client += 1;
                id
            }
            _ => -1,
        }
    })
}

extern "C" fn fluid_sequencer_send_at(seq: Handle, evt: Handle, time: u32, absolute: i32) -> i32 {
    engine(|e| {
        if e.fails("fluid_sequencer_send_at") {
            return -1;
        }
        let (dest, payload) = match e.object(evt, "fluid_sequencer_send_at") {
            Some(Object::Event { dest, payload, .. }) => (*dest, *payload),
            _ => return -1,
        };
        let at = match e.object(seq, "fluid_sequencer_send_at") {
            Some(Object::Sequencer { queue, frames, .. }) => {
                let at = if absolute != 0 { time } else { ticks(*frames) + time };
                queue.push((at, dest, payload));
                at
            }
            _ => return -1,
        };
        e.scheduled.push(Scheduled {
            time: at,
            absolute: absolute != 0,
            dest,
            payload,
        });
        0
    })
}

// Sequencer events

extern "C" fn new_fluid_event() -> Handle {
    engine(|e| {
        e.create(
            "event",
            Object::Event {
                source: -1,
                dest: -1,
                payload: Payload::Empty,
            },
        )
    })
}

extern "C" fn delete_fluid_event(evt: Handle) {
    engine(|e| e.destroy(evt, "delete_fluid_event"))
}

fn with_event(evt: Handle, function: &'static str, f: impl FnOnce(&mut i16, &mut i16, &mut Payload)) {
    engine(|e| {
        if let Some(Object::Event {
            source,
            dest,
            payload,
        }) = e.object(evt, function)
        {
            f(source, dest, payload);
        }
    })
}

extern "C" fn fluid_event_get_source(evt: Handle) -> i16 {
    let mut value = -1;
    with_event(evt, "fluid_event_get_source", |source, _, _| value = *source);
    value
}

extern "C" fn fluid_event_set_source(evt: Handle, src: i16) {
    with_event(evt, "fluid_event_set_source", |source, _, _| *source = src);
}

extern "C" fn fluid_event_get_dest(evt: Handle) -> i16 {
    let mut value = -1;
    with_event(evt, "fluid_event_get_dest", |_, dest, _| value = *dest);
    value
}

extern "C" fn fluid_event_set_dest(evt: Handle, dest: i16) {
    with_event(evt, "fluid_event_set_dest", |_, d, _| *d = dest);
}

extern "C" fn fluid_event_noteon(evt: Handle, channel: i32, key: i16, vel: i16) {
    with_event(evt, "fluid_event_noteon", |_, _, payload| {
        *payload = Payload::NoteOn {
            channel,
            key,
            velocity: vel,
        }
    });
}

extern "C" fn fluid_event_pan(evt: Handle, channel: i32, val: i16) {
    with_event(evt, "fluid_event_pan", |_, _, payload| {
        *payload = Payload::Pan {
            channel,
            value: val,
        }
    });
}

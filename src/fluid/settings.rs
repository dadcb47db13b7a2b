//! Key/value configuration store for a synthesizer.

use super::handle::OwnedHandle;
use super::{check, FluidSynthApi, SynthError};
use crate::native::Handle;
use std::sync::Arc;

/// A value accepted by [`Settings::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue<'a> {
    Str(&'a str),
    Int(i32),
}

impl<'a> From<&'a str> for SettingValue<'a> {
    fn from(value: &'a str) -> Self {
        SettingValue::Str(value)
    }
}

impl From<i32> for SettingValue<'_> {
    fn from(value: i32) -> Self {
        SettingValue::Int(value)
    }
}

/// Owns a `fluid_settings_t`.
pub struct Settings {
    handle: OwnedHandle,
}

impl Settings {
    /// Creates a settings object with the engine's defaults.
    pub fn new(api: &Arc<FluidSynthApi>) -> Result<Self, SynthError> {
        let handle = OwnedHandle::new(
            api,
            api.new_fluid_settings()?,
            "settings",
            |api, handle| api.delete_fluid_settings(handle),
        )?;
        Ok(Self { handle })
    }

    /// Sets a string or integer key, depending on the value's type.
    ///
    /// # Arguments
    ///
    /// * `key` - Dotted setting name, e.g. `"audio.file.name"`
    /// * `value` - A `&str` or an `i32`
    ///
    /// # Errors
    ///
    /// `ConfigRejected` if the engine refuses the key or value.
    pub fn set<'a>(&self, key: &str, value: impl Into<SettingValue<'a>>) -> Result<(), SynthError> {
        match value.into() {
            SettingValue::Str(value) => self.set_str(key, value),
            SettingValue::Int(value) => self.set_int(key, value),
        }
    }

    /// Sets a string-valued key.
    pub fn set_str(&self, key: &str, value: &str) -> Result<(), SynthError> {
        let status = self
            .api()
            .fluid_settings_setstr(self.handle.get(), key, value)?;
        check(status, rejected(key))
    }

    /// Sets an integer-valued key.
    pub fn set_int(&self, key: &str, value: i32) -> Result<(), SynthError> {
        let status = self
            .api()
            .fluid_settings_setint(self.handle.get(), key, value)?;
        check(status, rejected(key))
    }

    pub(crate) fn api(&self) -> &Arc<FluidSynthApi> {
        self.handle.api()
    }

    pub(crate) fn handle(&self) -> Handle {
        self.handle.get()
    }
}

fn rejected(key: &str) -> SynthError {
    SynthError::ConfigRejected {
        key: key.to_string(),
    }
}

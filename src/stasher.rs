// Copyright (C) 2025-2026 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of logstash-emit.
//
// logstash-emit is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// mpdpopm is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even
// the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details.
//
// You should have received a copy of the GNU General Public License along with mpdpopm.  If not,
// see <http://www.gnu.org/licenses/>.

//! The emission context.
//!
//! # Introduction
//!
//! A [`Stasher`] owns the [`Settings`] & turns payloads into lines:
//!
//! ```text
//! emit(payload, as_event)
//!   -> merge metadata
//!   -> wrap into an Event      (if as_event)
//!   -> validate                (if a contract is configured)
//!   -> serialize
//!   -> writer.write(line)
//! ```
//!
//! Each call to [`Stasher::emit`] works from a single snapshot of the settings, so a concurrent
//! reconfiguration is seen either entirely or not at all. Updates are serialized among
//! themselves, so two threads toggling different flags won't lose one another's changes.
//!
//! Applications that don't want to thread a [`Stasher`] through their code can use the
//! process-wide instance returned by [`global`].

use crate::{
    config::{AppendFields, Settings},
    device::Device,
    error::Result,
    payload::Payload,
    validation::{validate, Contract},
};

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use std::sync::Arc;

/// Turns payloads into lines of JSON on the configured device.
pub struct Stasher {
    settings: ArcSwap<Settings>,
    update: Mutex<()>,
}

impl std::default::Default for Stasher {
    fn default() -> Self {
        Stasher::with_settings(Settings::default())
    }
}

impl std::fmt::Debug for Stasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stasher")
            .field("settings", &**self.settings.load())
            .finish()
    }
}

impl Stasher {
    pub fn new() -> Stasher {
        Stasher::default()
    }
    pub fn with_settings(settings: Settings) -> Stasher {
        Stasher {
            settings: ArcSwap::from_pointee(settings),
            update: Mutex::new(()),
        }
    }

    /// A snapshot of the current settings
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.load_full()
    }

    fn try_modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Settings) -> Result<()>,
    {
        let _guard = self.update.lock();
        let mut next = Settings::clone(&self.settings.load());
        f(&mut next)?;
        self.settings.store(Arc::new(next));
        Ok(())
    }

    fn modify<F: FnOnce(&mut Settings)>(&self, f: F) {
        let _guard = self.update.lock();
        let mut next = Settings::clone(&self.settings.load());
        f(&mut next);
        self.settings.store(Arc::new(next));
    }

    ////////////////////////////////////////////////////////////////////////////////////////////
    //                                      emission                                          //
    ////////////////////////////////////////////////////////////////////////////////////////////

    /// Emit `payload` as a single line of JSON on the configured writer.
    ///
    /// If anything goes wrong before the line is complete (a contract that fails, say), nothing
    /// is written.
    pub fn emit(&self, payload: impl Into<Payload>, as_event: bool) -> Result<()> {
        let settings = self.settings.load();

        let mut payload = payload.into().merge_metadata(settings.metadata());
        if as_event {
            payload = payload.into_event();
        }
        if let Some(contract) = settings.contract() {
            payload = validate(contract.as_ref(), payload)?;
        }

        settings.writer().write(&payload.to_line()?)
    }

    /// Emit anything serializable; see [`Stasher::emit`]
    pub fn emit_serialize<T: Serialize + ?Sized>(&self, payload: &T, as_event: bool) -> Result<()> {
        self.emit(Payload::from_serialize(payload)?, as_event)
    }

    ////////////////////////////////////////////////////////////////////////////////////////////
    //                                    configuration                                       //
    ////////////////////////////////////////////////////////////////////////////////////////////

    /// Apply a configuration mapping; see [`crate::config`] for the recognized keys.
    ///
    /// Either the entire configuration is applied, or (on error) none of it is.
    pub fn load_from_config(&self, config: &Map<String, Value>) -> Result<()> {
        self.try_modify(|s| {
            s.apply(config)?;
            debug!("Loaded configuration: {:?}", s);
            Ok(())
        })
    }

    pub fn enabled(&self) -> bool {
        self.settings.load().enabled()
    }
    pub fn set_enabled(&self, enabled: bool) {
        self.modify(|s| s.set_enabled(enabled))
    }
    pub fn include_parameters(&self) -> bool {
        self.settings.load().include_parameters()
    }
    pub fn set_include_parameters(&self, x: bool) {
        self.modify(|s| s.set_include_parameters(x))
    }
    pub fn serialize_parameters(&self) -> bool {
        self.settings.load().serialize_parameters()
    }
    pub fn set_serialize_parameters(&self, x: bool) {
        self.modify(|s| s.set_serialize_parameters(x))
    }
    pub fn silence_standard_logging(&self) -> bool {
        self.settings.load().silence_standard_logging()
    }
    pub fn set_silence_standard_logging(&self, x: bool) {
        self.modify(|s| s.set_silence_standard_logging(x))
    }
    /// True when we're enabled & the host's standard logging hasn't been silenced
    pub fn instrumentation_active(&self) -> bool {
        self.settings.load().instrumentation_active()
    }
    pub fn metadata(&self) -> Map<String, Value> {
        self.settings.load().metadata().clone()
    }
    pub fn set_metadata(&self, metadata: Map<String, Value>) {
        self.modify(|s| s.set_metadata(metadata))
    }
    pub fn default_device(&self) -> Option<Arc<dyn Device>> {
        self.settings.load().default_device().cloned()
    }
    /// Install `device` as both the default device & the writer
    pub fn set_device(&self, device: Arc<dyn Device>) {
        self.modify(|s| s.set_device(device))
    }
    /// Redirect output without touching the default device
    pub fn set_writer(&self, writer: Arc<dyn Device>) {
        self.modify(|s| s.set_writer(writer))
    }
    pub fn contract(&self) -> Option<Arc<dyn Contract>> {
        self.settings.load().contract().cloned()
    }
    pub fn set_contract(&self, contract: Option<Arc<dyn Contract>>) {
        self.modify(|s| s.set_contract(contract))
    }
    /// Make `contract` available under `name` to [`Stasher::set_contract_by_name`] & the
    /// `contract` configuration key
    pub fn register_contract(&self, name: impl Into<String>, contract: Arc<dyn Contract>) {
        let name = name.into();
        self.modify(|s| s.register_contract(name, contract))
    }
    /// Install a registered contract by name, or clear it with `null`; anything else is an
    /// [`Error::BadContract`](crate::error::Error::BadContract) & leaves the current contract
    /// in place.
    pub fn set_contract_by_name(&self, value: &Value) -> Result<()> {
        self.try_modify(|s| s.set_contract_by_name(value))
    }
    /// Install a callback that may add fields to every payload built by the tracing bridge
    pub fn append_fields<F>(&self, callback: F)
    where
        F: Fn(&mut Map<String, Value>) + Send + Sync + 'static,
    {
        let callback: AppendFields = Arc::new(callback);
        self.modify(|s| s.set_append_fields(Some(callback)))
    }
    pub fn append_fields_callback(&self) -> Option<AppendFields> {
        self.settings.load().append_fields().cloned()
    }
}

static GLOBAL: Lazy<Stasher> = Lazy::new(Stasher::new);

/// The process-wide [`Stasher`], created with default settings on first use
pub fn global() -> &'static Stasher {
    &GLOBAL
}

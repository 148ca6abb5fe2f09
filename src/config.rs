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

//! [logstash-emit](crate) settings.
//!
//! [`Settings`] is a plain value: every field has its default from construction on, and bulk
//! configuration ([`Settings::apply`]) works on a copy that the owning
//! [`Stasher`](crate::stasher::Stasher) swaps in only if the whole configuration applied cleanly.
//!
//! # Configuration keys
//!
//! | key                        | value                                  |
//! |----------------------------|----------------------------------------|
//! | `metadata`                 | object; replaces the metadata wholesale |
//! | `device`                   | a [`DeviceConfig`] description          |
//! | `include_parameters`       | bool                                   |
//! | `serialize_parameters`     | bool                                   |
//! | `silence_standard_logging` | bool                                   |
//! | `contract`                 | name of a registered contract, or null  |
//!
//! Anything else is ignored.

use crate::{
    device::{factory, Device, DeviceConfig, Null, Stream},
    error::{Error, Result},
    validation::Contract,
};

use backtrace::Backtrace;
use serde_json::{Map, Value};
use tracing::debug;

use std::{collections::HashMap, sync::Arc};

/// A callback given the chance to add fields to instrumentation payloads
pub type AppendFields = Arc<dyn Fn(&mut Map<String, Value>) + Send + Sync>;

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Everything a [`Stasher`](crate::stasher::Stasher) needs to know to emit a line.
#[derive(Clone)]
pub struct Settings {
    enabled: bool,
    include_parameters: bool,
    serialize_parameters: bool,
    silence_standard_logging: bool,
    metadata: Map<String, Value>,
    default_device: Option<Arc<dyn Device>>,
    writer: Arc<dyn Device>,
    contract: Option<Arc<dyn Contract>>,
    contracts: HashMap<String, Arc<dyn Contract>>,
    append_fields: Option<AppendFields>,
}

impl std::default::Default for Settings {
    fn default() -> Self {
        Settings {
            enabled: false,
            include_parameters: true,
            serialize_parameters: true,
            silence_standard_logging: false,
            metadata: Map::new(),
            default_device: None,
            writer: Arc::new(Stream::stdout()),
            contract: None,
            contracts: HashMap::new(),
            append_fields: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("enabled", &self.enabled)
            .field("include_parameters", &self.include_parameters)
            .field("serialize_parameters", &self.serialize_parameters)
            .field("silence_standard_logging", &self.silence_standard_logging)
            .field("metadata", &self.metadata)
            .field("default_device", &self.default_device.as_ref().map(|d| d.kind()))
            .field("writer", &self.writer.kind())
            .field("contract", &self.contract.is_some())
            .field("contracts", &self.contracts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Settings {
    pub fn enabled(&self) -> bool {
        self.enabled
    }
    pub fn include_parameters(&self) -> bool {
        self.include_parameters
    }
    pub fn serialize_parameters(&self) -> bool {
        self.serialize_parameters
    }
    pub fn silence_standard_logging(&self) -> bool {
        self.silence_standard_logging
    }
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
    /// The device most recently built from configuration (or installed directly), if any
    pub fn default_device(&self) -> Option<&Arc<dyn Device>> {
        self.default_device.as_ref()
    }
    /// The device lines are actually written to
    pub fn writer(&self) -> &Arc<dyn Device> {
        &self.writer
    }
    pub fn contract(&self) -> Option<&Arc<dyn Contract>> {
        self.contract.as_ref()
    }
    pub fn append_fields(&self) -> Option<&AppendFields> {
        self.append_fields.as_ref()
    }
    /// Should the host's instrumentation be wired-up to us?
    pub fn instrumentation_active(&self) -> bool {
        self.enabled && !self.silence_standard_logging
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    pub fn set_include_parameters(&mut self, x: bool) {
        self.include_parameters = x;
    }
    pub fn set_serialize_parameters(&mut self, x: bool) {
        self.serialize_parameters = x;
    }
    pub fn set_silence_standard_logging(&mut self, x: bool) {
        self.silence_standard_logging = x;
    }
    pub fn set_metadata(&mut self, metadata: Map<String, Value>) {
        self.metadata = metadata;
    }
    /// Install `device` as both the default device & the writer
    pub fn set_device(&mut self, device: Arc<dyn Device>) {
        self.default_device = Some(device.clone());
        self.writer = device;
    }
    pub fn set_writer(&mut self, writer: Arc<dyn Device>) {
        self.writer = writer;
    }
    pub fn set_contract(&mut self, contract: Option<Arc<dyn Contract>>) {
        self.contract = contract;
    }
    pub fn register_contract(&mut self, name: impl Into<String>, contract: Arc<dyn Contract>) {
        self.contracts.insert(name.into(), contract);
    }
    /// Install a contract by (registered) name; `null` clears it.
    ///
    /// On error, the current contract is left as it was.
    pub fn set_contract_by_name(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => {
                self.contract = None;
                Ok(())
            }
            Value::String(name) => match self.contracts.get(name) {
                Some(contract) => {
                    self.contract = Some(contract.clone());
                    Ok(())
                }
                None => Err(Error::BadContract {
                    reason: format!("the unregistered name '{}'", name),
                    back: Backtrace::new(),
                }),
            },
            other => Err(Error::BadContract {
                reason: json_type(other).to_string(),
                back: Backtrace::new(),
            }),
        }
    }
    pub fn set_append_fields(&mut self, callback: Option<AppendFields>) {
        self.append_fields = callback;
    }

    /// Apply a configuration mapping (see the module docs for the keys).
    ///
    /// The writer is reset to the bit bucket first; only a `device` key installs a new one.
    pub fn apply(&mut self, config: &Map<String, Value>) -> Result<()> {
        self.writer = Arc::new(Null);
        for (key, value) in config {
            match key.as_str() {
                "metadata" => {
                    self.metadata = match value {
                        Value::Object(m) => m.clone(),
                        Value::Null => Map::new(),
                        _ => return Err(bad_value(key, "an object")),
                    }
                }
                "device" => {
                    let device = factory(&DeviceConfig::from_value(value)?)?;
                    self.set_device(device);
                }
                "include_parameters" => self.include_parameters = flag(key, value)?,
                "serialize_parameters" => self.serialize_parameters = flag(key, value)?,
                "silence_standard_logging" => self.silence_standard_logging = flag(key, value)?,
                "contract" => self.set_contract_by_name(value)?,
                _ => debug!("Ignoring unknown configuration key '{}'", key),
            }
        }
        Ok(())
    }
}

fn bad_value(key: &str, expected: &'static str) -> Error {
    Error::BadConfigValue {
        key: key.to_string(),
        expected,
        back: Backtrace::new(),
    }
}

fn flag(key: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| bad_value(key, "a boolean"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        device::DeviceKind,
        validation::test::{obj, yolo_contract},
    };
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(!s.enabled());
        assert!(s.include_parameters());
        assert!(s.serialize_parameters());
        assert!(!s.silence_standard_logging());
        assert!(s.metadata().is_empty());
        assert!(s.default_device().is_none());
        assert_eq!(s.writer().kind(), DeviceKind::Stdout);
        assert!(s.contract().is_none());
        assert!(!s.instrumentation_active());
    }

    #[test]
    fn test_flags_verbatim() {
        let mut s = Settings::default();
        s.apply(&obj(json!({
            "include_parameters": false,
            "serialize_parameters": false,
            "silence_standard_logging": true,
            "silence_creation_message": false
        })))
        .unwrap();
        assert!(!s.include_parameters());
        assert!(!s.serialize_parameters());
        assert!(s.silence_standard_logging());
        assert!(s.metadata().is_empty());
    }

    #[test]
    fn test_metadata_and_device() {
        let mut s = Settings::default();
        s.apply(&obj(json!({
            "metadata": {"namespace": "kirby", "logged_via": "logstasher"},
            "device": {"type": "stdout"}
        })))
        .unwrap();
        assert_eq!(
            Value::Object(s.metadata().clone()),
            json!({"namespace": "kirby", "logged_via": "logstasher"})
        );
        assert_eq!(s.default_device().unwrap().kind(), DeviceKind::Stdout);
        assert_eq!(s.writer().kind(), DeviceKind::Stdout);
    }

    #[test]
    fn test_writer_reset() {
        let mut s = Settings::default();
        s.apply(&obj(json!({"device": {"type": "stderr"}}))).unwrap();
        s.apply(&obj(json!({"metadata": {"a": 1}}))).unwrap();
        // The default device survives...
        assert_eq!(s.default_device().unwrap().kind(), DeviceKind::Stderr);
        // but the writer does not.
        assert_eq!(s.writer().kind(), DeviceKind::Null);
    }

    #[test]
    fn test_bad_values() {
        let mut s = Settings::default();
        assert!(matches!(
            s.apply(&obj(json!({"include_parameters": "no"}))),
            Err(Error::BadConfigValue { .. })
        ));
        assert!(matches!(
            s.apply(&obj(json!({"metadata": [1, 2]}))),
            Err(Error::BadConfigValue { .. })
        ));
        assert!(matches!(
            s.apply(&obj(json!({"device": {"type": "carrier-pigeon"}}))),
            Err(Error::BadDeviceType { .. })
        ));
    }

    #[test]
    fn test_contracts() {
        let mut s = Settings::default();
        s.register_contract("yolo", Arc::new(yolo_contract));

        s.apply(&obj(json!({"contract": "yolo"}))).unwrap();
        assert!(s.contract().is_some());

        let err = s.set_contract_by_name(&json!(17)).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            format!("{}", err),
            "Expected a validation contract, got a number"
        );
        assert!(s.contract().is_some());

        assert!(matches!(
            s.set_contract_by_name(&json!("nope")),
            Err(Error::BadContract { .. })
        ));
        assert!(s.contract().is_some());

        s.apply(&obj(json!({"contract": null}))).unwrap();
        assert!(s.contract().is_none());
    }
}

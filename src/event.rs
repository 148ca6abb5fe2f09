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

//! Logstash events.
//!
//! An [`Event`] is a JSON object carrying two reserved fields in addition to whatever the caller
//! supplied:
//!
//! - `@timestamp`: RFC 3339, UTC, millisecond precision, e.g. `2022-06-03T04:05:06.000Z`
//! - `@version`: always `"1"`
//!
//! Those two are present from construction on & nothing (not [`Event::append`], not metadata
//! merging, not validation) can overwrite them.

use chrono::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

pub const TIMESTAMP: &str = "@timestamp";
pub const VERSION: &str = "@version";
/// The Logstash event format version we produce
pub const FORMAT_VERSION: &str = "1";

/// True if `key` names one of the reserved [`Event`] fields
pub fn is_reserved(key: &str) -> bool {
    key == TIMESTAMP || key == VERSION
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A Logstash event; serializes as a flat JSON object.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    /// Build an event from `fields`, stamped with the current time.
    ///
    /// A caller-supplied `@timestamp` that parses as RFC 3339 is kept (normalized to UTC); anything
    /// else in that slot is replaced.
    pub fn new(fields: Map<String, Value>) -> Event {
        Event::with_timestamp(fields, Utc::now())
    }
    /// Build an event from `fields`, using `now` as the timestamp if `fields` doesn't carry a
    /// usable one.
    pub fn with_timestamp(mut fields: Map<String, Value>, now: DateTime<Utc>) -> Event {
        let ts = fields
            .get(TIMESTAMP)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(now);
        fields.insert(TIMESTAMP.to_string(), Value::String(format_timestamp(ts)));
        fields.insert(
            VERSION.to_string(),
            Value::String(FORMAT_VERSION.to_string()),
        );
        Event { fields }
    }
    /// Add `fields` to this event; reserved fields in `fields` are ignored, everything else
    /// overwrites.
    pub fn append(&mut self, fields: Map<String, Value>) {
        for (k, v) in fields.into_iter().filter(|(k, _)| !is_reserved(k)) {
            self.fields.insert(k, v);
        }
    }
    /// Add a single field; a no-op for the reserved fields.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if !is_reserved(&key) {
            self.fields.insert(key, value);
        }
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
    pub fn timestamp(&self) -> &str {
        self.fields
            .get(TIMESTAMP)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl std::convert::From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Event::new(fields)
    }
}

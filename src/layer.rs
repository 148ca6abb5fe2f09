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

//! [logstash-emit](crate) [`Layer`] implementation.
//!
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//!
//! This is the bridge from the host application's instrumentation to a [`Stasher`]: each
//! [`tracing`] [`Event`] becomes one Logstash event, built like so:
//!
//! - `message`, `level`, `target`, and (when known) `file` & `line`
//! - if the stasher's `include_parameters` is set, every other field of the [`Event`] under
//!   `params`; as a string of JSON if `serialize_parameters` is set, as an object if not
//! - whatever the stasher's append-fields callback cares to add
//!
//! Nothing is emitted unless the stasher's [`instrumentation_active`] is true. Events originating
//! in this crate are never emitted, lest a failing device log about itself forever.
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
//! [`instrumentation_active`]: Stasher::instrumentation_active

use crate::{error::Result, stasher::Stasher};

use serde_json::{Map, Value};
use tracing::Event;
use tracing_subscriber::layer::Context;

use std::sync::Arc;

#[cfg(feature = "tracing-log")]
use tracing_log::NormalizeEvent;

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// True for targets in this crate (`logstash_emit` or `logstash_emit::...`)
fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
}

/// Collects an [`Event`]'s fields; `message` is set aside, the rest become parameters
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    params: Map<String, Value>,
}

impl FieldVisitor {
    fn record(&mut self, field: &tracing::field::Field, value: Value) {
        match field.name() {
            "message" => {
                self.message = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            }
            // Added by tracing-log for `log` records; recovered via the normalized metadata
            name if name.starts_with("log.") => (),
            name => {
                self.params.insert(name.to_string(), value);
            }
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        // The tracing macros pre-format `message` as `fmt::Arguments`, whose Debug output has no
        // enclosing quotes.
        self.record(field, Value::String(format!("{:?}", value)));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.record(field, Value::String(value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.record(field, Value::Bool(value));
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.record(field, Value::from(value));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.record(field, Value::from(value));
    }
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.record(field, Value::from(value));
    }
}

/// A [`tracing-subscriber`]-compliant [`Layer`] that emits [`Event`]s through a [`Stasher`].
///
/// [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
/// [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
pub struct Layer {
    stasher: Arc<Stasher>,
}

impl Layer {
    pub fn new(stasher: Arc<Stasher>) -> Layer {
        Layer { stasher }
    }
    pub fn stasher(&self) -> &Arc<Stasher> {
        &self.stasher
    }

    fn handle(&self, event: &Event<'_>) -> Result<()> {
        #[cfg(feature = "tracing-log")]
        let normalized_meta = event.normalized_metadata();
        #[cfg(feature = "tracing-log")]
        let meta = normalized_meta.as_ref().unwrap_or_else(|| event.metadata());
        #[cfg(not(feature = "tracing-log"))]
        let meta = event.metadata();

        if is_own_target(meta.target()) {
            return Ok(());
        }

        let settings = self.stasher.settings();
        if !settings.instrumentation_active() {
            return Ok(());
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut fields = Map::new();
        fields.insert(
            "message".to_string(),
            Value::String(visitor.message.unwrap_or_default()),
        );
        fields.insert(
            "level".to_string(),
            Value::String(meta.level().to_string()),
        );
        fields.insert(
            "target".to_string(),
            Value::String(meta.target().to_string()),
        );
        if let Some(file) = meta.file() {
            fields.insert("file".to_string(), Value::String(file.to_string()));
        }
        if let Some(line) = meta.line() {
            fields.insert("line".to_string(), Value::from(line));
        }
        if settings.include_parameters() && !visitor.params.is_empty() {
            let params = if settings.serialize_parameters() {
                Value::String(Value::Object(visitor.params).to_string())
            } else {
                Value::Object(visitor.params)
            };
            fields.insert("params".to_string(), params);
        }
        if let Some(append_fields) = settings.append_fields() {
            append_fields(&mut fields);
        }

        self.stasher.emit(fields, true)
    }
}

impl<S> tracing_subscriber::layer::Layer<S> for Layer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.handle(event).unwrap_or_else(|err| {
            ::tracing::error!("logstash-emit layer failed: {}", err);
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{device::test::Capture, validation::test::obj};
    use serde_json::json;
    use tracing::{info, warn};
    use tracing_subscriber::{layer::SubscriberExt, registry::Registry};

    // Events in this module would otherwise carry this crate's name as their target, so the tests
    // all set one explicitly.

    fn setup() -> (Arc<Stasher>, Arc<Capture>) {
        let stasher = Arc::new(Stasher::new());
        let capture = Arc::new(Capture::default());
        stasher.set_writer(capture.clone());
        stasher.set_enabled(true);
        (stasher, capture)
    }

    #[test]
    fn test_serialized_params() {
        let (stasher, capture) = setup();
        let subscriber = Registry::default().with(Layer::new(stasher.clone()));
        tracing::subscriber::with_default(subscriber, || {
            info!(target: "app", user = "kirby", count = 3, "Hello, {}!", "world");
        });

        let out = capture.json();
        assert_eq!(out.len(), 1);
        let out = &out[0];
        assert_eq!(out["message"], json!("Hello, world!"));
        assert_eq!(out["level"], json!("INFO"));
        assert_eq!(out["target"], json!("app"));
        assert_eq!(out["file"], json!(file!()));
        assert!(out["line"].is_u64());
        assert_eq!(out["params"], json!("{\"user\":\"kirby\",\"count\":3}"));
        assert_eq!(out["@version"], json!("1"));
        assert!(out["@timestamp"].is_string());
    }

    #[test]
    fn test_structured_params() {
        let (stasher, capture) = setup();
        stasher.set_serialize_parameters(false);
        stasher.set_metadata(obj(json!({"namespace": "cooldude"})));
        stasher.append_fields(|m| {
            m.insert("request_id".to_string(), json!("abc123"));
        });
        let subscriber = Registry::default().with(Layer::new(stasher.clone()));
        tracing::subscriber::with_default(subscriber, || {
            warn!(target: "app", ok = false, "uh-oh");
        });

        let out = &capture.json()[0];
        assert_eq!(out["level"], json!("WARN"));
        assert_eq!(out["params"], json!({"ok": false}));
        assert_eq!(out["request_id"], json!("abc123"));
        assert_eq!(out["metadata"], json!({"namespace": "cooldude"}));
    }

    #[test]
    fn test_no_params() {
        let (stasher, capture) = setup();
        stasher.set_include_parameters(false);
        let subscriber = Registry::default().with(Layer::new(stasher.clone()));
        tracing::subscriber::with_default(subscriber, || {
            info!(target: "app", user = "kirby", "Hello");
        });
        let out = &capture.json()[0];
        assert_eq!(out["message"], json!("Hello"));
        assert!(out.get("params").is_none());
    }

    #[test]
    fn test_own_target() {
        assert!(is_own_target("logstash_emit"));
        assert!(is_own_target("logstash_emit::device"));
        assert!(!is_own_target("logstash_emit_app"));
        assert!(!is_own_target("logstash_emit_app::handlers"));
        assert!(!is_own_target("app"));

        let (stasher, capture) = setup();
        let subscriber = Registry::default().with(Layer::new(stasher.clone()));
        tracing::subscriber::with_default(subscriber, || {
            info!(target: "logstash_emit_app", "neighbor");
            info!(target: "logstash_emit::device", "ours");
        });
        let out = capture.json();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["target"], json!("logstash_emit_app"));
    }

    #[test]
    fn test_inactive() {
        let (stasher, capture) = setup();
        let subscriber = Registry::default().with(Layer::new(stasher.clone()));
        tracing::subscriber::with_default(subscriber, || {
            stasher.set_silence_standard_logging(true);
            info!(target: "app", "silenced");
            stasher.set_silence_standard_logging(false);
            stasher.set_enabled(false);
            info!(target: "app", "disabled");
            stasher.set_enabled(true);
            // Our own diagnostics never make it out
            info!("from {}", OWN_TARGET);
            info!(target: "app", "finally");
        });
        let out = capture.json();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["message"], json!("finally"));
    }
}

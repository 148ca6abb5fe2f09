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

//! Emit structured, [Logstash]-style events as single lines of JSON.
//!
//! [Logstash]: https://www.elastic.co/logstash
//!
//! # Introduction
//!
//! Log collectors such as Logstash are happiest when each log line is one self-contained JSON
//! document. This crate takes application-level payloads (a key/value record, a pre-built
//! [`Event`], or anything [`Serialize`]) and turns each into exactly one such line on a
//! configured output device, optionally:
//!
//! - merging process-wide metadata in under the `metadata` key
//! - wrapping the record into a Logstash [`Event`] (adding `@timestamp` & `@version`)
//! - checking the record against a pluggable validation [`Contract`], recording the outcome in
//!   the line itself
//!
//! [`Serialize`]: https://docs.rs/serde/latest/serde/trait.Serialize.html
//!
//! # Usage
//!
//! ```rust
//! use logstash_emit::Stasher;
//! use serde_json::json;
//!
//! let stasher = Stasher::new();
//! let config = match json!({
//!     "metadata": {"namespace": "kirby"},
//!     "device": {"type": "null"}
//! }) {
//!     serde_json::Value::Object(m) => m,
//!     _ => unreachable!(),
//! };
//! stasher.load_from_config(&config).unwrap();
//! stasher.emit(json!({"controller": "users", "status": 200}), true).unwrap();
//! ```
//!
//! To have your [`tracing`] events emitted, stack a [`layer::Layer`] onto your subscriber:
//!
//! ```rust
//! use logstash_emit::{layer::Layer, Stasher};
//! use std::sync::Arc;
//! use tracing::info;
//! use tracing_subscriber::{layer::SubscriberExt, registry::Registry};
//!
//! let stasher = Arc::new(Stasher::new());
//! stasher.set_enabled(true);
//! let subscriber = Registry::default().with(Layer::new(stasher));
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! info!(target: "app", user = "kirby", "Hello, world!");
//! ```
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//!
//! See [`_docs`] for more on how the pieces fit together.

pub mod _docs;
pub mod byte_utils;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod facility;
pub mod layer;
pub mod payload;
pub mod rfc3164;
pub mod stasher;
pub mod transport;
pub mod validation;

pub use error::{Error, Result};
pub use event::Event;
pub use payload::Payload;
pub use stasher::{global, Stasher};
pub use validation::{Contract, ValidationResult};

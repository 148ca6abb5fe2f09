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

//! Emit a few lines to stdout, both directly & through the tracing bridge.

use logstash_emit::{layer::Layer, Stasher};
use serde_json::json;
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{
    layer::SubscriberExt, // Needed to get `with()`
    registry::Registry,
};

use std::sync::Arc;

pub fn main() {
    let stasher = Arc::new(Stasher::new());
    stasher
        .load_from_config(
            json!({
                "metadata": {"namespace": "stdout-test"},
                "device": {"type": "stdout"}
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();
    stasher.set_enabled(true);

    stasher
        .emit(json!({"controller": "users", "status": 200}), true)
        .unwrap();
    stasher.emit(json!(["just", "a", "list"]), false).unwrap();

    let subscriber = Registry::default().with(Layer::new(stasher));
    let _guard = tracing::subscriber::set_default(subscriber);

    trace!(target: "stdout-test", "Hello, 世界!");
    debug!(target: "stdout-test", "Hello, 世界!");
    info!(target: "stdout-test", user = "kirby", "Hello, 世界!");
    warn!(target: "stdout-test", "Hello, 世界!");
    error!(target: "stdout-test", "Hello, 世界!");
}

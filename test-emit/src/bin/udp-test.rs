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

//! Test writing to port 31459 on the local host.

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
        .load_from_config(json!({"device": {"type": "udp"}}).as_object().unwrap())
        .unwrap();
    stasher.set_enabled(true);

    // Setup the real subsriber...
    let subscriber = Registry::default().with(Layer::new(stasher));
    // and install it.
    let _guard = tracing::subscriber::set_default(subscriber);

    trace!(target: "udp-test", "Hello, 世界!");
    debug!(target: "udp-test", "Hello, 世界!");
    info!(target: "udp-test", "Hello, 世界!");
    warn!(target: "udp-test", "Hello, 世界!");
    error!(target: "udp-test", "Hello, 世界!");
}

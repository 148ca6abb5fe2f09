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

//! Test writing to `/dev/log` on the local host.

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
                "metadata": {"namespace": "syslog-test"},
                "device": {
                    "type": "syslog",
                    "identity": "syslogtest",
                    "facility": "LOG_LOCAL0",
                    "priority": "LOG_INFO",
                    "flags": ["LOG_PID", "LOG_NDELAY", "LOG_PERROR"]
                }
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();
    stasher.set_enabled(true);

    let subscriber = Registry::default().with(Layer::new(stasher));
    let _guard = tracing::subscriber::set_default(subscriber);

    trace!(target: "syslog-test", "你好, Unix domain socket.");
    debug!(target: "syslog-test", "你好, Unix domain socket.");
    info!(target: "syslog-test", "你好, Unix domain socket.");
    warn!(target: "syslog-test", "你好, Unix domain socket.");
    error!(target: "syslog-test", "你好, Unix domain socket.");
}

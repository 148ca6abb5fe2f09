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

//! # General logstash-emit Documentation
//!
//! ## Introduction
//!
//! General (i.e. not documenting a particular struct or a method) documentation goes here.
//!
//! ## From Payload to Line
//!
//! Every call to [emit] goes through the same steps, in order:
//!
//! [emit]: crate::stasher::Stasher::emit
//!
//! 1. metadata merge: if the configured metadata is non-empty, it's set under the `metadata` key
//!    of maps & events (overwriting whatever the caller put there)
//! 2. event wrapping: if asked, a map is wrapped into an [Event], gaining `@timestamp` and
//!    `@version`
//! 3. validation: if a [Contract] is configured, maps & events are run past it & the outcome is
//!    folded into the record as `dry_validation_success` & `dry_validation_errors`
//! 4. serialization: the result is rendered as compact JSON terminated by a newline & handed to
//!    the writer in a single call
//!
//! [Event]: crate::event::Event
//! [Contract]: crate::validation::Contract
//!
//! Lists & scalars skip steps 1 through 3; they're written exactly as given.
//!
//! ## Validation Never Drops a Line
//!
//! A record that fails validation is still emitted, with the caller's original values intact
//! (a number submitted where the contract wants a string is logged as that number). Only a
//! contract that fails _outright_ stops the line, and the error comes back to the caller.
//!
//! ## Output Devices
//!
//! The writer is a [Device]; [factory] builds one from a [DeviceConfig]:
//!
//! [Device]: crate::device::Device
//! [factory]: crate::device::factory
//! [DeviceConfig]: crate::device::DeviceConfig
//!
//! | `type`   | fields                                            | notes                        |
//! |----------|---------------------------------------------------|------------------------------|
//! | `stdout` |                                                   | the default writer           |
//! | `stderr` |                                                   |                              |
//! | `syslog` | `identity`, `facility`, `priority`, `flags`, `socket` | RFC 3164 over a Unix socket |
//! | `udp`    | `host`, `port`                                    | one datagram per line        |
//! | `file`   | `path`                                            | appends                      |
//! | `null`   |                                                   | discards                     |
//!
//! The syslog device takes the traditional `syslog(3)` names for facilities (`LOG_LOCAL0`, ...),
//! priorities (`LOG_INFO`, ...) and options (`LOG_PID`, `LOG_CONS`, ...); see [facility].
//!
//! [facility]: crate::facility
//!
//! ## Configuration & Concurrency
//!
//! A [Stasher] holds its [Settings] behind an atomic pointer. Each emission reads one snapshot;
//! updates build a new [Settings] & swap it in, so a configuration load that fails part-way
//! leaves the old settings in place. Loading a configuration resets the writer to the `null`
//! device unless the configuration names a `device`.
//!
//! [Stasher]: crate::stasher::Stasher
//! [Settings]: crate::config::Settings

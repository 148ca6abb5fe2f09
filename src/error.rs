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

//! [logstash-emit](crate) errors

use backtrace::Backtrace;

/// Errors produced by a contract's `evaluate()` are opaque to us; we just carry them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// [logstash-emit](crate) error type
///
/// [logstash-emit](crate) eschews libraries like [thiserror], [anyhow] & [Snafu] in favor of a
/// straightforward enumeration with a few match arms chosen on the basis what the caller will need
/// to repond.
///
/// The variants fall into three families:
///
/// 1. configuration errors (an unknown device type, an unknown syslog facility, a wrongly-typed
///    configuration value & so on); these are only ever raised while configuring, never while
///    emitting (see [`Error::is_configuration`])
///
/// 2. [`Error::Contract`]: the validation contract itself failed (as opposed to the payload
///    failing validation, which is reported _in_ the emitted line)
///
/// 3. serialization & I/O errors raised while emitting
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
/// [Snafu]: https://docs.rs/snafu/latest/snafu
#[non_exhaustive]
pub enum Error {
    /// The named configuration key held a value of the wrong shape
    BadConfigValue {
        key: String,
        expected: &'static str,
        back: Backtrace,
    },
    /// A validation contract could not be installed
    BadContract { reason: String, back: Backtrace },
    /// A device configuration could not be parsed
    BadDeviceConfig {
        source: serde_json::Error,
        back: Backtrace,
    },
    /// Unknown device `type`
    BadDeviceType { name: String, back: Backtrace },
    /// Unknown syslog facility name
    BadFacility { name: String, back: Backtrace },
    /// Unknown syslog option name
    BadFlag { name: String, back: Backtrace },
    /// Non-compliant hostname provided or discovered
    BadHostname { name: Vec<u8>, back: Backtrace },
    /// Unknown syslog priority name
    BadPriority { name: String, back: Backtrace },
    /// Non-compliant syslog identity (RFC 3164 tag)
    BadTag { name: Vec<u8>, back: Backtrace },
    /// The validation contract failed to evaluate a payload
    Contract { source: BoxError, back: Backtrace },
    /// I/O error while writing a line
    Io {
        source: std::io::Error,
        back: Backtrace,
    },
    /// The payload has no JSON representation
    Serialization {
        source: serde_json::Error,
        back: Backtrace,
    },
    /// General transport layer error
    Transport { source: BoxError, back: Backtrace },
}

impl Error {
    /// True if this error was raised because of a misconfiguration (as opposed to a failure while
    /// emitting).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::BadConfigValue { .. }
                | Error::BadContract { .. }
                | Error::BadDeviceConfig { .. }
                | Error::BadDeviceType { .. }
                | Error::BadFacility { .. }
                | Error::BadFlag { .. }
                | Error::BadHostname { .. }
                | Error::BadPriority { .. }
                | Error::BadTag { .. }
        )
    }
    fn backtrace(&self) -> &Backtrace {
        match self {
            Error::BadConfigValue { back, .. }
            | Error::BadContract { back, .. }
            | Error::BadDeviceConfig { back, .. }
            | Error::BadDeviceType { back, .. }
            | Error::BadFacility { back, .. }
            | Error::BadFlag { back, .. }
            | Error::BadHostname { back, .. }
            | Error::BadPriority { back, .. }
            | Error::BadTag { back, .. }
            | Error::Contract { back, .. }
            | Error::Io { back, .. }
            | Error::Serialization { back, .. }
            | Error::Transport { back, .. } => back,
        }
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            source: err,
            back: Backtrace::new(),
        }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadConfigValue { key, expected, .. } => {
                write!(f, "Configuration key '{}' expects {}", key, expected)
            }
            Error::BadContract { reason, .. } => {
                write!(f, "Expected a validation contract, got {}", reason)
            }
            Error::BadDeviceConfig { source, .. } => {
                write!(f, "Invalid device configuration: {}", source)
            }
            Error::BadDeviceType { name, .. } => write!(f, "Unknown device type: {}", name),
            Error::BadFacility { name, .. } => write!(f, "Unknown syslog facility: {}", name),
            Error::BadFlag { name, .. } => write!(f, "Unknown syslog option: {}", name),
            Error::BadHostname { name, .. } => {
                write!(
                    f,
                    "'{}' is not an RFC3164-compliant hostname",
                    String::from_utf8_lossy(name)
                )
            }
            Error::BadPriority { name, .. } => write!(f, "Unknown syslog priority: {}", name),
            Error::BadTag { name, .. } => write!(
                f,
                "'{}' is not an RFC3164-compliant tag",
                String::from_utf8_lossy(name)
            ),
            Error::Contract { source, .. } => {
                write!(f, "While evaluating the validation contract, got {}", source)
            }
            Error::Io { source, .. } => write!(f, "I/O error: {}", source),
            Error::Serialization { source, .. } => {
                write!(f, "Payload could not be serialized to JSON: {}", source)
            }
            Error::Transport { source, .. } => write!(f, "Transport error: {}", source),
            _ => write!(f, "Other logstash-emit error"),
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}\n{:#?}", self, self.backtrace())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::BadDeviceConfig { source, .. } => Some(source),
            Error::Contract { source, .. } => Some(source.as_ref()),
            Error::Io { source, .. } => Some(source),
            Error::Serialization { source, .. } => Some(source),
            Error::Transport { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

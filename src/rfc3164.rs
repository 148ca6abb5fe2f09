// Copyright (C) 2022-2026 Michael Herstine <sp1ff@pobox.com>
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

//! RFC 3164-compliant syslog message formatting
//! ============================================
//!
//! # Introduction
//!
//! [`Rfc3164`] wraps a JSON line in a syslog packet according to RFC [3164] (AKA the BSD syslog
//! protocol). This is the dialect local daemons expect on `/dev/log`: [rsyslog], when configured
//! to listen on a Unix Domain socket, will [use] the so-called "special parser" to handle incoming
//! messages, which does not support RFC [5424] (see e.g. [here]).
//!
//! [3164]: https://datatracker.ietf.org/doc/html/rfc3164
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//! [rsyslog]: https://www.rsyslog.com/
//! [use]: https://unix.stackexchange.com/questions/622801/does-linuxs-rsyslog-support-rfc-5424
//! [here]: https://github.com/rsyslog/rsyslog/issues/4749

use crate::{
    byte_utils::bytes_from_os_str,
    error::{Error, Result},
    facility::{Facility, Level},
};

use backtrace::Backtrace;
use bytes::BufMut;
use chrono::prelude::*;

type StdResult<T, E> = std::result::Result<T, E>;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         utility types                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A `Vec<u8>` instance with the additional constraint that its contents be ASCII above the value
/// 32 (space)
#[derive(Clone, Debug)]
pub struct Rfc3164Hostname(Vec<u8>);

impl Rfc3164Hostname {
    /// An RFC 3164-compliant hostname is made-up of ASCII above 32/space. An IP v4 address is
    /// also acceptable, so this method doesn't insist on letters, digits & `-`.
    pub fn new(bytes: Vec<u8>) -> Result<Rfc3164Hostname> {
        if bytes.iter().all(|&x| x > 32 && x < 128) {
            Ok(Rfc3164Hostname(bytes))
        } else {
            Err(Error::BadHostname {
                name: bytes,
                back: Backtrace::new(),
            })
        }
    }
    /// Remove the domain (if any) from a host name
    ///
    /// This method will remove anything including & after the first `.` in `bytes`.
    fn strip_domain(mut bytes: Vec<u8>) -> Vec<u8> {
        if let Some(idx) = bytes.iter().position(|&x| x == b'.') {
            bytes.truncate(idx);
        }
        bytes
    }
    /// Attempt to figure-out an RFC [3164]-compliant hostname: the host name sans domain if
    /// we can get one, this host's IP address if not.
    ///
    /// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
    pub fn try_default() -> Result<Rfc3164Hostname> {
        hostname::get()
            .map_err(|err| err.into())
            // 👇 :=> StdResult<Rfc3164Hostname, Error>
            .and_then(|hn| {
                Rfc3164Hostname::new(Rfc3164Hostname::strip_domain(bytes_from_os_str(hn)))
            })
            // 👇 will return the Ok(Rfc3164Hostname), or call the closure
            .or_else(|_err| {
                local_ip_address::local_ip()
                    .map(|ip| Rfc3164Hostname(ip.to_string().into_bytes()))
                    .map_err(|err| Error::Transport {
                        source: Box::new(err),
                        back: Backtrace::new(),
                    })
            })
    }
}

/// A `Vec<u8>` instance with the additional constraint that it be ASCII alphanumeric characters
///
/// Per the RFC: "The value in the TAG field will be the name of the program or process that
/// generated the message. The TAG is a string of ABNF alphanumeric characters that MUST NOT exceed
/// 32 characters.  Any non-alphanumeric character will terminate the TAG field and will be assumed
/// to be the starting character of the CONTENT field."
///
/// The syslog device's "identity" becomes the tag. The process ID, if requested, is _not_ part of
/// the tag; it is rendered as `TAG[pid]:` where the left square bracket begins the CONTENT field.
#[derive(Clone, Debug)]
pub struct Tag(Vec<u8>);

impl Tag {
    pub fn new(bytes: Vec<u8>) -> Result<Tag> {
        if !bytes.is_empty() && bytes.len() <= 32 && bytes.iter().all(|x| x.is_ascii_alphanumeric())
        {
            Ok(Tag(bytes))
        } else {
            Err(Error::BadTag {
                name: bytes,
                back: Backtrace::new(),
            })
        }
    }
    /// Strip non-compliant ASCII characters (and anything past the thirty-second character)
    fn strip_non_compliant(x: Vec<u8>) -> Vec<u8> {
        x.into_iter()
            .filter(|x| x.is_ascii_alphanumeric())
            .take(32)
            .collect()
    }
    /// Derive a tag from a configured identity such as `my-app`; characters a tag can't carry are
    /// dropped, and it's only an error if nothing is left.
    pub fn from_identity(identity: &str) -> Result<Tag> {
        Tag::new(Tag::strip_non_compliant(identity.as_bytes().to_vec()))
    }
    /// Derive a tag from the name of the current executable.
    pub fn try_default() -> Result<Tag> {
        std::env::current_exe() // :=> StdResult<PathBuf, std::io::Error>
            .map_err(|err| err.into())
            .and_then(|pbuf| match pbuf.file_name() {
                Some(os_str) => Tag::new(Tag::strip_non_compliant(bytes_from_os_str(
                    os_str.to_os_string(),
                ))),
                None => Err(Error::BadTag {
                    name: bytes_from_os_str(pbuf.into_os_string()),
                    back: Backtrace::new(),
                }),
            })
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        // Construction guarantees ASCII
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         struct Rfc3164                                         //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Produces RFC [3164]-conformant syslog packets whose MSG part is a single JSON line.
///
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
///
/// The packet looks like `<PRI>Mmm dd hh:mm:ss HOST TAG[PID]: MSG`; `[PID]` is only present when
/// the formatter was built with a pid.
#[derive(Clone, Debug)]
pub struct Rfc3164 {
    facility: Facility,
    hostname: Rfc3164Hostname,
    tag: Tag,
    add_pid: Option<u32>,
}

impl Rfc3164 {
    pub fn new(
        facility: Facility,
        hostname: Rfc3164Hostname,
        tag: Tag,
        add_pid: Option<u32>,
    ) -> Rfc3164 {
        Rfc3164 {
            facility,
            hostname,
            tag,
            add_pid,
        }
    }
    /// Format `msg` at `level`; if `timestamp` is `None`, the current local time will be used.
    pub fn format(&self, level: Level, msg: &[u8], timestamp: Option<DateTime<Utc>>) -> Vec<u8> {
        let mut buf = format!(
            "<{}>{} ",
            self.facility as u8 | level as u8,
            timestamp
                .map(|d| d.with_timezone(&Local))
                .unwrap_or_else(Local::now)
                .format("%b %_d %H:%M:%S"),
        )
        .into_bytes();

        buf.put_slice(&self.hostname.0);
        buf.put_slice(b" ");
        buf.put_slice(&self.tag.0);
        match self.add_pid {
            Some(pid) => buf.put_slice(format!("[{}]: ", pid).as_bytes()),
            None => buf.put_slice(b": "),
        }
        buf.put_slice(msg);
        buf
    }
}

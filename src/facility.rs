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

//! syslog facility, level & option defintions.
//!
//! [`Facility`], [`Level`] and [`LogOptions`] replicate the names used in `<syslog.h>`. Device
//! configuration refers to them symbolically (`"LOG_LOCAL1"`, `"LOG_INFO"`, `"LOG_PID"`); the
//! mapping from names to values lives in the static tables in this module, so supporting a new
//! name means adding a row, not a branch.

use crate::error::{Error, Result};

use backtrace::Backtrace;

type StdResult<T, E> = std::result::Result<T, E>;

/// Both RFCs [5424] & [3164] define twenty-four "facilities" for messages. The enumeration values
/// duplicate the constants defined in `<syslog.h>`, albeit multiplied by 8 for convenience in
/// forming syslog message headers (which again mirrors the `#define`s in `<syslog.h>`).
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Facility {
    /// kernel messages
    LOG_KERN = 0 << 3,
    /// random user-level messages
    LOG_USER = 1 << 3,
    /// mail system
    LOG_MAIL = 2 << 3,
    /// system daemons
    LOG_DAEMON = 3 << 3,
    /// security/authorization messages
    LOG_AUTH = 4 << 3,
    /// messages generated internally by syslogd
    LOG_SYSLOG = 5 << 3,
    /// line printer subsystem
    LOG_LPR = 6 << 3,
    /// network news subsystem
    LOG_NEWS = 7 << 3,
    /// UUCP subsystem
    LOG_UUCP = 8 << 3,
    /// clock daemon
    LOG_CRON = 9 << 3,
    /// security/authorization messages (private)
    LOG_AUTHPRIV = 10 << 3,
    /// ftp daemon
    LOG_FTP = 11 << 3,
    /// NTP subsystem
    LOG_NTP = 12 << 3,
    /// log audit
    LOG_AUDIT = 13 << 3,
    /// log alert
    LOG_ALERT = 14 << 3,
    /// clock daemon (the other one)
    LOG_CLOCK = 15 << 3,
    /// reserved for local use
    LOG_LOCAL0 = 16 << 3,
    /// reserved for local use
    LOG_LOCAL1 = 17 << 3,
    /// reserved for local use
    LOG_LOCAL2 = 18 << 3,
    /// reserved for local use
    LOG_LOCAL3 = 19 << 3,
    /// reserved for local use
    LOG_LOCAL4 = 20 << 3,
    /// reserved for local use
    LOG_LOCAL5 = 21 << 3,
    /// reserved for local use
    LOG_LOCAL6 = 22 << 3,
    /// reserved for local use
    LOG_LOCAL7 = 23 << 3,
}

const FACILITIES: [(&str, Facility); 24] = [
    ("LOG_KERN", Facility::LOG_KERN),
    ("LOG_USER", Facility::LOG_USER),
    ("LOG_MAIL", Facility::LOG_MAIL),
    ("LOG_DAEMON", Facility::LOG_DAEMON),
    ("LOG_AUTH", Facility::LOG_AUTH),
    ("LOG_SYSLOG", Facility::LOG_SYSLOG),
    ("LOG_LPR", Facility::LOG_LPR),
    ("LOG_NEWS", Facility::LOG_NEWS),
    ("LOG_UUCP", Facility::LOG_UUCP),
    ("LOG_CRON", Facility::LOG_CRON),
    ("LOG_AUTHPRIV", Facility::LOG_AUTHPRIV),
    ("LOG_FTP", Facility::LOG_FTP),
    ("LOG_NTP", Facility::LOG_NTP),
    ("LOG_AUDIT", Facility::LOG_AUDIT),
    ("LOG_ALERT", Facility::LOG_ALERT),
    ("LOG_CLOCK", Facility::LOG_CLOCK),
    ("LOG_LOCAL0", Facility::LOG_LOCAL0),
    ("LOG_LOCAL1", Facility::LOG_LOCAL1),
    ("LOG_LOCAL2", Facility::LOG_LOCAL2),
    ("LOG_LOCAL3", Facility::LOG_LOCAL3),
    ("LOG_LOCAL4", Facility::LOG_LOCAL4),
    ("LOG_LOCAL5", Facility::LOG_LOCAL5),
    ("LOG_LOCAL6", Facility::LOG_LOCAL6),
    ("LOG_LOCAL7", Facility::LOG_LOCAL7),
];

/// Look `name` up in one of our name tables
fn lookup<T: Copy>(table: &[(&'static str, T)], name: &str) -> Option<T> {
    table.iter().find(|(n, _)| *n == name).map(|(_, t)| *t)
}

/// The reverse of [`lookup`]; our tables are total over their enumerations.
fn name_of<T: Copy + PartialEq>(table: &[(&'static str, T)], t: T) -> &'static str {
    table
        .iter()
        .find(|(_, x)| *x == t)
        .map(|(n, _)| *n)
        .unwrap_or("?")
}

impl std::str::FromStr for Facility {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        lookup(&FACILITIES, s).ok_or_else(|| Error::BadFacility {
            name: s.to_string(),
            back: Backtrace::new(),
        })
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", name_of(&FACILITIES, *self))
    }
}

/// Both RFCs [5424] & [3164] define eight severity levels for messages. The enumeration values
/// duplicate the constants documented as per the `syslog()` manual [page] & defined in
/// `<syslog.h>`. Device configuration calls this the "priority".
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    /// system is unusable
    LOG_EMERG,
    /// action must be take immediately
    LOG_ALERT,
    /// critical conditions
    LOG_CRIT,
    /// error conditions
    LOG_ERR,
    /// warning conditions
    LOG_WARNING,
    /// normal, but significant condition
    LOG_NOTICE,
    /// informational message
    LOG_INFO,
    /// debug-level message
    LOG_DEBUG,
}

const LEVELS: [(&str, Level); 8] = [
    ("LOG_EMERG", Level::LOG_EMERG),
    ("LOG_ALERT", Level::LOG_ALERT),
    ("LOG_CRIT", Level::LOG_CRIT),
    ("LOG_ERR", Level::LOG_ERR),
    ("LOG_WARNING", Level::LOG_WARNING),
    ("LOG_NOTICE", Level::LOG_NOTICE),
    ("LOG_INFO", Level::LOG_INFO),
    ("LOG_DEBUG", Level::LOG_DEBUG),
];

impl std::str::FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        lookup(&LEVELS, s).ok_or_else(|| Error::BadPriority {
            name: s.to_string(),
            back: Backtrace::new(),
        })
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", name_of(&LEVELS, *self))
    }
}

/// The `openlog(3)` option flags, as a bit set.
///
/// The bit values match `<syslog.h>` on Linux & the BSDs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogOptions(u8);

impl LogOptions {
    /// log the pid with each message
    pub const LOG_PID: LogOptions = LogOptions(0x01);
    /// log on the console if errors in sending
    pub const LOG_CONS: LogOptions = LogOptions(0x02);
    /// delay open until first write
    pub const LOG_ODELAY: LogOptions = LogOptions(0x04);
    /// don't delay open
    pub const LOG_NDELAY: LogOptions = LogOptions(0x08);
    /// don't wait for console forks (accepted; has no effect here)
    pub const LOG_NOWAIT: LogOptions = LogOptions(0x10);
    /// log to stderr as well
    pub const LOG_PERROR: LogOptions = LogOptions(0x20);

    pub fn empty() -> LogOptions {
        LogOptions(0)
    }
    pub fn bits(&self) -> u8 {
        self.0
    }
    pub fn contains(&self, other: LogOptions) -> bool {
        self.0 & other.0 == other.0
    }
    /// Combine a list of symbolic option names; the first unknown name fails the whole lot.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<LogOptions> {
        names.iter().try_fold(LogOptions::empty(), |acc, name| {
            Ok(acc | name.as_ref().parse::<LogOptions>()?)
        })
    }
}

const OPTIONS: [(&str, LogOptions); 6] = [
    ("LOG_PID", LogOptions::LOG_PID),
    ("LOG_CONS", LogOptions::LOG_CONS),
    ("LOG_ODELAY", LogOptions::LOG_ODELAY),
    ("LOG_NDELAY", LogOptions::LOG_NDELAY),
    ("LOG_NOWAIT", LogOptions::LOG_NOWAIT),
    ("LOG_PERROR", LogOptions::LOG_PERROR),
];

impl std::ops::BitOr for LogOptions {
    type Output = LogOptions;
    fn bitor(self, rhs: LogOptions) -> LogOptions {
        LogOptions(self.0 | rhs.0)
    }
}

impl std::str::FromStr for LogOptions {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        lookup(&OPTIONS, s).ok_or_else(|| Error::BadFlag {
            name: s.to_string(),
            back: Backtrace::new(),
        })
    }
}

#[cfg(test)]
mod facility_level_tests {
    use super::*;
    /// Test basic PRI formatting
    #[test]
    fn test_pri() {
        assert_eq!(14, (Facility::LOG_USER as u8) | (Level::LOG_INFO as u8));
        assert_eq!(format!("{}", Facility::LOG_FTP), "LOG_FTP".to_string());
        assert_eq!(format!("{:?}", Facility::LOG_FTP), "LOG_FTP".to_string());
    }

    #[test]
    fn test_names() {
        assert_eq!(
            "LOG_LOCAL1".parse::<Facility>().unwrap(),
            Facility::LOG_LOCAL1
        );
        assert_eq!(Facility::LOG_LOCAL1 as u8, 136);
        assert_eq!("LOG_INFO".parse::<Level>().unwrap(), Level::LOG_INFO);
        assert_eq!(format!("{}", Level::LOG_WARNING), "LOG_WARNING");

        // Every table row must round-trip through Display
        for (name, facility) in FACILITIES.iter() {
            assert_eq!(&format!("{}", facility), name);
        }

        assert!(matches!(
            "LOG_LOCAL8".parse::<Facility>(),
            Err(Error::BadFacility { .. })
        ));
        assert!(matches!(
            "info".parse::<Level>(),
            Err(Error::BadPriority { .. })
        ));
    }

    #[test]
    fn test_options() {
        let opts = LogOptions::from_names(&["LOG_PID", "LOG_CONS"]).unwrap();
        assert_eq!(opts.bits(), 0x03);
        assert!(opts.contains(LogOptions::LOG_PID));
        assert!(opts.contains(LogOptions::LOG_CONS));
        assert!(!opts.contains(LogOptions::LOG_NDELAY));

        assert_eq!(LogOptions::from_names::<&str>(&[]).unwrap(), LogOptions::empty());

        match LogOptions::from_names(&["LOG_PID", "LOG_BOGUS"]) {
            Err(Error::BadFlag { name, .. }) => assert_eq!(name, "LOG_BOGUS"),
            _ => panic!("expected BadFlag"),
        }
    }
}

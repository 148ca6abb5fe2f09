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

//! Output devices.
//!
//! A [`Device`] accepts finished lines of JSON & gets them to wherever they're going. Devices are
//! described by a [`DeviceConfig`], typically parsed out of the application's configuration:
//!
//! ```rust
//! use logstash_emit::device::{factory, DeviceConfig, DeviceKind};
//! use serde_json::json;
//!
//! let config = DeviceConfig::from_value(&json!({
//!     "type": "syslog",
//!     "identity": "logstasher",
//!     "facility": "LOG_LOCAL1",
//!     "priority": "LOG_INFO",
//!     "flags": ["LOG_PID", "LOG_CONS"]
//! }))
//! .unwrap();
//! let device = factory(&config).unwrap();
//! assert_eq!(device.kind(), DeviceKind::Syslog);
//! ```
//!
//! All name lookups (device type, syslog facility, priority & options) happen in [`factory`], so
//! a misconfiguration is reported at startup rather than on the first write.
//!
//! Every implementation writes a line in a single operation (one locked `write_all`, one
//! datagram), so lines from concurrent callers never interleave.

use crate::{
    byte_utils::strip_line_terminator,
    error::{Error, Result},
    facility::{Facility, Level, LogOptions},
    transport::{Transport, UdpTransport},
};

#[cfg(unix)]
use crate::{
    rfc3164::{Rfc3164, Rfc3164Hostname, Tag},
    transport::UnixSocket,
};

use backtrace::Backtrace;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use std::{io::Write, path::PathBuf, sync::Arc};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         the Device trait                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Which sort of [`Device`] this is
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    Stdout,
    Stderr,
    Syslog,
    Udp,
    File,
    Null,
}

/// Operations all output devices must support.
pub trait Device: Send + Sync {
    /// Write one complete, terminated line.
    fn write(&self, line: &[u8]) -> Result<()>;
    fn kind(&self) -> DeviceKind;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         configuration                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

const DEVICE_TYPES: [&str; 6] = ["stdout", "stderr", "syslog", "udp", "file", "null"];

/// Device configuration, tagged by `type`
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeviceConfig {
    Stdout,
    Stderr,
    Syslog(SyslogConfig),
    Udp(UdpConfig),
    File(FileConfig),
    Null,
}

fn default_facility() -> String {
    "LOG_LOCAL0".to_string()
}
fn default_priority() -> String {
    "LOG_INFO".to_string()
}
fn default_flags() -> Vec<String> {
    vec!["LOG_PID".to_string(), "LOG_CONS".to_string()]
}
fn default_socket() -> PathBuf {
    PathBuf::from("/dev/log")
}

/// Syslog settings; names are as in `<syslog.h>`
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SyslogConfig {
    /// The tag attached to each message; defaults to the name of the running executable
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default = "default_facility")]
    pub facility: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_flags")]
    pub flags: Vec<String>,
    /// The daemon's socket
    #[serde(default = "default_socket")]
    pub socket: PathBuf,
}

impl std::default::Default for SyslogConfig {
    fn default() -> Self {
        SyslogConfig {
            identity: None,
            facility: default_facility(),
            priority: default_priority(),
            flags: default_flags(),
            socket: default_socket(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    31459
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UdpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FileConfig {
    pub path: PathBuf,
}

impl DeviceConfig {
    /// Parse a device description such as `{"type": "stdout"}`.
    pub fn from_value(value: &Value) -> Result<DeviceConfig> {
        let name = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::BadConfigValue {
                key: "device.type".to_string(),
                expected: "a string naming the device type",
                back: Backtrace::new(),
            })?;
        if !DEVICE_TYPES.contains(&name) {
            return Err(Error::BadDeviceType {
                name: name.to_string(),
                back: Backtrace::new(),
            });
        }
        DeviceConfig::deserialize(value).map_err(|err| Error::BadDeviceConfig {
            source: err,
            back: Backtrace::new(),
        })
    }
}

/// Build the [`Device`] described by `config`.
pub fn factory(config: &DeviceConfig) -> Result<Arc<dyn Device>> {
    debug!("Building a device from {:?}", config);
    Ok(match config {
        DeviceConfig::Stdout => Arc::new(Stream::stdout()),
        DeviceConfig::Stderr => Arc::new(Stream::stderr()),
        #[cfg(unix)]
        DeviceConfig::Syslog(cfg) => Arc::new(Syslog::new(cfg)?),
        #[cfg(not(unix))]
        DeviceConfig::Syslog(_) => {
            return Err(Error::BadDeviceType {
                name: "syslog".to_string(),
                back: Backtrace::new(),
            })
        }
        DeviceConfig::Udp(cfg) => Arc::new(Udp::new(cfg)?),
        DeviceConfig::File(cfg) => Arc::new(File::new(cfg)?),
        DeviceConfig::Null => Arc::new(Null),
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         implementations                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamTarget {
    Stdout,
    Stderr,
}

/// One of the process' standard streams (stdout, unless told otherwise)
#[derive(Debug)]
pub struct Stream {
    target: StreamTarget,
}

impl Stream {
    pub fn new(target: StreamTarget) -> Stream {
        Stream { target }
    }
    pub fn stdout() -> Stream {
        Stream::new(StreamTarget::Stdout)
    }
    pub fn stderr() -> Stream {
        Stream::new(StreamTarget::Stderr)
    }
}

impl std::default::Default for Stream {
    fn default() -> Self {
        Stream::stdout()
    }
}

impl Device for Stream {
    fn write(&self, line: &[u8]) -> Result<()> {
        // Hold the stream's lock across the whole line
        match self.target {
            StreamTarget::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(line)?;
                out.flush()?;
            }
            StreamTarget::Stderr => {
                let mut out = std::io::stderr().lock();
                out.write_all(line)?;
                out.flush()?;
            }
        }
        Ok(())
    }
    fn kind(&self) -> DeviceKind {
        match self.target {
            StreamTarget::Stdout => DeviceKind::Stdout,
            StreamTarget::Stderr => DeviceKind::Stderr,
        }
    }
}

/// Sends each line, wrapped in an RFC 3164 packet, to the local syslog daemon.
///
/// The `openlog(3)` options are honored as follows:
///
/// - `LOG_PID`: include the process ID in each message
/// - `LOG_CONS`: if the daemon can't be reached, write the message to `/dev/console` instead
/// - `LOG_NDELAY`: connect at construction; otherwise we connect on first write (`LOG_ODELAY`)
/// - `LOG_PERROR`: copy each message to stderr, as well
/// - `LOG_NOWAIT`: accepted, but meaningless here
#[cfg(unix)]
pub struct Syslog {
    formatter: Rfc3164,
    facility: Facility,
    priority: Level,
    options: LogOptions,
    path: PathBuf,
    socket: Mutex<Option<UnixSocket>>,
    console: PathBuf,
    perror: Arc<dyn Device>,
}

#[cfg(unix)]
impl Syslog {
    pub fn new(config: &SyslogConfig) -> Result<Syslog> {
        let facility: Facility = config.facility.parse()?;
        let priority: Level = config.priority.parse()?;
        let options = LogOptions::from_names(&config.flags)?;
        let tag = match &config.identity {
            Some(identity) => Tag::from_identity(identity)?,
            None => Tag::try_default().or_else(|_| Tag::new(b"logstasher".to_vec()))?,
        };
        let hostname = Rfc3164Hostname::try_default()
            .or_else(|_| Rfc3164Hostname::new(b"localhost".to_vec()))?;
        let pid = if options.contains(LogOptions::LOG_PID) {
            Some(std::process::id())
        } else {
            None
        };

        let syslog = Syslog {
            formatter: Rfc3164::new(facility, hostname, tag, pid),
            facility,
            priority,
            options,
            path: config.socket.clone(),
            socket: Mutex::new(None),
            console: PathBuf::from("/dev/console"),
            perror: Arc::new(Stream::stderr()),
        };
        if options.contains(LogOptions::LOG_NDELAY) {
            // Not fatal: we'll try again on the first write
            if let Err(err) = syslog.connect(&mut syslog.socket.lock()) {
                warn!("Failed to connect to {:?} ({}); will retry", syslog.path, err);
            }
        }
        Ok(syslog)
    }
    /// Fall back to `path` rather than `/dev/console` under `LOG_CONS`
    pub fn with_console<P: Into<PathBuf>>(mut self, path: P) -> Syslog {
        self.console = path.into();
        self
    }
    /// Copy messages to `device` rather than stderr under `LOG_PERROR`
    pub fn with_perror(mut self, device: Arc<dyn Device>) -> Syslog {
        self.perror = device;
        self
    }
    pub fn facility(&self) -> Facility {
        self.facility
    }
    pub fn priority(&self) -> Level {
        self.priority
    }
    pub fn options(&self) -> LogOptions {
        self.options
    }
    fn connect(&self, socket: &mut Option<UnixSocket>) -> Result<()> {
        if socket.is_none() {
            *socket = Some(UnixSocket::new(&self.path)?);
        }
        Ok(())
    }
    fn send(&self, packet: &[u8]) -> Result<()> {
        let mut socket = self.socket.lock();
        self.connect(&mut socket)?;
        let rsp = match socket.as_ref() {
            Some(s) => s.send(packet).map(|_| ()),
            None => Ok(()),
        };
        if rsp.is_err() {
            // The daemon may have been restarted; start afresh next time.
            *socket = None;
        }
        rsp
    }
    fn write_console(&self, msg: &[u8]) -> Result<()> {
        let mut console = std::fs::OpenOptions::new()
            .write(true)
            .open(&self.console)?;
        let mut buf = msg.to_vec();
        buf.extend_from_slice(b"\r\n");
        console.write_all(&buf)?;
        Ok(())
    }
}

#[cfg(unix)]
impl Device for Syslog {
    fn write(&self, line: &[u8]) -> Result<()> {
        let msg = strip_line_terminator(line);
        if self.options.contains(LogOptions::LOG_PERROR) {
            let mut buf = msg.to_vec();
            buf.push(b'\n');
            self.perror.write(&buf)?;
        }
        match self.send(&self.formatter.format(self.priority, msg, None)) {
            Err(err) if self.options.contains(LogOptions::LOG_CONS) => {
                warn!("Failed to reach syslog ({}); writing to the console", err);
                self.write_console(msg).map_err(|_| err)
            }
            rsp => rsp,
        }
    }
    fn kind(&self) -> DeviceKind {
        DeviceKind::Syslog
    }
}

/// Ships each line (sans terminator) as a single UDP datagram.
#[derive(Debug)]
pub struct Udp {
    transport: UdpTransport,
}

impl Udp {
    pub fn new(config: &UdpConfig) -> Result<Udp> {
        Ok(Udp {
            transport: UdpTransport::new((config.host.as_str(), config.port))?,
        })
    }
}

impl Device for Udp {
    fn write(&self, line: &[u8]) -> Result<()> {
        self.transport.send(strip_line_terminator(line)).map(|_| ())
    }
    fn kind(&self) -> DeviceKind {
        DeviceKind::Udp
    }
}

/// Appends lines to a file.
#[derive(Debug)]
pub struct File {
    file: Mutex<std::fs::File>,
}

impl File {
    pub fn new(config: &FileConfig) -> Result<File> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)?;
        Ok(File {
            file: Mutex::new(file),
        })
    }
}

impl Device for File {
    fn write(&self, line: &[u8]) -> Result<()> {
        let mut file = self.file.lock();
        file.write_all(line)?;
        file.flush()?;
        Ok(())
    }
    fn kind(&self) -> DeviceKind {
        DeviceKind::File
    }
}

/// The bit bucket
#[derive(Debug, Default)]
pub struct Null;

impl Device for Null {
    fn write(&self, _line: &[u8]) -> Result<()> {
        Ok(())
    }
    fn kind(&self) -> DeviceKind {
        DeviceKind::Null
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use serde_json::json;

    /// Remembers everything written to it
    #[derive(Default)]
    pub(crate) struct Capture {
        lines: Mutex<Vec<Vec<u8>>>,
    }

    impl Capture {
        pub(crate) fn lines(&self) -> Vec<Vec<u8>> {
            self.lines.lock().clone()
        }
        /// Parse each captured line as JSON (checking the terminator on the way)
        pub(crate) fn json(&self) -> Vec<Value> {
            self.lines()
                .iter()
                .map(|l| {
                    assert_eq!(l.last(), Some(&b'\n'));
                    serde_json::from_slice(&l[..l.len() - 1]).unwrap()
                })
                .collect()
        }
    }

    impl Device for Capture {
        fn write(&self, line: &[u8]) -> Result<()> {
            self.lines.lock().push(line.to_vec());
            Ok(())
        }
        fn kind(&self) -> DeviceKind {
            DeviceKind::Null
        }
    }

    #[test]
    fn test_config_parsing() {
        assert_eq!(
            DeviceConfig::from_value(&json!({"type": "stdout"})).unwrap(),
            DeviceConfig::Stdout
        );
        assert_eq!(
            DeviceConfig::from_value(&json!({"type": "syslog"})).unwrap(),
            DeviceConfig::Syslog(SyslogConfig::default())
        );
        assert_eq!(
            DeviceConfig::from_value(&json!({"type": "udp", "port": 5000})).unwrap(),
            DeviceConfig::Udp(UdpConfig {
                host: "127.0.0.1".to_string(),
                port: 5000
            })
        );

        assert!(matches!(
            DeviceConfig::from_value(&json!({"type": "redis"})),
            Err(Error::BadDeviceType { .. })
        ));
        assert!(matches!(
            DeviceConfig::from_value(&json!({"identity": "x"})),
            Err(Error::BadConfigValue { .. })
        ));
        assert!(matches!(
            DeviceConfig::from_value(&json!({"type": "file"})),
            Err(Error::BadDeviceConfig { .. })
        ));
        assert!(matches!(
            DeviceConfig::from_value(&json!({"type": "syslog", "flags": "LOG_PID"})),
            Err(Error::BadDeviceConfig { .. })
        ));
    }

    #[test]
    fn test_stdout() {
        let device = factory(&DeviceConfig::Stdout).unwrap();
        assert_eq!(device.kind(), DeviceKind::Stdout);
        assert_eq!(Stream::default().kind(), DeviceKind::Stdout);
        assert_eq!(
            factory(&DeviceConfig::Stderr).unwrap().kind(),
            DeviceKind::Stderr
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_names() {
        let cfg = SyslogConfig {
            identity: Some("logstasher".to_string()),
            facility: "LOG_LOCAL1".to_string(),
            priority: "LOG_INFO".to_string(),
            flags: vec!["LOG_PID".to_string(), "LOG_CONS".to_string()],
            ..Default::default()
        };
        let syslog = Syslog::new(&cfg).unwrap();
        assert_eq!(syslog.facility(), Facility::LOG_LOCAL1);
        assert_eq!(syslog.priority(), Level::LOG_INFO);
        assert_eq!(syslog.options().bits(), 0x03);

        for (bad, check) in [
            (
                SyslogConfig {
                    facility: "LOG_LOCAL9".to_string(),
                    ..cfg.clone()
                },
                "facility",
            ),
            (
                SyslogConfig {
                    priority: "LOG_CHATTY".to_string(),
                    ..cfg.clone()
                },
                "priority",
            ),
            (
                SyslogConfig {
                    flags: vec!["LOG_PID".to_string(), "LOG_LOUD".to_string()],
                    ..cfg.clone()
                },
                "flag",
            ),
            (
                SyslogConfig {
                    identity: Some("-_-".to_string()),
                    ..cfg.clone()
                },
                "tag",
            ),
        ] {
            match (Syslog::new(&bad), check) {
                (Err(Error::BadFacility { .. }), "facility")
                | (Err(Error::BadPriority { .. }), "priority")
                | (Err(Error::BadFlag { .. }), "flag")
                | (Err(Error::BadTag { .. }), "tag") => (),
                (Err(err), _) => panic!("wrong error for {}: {}", check, err),
                (Ok(_), _) => panic!("bad {} accepted", check),
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_write() {
        use std::os::unix::net::UnixDatagram;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.s");

        let cfg = SyslogConfig {
            identity: Some("logstasher".to_string()),
            facility: "LOG_LOCAL1".to_string(),
            flags: vec!["LOG_PID".to_string()],
            socket: path.clone(),
            ..Default::default()
        };
        // Not listening yet; since LOG_NDELAY isn't set, that's fine...
        let syslog = Syslog::new(&cfg).unwrap();
        // until we write.
        assert!(syslog.write(b"{\"yolo\":\"brolo\"}\n").is_err());

        let rx = UnixDatagram::bind(&path).unwrap();
        syslog.write(b"{\"yolo\":\"brolo\"}\n").unwrap();

        let mut buf = [0u8; 512];
        let n = rx.recv(&mut buf).unwrap();
        let packet = std::str::from_utf8(&buf[..n]).unwrap();
        assert!(packet.starts_with("<142>"), "{}", packet);
        assert!(
            packet.ends_with(&format!(
                " logstasher[{}]: {{\"yolo\":\"brolo\"}}",
                std::process::id()
            )),
            "{}",
            packet
        );
    }

    #[cfg(unix)]
    fn syslog_config(path: &std::path::Path, flags: &[&str]) -> SyslogConfig {
        SyslogConfig {
            identity: Some("my-app".to_string()),
            flags: flags.iter().map(|f| f.to_string()).collect(),
            socket: path.to_path_buf(),
            ..Default::default()
        }
    }

    #[cfg(unix)]
    fn recv_packet(rx: &std::os::unix::net::UnixDatagram) -> String {
        let mut buf = [0u8; 512];
        let n = rx.recv(&mut buf).unwrap();
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_identity_cleaned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.s");
        let rx = std::os::unix::net::UnixDatagram::bind(&path).unwrap();

        let device = factory(
            &DeviceConfig::from_value(&json!({
                "type": "syslog",
                "identity": "my-app",
                "flags": [],
                "socket": path
            }))
            .unwrap(),
        )
        .unwrap();
        device.write(b"{}\n").unwrap();
        assert!(recv_packet(&rx).ends_with(" myapp: {}"));
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_ndelay() {
        use std::os::unix::net::UnixDatagram;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.s");
        let rx = UnixDatagram::bind(&path).unwrap();

        // Connected at construction, so removing the socket's name afterward doesn't matter...
        let eager = Syslog::new(&syslog_config(&path, &["LOG_NDELAY"])).unwrap();
        let lazy = Syslog::new(&syslog_config(&path, &[])).unwrap();
        std::fs::remove_file(&path).unwrap();

        eager.write(b"{\"n\":1}\n").unwrap();
        assert!(recv_packet(&rx).ends_with(" myapp: {\"n\":1}"));
        // but it does to a device that waits for its first write.
        assert!(lazy.write(b"{\"n\":2}\n").is_err());

        // Nobody listening at construction is not an error, either.
        assert!(Syslog::new(&syslog_config(&path, &["LOG_NDELAY"])).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_reconnect() {
        use std::os::unix::net::UnixDatagram;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.s");
        let syslog = Syslog::new(&syslog_config(&path, &[])).unwrap();

        let rx = UnixDatagram::bind(&path).unwrap();
        syslog.write(b"{\"n\":1}\n").unwrap();
        assert!(recv_packet(&rx).ends_with("{\"n\":1}"));

        // The daemon goes away...
        drop(rx);
        std::fs::remove_file(&path).unwrap();
        assert!(syslog.write(b"{\"n\":2}\n").is_err());

        // & comes back.
        let rx = UnixDatagram::bind(&path).unwrap();
        syslog.write(b"{\"n\":3}\n").unwrap();
        assert!(recv_packet(&rx).ends_with("{\"n\":3}"));
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_perror() {
        use std::os::unix::net::UnixDatagram;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.s");
        let rx = UnixDatagram::bind(&path).unwrap();
        let copy = Arc::new(Capture::default());

        let syslog = Syslog::new(&syslog_config(&path, &["LOG_PERROR"]))
            .unwrap()
            .with_perror(copy.clone());
        syslog.write(b"{\"yolo\":\"brolo\"}\n").unwrap();

        assert_eq!(copy.lines(), vec![b"{\"yolo\":\"brolo\"}\n".to_vec()]);
        assert!(recv_packet(&rx).ends_with(" myapp: {\"yolo\":\"brolo\"}"));

        // Without the option, nothing is copied.
        let quiet = Arc::new(Capture::default());
        let syslog = Syslog::new(&syslog_config(&path, &[]))
            .unwrap()
            .with_perror(quiet.clone());
        syslog.write(b"{}\n").unwrap();
        assert!(quiet.lines().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_console_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.s"); // never bound
        let console = dir.path().join("console");
        std::fs::File::create(&console).unwrap();

        let syslog = Syslog::new(&syslog_config(&path, &["LOG_CONS"]))
            .unwrap()
            .with_console(&console);
        syslog.write(b"{\"yolo\":\"brolo\"}\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(&console).unwrap(),
            "{\"yolo\":\"brolo\"}\r\n"
        );

        // If the console can't be had either, the original error comes back.
        let syslog = Syslog::new(&syslog_config(&path, &["LOG_CONS"]))
            .unwrap()
            .with_console(dir.path().join("no-such-dir").join("console"));
        assert!(matches!(
            syslog.write(b"{}\n"),
            Err(Error::Transport { .. })
        ));

        // Without LOG_CONS, no fallback.
        std::fs::write(&console, b"").unwrap();
        let syslog = Syslog::new(&syslog_config(&path, &[]))
            .unwrap()
            .with_console(&console);
        assert!(syslog.write(b"{}\n").is_err());
        assert_eq!(std::fs::read_to_string(&console).unwrap(), "");
    }

    #[test]
    fn test_udp() {
        let rx = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = rx.local_addr().unwrap().port();
        let device = factory(
            &DeviceConfig::from_value(&json!({"type": "udp", "host": "127.0.0.1", "port": port}))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(device.kind(), DeviceKind::Udp);
        device.write(b"{\"a\":1}\n").unwrap();

        let mut buf = [0u8; 64];
        let n = rx.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"{\"a\":1}");
    }

    #[test]
    fn test_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");
        let device = factory(&DeviceConfig::File(FileConfig { path: path.clone() })).unwrap();
        device.write(b"{\"a\":1}\n").unwrap();
        device.write(b"{\"a\":2}\n").unwrap();
        // Re-opening appends
        let device = factory(&DeviceConfig::File(FileConfig { path: path.clone() })).unwrap();
        device.write(b"[]\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"a\":1}\n{\"a\":2}\n[]\n"
        );
    }

    #[test]
    fn test_null() {
        let device = factory(&DeviceConfig::Null).unwrap();
        assert_eq!(device.kind(), DeviceKind::Null);
        assert!(device.write(b"whatever\n").is_ok());
    }
}

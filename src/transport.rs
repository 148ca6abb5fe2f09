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

//! Datagram transports.
//!
//! This module defines the [`Transport`] trait along with UDP & Unix socket implementations. The
//! syslog device speaks to the local daemon over a [`UnixSocket`]; the UDP device ships each line
//! in a [`UdpTransport`] datagram.
//!
//! # Examples
//!
//! To send datagrams to a collector listening on port 31459 on localhost:
//!
//! ```rust
//! use logstash_emit::transport::UdpTransport;
//! let transpo = UdpTransport::new("127.0.0.1:31459").unwrap();
//! ```
//!
//! To send messages to a local Unix socket:
//!
//! ```rust
//! use logstash_emit::transport::UnixSocket;
//! let transpo = UnixSocket::new("/i/am/not/there.s");
//! assert!(transpo.is_err()); // no such socket, after all
//! ```

use crate::error::{Error, Result};

use backtrace::Backtrace;

#[cfg(unix)]
use std::{os::unix::net::UnixDatagram, path::Path};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      transport mechanisms                                      //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Operations all transport layers must support.
pub trait Transport {
    /// Send a slice of bytes on this transport mechanism as a single datagram.
    fn send(&self, buf: &[u8]) -> Result<usize>;
}

/// Sending datagrams via UDP.
#[derive(Debug)]
pub struct UdpTransport {
    socket: std::net::UdpSocket,
}

impl UdpTransport {
    /// Construct a [`Transport`] implementation via UDP at `addr`.
    pub fn new<A: std::net::ToSocketAddrs>(addr: A) -> Result<UdpTransport> {
        let peer = addr
            .to_socket_addrs()
            .map_err(|err| Error::Transport {
                source: Box::new(err),
                back: Backtrace::new(),
            })?
            .next()
            .ok_or_else(|| Error::Transport {
                source: "address resolved to nothing".into(),
                back: Backtrace::new(),
            })?;
        // Bind to any available port in the peer's address family...
        let local = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = std::net::UdpSocket::bind(local).map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        // and "connect" to the collector (this only records the peer; no packets are exchanged).
        socket.connect(peer).map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        Ok(UdpTransport { socket })
    }
}

impl Transport for UdpTransport {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        self.socket.send(buf).map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })
    }
}

/// Sending datagrams via Unix socket.
#[cfg(unix)]
#[derive(Debug)]
pub struct UnixSocket {
    socket: UnixDatagram,
}

#[cfg(unix)]
impl UnixSocket {
    /// Construct a [`Transport`] implementation via Unix datagram sockets at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<UnixSocket> {
        let sock = UnixDatagram::unbound().map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        sock.connect(path).map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        Ok(UnixSocket { socket: sock })
    }
}

#[cfg(unix)]
impl Transport for UnixSocket {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        let cb_written = self.socket.send(buf).map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        Ok(cb_written)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_udp() {
        let rx = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let tx = UdpTransport::new(rx.local_addr().unwrap()).unwrap();
        assert_eq!(tx.send(b"{\"yolo\":\"brolo\"}").unwrap(), 16);

        let mut buf = [0u8; 64];
        let n = rx.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"{\"yolo\":\"brolo\"}");
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.s");
        let rx = UnixDatagram::bind(&path).unwrap();

        let tx = UnixSocket::new(&path).unwrap();
        tx.send(b"Hello, world!").unwrap();

        let mut buf = [0u8; 64];
        let n = rx.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"Hello, world!");

        assert!(UnixSocket::new(dir.path().join("nope.s")).is_err());
    }
}

// Copyright (C) 2022 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of syslog-sender.
//
// syslog-sender is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// syslog-sender is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with syslog-sender.  If
// not, see <http://www.gnu.org/licenses/>.

//! The syslog transport layer.
//!
//! This module defines the [`Transport`] trait that all implementations must support, as well
//! as [`SocketTransport`], which speaks TCP, UDP & both flavors of Unix socket.
//!
//! A [`SocketTransport`] asks the OS what kind of socket it holds & behaves accordingly:
//!
//! - on a stream socket it keeps writing until the entire message has gone out
//! - on a datagram socket it sends the message as a single datagram, refusing (with
//!   [`Error::SizeExceeded`]) anything larger than the configured maximum rather than let it be
//!   fragmented or truncated
//!
//! # Examples
//!
//! To send syslog messages over UDP to a daemon listening on port 514 on localhost:
//!
//! ```rust
//! use syslog_sender::transport::SocketTransport;
//! let transpo = SocketTransport::udp("localhost", 514).unwrap();
//! ```
//!
//! Connecting a stream socket fails immediately if nobody is listening:
//!
//! ```rust
//! use syslog_sender::transport::{Endpoint, SocketTransport};
//! let transpo = SocketTransport::connect_stream(&Endpoint::unix_path("/i/am/not/there.s"));
//! assert!(transpo.is_err()); // no such socket, after all
//! ```

use crate::error::{Error, Result};

use backtrace::Backtrace;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, trace};

use std::{
    borrow::Cow,
    io::{self, Write},
    net::ToSocketAddrs,
    path::PathBuf,
    sync::Arc,
};

/// Default ceiling on UDP datagrams, in octets; small enough to avoid IP fragmentation on
/// typical MTUs
pub const DEFAULT_UDP_MAX_MSG_SIZE: usize = 480;
/// Default ceiling on Unix-domain datagrams, in octets
pub const DEFAULT_UNIX_DGRAM_MAX_MSG_SIZE: usize = 2048;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                           endpoints                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Where to find the syslog daemon
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// A host name (or address literal) & port, for TCP or UDP
    Inet { host: String, port: u16 },
    /// A filesystem path naming a Unix-domain socket
    UnixPath { path: PathBuf },
}

impl Endpoint {
    pub fn inet<S: Into<String>>(host: S, port: u16) -> Endpoint {
        Endpoint::Inet {
            host: host.into(),
            port,
        }
    }
    pub fn unix_path<P: Into<PathBuf>>(path: P) -> Endpoint {
        Endpoint::UnixPath { path: path.into() }
    }
    fn resolve(&self) -> io::Result<Vec<SockAddr>> {
        match self {
            Endpoint::Inet { host, port } => Ok((host.as_str(), *port)
                .to_socket_addrs()?
                .map(SockAddr::from)
                .collect()),
            Endpoint::UnixPath { path } => Ok(vec![SockAddr::unix(path)?]),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Inet { host, port } => write!(f, "{}:{}", host, port),
            Endpoint::UnixPath { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Create a socket of type `ty` & connect it to the first address `endpoint` resolves to that
/// will accept the connection.
fn connect(endpoint: &Endpoint, ty: Type) -> Result<Socket> {
    let connect_err = |source| Error::Connect {
        endpoint: endpoint.to_string(),
        source,
        back: Backtrace::new(),
    };
    let protocol = match endpoint {
        Endpoint::UnixPath { .. } => None,
        Endpoint::Inet { .. } if ty == Type::STREAM => Some(Protocol::TCP),
        Endpoint::Inet { .. } => Some(Protocol::UDP),
    };
    let mut last_err = None;
    for addr in endpoint.resolve().map_err(connect_err)? {
        match Socket::new(addr.domain(), ty, protocol).and_then(|sock| {
            sock.connect(&addr)?;
            Ok(sock)
        }) {
            Ok(sock) => {
                debug!("connected a {:?} socket to {}", ty, endpoint);
                return Ok(sock);
            }
            Err(err) => {
                trace!("failed to connect to {:?}: {}", addr.as_socket(), err);
                last_err = Some(err);
            }
        }
    }
    Err(connect_err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no addresses to connect to")
    })))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      transport mechanisms                                      //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Operations all transport layers must support.
pub trait Transport {
    /// Send a slice of bytes on this transport mechanism.
    ///
    /// UDP, TCP & Unix sockets all operate on a contiguous slice of `u8`, so we require that our
    /// caller assemble one.
    fn send(&self, buf: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, buf: &[u8]) -> Result<()> {
        (**self).send(buf)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, buf: &[u8]) -> Result<()> {
        (**self).send(buf)
    }
}

/// How a [`SocketTransport`] treats its socket; determined by the socket type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    /// Connection-oriented byte stream (TCP, Unix stream)
    Stream,
    /// Message-oriented; datagrams larger than `max_msg_size` octets are refused
    Datagram { max_msg_size: usize },
    /// Anything else (`SOCK_SEQPACKET`, `SOCK_RAW`, ...); every send fails
    Unsupported { kind: Type },
}

/// Message framing on stream sockets, as per RFC [6587]
///
/// [6587]: https://datatracker.ietf.org/doc/html/rfc6587
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Framing {
    /// Write the formatted message as-is
    #[default]
    None,
    /// Terminate each message with a LF
    NonTransparent,
    /// Prefix each message with its length in octets & a space
    OctetCounting,
}

impl Framing {
    fn frame<'a>(&self, buf: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            Framing::None => Cow::Borrowed(buf),
            Framing::NonTransparent => {
                let mut framed = Vec::with_capacity(buf.len() + 1);
                framed.extend_from_slice(buf);
                framed.push(b'\n');
                Cow::Owned(framed)
            }
            Framing::OctetCounting => {
                let mut framed = format!("{} ", buf.len()).into_bytes();
                framed.extend_from_slice(buf);
                Cow::Owned(framed)
            }
        }
    }
}

/// Write all of `buf` to `writer`, picking up after short writes.
///
/// `Interrupted` is retried; a write of zero bytes, or any other error, is an [`Error::Write`].
fn write_stream<W: Write>(writer: &mut W, mut buf: &[u8]) -> Result<()> {
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => {
                return Err(Error::write(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write the whole syslog message",
                )))
            }
            Ok(n) => {
                if n < buf.len() {
                    trace!("short write: {} of {} bytes", n, buf.len());
                }
                buf = &buf[n..];
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::write(err)),
        }
    }
    writer.flush().map_err(Error::write)
}

/// Sending syslog messages over a connected socket.
///
/// Owns exactly one socket, which is closed when the transport is dropped. A [`SocketTransport`]
/// is not safe for unsynchronized concurrent use: on a stream socket, two callers' writes could
/// interleave.
#[derive(Debug)]
pub struct SocketTransport {
    socket: Socket,
    discipline: Discipline,
    framing: Framing,
}

impl SocketTransport {
    fn with_default_max(socket: Socket, max_msg_size: usize) -> Result<SocketTransport> {
        let kind = socket.r#type().map_err(|err| Error::SocketType {
            source: err,
            back: Backtrace::new(),
        })?;
        let discipline = if kind == Type::STREAM {
            Discipline::Stream
        } else if kind == Type::DGRAM {
            Discipline::Datagram { max_msg_size }
        } else {
            Discipline::Unsupported { kind }
        };
        Ok(SocketTransport {
            socket,
            discipline,
            framing: Framing::default(),
        })
    }
    /// Wrap a socket the caller has already created & connected.
    ///
    /// This is the way to send over a socket with timeouts or other options configured. Datagram
    /// sockets are limited to `max_msg_size` octets if given, else to the default for their
    /// domain.
    pub fn from_socket(socket: Socket, max_msg_size: Option<usize>) -> Result<SocketTransport> {
        let max_msg_size = max_msg_size.unwrap_or_else(|| {
            match socket.local_addr().map(|addr| addr.domain()) {
                Ok(domain) if domain == Domain::UNIX => DEFAULT_UNIX_DGRAM_MAX_MSG_SIZE,
                _ => DEFAULT_UDP_MAX_MSG_SIZE,
            }
        });
        SocketTransport::with_default_max(socket, max_msg_size)
    }
    /// Connect a stream socket (TCP for [`Endpoint::Inet`], Unix stream for
    /// [`Endpoint::UnixPath`])
    pub fn connect_stream(endpoint: &Endpoint) -> Result<SocketTransport> {
        // The maximum is never consulted on a stream socket
        SocketTransport::with_default_max(connect(endpoint, Type::STREAM)?, usize::MAX)
    }
    /// Connect a datagram socket (UDP for [`Endpoint::Inet`], Unix datagram for
    /// [`Endpoint::UnixPath`]).
    ///
    /// Messages are limited to `max_msg_size` octets if given, else to 480 for UDP & 2048 for
    /// Unix sockets.
    pub fn connect_datagram(
        endpoint: &Endpoint,
        max_msg_size: Option<usize>,
    ) -> Result<SocketTransport> {
        let max_msg_size = max_msg_size.unwrap_or(match endpoint {
            Endpoint::Inet { .. } => DEFAULT_UDP_MAX_MSG_SIZE,
            Endpoint::UnixPath { .. } => DEFAULT_UNIX_DGRAM_MAX_MSG_SIZE,
        });
        SocketTransport::with_default_max(connect(endpoint, Type::DGRAM)?, max_msg_size)
    }
    /// Construct a [`Transport`] implementation via TCP at `host`:`port`
    pub fn tcp<S: Into<String>>(host: S, port: u16) -> Result<SocketTransport> {
        SocketTransport::connect_stream(&Endpoint::inet(host, port))
    }
    /// Construct a [`Transport`] implementation via UDP at `host`:`port`
    pub fn udp<S: Into<String>>(host: S, port: u16) -> Result<SocketTransport> {
        SocketTransport::connect_datagram(&Endpoint::inet(host, port), None)
    }
    /// Construct a [`Transport`] implementation via UDP at `host`:`port`, with a non-default
    /// message size limit
    pub fn udp_with_max_msg_size<S: Into<String>>(
        host: S,
        port: u16,
        max_msg_size: usize,
    ) -> Result<SocketTransport> {
        SocketTransport::connect_datagram(&Endpoint::inet(host, port), Some(max_msg_size))
    }
    /// Construct a [`Transport`] implementation via a Unix stream socket at `path`
    pub fn unix_stream<P: Into<PathBuf>>(path: P) -> Result<SocketTransport> {
        SocketTransport::connect_stream(&Endpoint::unix_path(path))
    }
    /// Construct a [`Transport`] implementation via a Unix datagram socket at `path`
    pub fn unix_datagram<P: Into<PathBuf>>(path: P) -> Result<SocketTransport> {
        SocketTransport::connect_datagram(&Endpoint::unix_path(path), None)
    }
    /// Frame messages on stream sockets; has no effect on datagram sockets
    pub fn with_framing(mut self, framing: Framing) -> SocketTransport {
        self.framing = framing;
        self
    }
    pub fn discipline(&self) -> Discipline {
        self.discipline
    }
    /// The datagram size limit; `None` for stream (& unsupported) sockets
    pub fn max_msg_size(&self) -> Option<usize> {
        match self.discipline {
            Discipline::Datagram { max_msg_size } => Some(max_msg_size),
            _ => None,
        }
    }
    /// The underlying socket, e.g. to set a write timeout
    pub fn socket(&self) -> &Socket {
        &self.socket
    }
}

impl Transport for SocketTransport {
    fn send(&self, buf: &[u8]) -> Result<()> {
        match self.discipline {
            Discipline::Stream => {
                // `Write` is implemented on both `Socket` and `&Socket`. Declaring `writer` as
                // `&Socket` lets us call `write()` (which takes `&mut self`) from a method that
                // only has `&self`.
                let mut writer: &Socket = &self.socket;
                write_stream(&mut writer, &self.framing.frame(buf))
            }
            Discipline::Datagram { max_msg_size } => {
                if buf.len() > max_msg_size {
                    debug!(
                        "refusing to send a {}-octet datagram (limit {})",
                        buf.len(),
                        max_msg_size
                    );
                    return Err(Error::SizeExceeded {
                        size: buf.len(),
                        max: max_msg_size,
                        back: Backtrace::new(),
                    });
                }
                let sent = self.socket.send(buf).map_err(Error::write)?;
                if sent != buf.len() {
                    return Err(Error::write(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("sent {} of {} octets", sent, buf.len()),
                    )));
                }
                Ok(())
            }
            Discipline::Unsupported { kind } => Err(Error::UnsupportedSocket {
                kind: format!("{:?}", kind),
                back: Backtrace::new(),
            }),
        }
    }
}

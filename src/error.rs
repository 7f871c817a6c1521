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
//! [syslog-sender](crate) errors

use backtrace::Backtrace;

/// [syslog-sender](crate) error type
///
/// [syslog-sender](crate) eschews libraries like [thiserror], [anyhow] & [Snafu] in favor of
/// a straightforward enumeration with a few match arms chosen on the basis what the caller will
/// need to respond.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
/// [Snafu]: https://docs.rs/snafu/latest/snafu
#[non_exhaustive]
pub enum Error {
    /// Failed to create a socket, or to connect it to `endpoint`
    Connect {
        endpoint: String,
        source: std::io::Error,
        back: Backtrace,
    },
    /// A structured-data element with this SD-ID is already present on the message
    DuplicateSdId { id: String, back: Backtrace },
    /// The formatted message is larger than the datagram socket will accept; nothing was sent
    SizeExceeded {
        size: usize,
        max: usize,
        back: Backtrace,
    },
    /// Unable to determine the type of a socket
    SocketType {
        source: std::io::Error,
        back: Backtrace,
    },
    /// The socket is neither a stream nor a datagram socket
    UnsupportedSocket { kind: String, back: Backtrace },
    /// The OS reported a failure while sending
    Write {
        source: std::io::Error,
        back: Backtrace,
    },
}

impl Error {
    /// Convenience constructor for [`Error::Write`]
    pub(crate) fn write(source: std::io::Error) -> Error {
        Error::Write {
            source,
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
            Error::Connect {
                endpoint, source, ..
            } => write!(f, "Failed to connect to {}: {}", endpoint, source),
            Error::DuplicateSdId { id, .. } => {
                write!(f, "SD-ELEMENT with SD-ID {} already exists", id)
            }
            Error::SizeExceeded { size, max, .. } => write!(
                f,
                "The message size ({} octets) exceeds the datagram socket's limit of {} octets",
                size, max
            ),
            Error::SocketType { source, .. } => {
                write!(f, "Failed to determine the socket type: {}", source)
            }
            Error::UnsupportedSocket { kind, .. } => {
                write!(f, "The socket type {} is not supported", kind)
            }
            Error::Write { source, .. } => write!(f, "While sending a syslog message, got {}", source),
            _ => write!(f, "Other syslog-sender error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Connect { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::DuplicateSdId { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::SizeExceeded { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::SocketType { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::UnsupportedSocket { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::Write { back, .. } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "syslog-sender error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connect { source, .. }
            | Error::SocketType { source, .. }
            | Error::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

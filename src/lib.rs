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
//! Build RFC [5424] [`syslog`] messages & send them to a syslog [daemon] over TCP, UDP or Unix
//! sockets.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//! [`syslog`]: https://en.wikipedia.org/wiki/Syslog
//! [daemon]: https://en.wikipedia.org/wiki/Daemon_(computing)
//!
//! # Introduction
//!
//! Sending a syslog message happens in two steps:
//!
//! 1. a [`Message`] is serialized by a [`SyslogFormatter`] (in practice, [`Rfc5424`]) into a
//!    byte buffer
//! 2. that buffer is handed to a [`Transport`] (in practice, [`SocketTransport`]) for delivery
//!
//! [`Message`]: crate::message::Message
//! [`SyslogFormatter`]: crate::formatter::SyslogFormatter
//! [`Rfc5424`]: crate::rfc5424::Rfc5424
//! [`Transport`]: crate::transport::Transport
//! [`SocketTransport`]: crate::transport::SocketTransport
//!
//! The formatter is charged with coercing whatever the caller put into the [`Message`] into
//! something RFC 5424-compliant. The transport is charged with getting the whole buffer onto the
//! wire: on stream sockets it will keep writing until everything has gone out, and on datagram
//! sockets it will refuse to send anything too large to go as a single datagram.
//!
//! # Usage
//!
//! [`Client`] ties the two together & supplies defaults:
//!
//! [`Client`]: crate::client::Client
//!
//! ```no_run
//! use syslog_sender::{client::Client, facility::{Facility, Severity}, transport::SocketTransport};
//!
//! let client = Client::builder(SocketTransport::tcp("localhost", 514).unwrap())
//!     .facility(Facility::LOG_LOCAL3)
//!     .app_name("myapp")
//!     .build();
//! client.send(Severity::LOG_WARNING, "Hello, world!").unwrap();
//! ```
//!
//! To attach structured data, build the [`Message`] yourself:
//!
//! ```no_run
//! use syslog_sender::{
//!     client::Client, facility::Severity, structured_data::StructuredDataElement,
//!     transport::SocketTransport,
//! };
//!
//! let client = Client::new(SocketTransport::unix_datagram("/dev/log").unwrap());
//! let mut msg = client.create_message(Severity::LOG_NOTICE, "An application event log entry");
//! msg.add_sd_element(StructuredDataElement::from_params(
//!     "exampleSDID@32473",
//!     [("iut", "3"), ("eventSource", "Application")],
//! ))
//! .unwrap();
//! client.send_message(&msg).unwrap();
//! ```
//!
//! Finally, [`layer::Layer`] will forward [`tracing`] events through a [`Client`].
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html

pub mod client;
pub mod error;
pub mod facility;
pub mod formatter;
pub mod host;
pub mod layer;
pub mod message;
pub mod rfc5424;
pub mod structured_data;
pub mod transport;

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

//! A convenience facade over a formatter & a transport.
//!
//! [`Client`] remembers the facility, APP-NAME & HOSTNAME to stamp on each message so that the
//! caller need only supply a severity & some text:
//!
//! ```no_run
//! use syslog_sender::{client::Client, facility::Severity, transport::SocketTransport};
//!
//! let client = Client::builder(SocketTransport::udp("localhost", 514).unwrap())
//!     .app_name("myapp")
//!     .build();
//! client.send(Severity::LOG_INFO, "Hello, world!").unwrap();
//! ```
//!
//! Facility & severity codes may also be given as plain integers. Out-of-range values are not
//! errors: a facility falls back to `LOG_LOCAL0`, and a severity escalates to `LOG_EMERG`.

use crate::{
    error::Result,
    facility::{Facility, Severity},
    formatter::SyslogFormatter,
    host,
    message::Message,
    rfc5424::Rfc5424,
    transport::Transport,
};

use std::sync::Arc;

/// Send syslog messages with a fixed facility, APP-NAME & HOSTNAME.
///
/// The formatter & transport are reference-counted so that [`Client::with_transport`] &
/// [`Client::with_formatter`] can produce new clients sharing whichever one isn't replaced.
pub struct Client<F: SyslogFormatter, T: Transport> {
    facility: Facility,
    app_name: String,
    host_name: String,
    formatter: Arc<F>,
    transport: Arc<T>,
}

impl<F: SyslogFormatter, T: Transport> Clone for Client<F, T> {
    fn clone(&self) -> Self {
        Client {
            facility: self.facility,
            app_name: self.app_name.clone(),
            host_name: self.host_name.clone(),
            formatter: self.formatter.clone(),
            transport: self.transport.clone(),
        }
    }
}

pub struct ClientBuilder<F: SyslogFormatter, T: Transport> {
    imp: Client<F, T>,
}

impl<F: SyslogFormatter, T: Transport> ClientBuilder<F, T> {
    /// Set the facility by code; out-of-range codes fall back to `LOG_LOCAL0`
    pub fn facility<C: Into<i32>>(mut self, facility: C) -> Self {
        self.imp.set_facility(facility);
        self
    }
    pub fn app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.imp.app_name = app_name.into();
        self
    }
    /// Use the name of the running executable as the APP-NAME
    pub fn discover_app_name(mut self) -> Self {
        self.imp.app_name = host::app_name();
        self
    }
    pub fn host_name<S: Into<String>>(mut self, host_name: S) -> Self {
        self.imp.host_name = host_name.into();
        self
    }
    pub fn formatter<F2: SyslogFormatter>(self, formatter: F2) -> ClientBuilder<F2, T> {
        ClientBuilder {
            imp: self.imp.with_formatter(formatter),
        }
    }
    pub fn build(self) -> Client<F, T> {
        self.imp
    }
}

impl<T: Transport> Client<Rfc5424, T> {
    /// An RFC 5424 client for `transport`, using facility `LOG_LOCAL0`, no APP-NAME & this
    /// host's name.
    pub fn new(transport: T) -> Self {
        Client {
            facility: Facility::LOG_LOCAL0,
            app_name: String::new(),
            host_name: host::local_hostname(),
            formatter: Arc::new(Rfc5424),
            transport: Arc::new(transport),
        }
    }
    pub fn builder(transport: T) -> ClientBuilder<Rfc5424, T> {
        ClientBuilder {
            imp: Client::new(transport),
        }
    }
}

impl<F: SyslogFormatter, T: Transport> Client<F, T> {
    pub fn facility(&self) -> Facility {
        self.facility
    }
    /// Set the facility by code; out-of-range codes fall back to `LOG_LOCAL0`
    pub fn set_facility<C: Into<i32>>(&mut self, facility: C) {
        self.facility = Facility::clamped(facility.into());
    }
    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub fn set_app_name<S: Into<String>>(&mut self, app_name: S) {
        self.app_name = app_name.into();
    }
    pub fn host_name(&self) -> &str {
        &self.host_name
    }
    pub fn set_host_name<S: Into<String>>(&mut self, host_name: S) {
        self.host_name = host_name.into();
    }
    pub fn formatter(&self) -> &F {
        &self.formatter
    }
    pub fn transport(&self) -> &T {
        &self.transport
    }
    /// A new [`Client`] identical to this one but for its transport; `self` is unchanged.
    pub fn with_transport<T2: Transport>(&self, transport: T2) -> Client<F, T2> {
        Client {
            facility: self.facility,
            app_name: self.app_name.clone(),
            host_name: self.host_name.clone(),
            formatter: self.formatter.clone(),
            transport: Arc::new(transport),
        }
    }
    /// A new [`Client`] identical to this one but for its formatter; `self` is unchanged.
    pub fn with_formatter<F2: SyslogFormatter>(&self, formatter: F2) -> Client<F2, T> {
        Client {
            facility: self.facility,
            app_name: self.app_name.clone(),
            host_name: self.host_name.clone(),
            formatter: Arc::new(formatter),
            transport: self.transport.clone(),
        }
    }
    /// Build the [`Message`] that [`Client::send`] would send.
    ///
    /// The severity code is clamped to `LOG_EMERG` if out of range, & the PROCID is this
    /// process' ID.
    pub fn create_message<C: Into<i32>, S: Into<String>>(&self, severity: C, text: S) -> Message {
        Message::builder(self.facility, Severity::clamped(severity.into()), text)
            .app_name(self.app_name.as_str())
            .host_name(self.host_name.as_str())
            .proc_id(host::proc_id())
            .build()
    }
    /// Format `message` & hand it to the transport
    pub fn send_message(&self, message: &Message) -> Result<()> {
        self.transport.send(&self.formatter.format(message, None))
    }
    /// Send `text` at `severity`
    pub fn send<C: Into<i32>, S: Into<String>>(&self, severity: C, text: S) -> Result<()> {
        self.send_message(&self.create_message(severity, text))
    }
}

#[cfg(test)]
pub(crate) mod test {

    use super::*;

    use crate::{error::Error, transport::SocketTransport};

    use backtrace::Backtrace;

    use std::{net::UdpSocket, sync::Mutex, time::Duration};

    /// A [`Transport`] that records what it's asked to send, optionally refusing anything larger
    /// than `max`
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) sent: Mutex<Vec<Vec<u8>>>,
        pub(crate) max: Option<usize>,
    }

    impl Recorder {
        pub(crate) fn texts(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|b| String::from_utf8(b.clone()).unwrap())
                .collect()
        }
    }

    impl Transport for Recorder {
        fn send(&self, buf: &[u8]) -> Result<()> {
            if let Some(max) = self.max {
                if buf.len() > max {
                    return Err(Error::SizeExceeded {
                        size: buf.len(),
                        max,
                        back: Backtrace::new(),
                    });
                }
            }
            self.sent.lock().unwrap().push(buf.to_vec());
            Ok(())
        }
    }

    /// Upper-cases the body; stands in for an alternative formatter
    struct Shouty;

    impl SyslogFormatter for Shouty {
        type Output = Vec<u8>;
        fn format(
            &self,
            message: &Message,
            _timestamp: Option<chrono::DateTime<chrono::FixedOffset>>,
        ) -> Vec<u8> {
            message.body().to_uppercase().into_bytes()
        }
    }

    fn fields(text: &str) -> Vec<String> {
        text.splitn(8, ' ').map(String::from).collect()
    }

    #[test]
    fn defaults() {
        let client = Client::new(Recorder::default());
        assert_eq!(client.facility(), Facility::LOG_LOCAL0);
        assert_eq!(client.app_name(), "");
        assert_eq!(client.host_name(), host::local_hostname());
    }

    #[test]
    fn send() {
        let client = Client::builder(Recorder::default())
            .facility(Facility::LOG_LOCAL0)
            .app_name("myapp")
            .host_name("bree.local")
            .build();
        client.send(Severity::LOG_INFO, "Hello, world!").unwrap();
        client.send(3, "oops").unwrap();

        let sent = client.transport().texts();
        assert_eq!(sent.len(), 2);
        let f = fields(&sent[0]);
        assert_eq!(f[0], "<134>1");
        assert_eq!(f[2], "bree.local");
        assert_eq!(f[3], "myapp");
        assert_eq!(f[4], host::proc_id());
        assert_eq!(f[5], "-");
        assert_eq!(f[6], "-");
        assert_eq!(f[7], "Hello, world!");
        assert!(sent[1].starts_with("<131>1 "));
        assert!(sent[1].ends_with(" - - oops"));
    }

    #[test]
    fn out_of_range_severity_escalates_to_emergency() {
        let client = Client::builder(Recorder::default())
            .facility(Facility::LOG_USER)
            .build();
        client.send(8, "too quiet").unwrap();
        client.send(-1, "negative").unwrap();
        let sent = client.transport().texts();
        // LOG_USER|LOG_EMERG
        assert!(sent[0].starts_with("<8>1 "));
        assert!(sent[1].starts_with("<8>1 "));
        assert_eq!(
            client.create_message(99, "x").severity(),
            Severity::LOG_EMERG
        );
    }

    #[test]
    fn out_of_range_facility_falls_back_to_local0() {
        let mut client = Client::builder(Recorder::default()).facility(24).build();
        assert_eq!(client.facility(), Facility::LOG_LOCAL0);
        client.set_facility(-3);
        assert_eq!(client.facility(), Facility::LOG_LOCAL0);
        client.set_facility(9);
        assert_eq!(client.facility(), Facility::LOG_CRON);
        client.set_facility(Facility::LOG_MAIL);
        assert_eq!(client.facility(), Facility::LOG_MAIL);
    }

    #[test]
    fn create_message() {
        let client = Client::builder(Recorder::default())
            .app_name("myapp")
            .host_name("bree.local")
            .build();
        let msg = client.create_message(Severity::LOG_NOTICE, "text");
        assert_eq!(msg.facility(), Facility::LOG_LOCAL0);
        assert_eq!(msg.severity(), Severity::LOG_NOTICE);
        assert_eq!(msg.app_name(), "myapp");
        assert_eq!(msg.host_name(), "bree.local");
        assert_eq!(msg.proc_id(), host::proc_id());
        assert_eq!(msg.msg_id(), "");
        assert_eq!(msg.body(), "text");
    }

    #[test]
    fn size_exceeded_propagates() {
        let client = Client::builder(Recorder {
            max: Some(64),
            ..Default::default()
        })
        .host_name("h")
        .build();
        let err = client.send(Severity::LOG_INFO, "x".repeat(100)).unwrap_err();
        assert!(matches!(err, Error::SizeExceeded { max: 64, .. }));
        assert!(client.transport().texts().is_empty());
    }

    #[test]
    fn copy_with_override() {
        let original = Client::builder(Recorder::default())
            .app_name("myapp")
            .host_name("h")
            .build();
        let shouty = original.with_formatter(Shouty);
        shouty.send(Severity::LOG_INFO, "quiet").unwrap();
        original.send(Severity::LOG_INFO, "quiet").unwrap();

        // Both share the original transport...
        let sent = original.transport().texts();
        assert_eq!(sent[0], "QUIET");
        assert!(sent[1].ends_with(" - - quiet"));

        // while a new transport leaves the original's alone.
        let other = original.with_transport(Recorder::default());
        other.send(Severity::LOG_INFO, "elsewhere").unwrap();
        assert_eq!(other.transport().texts().len(), 1);
        assert_eq!(original.transport().texts().len(), 2);
        assert_eq!(other.app_name(), "myapp");
    }

    #[test]
    fn over_udp() {
        let rx = UdpSocket::bind("127.0.0.1:0").unwrap();
        rx.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let port = rx.local_addr().unwrap().port();

        let client = Client::builder(SocketTransport::udp("127.0.0.1", port).unwrap())
            .facility(Facility::LOG_LOCAL0)
            .app_name("udp-test")
            .host_name("bree.local")
            .build();
        client.send(Severity::LOG_INFO, "Hello, 世界!").unwrap();

        let mut buf = [0u8; 1024];
        let n = rx.recv(&mut buf).unwrap();
        let got = &buf[..n];
        assert!(got.starts_with(b"<134>1 "));
        let body = "Hello, 世界!".as_bytes();
        assert!(got.ends_with(body));
        assert_eq!(
            &got[n - body.len() - 3..n - body.len()],
            &[0xef_u8, 0xbb_u8, 0xbf_u8]
        );

        // Too big for a default UDP transport
        assert!(matches!(
            client.send(Severity::LOG_INFO, "x".repeat(480)),
            Err(Error::SizeExceeded { max: 480, .. })
        ));
    }
}

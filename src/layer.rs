// Copyright (C) 2022-2025 Michael Herstine <sp1ff@pobox.com>
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

//! A [`tracing-subscriber`] [`Layer`] that forwards [`tracing`] [`Event`]s through a [`Client`].
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/latest/tracing/struct.Event.html
//!
//! ```no_run
//! use tracing::info;
//! use syslog_sender::layer::Layer;
//! use tracing_subscriber::registry::Registry;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//!
//! // RFC 5424 via UDP to port 514 on localhost
//! let subscriber = Registry::default().with(Layer::try_default().unwrap());
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! info!("Hello, world!");
//! ```
//!
//! Events emitted by this crate itself are never forwarded, so the transport's own diagnostics
//! can't feed back into it.
//!
//! [`on_event`] has no way to return an error, so failures to send are handed to an error
//! handler instead (by default, one that prints them on stderr); see [`Layer::with_error_handler`].
//!
//! [`on_event`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html#method.on_event

use crate::{
    client::Client,
    error::{Error, Result},
    facility::Severity,
    formatter::SyslogFormatter,
    rfc5424::Rfc5424,
    structured_data::StructuredDataElement,
    transport::{SocketTransport, Transport},
};

use tracing::Event;
use tracing_subscriber::layer::Context;

// When the tracing-log feature is enabled, use NormalizeEvent to extract file/line metadata
// from events that originated from the `log` crate. This follows the same pattern used by
// tracing-subscriber's fmt layer.
// See: https://github.com/tokio-rs/tracing/blob/master/tracing-subscriber/src/fmt/fmt_layer.rs
#[cfg(feature = "tracing-log")]
use tracing_log::NormalizeEvent;

use std::sync::Mutex;

/// SD-ID under which event metadata is attached
pub const TRACING_SD_ID: &str = "tracing@32473";

const OWN_TARGET: &str = "syslog_sender";

fn default_level_mapping(level: &tracing::Level) -> Severity {
    match *level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Severity::LOG_DEBUG,
        tracing::Level::INFO => Severity::LOG_INFO,
        tracing::Level::WARN => Severity::LOG_WARNING,
        tracing::Level::ERROR => Severity::LOG_ERR,
    }
}

fn default_error_handler(err: &Error) {
    eprintln!("syslog-sender: failed to forward an event to syslog: {}", err);
}

struct MessageEventVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageEventVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            // We have only a `Debug` implementation available to us; but the tracing macros
            // `info!()`, `event!()` & the like all "pre-format" the `message` field so that
            // `value` refers to a `std::fmt::Arguments` instance, which will print to a debug
            // format without enclosing double-quotes.
            self.message = Some(format!("{:?}", value));
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// A [`tracing-subscriber`]-compliant [`Layer`] implementation that will send [`Event`]s to a
/// syslog daemon.
///
/// [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
/// [`Event`]: https://docs.rs/tracing/latest/tracing/struct.Event.html
pub struct Layer<F: SyslogFormatter, T: Transport> {
    client: Client<F, T>,
    map_level: Box<dyn Fn(&tracing::Level) -> Severity + Send + Sync>,
    on_error: Box<dyn Fn(&Error) + Send + Sync>,
    include_target: bool,
    include_module: bool,
    include_source_location: bool,
    // Transports may not be used concurrently
    lock: Mutex<()>,
}

impl Layer<Rfc5424, SocketTransport> {
    /// Attempt to construct a [`Layer`] that will send RFC5424-compliant syslog messages via UDP to
    /// port 514 on localhost
    pub fn try_default() -> Result<Self> {
        Ok(Layer::new(
            Client::builder(SocketTransport::udp("localhost", 514)?)
                .discover_app_name()
                .build(),
        ))
    }
}

impl<F: SyslogFormatter, T: Transport> Layer<F, T> {
    /// Construct a [`Layer`] sending through `client`
    pub fn new(client: Client<F, T>) -> Self {
        Layer {
            client,
            map_level: Box::new(default_level_mapping),
            on_error: Box::new(default_error_handler),
            include_target: false,
            include_module: false,
            include_source_location: false,
            lock: Mutex::new(()),
        }
    }
    /// Replace the default mapping from [`tracing::Level`] to [`Severity`]
    pub fn with_level_mapping<M>(mut self, map_level: M) -> Self
    where
        M: Fn(&tracing::Level) -> Severity + Send + Sync + 'static,
    {
        self.map_level = Box::new(map_level);
        self
    }
    /// Replace the default error handler, which writes to stderr.
    ///
    /// The handler is invoked from within [`on_event`], while the current dispatcher is busy, so
    /// any events it emits through a scoped subscriber will be dropped.
    ///
    /// [`on_event`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html#method.on_event
    pub fn with_error_handler<H>(mut self, on_error: H) -> Self
    where
        H: Fn(&Error) + Send + Sync + 'static,
    {
        self.on_error = Box::new(on_error);
        self
    }
    /// Attach the event's target as structured data
    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }
    /// Attach the event's module path as structured data
    pub fn with_module(mut self, include: bool) -> Self {
        self.include_module = include;
        self
    }
    /// Attach the event's file & line as structured data
    pub fn with_source_location(mut self, include: bool) -> Self {
        self.include_source_location = include;
        self
    }

    fn metadata_element(&self, meta: &tracing::Metadata<'_>) -> Option<StructuredDataElement> {
        let mut elem = StructuredDataElement::new(TRACING_SD_ID);
        if self.include_target {
            elem.insert("target", meta.target());
        }
        if self.include_module {
            if let Some(module) = meta.module_path() {
                elem.insert("module", module);
            }
        }
        if self.include_source_location {
            if let Some(file) = meta.file() {
                elem.insert("file", file);
            }
            if let Some(line) = meta.line() {
                elem.insert("line", line.to_string());
            }
        }
        if elem.params().is_empty() {
            None
        } else {
            Some(elem)
        }
    }
}

impl<S, F, T> tracing_subscriber::layer::Layer<S> for Layer<F, T>
where
    S: tracing::Subscriber,
    F: SyslogFormatter + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // When the tracing-log feature is enabled, use normalized_metadata() to get
        // file/line info for events that originated from the `log` crate.
        #[cfg(feature = "tracing-log")]
        let normalized_meta = event.normalized_metadata();
        #[cfg(feature = "tracing-log")]
        let meta = normalized_meta.as_ref().unwrap_or_else(|| event.metadata());
        #[cfg(not(feature = "tracing-log"))]
        let meta = event.metadata();

        if meta.target().split("::").next() == Some(OWN_TARGET) {
            return;
        }

        let mut visitor = MessageEventVisitor { message: None };
        event.record(&mut visitor);
        let text = match visitor.message {
            Some(text) => text,
            None => return,
        };

        let mut msg = self.client.create_message((self.map_level)(meta.level()), text);
        let res = match self.metadata_element(meta) {
            Some(elem) => msg.add_sd_element(elem),
            None => Ok(()),
        }
        .and_then(|_| {
            let _guard = self
                .lock
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            self.client.send_message(&msg)
        });
        if let Err(err) = res {
            (self.on_error)(&err);
        }
    }
}

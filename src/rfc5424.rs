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

//! RFC [5424]-compliant syslog message formatting
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//!
//! [`Rfc5424`] is a [`SyslogFormatter`] that produces syslog messages according to RFC 5424:
//!
//! ```text
//! <PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID MSGID STRUCTURED-DATA MSG
//! ```
//!
//! The caller's [`Message`] may contain anything at all; this module is responsible for coercing
//! it into something compliant:
//!
//! - header fields are truncated to their maximum lengths & any octet outside of `PRINTUSASCII`
//!   (%d33-126) is replaced with `?`
//! - SD-IDs & SD-PARAM names lose any `=`, `]` or `"`, are filtered the same way, and are cut to
//!   thirty-two octets
//! - SD-PARAM values have `"`, `\` & `]` escaped
//! - a MSG that is not pure ASCII is prefixed with the UTF-8 BOM
//!
//! None of this touches the [`Message`] itself.

use crate::{facility::priority, formatter::SyslogFormatter, message::Message};

use bytes::buf::BufMut;
use chrono::prelude::*;

/// Maximum length of the HOSTNAME field, in octets
pub const HOSTNAME_MAX_LEN: usize = 255;
/// Maximum length of the APP-NAME field, in octets
pub const APP_NAME_MAX_LEN: usize = 48;
/// Maximum length of the PROCID field, in octets
pub const PROC_ID_MAX_LEN: usize = 128;
/// Maximum length of the MSGID field, in octets
pub const MSG_ID_MAX_LEN: usize = 32;
/// Maximum length of an SD-ID or SD-PARAM name, in octets
pub const SD_NAME_MAX_LEN: usize = 32;

const VERSION: u8 = b'1';
const SP: u8 = b' ';
const NILVALUE: &[u8] = b"-";
const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// RFC 5424 TIMESTAMP, at whole-second precision
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

fn printusascii(b: u8) -> u8 {
    if (33..=126).contains(&b) {
        b
    } else {
        b'?'
    }
}

/// Render a header field (HOSTNAME, APP-NAME, PROCID or MSGID).
///
/// The empty string becomes the NILVALUE. Otherwise the field is cut to `max_len` octets _first_,
/// then filtered, so a multi-byte character straddling the limit leaves a trailing `?`.
pub fn header_field(field: &str, max_len: usize) -> Vec<u8> {
    if field.is_empty() {
        return NILVALUE.to_vec();
    }
    field.bytes().take(max_len).map(printusascii).collect()
}

/// Render an SD-ID or SD-PARAM name.
pub fn sd_name(name: &str) -> Vec<u8> {
    name.bytes()
        .filter(|b| !matches!(b, b'=' | b']' | b'"'))
        .map(printusascii)
        .take(SD_NAME_MAX_LEN)
        .collect()
}

/// Render an SD-PARAM value, escaping `"`, `\` & `]`.
///
/// This is a single pass over the input; the backslashes it introduces are never themselves
/// escaped.
pub fn sd_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A formatter that produces RFC [5424]-conformant syslog messages.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rfc5424;

impl Rfc5424 {
    /// Format `message` with the given `timestamp`
    pub fn format_at(&self, message: &Message, timestamp: DateTime<FixedOffset>) -> Vec<u8> {
        let mut buf = format!(
            "<{}>",
            priority(message.facility(), message.severity())
        )
        .into_bytes();
        buf.put_u8(VERSION);
        buf.put_u8(SP);
        buf.put_slice(timestamp.format(TIMESTAMP_FORMAT).to_string().as_bytes());
        buf.put_u8(SP);
        buf.put_slice(&header_field(message.host_name(), HOSTNAME_MAX_LEN));
        buf.put_u8(SP);
        buf.put_slice(&header_field(message.app_name(), APP_NAME_MAX_LEN));
        buf.put_u8(SP);
        buf.put_slice(&header_field(message.proc_id(), PROC_ID_MAX_LEN));
        buf.put_u8(SP);
        buf.put_slice(&header_field(message.msg_id(), MSG_ID_MAX_LEN));
        buf.put_u8(SP);
        self.put_structured_data(message, &mut buf);
        buf.put_u8(SP);

        // From the RFC

        // "If a syslog application encodes MSG in UTF-8, the string MUST start with the Unicode
        // byte order mask (BOM), which for UTF-8 is ABNF %xEF.BB.BF."
        let body = message.body();
        if !body.is_ascii() {
            buf.put_slice(&UTF8_BOM);
        }
        buf.put_slice(body.as_bytes());
        buf
    }

    fn put_structured_data(&self, message: &Message, buf: &mut Vec<u8>) {
        let elems = message.sd_elements();
        if elems.is_empty() {
            buf.put_slice(NILVALUE);
            return;
        }
        for elem in elems {
            buf.put_u8(b'[');
            buf.put_slice(&sd_name(elem.id()));
            for (name, value) in elem.iter() {
                buf.put_u8(SP);
                buf.put_slice(&sd_name(name));
                buf.put_slice(b"=\"");
                buf.put_slice(sd_value(value).as_bytes());
                buf.put_u8(b'"');
            }
            buf.put_u8(b']');
        }
    }
}

impl SyslogFormatter for Rfc5424 {
    type Output = Vec<u8>;
    fn format(&self, message: &Message, timestamp: Option<DateTime<FixedOffset>>) -> Vec<u8> {
        self.format_at(
            message,
            timestamp.unwrap_or_else(|| DateTime::<FixedOffset>::from(Local::now())),
        )
    }
}

#[cfg(test)]
mod test {

    use super::*;

    use crate::{
        facility::{Facility, Severity},
        structured_data::StructuredDataElement,
    };

    fn epoch() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2003, 10, 11, 22, 14, 15)
            .unwrap()
    }

    fn format(msg: &Message) -> String {
        String::from_utf8(Rfc5424.format_at(msg, epoch())).unwrap()
    }

    #[test]
    fn rfc_example_1() {
        let msg = Message::builder(
            Facility::LOG_AUTH,
            Severity::LOG_CRIT,
            "'su root' failed for lonvick on /dev/pts/8",
        )
        .host_name("mymachine.example.com")
        .app_name("su")
        .msg_id("ID47")
        .build();
        assert_eq!(
            format(&msg),
            "<34>1 2003-10-11T22:14:15+00:00 mymachine.example.com su - ID47 - 'su root' failed for lonvick on /dev/pts/8"
        );
    }

    #[test]
    fn all_nil() {
        let msg = Message::builder(Facility::LOG_LOCAL0, Severity::LOG_INFO, "").build();
        assert_eq!(format(&msg), "<134>1 2003-10-11T22:14:15+00:00 - - - - - ");
    }

    #[test]
    fn timestamp_offsets() {
        let msg = Message::builder(Facility::LOG_USER, Severity::LOG_INFO, "x").build();
        let ts = FixedOffset::west_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2003, 8, 24, 5, 14, 15)
            .unwrap();
        assert_eq!(
            String::from_utf8(Rfc5424.format_at(&msg, ts)).unwrap(),
            "<14>1 2003-08-24T05:14:15-07:00 - - - - - x"
        );
        let ts = FixedOffset::east_opt(5 * 3600 + 30 * 60)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap();
        assert_eq!(
            String::from_utf8(Rfc5424.format_at(&msg, ts)).unwrap(),
            "<14>1 2024-01-02T03:04:05+05:30 - - - - - x"
        );
    }

    #[test]
    fn now_has_no_fractional_seconds() {
        let msg = Message::builder(Facility::LOG_USER, Severity::LOG_NOTICE, "x").build();
        let out = String::from_utf8(Rfc5424.format(&msg, None)).unwrap();
        let ts = out.split(' ').nth(1).unwrap();
        // YYYY-MM-DDThh:mm:ss+hh:mm
        assert_eq!(ts.len(), 25, "{}", ts);
        assert!(!ts.contains('.'));
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn header_truncation() {
        let host = "a".repeat(300);
        let app = "b".repeat(60);
        let proc_id = "1".repeat(129);
        let msg_id = "c".repeat(33);
        let msg = Message::builder(Facility::LOG_USER, Severity::LOG_INFO, "x")
            .host_name(host)
            .app_name(app)
            .proc_id(proc_id)
            .msg_id(msg_id)
            .build();
        let out = format(&msg);
        let fields: Vec<&str> = out.split(' ').collect();
        assert_eq!(fields[2], "a".repeat(255));
        assert_eq!(fields[3], "b".repeat(48));
        assert_eq!(fields[4], "1".repeat(128));
        assert_eq!(fields[5], "c".repeat(32));
    }

    #[test]
    fn header_filtering() {
        assert_eq!(header_field("my host", 255), b"my?host");
        assert_eq!(header_field("tab\there", 255), b"tab?here");
        assert_eq!(header_field("del\x7f", 255), b"del?");
        assert_eq!(header_field("", 48), b"-");
        // Each octet of a multi-byte character is replaced
        assert_eq!(header_field("caf\u{e9}", 255), b"caf??");
        // Truncation precedes filtering, so a split character leaves one `?`
        let app = format!("{}\u{e9}zzz", "a".repeat(47));
        let rendered = header_field(&app, APP_NAME_MAX_LEN);
        assert_eq!(rendered.len(), 48);
        assert_eq!(rendered, format!("{}?", "a".repeat(47)).into_bytes());
        // Visible ASCII passes through untouched
        assert_eq!(header_field("!~az09[]\"=", 255), b"!~az09[]\"=");
    }

    #[test]
    fn structured_data() {
        let mut msg = Message::builder(Facility::LOG_LOCAL4, Severity::LOG_NOTICE, "An application event log entry...")
            .host_name("mymachine.example.com")
            .app_name("evntslog")
            .msg_id("ID47")
            .build();
        msg.add_sd_element(StructuredDataElement::from_params(
            "exampleSDID@32473",
            [("iut", "3"), ("eventSource", "Application"), ("eventID", "1011")],
        ))
        .unwrap();
        assert_eq!(
            format(&msg),
            "<165>1 2003-10-11T22:14:15+00:00 mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut=\"3\" eventSource=\"Application\" eventID=\"1011\"] An application event log entry..."
        );

        let mut msg = Message::builder(Facility::LOG_LOCAL0, Severity::LOG_INFO, "x").build();
        msg.add_sd_element(StructuredDataElement::from_params(
            "exampleSDID@0",
            [("iut", "3")],
        ))
        .unwrap();
        assert_eq!(
            format(&msg),
            "<134>1 2003-10-11T22:14:15+00:00 - - - - [exampleSDID@0 iut=\"3\"] x"
        );
    }

    #[test]
    fn multiple_and_empty_elements() {
        let mut msg = Message::builder(Facility::LOG_LOCAL0, Severity::LOG_INFO, "x").build();
        msg.add_sd_element(StructuredDataElement::from_params(
            "exampleSDID@32473",
            [("iut", "3")],
        ))
        .unwrap();
        msg.add_sd_element(StructuredDataElement::new("origin")).unwrap();
        msg.add_sd_element(StructuredDataElement::from_params(
            "examplePriority@32473",
            [("class", "high")],
        ))
        .unwrap();
        assert_eq!(
            format(&msg),
            "<134>1 2003-10-11T22:14:15+00:00 - - - - [exampleSDID@32473 iut=\"3\"][origin][examplePriority@32473 class=\"high\"] x"
        );
    }

    #[test]
    fn sd_name_sanitization() {
        assert_eq!(sd_name("ex\"am]ple=ID"), b"exampleID");
        assert_eq!(sd_name("a b"), b"a?b");
        assert_eq!(sd_name("na\u{ef}ve"), b"na??ve");
        assert_eq!(sd_name(&"x".repeat(40)), "x".repeat(32).into_bytes());
        // Stripping happens before the length cut
        let name = format!("{}{}", "=".repeat(10), "y".repeat(32));
        assert_eq!(sd_name(&name), "y".repeat(32).into_bytes());
    }

    #[test]
    fn sd_value_escaping() {
        assert_eq!(sd_value("plain"), "plain");
        assert_eq!(sd_value("a\"b"), "a\\\"b");
        assert_eq!(sd_value("a\\b"), "a\\\\b");
        assert_eq!(sd_value("a]b"), "a\\]b");
        // An escaped quote on input is escaped exactly once: `\"` => `\\\"`
        assert_eq!(sd_value("\\\""), "\\\\\\\"");
        assert_eq!(sd_value("\\]"), "\\\\\\]");
        // Non-ASCII passes through as UTF-8
        assert_eq!(sd_value("世界"), "世界");
    }

    #[test]
    fn sanitization_leaves_message_untouched() {
        let mut msg = Message::builder(Facility::LOG_LOCAL0, Severity::LOG_INFO, "x").build();
        msg.add_sd_element(StructuredDataElement::from_params(
            "id=\"1\"",
            [("k]", "v\"]")],
        ))
        .unwrap();
        let before = msg.clone();
        assert_eq!(
            format(&msg),
            "<134>1 2003-10-11T22:14:15+00:00 - - - - [id1 k=\"v\\\"\\]\"] x"
        );
        assert_eq!(msg, before);
        assert_eq!(msg.sd_elements()[0].get("k]"), Some("v\"]"));
    }

    #[test]
    fn bom() {
        let msg = Message::builder(Facility::LOG_USER, Severity::LOG_INFO, "Hello, 世界!")
            .host_name("bree.local")
            .app_name("prototyping")
            .proc_id("123")
            .build();
        let mut golden = Vec::from("<14>1 2003-10-11T22:14:15+00:00 bree.local prototyping 123 - - ");
        golden.extend_from_slice(&[0xef_u8, 0xbb_u8, 0xbf_u8]);
        golden.extend_from_slice("Hello, 世界!".as_bytes());
        assert_eq!(Rfc5424.format_at(&msg, epoch()), golden);

        let msg = Message::builder(Facility::LOG_USER, Severity::LOG_INFO, "Hello, world!")
            .host_name("bree.local")
            .app_name("prototyping")
            .proc_id("123")
            .build();
        assert_eq!(
            Rfc5424.format_at(&msg, epoch()),
            b"<14>1 2003-10-11T22:14:15+00:00 bree.local prototyping 123 - - Hello, world!".to_vec()
        );
    }

    #[test]
    fn parses_as_rfc5424() {
        let mut msg = Message::builder(Facility::LOG_LOCAL4, Severity::LOG_NOTICE, "An event")
            .host_name("mymachine.example.com")
            .app_name("evntslog")
            .proc_id("4242")
            .msg_id("ID47")
            .build();
        msg.add_sd_element(StructuredDataElement::from_params(
            "exampleSDID@32473",
            [("iut", "3"), ("path", "C:\\temp]")],
        ))
        .unwrap();
        let text = String::from_utf8(Rfc5424.format(&msg, None)).unwrap();
        let parsed = syslog_rfc5424::parse_message(&text).unwrap();
        assert_eq!(parsed.hostname.as_deref(), Some("mymachine.example.com"));
        assert_eq!(parsed.appname.as_deref(), Some("evntslog"));
        assert_eq!(parsed.msgid.as_deref(), Some("ID47"));
        assert_eq!(parsed.msg, "An event");
        assert_eq!(
            parsed
                .sd
                .find_tuple("exampleSDID@32473", "iut")
                .map(|s| s.as_str()),
            Some("3")
        );
        assert_eq!(
            parsed
                .sd
                .find_tuple("exampleSDID@32473", "path")
                .map(|s| s.as_str()),
            Some("C:\\temp]")
        );
    }
}

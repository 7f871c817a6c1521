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

//! Test writing to port 514 on the local host over TCP.

use syslog_sender::{
    client::Client,
    facility::{Facility, Severity},
    structured_data::StructuredDataElement,
    transport::{Framing, SocketTransport},
};

pub fn main() {
    // rsyslogd & syslog-ng both expect one message per line on TCP
    let transport = SocketTransport::tcp("localhost", 514)
        .unwrap()
        .with_framing(Framing::NonTransparent);
    let client = Client::builder(transport)
        .facility(Facility::LOG_LOCAL0)
        .app_name("tcp-test")
        .build();

    for severity in [
        Severity::LOG_DEBUG,
        Severity::LOG_INFO,
        Severity::LOG_NOTICE,
        Severity::LOG_WARNING,
        Severity::LOG_ERR,
    ] {
        client.send(severity, "你好, TCP socket.").unwrap();
    }

    let mut msg = client.create_message(Severity::LOG_INFO, "Structured data over TCP.");
    msg.add_sd_element(StructuredDataElement::from_params(
        "exampleSDID@32473",
        [("iut", "3"), ("quoted", "say \"hi\" [ok]")],
    ))
    .unwrap();
    client.send_message(&msg).unwrap();
}

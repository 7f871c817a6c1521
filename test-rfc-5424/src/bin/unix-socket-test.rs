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

//! Test writing to `/dev/log` over a Unix datagram socket.

use syslog_sender::{
    client::Client,
    error::Error,
    facility::{Facility, Severity},
    transport::SocketTransport,
};

pub fn main() {
    let client = Client::builder(SocketTransport::unix_datagram("/dev/log").unwrap())
        .facility(Facility::LOG_USER)
        .discover_app_name()
        .build();

    client.send(Severity::LOG_INFO, "Hello, Unix socket.").unwrap();
    client.send(Severity::LOG_WARNING, "你好, Unix socket.").unwrap();

    // Anything over 2048 octets is refused rather than truncated
    match client.send(Severity::LOG_INFO, "x".repeat(4096)) {
        Err(Error::SizeExceeded { size, max, .. }) => {
            println!("refused a {}-octet message (limit {})", size, max)
        }
        other => panic!("expected SizeExceeded, got {:?}", other),
    }
}

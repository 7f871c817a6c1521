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

//! Discovering HOSTNAME, APP-NAME & PROCID values for this process.
//!
//! None of these functions fail; when a value can't be determined they return the empty string,
//! which the formatter renders as the NILVALUE.

use tracing::debug;

/// Attempt to figure-out a hostname.
///
/// RFC [5424] prefers, in order: FQDN, static IP address, hostname, dynamic IP address, NILVALUE.
/// This implementation doesn't quite do that; it will first simply try [gethostname()], then ask
/// for the local IP address.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424#section-6.2.4
/// [gethostname()]: https://man7.org/linux/man-pages/man2/gethostname.2.html
pub fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => match name.into_string() {
            Ok(name) if !name.is_empty() && name.is_ascii() => return name,
            Ok(name) => debug!("discarding hostname {:?}", name),
            Err(name) => debug!("discarding non-UTF-8 hostname {:?}", name),
        },
        Err(err) => debug!("gethostname failed: {}", err),
    }
    local_ip_address::local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|err| {
            debug!("no local IP address either: {}", err);
            String::new()
        })
}

/// Attempt to figure-out an application name.
///
/// "The APP-NAME field SHOULD identify the device or application that originated the message."
/// This implementation relies on [`std::env::current_exe`].
pub fn app_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|pbuf| {
            pbuf.file_name()
                .map(|os_str| os_str.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

/// This process' ID, in decimal.
///
/// "PROCID is a value that is included in the message, having no interoperable meaning, except
/// that a change in the value indicates there has been a discontinuity in syslog reporting."
pub fn proc_id() -> String {
    std::process::id().to_string()
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn discovery() {
        // At least _exercise_ these
        let host = local_hostname();
        assert!(host.is_ascii());
        assert!(!app_name().is_empty());
        assert_eq!(proc_id(), format!("{}", std::process::id()));
        assert!(proc_id().bytes().all(|b| b.is_ascii_digit()));
    }
}

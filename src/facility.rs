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

//! syslog facility & severity defintions.
//!
//! [`Facility`] and [`Severity`] replicate the names used in `<syslog.h>`. Unlike the `<syslog.h>`
//! constants, the discriminants here are the plain RFC [5424] codes (0-23 and 0-7); the PRI
//! value is computed from them in [`priority`].
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424

type StdResult<T, E> = std::result::Result<T, E>;

/// RFC [5424] defines twenty-four "facilities" for messages.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
///
/// The "facility" is designed to indicate the source of the log message, but selects from a
/// pre-defined set of values along with eight "local" values and a "user" value. Callers
/// forwarding application logs to a collector will usually want one of the `LOG_LOCALn` values.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Facility {
    /// kernel messages
    LOG_KERN = 0,
    /// random user-level messages
    LOG_USER = 1,
    /// mail system
    LOG_MAIL = 2,
    /// system daemons
    LOG_DAEMON = 3,
    /// security/authorization messages
    LOG_AUTH = 4,
    /// messages generated internally by syslogd
    LOG_SYSLOG = 5,
    /// line printer subsystem
    LOG_LPR = 6,
    /// network news subsystem
    LOG_NEWS = 7,
    /// UUCP subsystem
    LOG_UUCP = 8,
    /// clock daemon
    LOG_CRON = 9,
    /// security/authorization messages (private)
    LOG_AUTHPRIV = 10,
    /// ftp daemon
    LOG_FTP = 11,
    /// NTP subsystem
    LOG_NTP = 12,
    /// log audit
    LOG_AUDIT = 13,
    /// log alert
    LOG_ALERT = 14,
    /// clock daemon (note 2)
    LOG_CLOCK = 15,
    /// reserved for local use
    LOG_LOCAL0 = 16,
    /// reserved for local use
    LOG_LOCAL1 = 17,
    /// reserved for local use
    LOG_LOCAL2 = 18,
    /// reserved for local use
    LOG_LOCAL3 = 19,
    /// reserved for local use
    LOG_LOCAL4 = 20,
    /// reserved for local use
    LOG_LOCAL5 = 21,
    /// reserved for local use
    LOG_LOCAL6 = 22,
    /// reserved for local use
    LOG_LOCAL7 = 23,
}

const FACILITIES: [Facility; 24] = [
    Facility::LOG_KERN,
    Facility::LOG_USER,
    Facility::LOG_MAIL,
    Facility::LOG_DAEMON,
    Facility::LOG_AUTH,
    Facility::LOG_SYSLOG,
    Facility::LOG_LPR,
    Facility::LOG_NEWS,
    Facility::LOG_UUCP,
    Facility::LOG_CRON,
    Facility::LOG_AUTHPRIV,
    Facility::LOG_FTP,
    Facility::LOG_NTP,
    Facility::LOG_AUDIT,
    Facility::LOG_ALERT,
    Facility::LOG_CLOCK,
    Facility::LOG_LOCAL0,
    Facility::LOG_LOCAL1,
    Facility::LOG_LOCAL2,
    Facility::LOG_LOCAL3,
    Facility::LOG_LOCAL4,
    Facility::LOG_LOCAL5,
    Facility::LOG_LOCAL6,
    Facility::LOG_LOCAL7,
];

impl Facility {
    /// The numeric facility code, 0-23
    pub const fn code(self) -> u8 {
        self as u8
    }
    /// Look up a facility by its numeric code; `None` if `code` is outside 0-23.
    pub fn from_code(code: i32) -> Option<Facility> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| FACILITIES.get(idx).copied())
    }
    /// Look up a facility by its numeric code, falling back to `LOG_LOCAL0` when `code` is out
    /// of range.
    pub fn clamped(code: i32) -> Facility {
        Facility::from_code(code).unwrap_or(Facility::LOG_LOCAL0)
    }
}

impl std::default::Default for Facility {
    /// The default facility is `LOG_LOCAL0`.
    fn default() -> Self {
        Facility::LOG_LOCAL0
    }
}

impl std::convert::From<Facility> for i32 {
    fn from(x: Facility) -> Self {
        x.code() as i32
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Facility::LOG_KERN => "LOG_KERN",
                Facility::LOG_USER => "LOG_USER",
                Facility::LOG_MAIL => "LOG_MAIL",
                Facility::LOG_DAEMON => "LOG_DAEMON",
                Facility::LOG_AUTH => "LOG_AUTH",
                Facility::LOG_SYSLOG => "LOG_SYSLOG",
                Facility::LOG_LPR => "LOG_LPR",
                Facility::LOG_NEWS => "LOG_NEWS",
                Facility::LOG_UUCP => "LOG_UUCP",
                Facility::LOG_CRON => "LOG_CRON",
                Facility::LOG_AUTHPRIV => "LOG_AUTHPRIV",
                Facility::LOG_FTP => "LOG_FTP",
                Facility::LOG_NTP => "LOG_NTP",
                Facility::LOG_AUDIT => "LOG_AUDIT",
                Facility::LOG_ALERT => "LOG_ALERT",
                Facility::LOG_CLOCK => "LOG_CLOCK",
                Facility::LOG_LOCAL0 => "LOG_LOCAL0",
                Facility::LOG_LOCAL1 => "LOG_LOCAL1",
                Facility::LOG_LOCAL2 => "LOG_LOCAL2",
                Facility::LOG_LOCAL3 => "LOG_LOCAL3",
                Facility::LOG_LOCAL4 => "LOG_LOCAL4",
                Facility::LOG_LOCAL5 => "LOG_LOCAL5",
                Facility::LOG_LOCAL6 => "LOG_LOCAL6",
                Facility::LOG_LOCAL7 => "LOG_LOCAL7",
            }
        )
    }
}

/// RFC [5424] defines eight severity levels for messages. The enumeration values duplicate the
/// constants documented as per the `syslog()` manual [page] & defined in `<syslog.h>`.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Severity {
    /// system is unusable
    LOG_EMERG = 0,
    /// action must be take immediately
    LOG_ALERT = 1,
    /// critical conditions
    LOG_CRIT = 2,
    /// error conditions
    LOG_ERR = 3,
    /// warning conditions
    LOG_WARNING = 4,
    /// normal, but significant condition
    LOG_NOTICE = 5,
    /// informational message
    LOG_INFO = 6,
    /// debug-level message
    LOG_DEBUG = 7,
}

const SEVERITIES: [Severity; 8] = [
    Severity::LOG_EMERG,
    Severity::LOG_ALERT,
    Severity::LOG_CRIT,
    Severity::LOG_ERR,
    Severity::LOG_WARNING,
    Severity::LOG_NOTICE,
    Severity::LOG_INFO,
    Severity::LOG_DEBUG,
];

impl Severity {
    /// The numeric severity code, 0-7
    pub const fn code(self) -> u8 {
        self as u8
    }
    /// Look up a severity by its numeric code; `None` if `code` is outside 0-7.
    pub fn from_code(code: i32) -> Option<Severity> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| SEVERITIES.get(idx).copied())
    }
    /// Look up a severity by its numeric code, escalating to `LOG_EMERG` when `code` is out of
    /// range. An unintelligible severity is treated as the most severe rather than quietly
    /// downgraded.
    pub fn clamped(code: i32) -> Severity {
        Severity::from_code(code).unwrap_or(Severity::LOG_EMERG)
    }
}

impl std::convert::From<Severity> for i32 {
    fn from(x: Severity) -> Self {
        x.code() as i32
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Severity::LOG_EMERG => "LOG_EMERG",
                Severity::LOG_ALERT => "LOG_ALERT",
                Severity::LOG_CRIT => "LOG_CRIT",
                Severity::LOG_ERR => "LOG_ERR",
                Severity::LOG_WARNING => "LOG_WARNING",
                Severity::LOG_NOTICE => "LOG_NOTICE",
                Severity::LOG_INFO => "LOG_INFO",
                Severity::LOG_DEBUG => "LOG_DEBUG",
            }
        )
    }
}

/// Compute the PRI value: `facility * 8 + severity`
pub const fn priority(facility: Facility, severity: Severity) -> u8 {
    (facility.code() << 3) | severity.code()
}

#[cfg(test)]
mod facility_severity_tests {
    use super::*;
    /// Test basic PRI formatting
    #[test]
    fn test_pri() {
        assert_eq!(14, priority(Facility::LOG_USER, Severity::LOG_INFO));
        assert_eq!(134, priority(Facility::LOG_LOCAL0, Severity::LOG_INFO));
        assert_eq!(0, priority(Facility::LOG_KERN, Severity::LOG_EMERG));
        assert_eq!(191, priority(Facility::LOG_LOCAL7, Severity::LOG_DEBUG));
        assert_eq!(format!("{}", Facility::LOG_FTP), "LOG_FTP".to_string());
        assert_eq!(format!("{:?}", Facility::LOG_FTP), "LOG_FTP".to_string());
    }

    #[test]
    fn test_pri_all_pairs() {
        for f in 0..24 {
            for s in 0..8 {
                let pri = priority(
                    Facility::from_code(f).unwrap(),
                    Severity::from_code(s).unwrap(),
                );
                assert_eq!(pri as i32, f * 8 + s);
            }
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(Facility::from_code(16), Some(Facility::LOG_LOCAL0));
        assert_eq!(Facility::from_code(24), None);
        assert_eq!(Facility::from_code(-1), None);
        assert_eq!(Severity::from_code(7), Some(Severity::LOG_DEBUG));
        assert_eq!(Severity::from_code(8), None);
        assert_eq!(i32::from(Facility::LOG_MAIL), 2);
        assert_eq!(i32::from(Severity::LOG_NOTICE), 5);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Facility::clamped(3), Facility::LOG_DAEMON);
        assert_eq!(Facility::clamped(24), Facility::LOG_LOCAL0);
        assert_eq!(Facility::clamped(-7), Facility::LOG_LOCAL0);
        assert_eq!(Severity::clamped(6), Severity::LOG_INFO);
        // Out-of-range severities escalate to the most severe level
        assert_eq!(Severity::clamped(8), Severity::LOG_EMERG);
        assert_eq!(Severity::clamped(-1), Severity::LOG_EMERG);
        assert_eq!(Severity::clamped(i32::MAX), Severity::LOG_EMERG);
    }
}

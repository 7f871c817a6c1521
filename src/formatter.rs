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

//! syslog formatting primitives.
//!
//! This module defines the [`SyslogFormatter`] trait.

use crate::message::Message;

use chrono::prelude::*;

use std::ops::Deref;

/// Operations all formatters must support
/// ======================================
///
/// Sending a syslog message occurs in two parts:
///
/// 1. serializing a [`Message`] into a packet compliant with your daemon's implementation
///
/// 2. transporting that packet to your daemon
///
/// [`SyslogFormatter`] implements step 1: given a [`Message`] and an optional timestamp, produce
/// a compliant syslog packet. When `timestamp` is `None` the implementation shall use the current
/// local time.
///
/// The associated type `Output` need only dereference to a slice of `u8`, which is all the
/// [`Transport`] trait needs to send it.
///
/// [`Transport`]: crate::transport::Transport
pub trait SyslogFormatter {
    type Output: Deref<Target = [u8]>;
    fn format(&self, message: &Message, timestamp: Option<DateTime<FixedOffset>>) -> Self::Output;
}

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

//! The syslog message model.
//!
//! A [`Message`] carries everything but the timestamp: that is taken when the message is
//! formatted. Once built, the only mutation permitted is appending structured-data elements.
//!
//! ```rust
//! use syslog_sender::{
//!     facility::{Facility, Severity},
//!     message::Message,
//!     structured_data::StructuredDataElement,
//! };
//! let mut msg = Message::builder(Facility::LOG_LOCAL0, Severity::LOG_INFO, "Hello, world!")
//!     .app_name("myapp")
//!     .msg_id("ID47")
//!     .build();
//! msg.add_sd_element(StructuredDataElement::from_params("exampleSDID@32473", [("iut", "3")]))
//!     .unwrap();
//! assert!(msg
//!     .add_sd_element(StructuredDataElement::new("exampleSDID@32473"))
//!     .is_err());
//! assert_eq!(msg.sd_elements().len(), 1);
//! ```

use crate::{
    error::{Error, Result},
    facility::{Facility, Severity},
    rfc5424::sd_name,
    structured_data::StructuredDataElement,
};

use backtrace::Backtrace;

/// Two SD-IDs collide if they render identically
fn same_sd_id(lhs: &str, rhs: &str) -> bool {
    lhs == rhs || sd_name(lhs) == sd_name(rhs)
}

/// A single syslog message, awaiting formatting
///
/// The string-valued header fields use the empty string to mean "absent"; they will be rendered
/// as the RFC 5424 NILVALUE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    facility: Facility,
    severity: Severity,
    app_name: String,
    host_name: String,
    proc_id: String,
    msg_id: String,
    body: String,
    sd_elements: Vec<StructuredDataElement>,
}

pub struct MessageBuilder {
    imp: Message,
}

impl MessageBuilder {
    pub fn app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.imp.app_name = app_name.into();
        self
    }
    pub fn host_name<S: Into<String>>(mut self, host_name: S) -> Self {
        self.imp.host_name = host_name.into();
        self
    }
    pub fn proc_id<S: Into<String>>(mut self, proc_id: S) -> Self {
        self.imp.proc_id = proc_id.into();
        self
    }
    pub fn msg_id<S: Into<String>>(mut self, msg_id: S) -> Self {
        self.imp.msg_id = msg_id.into();
        self
    }
    /// Attach a structured-data element; fails if one with the same SD-ID is already present
    pub fn sd_element(mut self, elem: StructuredDataElement) -> Result<Self> {
        self.imp.add_sd_element(elem)?;
        Ok(self)
    }
    pub fn build(self) -> Message {
        self.imp
    }
}

impl Message {
    /// Begin building a [`Message`]; all string-valued header fields start out absent.
    pub fn builder<S: Into<String>>(
        facility: Facility,
        severity: Severity,
        body: S,
    ) -> MessageBuilder {
        MessageBuilder {
            imp: Message {
                facility,
                severity,
                app_name: String::new(),
                host_name: String::new(),
                proc_id: String::new(),
                msg_id: String::new(),
                body: body.into(),
                sd_elements: Vec::new(),
            },
        }
    }
    pub fn facility(&self) -> Facility {
        self.facility
    }
    pub fn severity(&self) -> Severity {
        self.severity
    }
    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub fn host_name(&self) -> &str {
        &self.host_name
    }
    pub fn proc_id(&self) -> &str {
        &self.proc_id
    }
    pub fn msg_id(&self) -> &str {
        &self.msg_id
    }
    pub fn body(&self) -> &str {
        &self.body
    }
    pub fn sd_elements(&self) -> &[StructuredDataElement] {
        &self.sd_elements
    }
    /// True if an element whose SD-ID renders the same as `id` has already been added
    pub fn has_sd_id(&self, id: &str) -> bool {
        self.sd_elements.iter().any(|elem| same_sd_id(elem.id(), id))
    }
    /// Append `elem`; an element with the same SD-ID must not already be present.
    ///
    /// SD-IDs are compared as they will appear on the wire, so `"ab"` & `"a\"b"` (both of which
    /// render as `ab`) collide.
    pub fn add_sd_element(&mut self, elem: StructuredDataElement) -> Result<()> {
        if self.has_sd_id(elem.id()) {
            return Err(Error::DuplicateSdId {
                id: elem.id().to_owned(),
                back: Backtrace::new(),
            });
        }
        self.sd_elements.push(elem);
        Ok(())
    }
    /// Append several elements at once.
    ///
    /// Either all of `elems` are appended or, if any SD-ID collides with one already present (or
    /// with another member of `elems`), none are.
    pub fn add_sd_elements<I>(&mut self, elems: I) -> Result<()>
    where
        I: IntoIterator<Item = StructuredDataElement>,
    {
        let elems: Vec<StructuredDataElement> = elems.into_iter().collect();
        for (i, elem) in elems.iter().enumerate() {
            if self.has_sd_id(elem.id()) || elems[..i].iter().any(|e| same_sd_id(e.id(), elem.id())) {
                return Err(Error::DuplicateSdId {
                    id: elem.id().to_owned(),
                    back: Backtrace::new(),
                });
            }
        }
        self.sd_elements.extend(elems);
        Ok(())
    }
}

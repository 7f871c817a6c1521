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

//! RFC [5424] structured data.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424#section-6.3
//!
//! A [`StructuredDataElement`] is an SD-ID together with an ordered collection of SD-PARAMs
//! ([`Params`]). Names & values are stored exactly as given; they are only sanitized when the
//! message is formatted (see [`Rfc5424`](crate::rfc5424::Rfc5424)).
//!
//! ```rust
//! use syslog_sender::structured_data::StructuredDataElement;
//! let mut elem = StructuredDataElement::new("exampleSDID@32473");
//! elem.insert("iut", "3");
//! elem.insert("eventSource", "Application");
//! let names: Vec<&str> = elem.iter().map(|(k, _)| k).collect();
//! assert_eq!(names, vec!["iut", "eventSource"]);
//! ```

use indexmap::IndexMap;

/// An insertion-ordered map of SD-PARAM names to values.
///
/// Re-inserting an existing name replaces its value but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, String>);

impl Params {
    pub fn new() -> Params {
        Params::default()
    }
    /// Insert `value` under `name`, returning the value previously stored there (if any)
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
    /// Remove `name`, preserving the order of the remaining parameters
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> std::iter::FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<String>> std::iter::Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// An SD-ELEMENT: an SD-ID and its parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredDataElement {
    id: String,
    params: Params,
}

impl StructuredDataElement {
    /// An element with no parameters; it will be rendered as `[id]`
    pub fn new<S: Into<String>>(id: S) -> StructuredDataElement {
        StructuredDataElement {
            id: id.into(),
            params: Params::new(),
        }
    }
    /// Build an element from `id` & a sequence of `(name, value)` pairs
    pub fn from_params<S, I, K, V>(id: S, params: I) -> StructuredDataElement
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        StructuredDataElement {
            id: id.into(),
            params: params.into_iter().collect(),
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn params(&self) -> &Params {
        &self.params
    }
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) -> Option<String> {
        self.params.insert(name, value)
    }
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.params.remove(name)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter()
    }
}

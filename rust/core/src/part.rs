// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part type identifiers.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::taxonomy;

/// A semantic part type such as `slide_main`, or the empty "unclassified" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartType(String);

impl PartType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The "no classification" sentinel.
    pub fn unclassified() -> Self {
        Self(String::new())
    }

    /// A part type that may be stored on a tag (see [`taxonomy::is_assignable`]).
    pub fn known(value: &str) -> Result<Self> {
        if taxonomy::is_assignable(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(Error::UnknownPartType(value.to_string()))
        }
    }

    pub fn is_unclassified(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Taxonomy label, or the raw value when the taxonomy has none.
    pub fn label(&self) -> &str {
        taxonomy::label_for(&self.0)
    }
}

impl Borrow<str> for PartType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PartType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PartType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for PartType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PartType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unclassified() {
            f.write_str("<unclassified>")
        } else {
            f.write_str(&self.0)
        }
    }
}

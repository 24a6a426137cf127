//! Crawl target addresses
//!
//! An [`Address`] is an opaque identifier for one crawl target. Discovery
//! workers hand back addresses already normalized to the same
//! protocol/host/port scope, so this type never rewrites what it is given:
//! two addresses are the same target exactly when their strings are equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized crawl target, used verbatim as the lock store key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

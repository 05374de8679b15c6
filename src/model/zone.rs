//! Zone identifiers
//!
//! A zone is a top-level domain suffix tracked by the pricing source, such as
//! `com` or `co.uk`. Zones are normalized once on construction and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced when a zone string cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("Zone is empty")]
    Empty,

    #[error("Zone '{0}' contains an empty label")]
    EmptyLabel(String),

    #[error("Zone '{zone}' contains invalid character '{ch}'")]
    InvalidCharacter { zone: String, ch: char },
}

/// A normalized top-level zone such as `com` or `co.uk`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Zone(String);

impl Zone {
    /// Parses and normalizes a zone string
    ///
    /// Surrounding whitespace and a single leading dot are removed and the result is
    /// lowercased. Each dot-separated label must be non-empty and consist of
    /// alphanumeric characters or hyphens.
    ///
    /// # Examples
    ///
    /// ```
    /// use tld_price_crawler::model::Zone;
    ///
    /// let zone = Zone::parse(" .CO.uk ").unwrap();
    /// assert_eq!(zone.as_str(), "co.uk");
    /// ```
    pub fn parse(input: &str) -> Result<Self, ZoneError> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(ZoneError::Empty);
        }

        let normalized = trimmed.to_lowercase();
        for label in normalized.split('.') {
            if label.is_empty() {
                return Err(ZoneError::EmptyLabel(normalized.clone()));
            }
            if let Some(ch) = label.chars().find(|c| !(c.is_alphanumeric() || *c == '-')) {
                return Err(ZoneError::InvalidCharacter {
                    zone: normalized.clone(),
                    ch,
                });
            }
        }

        Ok(Self(normalized))
    }

    /// Returns the zone as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Zone {
    type Error = ZoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Zone::parse(&value)
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.0
    }
}

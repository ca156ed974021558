//! Canonical timestamp representation.
//!
//! The wire/signing form is a fixed ISO-8601 string with seven fractional
//! digits (`yyyy-MM-ddTHH:mm:ss.fffffffZ`), matching the precision a
//! .NET `DateTime.ToString("o")` would emit on the client side of this
//! network. The string form, not the struct, is what gets fed to the
//! signature function — so `Timestamp` serializes directly to/from it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant carrying its own canonical string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Construct from a `chrono` instant.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// The underlying `chrono` instant.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Render the canonical `yyyy-MM-ddTHH:mm:ss.fffffffZ` string.
    ///
    /// `chrono` only natively supports millis/micros/nanos formats, so we
    /// take the nanosecond form (9 digits) and truncate to 7 to match the
    /// wire format exactly.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        let nanos = self.0.to_rfc3339_opts(SecondsFormat::Nanos, true);
        // nanos looks like "...ss.fffffffffZ" - shave the last two fractional digits.
        let z_pos = nanos.rfind('Z').expect("rfc3339 always ends in Z for UTC");
        let dot_pos = nanos.find('.').expect("Nanos format always includes a fraction");
        let mut truncated = nanos[..dot_pos + 8].to_string();
        truncated.push_str(&nanos[z_pos..]);
        truncated
    }

    /// Parse the canonical string form back into a `Timestamp`.
    pub fn parse_canonical(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_canonical(&s).map_err(serde::de::Error::custom)
    }
}

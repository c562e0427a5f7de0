//! Clock frequencies with unit parsing and display.
//!
//! Topology documents give clock-domain frequencies either as a bare number,
//! which is read as megahertz, or as a string with an explicit unit such as
//! `"2GHz"` or `"800MHz"`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A frequency value stored in Hertz.
///
/// Bare numbers are interpreted as MHz when deserialized or parsed, because
/// that is the unit interconnect clock tables are written in. Serializes back
/// as a bare MHz number.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Creates a new frequency from a value in megahertz.
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the frequency in gigahertz.
    pub fn ghz(&self) -> f64 {
        self.0 / 1_000_000_000.0
    }

    /// Returns `true` if the frequency is a finite, strictly positive value.
    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid frequency: '{}'", self.input)
    }
}

impl std::error::Error for ParseFrequencyError {}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let scaled = [
            ("ghz", 1_000_000_000.0),
            ("mhz", 1_000_000.0),
            ("khz", 1_000.0),
            ("hz", 1.0),
        ];
        for (suffix, scale) in scaled {
            if let Some(num) = lower.strip_suffix(suffix) {
                let val: f64 = num.trim().parse().map_err(|_| err())?;
                return Ok(Frequency(val * scale));
            }
        }

        // Bare number: megahertz
        let val: f64 = s.parse().map_err(|_| err())?;
        Ok(Frequency::from_mhz(val))
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.mhz())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FrequencyVisitor;

        impl Visitor<'_> for FrequencyVisitor {
            type Value = Frequency;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a frequency in MHz or a string such as \"2GHz\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Frequency, E> {
                Ok(Frequency::from_mhz(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Frequency, E> {
                Ok(Frequency::from_mhz(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Frequency, E> {
                Ok(Frequency::from_mhz(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Frequency, E> {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(FrequencyVisitor)
    }
}

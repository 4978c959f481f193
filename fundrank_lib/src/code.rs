//! Six-digit fund codes.
//!
//! Codes are identifiers, not numbers: they are kept as text and left-padded
//! with zeros so that `300`, `300.0` and `"000300"` all name the same fund.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Width every fund code is padded to.
pub const CODE_WIDTH: usize = 6;

/// A fund code normalized to six characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FundCode(String);

impl FundCode {
    /// Normalizes a textual code: trims whitespace and left-pads with zeros.
    /// Codes already at or beyond the width are kept verbatim.
    pub fn from_text(raw: &str) -> Self {
        Self(zero_pad(raw.trim(), CODE_WIDTH))
    }

    /// Normalizes an integer code, e.g. `300` becomes `000300`.
    pub fn from_integer(raw: i64) -> Self {
        Self(format!("{:0width$}", raw, width = CODE_WIDTH))
    }

    /// Normalizes a code that was stored as a float by a spreadsheet.
    /// The fractional part is dropped; non-finite values are rejected.
    pub fn from_float(raw: f64) -> Option<Self> {
        if raw.is_finite() {
            Some(Self::from_integer(raw.trunc() as i64))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FundCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FundCode {
    fn from(raw: &str) -> Self {
        Self::from_text(raw)
    }
}

impl<'de> Deserialize<'de> for FundCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCode {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        match RawCode::deserialize(deserializer)? {
            RawCode::Integer(n) => Ok(Self::from_integer(n)),
            RawCode::Float(f) => Self::from_float(f)
                .ok_or_else(|| serde::de::Error::custom("fund code is not a finite number")),
            RawCode::Text(s) => Ok(Self::from_text(&s)),
        }
    }
}

/// Left-pads with zeros to `width` characters, keeping a leading sign in front.
pub fn zero_pad(raw: &str, width: usize) -> String {
    let len = raw.chars().count();
    if len >= width {
        return raw.to_string();
    }
    let padding = "0".repeat(width - len);
    match raw.chars().next() {
        Some(sign @ ('+' | '-')) => format!("{}{}{}", sign, padding, &raw[1..]),
        _ => format!("{}{}", padding, raw),
    }
}

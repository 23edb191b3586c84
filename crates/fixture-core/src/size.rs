//! Byte-size literals such as `"4M"`, `"1GiB"` or `"1048576"`.
//!
//! Units are binary: `K`, `KB` and `KiB` all mean 1024 bytes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;
const TIB: u64 = 1024 * GIB;

/// Parse a size literal into a byte count.
///
/// Accepts a plain number of bytes or a number followed by a unit
/// (`B`, `K`/`KB`/`KiB`, `M`/`MB`/`MiB`, `G`/`GB`/`GiB`, `T`/`TB`/`TiB`),
/// case-insensitive, with optional whitespace between number and unit.
pub fn parse_size(s: &str) -> Result<u64, ConfigError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(invalid(s, "empty size"));
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(invalid(s, "missing number"));
    }

    let value: u64 = digits
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(s, &e.to_string()))?;

    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => KIB,
        "m" | "mb" | "mib" => MIB,
        "g" | "gb" | "gib" => GIB,
        "t" | "tb" | "tib" => TIB,
        other => return Err(invalid(s, &format!("unknown unit '{other}'"))),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| invalid(s, "value does not fit in 64 bits"))
}

fn invalid(value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSize {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// A size as written in a plan file: either a plain byte count or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeValue {
    Bytes(u64),
    Literal(String),
}

impl SizeValue {
    /// Resolve to a byte count.
    pub fn resolve(&self) -> Result<u64, ConfigError> {
        match self {
            SizeValue::Bytes(bytes) => Ok(*bytes),
            SizeValue::Literal(literal) => parse_size(literal),
        }
    }
}

impl From<u64> for SizeValue {
    fn from(bytes: u64) -> Self {
        SizeValue::Bytes(bytes)
    }
}

//! Byte-size quantity parsing.
//!
//! Grammar: `<number><optional-unit>` with unit one of `b`, `kb`, `mb`, `gb`,
//! `tb`, `pb` (case-insensitive, no space before the unit). A missing unit
//! means raw bytes. Multipliers are powers of 1024. The number may be
//! fractional; the product truncates toward zero.

use crate::error::ConfigError;

pub const KB: i64 = 1024;
pub const MB: i64 = KB * 1024;
pub const GB: i64 = MB * 1024;
pub const TB: i64 = GB * 1024;
pub const PB: i64 = TB * 1024;

/// Failure modes of the byte-size grammar, without key context.
///
/// The store attaches the key and raw text when converting to [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSizeError {
    /// Non-numeric leading portion or unrecognized unit suffix.
    Malformed,
    /// The computed byte count exceeds `i64::MAX`.
    Overflow,
}

impl ByteSizeError {
    pub(crate) fn into_config_error(self, key: &str, raw: &str) -> ConfigError {
        match self {
            ByteSizeError::Malformed => ConfigError::malformed(key, raw, "byte size"),
            ByteSizeError::Overflow => ConfigError::out_of_range(key, raw, i64::MAX),
        }
    }
}

/// Multiplier for a unit suffix; `None` for an unrecognized unit.
fn unit_multiplier(unit: &str) -> Option<i64> {
    if unit.is_empty() || unit.eq_ignore_ascii_case("b") {
        return Some(1);
    }
    if unit.eq_ignore_ascii_case("kb") {
        return Some(KB);
    }
    if unit.eq_ignore_ascii_case("mb") {
        return Some(MB);
    }
    if unit.eq_ignore_ascii_case("gb") {
        return Some(GB);
    }
    if unit.eq_ignore_ascii_case("tb") {
        return Some(TB);
    }
    if unit.eq_ignore_ascii_case("pb") {
        return Some(PB);
    }
    None
}

/// Parse a byte-size quantity into an integral byte count.
pub fn parse_byte_size(text: &str) -> Result<i64, ByteSizeError> {
    let split = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);

    if number.is_empty() {
        return Err(ByteSizeError::Malformed);
    }
    let multiplier = unit_multiplier(unit).ok_or(ByteSizeError::Malformed)?;

    if number.contains('.') {
        // Fractional sizes go through f64 and truncate toward zero.
        let value: f64 = number.parse().map_err(|_| ByteSizeError::Malformed)?;
        let total = value * multiplier as f64;
        // 2^63 is the first f64 above i64::MAX.
        if !total.is_finite() || total >= (i64::MAX as u64 + 1) as f64 {
            return Err(ByteSizeError::Overflow);
        }
        return Ok(total as i64);
    }

    let value: i64 = number.parse().map_err(|e: std::num::ParseIntError| {
        match e.kind() {
            std::num::IntErrorKind::PosOverflow => ByteSizeError::Overflow,
            _ => ByteSizeError::Malformed,
        }
    })?;
    value.checked_mul(multiplier).ok_or(ByteSizeError::Overflow)
}

//! # Duration Text Form
//!
//! Parsing and formatting of the textual duration syntax used by
//! configuration files: a sequence of decimal numbers, each with an optional
//! fraction and a unit suffix, such as `"300ms"`, `"1.5h"` or `"2h45m"`.
//! Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
//!
//! The canonical form produced by [`format_duration`] is the one the
//! duration checkers emit: `"18h0m0s"`, `"42m0s"`, `"42s"`, `"42ms"`,
//! `"1.5µs"`, `"0s"`.

use std::fmt::Write as _;
use std::time::Duration;

use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Largest representable duration, in nanoseconds.
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this precision cannot affect a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

/// Error parsing a duration string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    /// Input does not follow the duration grammar, or overflows.
    #[error("invalid duration {input:?}")]
    Invalid {
        /// The rejected input.
        input: String,
    },

    /// A number was not followed by a unit.
    #[error("missing unit in duration {input:?}")]
    MissingUnit {
        /// The rejected input.
        input: String,
    },

    /// A number was followed by an unrecognized unit.
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unrecognized unit.
        unit: String,
        /// The rejected input.
        input: String,
    },

    /// Durations are unsigned; a negative, non-zero input is rejected.
    #[error("negative duration {input:?} is not supported")]
    Negative {
        /// The rejected input.
        input: String,
    },
}

/// Parse a duration string such as `"1h30m"` or `"-0s"`.
///
/// # Errors
///
/// Returns a [`DurationParseError`] describing the first problem found.
/// The empty string is invalid here; callers that treat `""` as zero
/// handle that before calling.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let invalid = || DurationParseError::Invalid {
        input: input.to_string(),
    };

    let mut s = input;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, rest) = s.split_at(int_len);
        s = rest;

        let mut frac_digits = "";
        if let Some(rest) = s.strip_prefix('.') {
            let frac_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            (frac_digits, s) = rest.split_at(frac_len);
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_len == 0 {
            return Err(DurationParseError::MissingUnit {
                input: input.to_string(),
            });
        }
        let (unit, rest) = s.split_at(unit_len);
        s = rest;
        let unit_nanos = unit_nanos(unit).ok_or_else(|| DurationParseError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse::<u64>().map_err(|_| invalid())?.into()
        };
        let mut nanos = whole.checked_mul(unit_nanos).ok_or_else(invalid)?;

        let frac_digits = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
        if !frac_digits.is_empty() {
            let frac: u128 = frac_digits.parse::<u64>().map_err(|_| invalid())?.into();
            let scale = 10u128.pow(frac_digits.len() as u32);
            nanos = nanos
                .checked_add(frac * unit_nanos / scale)
                .ok_or_else(invalid)?;
        }

        total = total.checked_add(nanos).ok_or_else(invalid)?;
        if total > MAX_NANOS {
            return Err(invalid());
        }
    }

    if negative && total > 0 {
        return Err(DurationParseError::Negative {
            input: input.to_string(),
        });
    }
    let nanos = u64::try_from(total).map_err(|_| invalid())?;
    Ok(Duration::from_nanos(nanos))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        // U+00B5 micro sign and U+03BC Greek small letter mu.
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Canonical text form of a duration.
///
/// Durations under one second use the largest of `ns`, `µs`, `ms` that keeps
/// the leading number at least one; longer durations render as
/// `[<h>h][<m>m]<s>s`, with hours and minutes shown once they are non-zero.
/// Fractions drop trailing zeros.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SECOND {
        let (unit, precision) = if nanos < NANOS_PER_MICRO {
            ("ns", 0)
        } else if nanos < NANOS_PER_MILLI {
            ("\u{00b5}s", 3)
        } else {
            ("ms", 6)
        };
        let (whole, fraction) = split_fraction(nanos, precision);
        return format!("{whole}{fraction}{unit}");
    }

    let (seconds, fraction) = split_fraction(nanos, 9);
    let minutes = seconds / 60;
    let hours = minutes / 60;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if minutes > 0 {
        let _ = write!(out, "{}m", minutes % 60);
    }
    let _ = write!(out, "{}{fraction}s", seconds % 60);
    out
}

/// Split `value` into its integer part and a `.ddd` fraction string of at
/// most `precision` digits, trailing zeros removed.
fn split_fraction(value: u128, precision: u32) -> (u128, String) {
    if precision == 0 {
        return (value, String::new());
    }
    let scale = 10u128.pow(precision);
    let fraction = value % scale;
    if fraction == 0 {
        return (value / scale, String::new());
    }
    let digits = format!("{:0width$}", fraction, width = precision as usize);
    (value / scale, format!(".{}", digits.trim_end_matches('0')))
}

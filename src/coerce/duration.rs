//! Duration literals such as `"300ms"`, `"-1.5h"` or `"1h30m"`.
//!
//! A literal is an optional sign followed by one or more decimal numbers,
//! each with an optional fraction and a mandatory unit. Valid units are
//! `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare literal `"0"` is
//! the only value accepted without a unit.

use std::time::Duration;

use chrono::TimeDelta;
use thiserror::Error;

use super::{first, Coerce, CoerceError, Kind};

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Magnitude limit in nanoseconds; `-(1 << 63)` is the one value that
/// reaches it.
const LIMIT: u64 = 1 << 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("negative duration {0:?} cannot be represented")]
    Negative(String),
}

/// Parses a duration literal into signed nanoseconds.
pub fn parse_nanos(input: &str) -> Result<i64, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !starts_numeric(rest) {
            return Err(invalid());
        }

        let (whole, after_whole) = leading_int(rest).ok_or_else(invalid)?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1f64;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, s, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = f;
            scale = s;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        let unit_len = rest
            .bytes()
            .position(|b| b == b'.' || b.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let (unit_text, after_unit) = rest.split_at(unit_len);
        rest = after_unit;
        let unit = unit_nanos(unit_text).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit_text.to_string(),
            input: input.to_string(),
        })?;

        if whole > LIMIT / unit {
            return Err(invalid());
        }
        let mut value = whole * unit;
        if fraction > 0 {
            value += (fraction as f64 * (unit as f64 / scale)) as u64;
            if value > LIMIT {
                return Err(invalid());
            }
        }

        total = total.checked_add(value).filter(|t| *t <= LIMIT).ok_or_else(invalid)?;
    }

    if negative {
        // -(1 << 63) wraps to itself, which is i64::MIN.
        return Ok((total as i64).wrapping_neg());
    }
    if total > LIMIT - 1 {
        return Err(invalid());
    }
    Ok(total as i64)
}

fn starts_numeric(s: &str) -> bool {
    matches!(s.as_bytes().first(), Some(b'.' | b'0'..=b'9'))
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3600 * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Consumes leading decimal digits. `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for b in s[..end].bytes() {
        if value > LIMIT / 10 {
            return None;
        }
        value = value * 10 + u64::from(b - b'0');
        if value > LIMIT {
            return None;
        }
    }
    Some((value, &s[end..]))
}

/// Consumes leading fraction digits, returning the digits as an integer and
/// the power of ten they are scaled by. Digits that would overflow are
/// consumed but dropped.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale = 1f64;
    let mut overflow = false;
    for b in s[..end].bytes() {
        if overflow {
            continue;
        }
        if value > (LIMIT - 1) / 10 {
            overflow = true;
            continue;
        }
        let next = value * 10 + u64::from(b - b'0');
        if next > LIMIT {
            overflow = true;
            continue;
        }
        value = next;
        scale *= 10.0;
    }
    (value, scale, &s[end..])
}

impl Coerce for TimeDelta {
    const KIND: Kind = Kind::Duration;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        Ok(TimeDelta::nanoseconds(parse_nanos(first(raw)?)?))
    }
}

impl Coerce for Duration {
    const KIND: Kind = Kind::Duration;

    fn coerce(raw: &[String]) -> Result<Self, CoerceError> {
        let input = first(raw)?;
        let nanos = parse_nanos(input)?;
        let nanos = u64::try_from(nanos).map_err(|_| DurationError::Negative(input.to_string()))?;
        Ok(Duration::from_nanos(nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_nanos("1h"), Ok(3_600 * 1_000_000_000));
        assert_eq!(parse_nanos("15m"), Ok(900 * 1_000_000_000));
        assert_eq!(parse_nanos("300ms"), Ok(300_000_000));
        assert_eq!(parse_nanos("2us"), Ok(2_000));
        assert_eq!(parse_nanos("2µs"), Ok(2_000));
        assert_eq!(parse_nanos("7ns"), Ok(7));
    }

    #[test]
    fn test_compound_and_fraction() {
        assert_eq!(parse_nanos("1h30m"), Ok(5_400 * 1_000_000_000));
        assert_eq!(parse_nanos("1.5h"), Ok(5_400 * 1_000_000_000));
        assert_eq!(parse_nanos(".5s"), Ok(500_000_000));
        assert_eq!(parse_nanos("1.s"), Ok(1_000_000_000));
    }

    #[test]
    fn test_sign_and_zero() {
        assert_eq!(parse_nanos("0"), Ok(0));
        assert_eq!(parse_nanos("-0"), Ok(0));
        assert_eq!(parse_nanos("+5s"), Ok(5_000_000_000));
        assert_eq!(parse_nanos("-1m"), Ok(-60_000_000_000));
    }

    #[test]
    fn test_missing_unit() {
        assert_eq!(
            parse_nanos("1"),
            Err(DurationError::MissingUnit("1".to_string()))
        );
    }

    #[test]
    fn test_unknown_unit() {
        assert!(matches!(
            parse_nanos("3d"),
            Err(DurationError::UnknownUnit { unit, .. }) if unit == "d"
        ));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(parse_nanos(""), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_nanos("-"), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_nanos("h"), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_nanos(".s"), Err(DurationError::Invalid(_))));
    }

    #[test]
    fn test_range_limits() {
        assert_eq!(parse_nanos("9223372036854775807ns"), Ok(i64::MAX));
        assert_eq!(parse_nanos("-9223372036854775808ns"), Ok(i64::MIN));
        assert!(matches!(
            parse_nanos("9223372036854775808ns"),
            Err(DurationError::Invalid(_))
        ));
        assert!(matches!(parse_nanos("3000000h"), Err(DurationError::Invalid(_))));
    }

    #[test]
    fn test_std_duration_rejects_negative() {
        let result = Duration::coerce(&["-1s".to_string()]);
        assert!(matches!(
            result,
            Err(CoerceError::Duration(DurationError::Negative(_)))
        ));
    }

    #[test]
    fn test_time_delta_keeps_sign() {
        let delta = TimeDelta::coerce(&["-90s".to_string()]).unwrap();
        assert_eq!(delta, TimeDelta::seconds(-90));
    }
}

//! Point arithmetic: the dotted duration notation.
//!
//! A point is a signed count of minutes. Its textual form is a dot-separated
//! sequence of up to five fields read **right-to-left** as minutes, hours,
//! days, months, years with fixed multipliers 1, 60, 1440 (24 h), 43 200
//! (30 d), and 518 400 (360 d). A leading `-` negates the whole value.
//!
//! # Examples
//!
//! ```
//! # use zenith_ast::foundation::point::Point;
//! assert_eq!(Point::parse("0.1.30").unwrap().minutes(), 90);
//! assert_eq!(Point::parse("-1.30").unwrap().minutes(), -90);
//! assert_eq!(Point::from_minutes(90).to_string(), "0.1.30");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minute multipliers, most significant field first: years, months, days,
/// hours, minutes.
const MULTIPLIERS: [i64; 5] = [518_400, 43_200, 1_440, 60, 1];

/// A signed duration in minutes.
///
/// Serializes transparently as its minute count; the dotted notation is the
/// `Display`/`FromStr` form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Point(i64);

/// Malformed point literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    /// The literal was empty (or just a sign).
    #[error("empty point literal")]
    Empty,
    /// A dot-separated field was empty, e.g. `1..30`.
    #[error("empty field in point literal")]
    EmptyField,
    /// A character other than digits, dots, and a leading sign.
    #[error("invalid character '{0}' in point literal")]
    InvalidChar(char),
    /// More than five fields.
    #[error("point literal has {0} fields, the maximum is 5")]
    TooManyFields(usize),
    /// The value does not fit the signed minute range.
    #[error("point value overflows the minute range")]
    Overflow,
}

impl Point {
    /// Wrap a raw minute count.
    pub fn from_minutes(minutes: i64) -> Self {
        Point(minutes)
    }

    /// The signed minute count.
    pub fn minutes(self) -> i64 {
        self.0
    }

    /// Parse the dotted notation into minutes.
    ///
    /// Fields are read right-to-left: the last field is minutes, the one
    /// before it hours, and so on. `"30"` is 30 minutes, `"1.0"` one hour.
    pub fn parse(text: &str) -> Result<Point, PointError> {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if body.is_empty() {
            return Err(PointError::Empty);
        }

        let fields: Vec<&str> = body.split('.').collect();
        if fields.len() > MULTIPLIERS.len() {
            return Err(PointError::TooManyFields(fields.len()));
        }

        let mut total: i64 = 0;
        // Pair fields with multipliers from the least significant end.
        for (field, &multiplier) in fields.iter().rev().zip(MULTIPLIERS.iter().rev()) {
            if field.is_empty() {
                return Err(PointError::EmptyField);
            }
            if let Some(bad) = field.chars().find(|c| !c.is_ascii_digit()) {
                return Err(PointError::InvalidChar(bad));
            }
            let value: i64 = field.parse().map_err(|_| PointError::Overflow)?;
            total = value
                .checked_mul(multiplier)
                .and_then(|v| total.checked_add(v))
                .ok_or(PointError::Overflow)?;
        }

        Ok(Point(if negative { -total } else { total }))
    }
}

impl fmt::Display for Point {
    /// Canonical dotted form.
    ///
    /// The minute count is split greedily into the five fields; output
    /// starts one field above the most significant nonzero one, so 90
    /// renders as `0.1.30` and one hour as `0.1.0`. Zero renders as `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "0");
        }
        if self.0 < 0 {
            write!(f, "-")?;
        }

        let mut rem = self.0.unsigned_abs();
        let mut fields = [0u64; 5];
        for (slot, &multiplier) in fields.iter_mut().zip(MULTIPLIERS.iter()) {
            *slot = rem / multiplier as u64;
            rem %= multiplier as u64;
        }

        let msf = fields
            .iter()
            .position(|&v| v != 0)
            .unwrap_or(MULTIPLIERS.len() - 1);
        let rendered: Vec<String> = fields[msf.saturating_sub(1)..]
            .iter()
            .map(|v| v.to_string())
            .collect();
        write!(f, "{}", rendered.join("."))
    }
}

impl FromStr for Point {
    type Err = PointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Point::parse(s)
    }
}

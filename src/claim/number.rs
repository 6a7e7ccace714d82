//! Numeric ranges in their textual form: `34 < n < 100`, `0 <= n`, `n <= 5`, `n`.
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseRangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Unbounded,
    Inclusive(OrderedFloat<f64>),
    Exclusive(OrderedFloat<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumberRange {
    pub lower: Bound,
    pub upper: Bound,
}

impl NumberRange {
    pub const ANY: NumberRange = NumberRange { lower: Bound::Unbounded, upper: Bound::Unbounded };

    pub fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// NaN is outside every range, including the unbounded one.
    pub fn contains(&self, n: f64) -> bool {
        if n.is_nan() {
            return false;
        }
        let above = match self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(lo) => lo.0 <= n,
            Bound::Exclusive(lo) => lo.0 < n,
        };
        let below = match self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(hi) => n <= hi.0,
            Bound::Exclusive(hi) => n < hi.0,
        };
        above && below
    }
}

static RANGE_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?P<lower>[^\s<]+)\s*(?P<lower_op><=|<)\s*)?n(?:\s*(?P<upper_op><=|<)\s*(?P<upper>\S+))?\s*$",
    )
    .expect("range pattern is valid")
});

fn parse_bound(number: Option<&str>, op: Option<&str>, src: &str) -> Result<Bound, ParseRangeError> {
    let (Some(number), Some(op)) = (number, op) else {
        return Ok(Bound::Unbounded);
    };
    let x: f64 = number.parse().map_err(|_| ParseRangeError {
        input: src.to_owned(),
        reason: format!("`{number}` is not a number"),
    })?;
    if x.is_nan() {
        return Err(ParseRangeError { input: src.to_owned(), reason: "NaN cannot bound a range".into() });
    }
    Ok(match op {
        "<=" => Bound::Inclusive(OrderedFloat(x)),
        _ => Bound::Exclusive(OrderedFloat(x)),
    })
}

impl FromStr for NumberRange {
    type Err = ParseRangeError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let caps = RANGE_RX.captures(src).ok_or_else(|| ParseRangeError {
            input: src.to_owned(),
            reason: "expected a form like `0 <= n < 10`".into(),
        })?;
        let text = |name: &str| caps.name(name).map(|m| m.as_str());
        let lower = parse_bound(text("lower"), text("lower_op"), src)?;
        let upper = parse_bound(text("upper"), text("upper_op"), src)?;
        Ok(Self { lower, upper })
    }
}

impl TryFrom<String> for NumberRange {
    type Error = ParseRangeError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<NumberRange> for String {
    fn from(range: NumberRange) -> Self { range.to_string() }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Bound::Unbounded => {}
            Bound::Inclusive(x) => write!(f, "{} <= ", x.0)?,
            Bound::Exclusive(x) => write!(f, "{} < ", x.0)?,
        }
        f.write_str("n")?;
        match self.upper {
            Bound::Unbounded => Ok(()),
            Bound::Inclusive(x) => write!(f, " <= {}", x.0),
            Bound::Exclusive(x) => write!(f, " < {}", x.0),
        }
    }
}

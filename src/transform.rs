//! Type coercion and operator decoding.
//!
//! A raw filter token looks like `value` or `op:value`:
//!
//! ```text
//! >=:2024-01-01      in:1,2,3      ~:smith      active
//! ─┬ ─────┬────      ─┬ ──┬──      ┬ ──┬──      ──┬───
//!  │      │           │   └ list   │   └ LIKE    └── "=" implied
//!  │      └ scalar    └ IN         └ %smith%
//!  └ operator prefix
//! ```
//!
//! Coercion never fails. A value that does not parse as its declared type
//! comes back as the original string (see [`Coerced::Fallback`]).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nom::{
    bytes::complete::take_until, character::complete::char, sequence::terminated, IResult,
};
use tracing::debug;

use crate::ast::{Operator, TypeKey, Value};

/// Canonical output form of `date` values.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
];

// Ordinal and ISO week dates come after the calendar forms.
const DATE_ONLY_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y%m%d",
    "%Y-%j",
    "%G-W%V-%u",
    "%GW%V%u",
];

/// Outcome of coercing one raw string.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// The input parsed as the declared type.
    Typed(Value),
    /// The input did not parse; carries it back untouched.
    Fallback(String),
}

impl Coerced {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Coerced::Fallback(_))
    }

    /// Collapse into a value, a fallback becoming a plain string.
    pub fn into_value(self) -> Value {
        match self {
            Coerced::Typed(value) => value,
            Coerced::Fallback(raw) => Value::String(raw),
        }
    }
}

/// Coerce `input` to `kind`, reporting whether it fell back.
pub fn coerce(input: &str, kind: TypeKey) -> Coerced {
    let typed = match kind {
        TypeKey::String | TypeKey::Unknown => Some(Value::String(input.to_string())),
        TypeKey::Number => input.trim().parse::<i64>().ok().map(Value::Int),
        TypeKey::Float => input.trim().parse::<f64>().ok().map(Value::Float),
        TypeKey::Bool => Some(Value::Bool(parse_bool(input))),
        TypeKey::Date => parse_date(input).map(|dt| Value::String(format_date(&dt))),
    };

    match typed {
        Some(value) => Coerced::Typed(value),
        None => {
            debug!(input, kind = %kind, "coercion failed, keeping raw value");
            Coerced::Fallback(input.to_string())
        }
    }
}

/// Coerce `input` to `kind`, falling back to the raw string.
pub fn transform_type(input: &str, kind: TypeKey) -> Value {
    coerce(input, kind).into_value()
}

/// Truthiness with a fixed table of spellings; anything else is true
/// unless empty. Case-sensitive.
pub fn parse_bool(input: &str) -> bool {
    match input {
        "true" | "y" | "yes" | "1" => true,
        "false" | "n" | "no" | "0" => false,
        other => !other.is_empty(),
    }
}

/// Detect an ISO-8601-ish date or date-time and convert it to UTC.
///
/// Values without an offset are taken as UTC. Date-only values land on
/// midnight.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // `Z` without seconds is not RFC 3339, read it as naive UTC
    let naive = s
        .strip_suffix('Z')
        .or_else(|| s.strip_suffix('z'))
        .unwrap_or(s);

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.and_utc());
        }
    }

    if let Some(dt) = parse_reduced(naive) {
        return Some(dt.and_utc());
    }

    for fmt in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Reduced-precision forms (`YYYY`, `YYYY-MM`, `YYYY-MM-DDTHH`), widened
/// to minutes before parsing.
fn parse_reduced(s: &str) -> Option<NaiveDateTime> {
    let bytes = s.as_bytes();
    let widened = match bytes.len() {
        4 if bytes.iter().all(u8::is_ascii_digit) => format!("{}-01-01T00:00", s),
        7 if bytes[4] == b'-' => format!("{}-01T00:00", s),
        13 if bytes[10] == b'T' || bytes[10] == b' ' => format!("{}:00", s),
        _ => return None,
    };

    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&widened, fmt).ok())
}

pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// Everything before the first `:`, consuming the separator.
fn operator_prefix(input: &str) -> IResult<&str, &str> {
    terminated(take_until(":"), char(':'))(input)
}

/// Split a raw token into its operator and typed value.
///
/// An unrecognized prefix means equality; the prefix itself is dropped.
pub fn get_operator_and_typed_value(raw: &str, kind: TypeKey) -> (Operator, Value) {
    let Ok((payload, prefix)) = operator_prefix(raw) else {
        return (Operator::Eq, transform_type(raw, kind));
    };

    let op = Operator::from_prefix(prefix).unwrap_or_else(|| {
        debug!(prefix, "unknown operator prefix, using equality");
        Operator::Eq
    });

    let value = if op.takes_list() {
        Value::List(
            payload
                .split(',')
                .map(|item| transform_type(item, kind))
                .collect(),
        )
    } else if op.is_pattern() {
        Value::String(format!("%{}%", transform_type(payload, kind).as_text()))
    } else {
        transform_type(payload, kind)
    };

    (op, value)
}

//! Literal coercion helpers for typed attribute comparisons.

use crate::{backend::LIKE_ESCAPE, compile::CompileError};
use chrono::DateTime;

/// Parse a timestamp literal into epoch milliseconds.
///
/// Filter literals use ISO-8601 extended format (e.g.
/// `2011-05-13T04:42:34Z`); storage keeps epoch milliseconds. A literal
/// that is not ISO-8601 falls back to being read as an already-numeric
/// epoch-millisecond value. Failing both is a fatal filter-syntax error,
/// not an unsupported filter.
pub(crate) fn parse_timestamp_millis(literal: &str) -> Result<i64, CompileError> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(literal) {
        return Ok(datetime.timestamp_millis());
    }

    literal
        .parse::<i64>()
        .map_err(|_| CompileError::MalformedLiteral {
            literal: literal.to_string(),
            expected: "ISO-8601 date-time (e.g. 2011-05-13T04:42:34Z) or epoch milliseconds",
        })
}

/// Permissive boolean parsing: `true` (any case) is true, everything else
/// is false.
pub(crate) fn parse_boolean(literal: &str) -> bool {
    literal.eq_ignore_ascii_case("true")
}

/// Escape LIKE wildcard metacharacters so the value matches literally
/// inside a pattern.
pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }

    out
}

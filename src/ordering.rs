//! Ordering Key
//!
//! Bill numbers arrive in several shapes: plain digits (`2112345`), a two-letter
//! prefix followed by digits for provisional entries (`ZZ00123`), and the formatted
//! `제2112345호`. Each shape maps to one `i64` so the backlog is processed in a
//! deterministic order that does not depend on storage-engine pattern syntax.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Subtracted from prefixed ids so they sort ahead of every plain numeric id.
pub const PREFIXED_OFFSET: i64 = 1_000_000_000;

/// Key for identifiers that match no known shape. Strictly larger than any key
/// produced by the other rules.
pub const UNRECOGNIZED_KEY: i64 = i64::MAX;

static PREFIXED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}([0-9]+)$").expect("static pattern"));
static NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)$").expect("static pattern"));
static FORMATTED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^제([0-9]+)호$").expect("static pattern"));

/// Map a bill identifier to its sortable key.
///
/// Rules, first match wins:
/// 1. two uppercase letters then digits: `digits - PREFIXED_OFFSET`
/// 2. digits only: the integer value
/// 3. `제<digits>호`: the embedded integer
/// 4. anything else: [`UNRECOGNIZED_KEY`]
pub fn ordering_key(id: &str) -> i64 {
    let id = id.trim();

    if let Some(digits) = capture_digits(&PREFIXED_ID, id) {
        return match parse_digits(digits) {
            Some(value) => value - PREFIXED_OFFSET,
            None => UNRECOGNIZED_KEY,
        };
    }

    if let Some(digits) = capture_digits(&NUMERIC_ID, id) {
        return parse_digits(digits).unwrap_or(UNRECOGNIZED_KEY);
    }

    if let Some(digits) = capture_digits(&FORMATTED_ID, id) {
        return parse_digits(digits).unwrap_or(UNRECOGNIZED_KEY);
    }

    UNRECOGNIZED_KEY
}

/// Total order used by record selection: key, then proposal date, then bill id.
pub fn compare_candidates<D: Ord>(
    (key_a, date_a, id_a): (i64, &D, &str),
    (key_b, date_b, id_b): (i64, &D, &str),
) -> Ordering {
    key_a
        .cmp(&key_b)
        .then_with(|| date_a.cmp(date_b))
        .then_with(|| id_a.cmp(id_b))
}

fn capture_digits<'a>(pattern: &Regex, id: &'a str) -> Option<&'a str> {
    pattern
        .captures(id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// Values that would reach the sentinel are rejected so rule 4 stays strictly last.
fn parse_digits(digits: &str) -> Option<i64> {
    digits
        .parse::<i64>()
        .ok()
        .filter(|value| *value < UNRECOGNIZED_KEY)
}

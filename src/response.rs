//! Response Parser
//!
//! Turns raw generated text into a [`BillSummary`]. The generator is asked for a
//! single JSON object but is not trusted to deliver one: the parser looks for the
//! object that closes the text, coerces every field to its expected shape, and
//! silently drops anything it cannot use. Parsing never fails; the outcome is
//! tagged with a [`ParseStatus`] instead.

use crate::bill::{Axis, AxisWeights, BillSummary};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Outcome of parsing one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    /// Headline and summary are both present
    Complete,
    /// A JSON object was decoded but headline or summary is empty
    Incomplete,
    /// No decodable JSON object; all fields hold empty defaults
    Empty,
}

/// Parsed response with its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub summary: BillSummary,
    pub status: ParseStatus,
}

impl ParsedResponse {
    fn empty() -> Self {
        Self {
            summary: BillSummary::default(),
            status: ParseStatus::Empty,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == ParseStatus::Complete
    }
}

/// Parse raw generated text.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let Some(object) = decode_trailing_object(raw.trim()) else {
        return ParsedResponse::empty();
    };

    let headline = string_field(&object, "headline");
    let summary = string_field(&object, "summary");
    let categories = categories_field(object.get("categories"));

    let vote = object.get("vote");
    let vote_for = vote
        .and_then(|v| v.get("for"))
        .map(filter_axis_weights)
        .unwrap_or_default();
    let vote_against = vote
        .and_then(|v| v.get("against"))
        .map(filter_axis_weights)
        .unwrap_or_default();

    let status = if headline.is_empty() || summary.is_empty() {
        ParseStatus::Incomplete
    } else {
        ParseStatus::Complete
    };

    ParsedResponse {
        summary: BillSummary {
            headline,
            summary,
            categories,
            vote_for: resolve_axis_conflicts(vote_for, "for"),
            vote_against: resolve_axis_conflicts(vote_against, "against"),
        },
        status,
    }
}

/// Keep only allowed axis symbols whose value coerces to a strictly positive integer.
pub fn filter_axis_weights(value: &Value) -> AxisWeights {
    let mut out = AxisWeights::new();
    let Some(entries) = value.as_object() else {
        return out;
    };
    for (key, raw) in entries {
        let Some(axis) = Axis::from_symbol(key) else {
            continue;
        };
        if let Some(weight) = coerce_positive(raw) {
            out.insert(axis, weight);
        }
    }
    out
}

/// Remove both members of any exclusive pair that appear together.
pub fn resolve_axis_conflicts(mut weights: AxisWeights, side: &str) -> AxisWeights {
    let conflicting: Vec<Axis> = weights
        .keys()
        .copied()
        .filter(|axis| weights.contains_key(&axis.opposite()))
        .collect();
    if !conflicting.is_empty() {
        let symbols: Vec<&str> = conflicting.iter().map(|a| a.symbol()).collect();
        warn!(
            side = side,
            axes = %symbols.join(","),
            "Dropping conflicting vote axes"
        );
        for axis in conflicting {
            weights.remove(&axis);
        }
    }
    weights
}

// The object that closes the text, scanning opening braces left to right so the
// outermost decodable object wins.
fn decode_trailing_object(text: &str) -> Option<Map<String, Value>> {
    if !text.ends_with('}') {
        return None;
    }
    text.match_indices('{')
        .find_map(|(start, _)| decode_object(&text[start..]))
}

fn decode_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn categories_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(raw)) if raw.trim().is_empty() => Vec::new(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Ok(other) => scalar_text(&other).into_iter().collect(),
            Err(_) => vec![raw.clone()],
        },
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Integers, floats (truncated) and numeric strings. Booleans are not weights.
fn coerce_positive(value: &Value) -> Option<u32> {
    let parsed: i64 = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => n.as_f64().map(|f| f.trunc() as i64)?,
        },
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    if parsed > 0 {
        u32::try_from(parsed).ok()
    } else {
        None
    }
}

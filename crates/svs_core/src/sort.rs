//! Canonical ordering for history documents.
//!
//! Dates within each state are sorted ascending (lexicographic order on
//! `YYYY-MM-DD` is chronological) and outcome fields are rewritten in
//! [`OUTCOME_FIELD_ORDER`], dropping any field outside that list.

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::{CoreError, CoreErrorCode};

/// Key the front end expects the per-state mapping to live under.
pub const ENVELOPE_KEY: &str = "svs-data-per-state";

pub const OUTCOME_FIELD_ORDER: [&str; 4] =
    ["won-prep", "won-castle", "had-svs-match", "opposition-state"];

/// Sorts a history document in place.
///
/// Accepts both the enveloped form (`{"svs-data-per-state": {...}}`) and the
/// bare state mapping. Running it on already-sorted data changes nothing.
pub fn sort_history(value: &mut JsonValue) -> Result<(), CoreError> {
    let states = state_mapping(value)?;

    for (state, history) in states.iter_mut() {
        let JsonValue::Object(dates) = history else {
            return Err(CoreError::new(
                CoreErrorCode::Parse,
                format!("history for state {state} is not an object"),
            ));
        };

        let mut entries: Vec<(String, JsonValue)> = std::mem::take(dates).into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        *dates = entries
            .into_iter()
            .map(|(date, outcome)| (date, reorder_outcome(outcome)))
            .collect();
    }

    Ok(())
}

fn state_mapping(value: &mut JsonValue) -> Result<&mut JsonMap<String, JsonValue>, CoreError> {
    let JsonValue::Object(top) = value else {
        return Err(CoreError::new(
            CoreErrorCode::Parse,
            "history document must be a JSON object",
        ));
    };

    if !top.contains_key(ENVELOPE_KEY) {
        return Ok(top);
    }
    match top.get_mut(ENVELOPE_KEY) {
        Some(JsonValue::Object(states)) => Ok(states),
        _ => Err(CoreError::new(
            CoreErrorCode::Parse,
            format!("\"{ENVELOPE_KEY}\" must be a JSON object"),
        )),
    }
}

fn reorder_outcome(outcome: JsonValue) -> JsonValue {
    let JsonValue::Object(mut fields) = outcome else {
        return outcome;
    };

    let mut ordered = JsonMap::new();
    for key in OUTCOME_FIELD_ORDER {
        if let Some(v) = fields.remove(key) {
            ordered.insert(key.to_string(), v);
        }
    }
    JsonValue::Object(ordered)
}

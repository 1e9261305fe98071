use indexmap::IndexMap;
use serde::Serialize;

use super::result_code::ResultCode;

/// One recorded SvS match from a single state's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchOutcome {
    pub opposition_state: i64,
    pub won_prep: bool,
    pub won_castle: bool,
    pub had_svs_match: bool,
}

impl MatchOutcome {
    pub fn new(opposition_state: i64, result: ResultCode) -> Self {
        Self {
            opposition_state,
            won_prep: result.won_prep(),
            won_castle: result.won_castle(),
            had_svs_match: true,
        }
    }
}

/// Match outcomes for one state, keyed by `YYYY-MM-DD` in insertion order.
pub type StateHistory = IndexMap<String, MatchOutcome>;

/// State identifier to its dated match outcomes.
///
/// Serializes as a plain JSON object. States appear in the order their
/// first data row was read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryDocument {
    states: IndexMap<String, StateHistory>,
}

impl HistoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state with no matches if it is not present yet.
    pub fn register_state(&mut self, state: &str) -> &mut StateHistory {
        self.states.entry(state.to_string()).or_default()
    }

    /// Stores an outcome, replacing any earlier one for the same date.
    pub fn record(&mut self, state: &str, date: String, outcome: MatchOutcome) {
        self.register_state(state).insert(date, outcome);
    }

    pub fn state(&self, state: &str) -> Option<&StateHistory> {
        self.states.get(state)
    }

    pub fn states(&self) -> impl Iterator<Item = (&str, &StateHistory)> {
        self.states.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn match_count(&self) -> usize {
        self.states.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

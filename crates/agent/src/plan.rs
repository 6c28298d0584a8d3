//! Plan extraction from raw model output
//!
//! Models frequently wrap valid JSON in explanatory prose despite
//! instructions, so parsing is two-stage: the whole text first, then the
//! substring between the first `{` and the last `}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel action that ends a run
pub const FINAL_ANSWER: &str = "FINAL_ANSWER";

/// The decision produced by one planning call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Defaulted when absent: a recovered object with no action still
    /// flows into dispatch, where the empty name fails as an unknown
    /// tool and becomes a recoverable observation.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub action_input: String,
}

impl Plan {
    pub fn is_final(&self) -> bool {
        self.action == FINAL_ANSWER
    }
}

/// No JSON object was recoverable from the model output
#[derive(Error, Debug)]
#[error("planner returned non-JSON output:\n{raw}")]
pub struct PlanParseError {
    /// The raw model text, kept for diagnostics
    pub raw: String,
}

/// Extract a `Plan` from raw model text
pub fn parse_plan(raw: &str) -> Result<Plan, PlanParseError> {
    let trimmed = raw.trim();

    if let Ok(plan) = serde_json::from_str::<Plan>(trimmed) {
        return Ok(plan);
    }

    // Tolerate prose around the JSON object
    if let (Some(first), Some(last)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if first < last {
            if let Ok(plan) = serde_json::from_str::<Plan>(&trimmed[first..=last]) {
                return Ok(plan);
            }
        }
    }

    Err(PlanParseError {
        raw: raw.to_string(),
    })
}

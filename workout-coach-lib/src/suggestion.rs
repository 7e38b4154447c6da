//src/suggestion.rs
use crate::units::{self, Units};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Differences at or below this many kg are treated as conversion noise.
pub const CHANGE_EPSILON_KG: f64 = 0.1;
/// Slack for float subtraction, so a 0.1 kg step compares equal to the epsilon at any weight.
const FLOAT_TOLERANCE: f64 = 1e-9;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Increase,
    Decrease,
    Maintain,
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
            Self::Maintain => write!(f, "maintain"),
        }
    }
}

impl TryFrom<&str> for SuggestionType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "maintain" => Ok(Self::Maintain),
            _ => Err(format!("Unknown suggestion type: {value}")),
        }
    }
}

/// Which rest period a suggestion belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct RestContext {
    pub exercise_id: i64,
    pub set_index: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightSuggestion {
    #[serde(rename = "type")]
    pub type_: SuggestionType,
    /// Always in kg.
    pub suggested_weight: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub encouragement: String,
    #[serde(default)]
    pub ai_powered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RestContext>,
}

impl WeightSuggestion {
    /// # Errors
    /// Returns the `serde_json` error when the payload is not a suggestion record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A maintain suggestion has nothing to apply, so no accept action is shown.
    pub const fn offers_accept(&self) -> bool {
        !matches!(self.type_, SuggestionType::Maintain)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Suggested minus current, in kg.
    pub delta: f64,
    pub has_change: bool,
    /// Delta in display units with sign, e.g. "+2.5 kg". Unsigned "0.0 kg" when unchanged.
    pub formatted_delta: String,
}

pub fn reconcile(current_weight_kg: f64, suggestion: &WeightSuggestion, units: Units) -> Reconciliation {
    let delta = suggestion.suggested_weight - current_weight_kg;
    let has_change = delta.abs() > CHANGE_EPSILON_KG + FLOAT_TOLERANCE;
    let formatted_delta = if has_change {
        format_delta(delta, units)
    } else {
        format!("{:.1} {}", 0.0, units.weight_unit())
    };
    debug!(
        "Reconciled {} suggestion: current {current_weight_kg} kg, delta {delta} kg, change {has_change}",
        suggestion.type_
    );
    Reconciliation {
        delta,
        has_change,
        formatted_delta,
    }
}

pub fn format_delta(delta_kg: f64, units: Units) -> String {
    format!(
        "{:+.1} {}",
        units::to_display(delta_kg, units.use_kg()),
        units.weight_unit()
    )
}

/// The weight to apply when the user accepts.
pub const fn accept(suggestion: &WeightSuggestion) -> f64 {
    suggestion.suggested_weight
}

pub const fn dismiss(current_weight_kg: f64) -> f64 {
    current_weight_kg
}

/// Outcome handed back when the suggestion card closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuggestionDecision {
    Accepted { weight_kg: f64 },
    Dismissed { weight_kg: f64 },
}

impl SuggestionDecision {
    pub const fn weight_kg(self) -> f64 {
        match self {
            Self::Accepted { weight_kg } | Self::Dismissed { weight_kg } => weight_kg,
        }
    }
}

/// Resolves the user's choice. Accepting a maintain suggestion keeps the current weight.
pub fn decide(current_weight_kg: f64, suggestion: &WeightSuggestion, accepted: bool) -> SuggestionDecision {
    if accepted && suggestion.offers_accept() {
        SuggestionDecision::Accepted {
            weight_kg: accept(suggestion),
        }
    } else {
        SuggestionDecision::Dismissed {
            weight_kg: dismiss(current_weight_kg),
        }
    }
}

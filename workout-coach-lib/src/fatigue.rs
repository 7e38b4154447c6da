//src/fatigue.rs
use crate::config::StandardColor;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum_macros::EnumIter;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Action '{action}' is not offered for a {severity} fatigue alert.")]
    ActionNotOffered {
        action: FatigueAction,
        severity: FatigueSeverity,
    },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum FatigueSeverity {
    #[default]
    None,
    Low,
    Moderate,
    High,
    Critical,
}

impl FatigueSeverity {
    /// Case-insensitive. Anything unrecognised, including a missing label, is `None`.
    pub fn classify(label: Option<&str>) -> Self {
        let Some(raw) = label else {
            return Self::None;
        };
        match raw.trim().to_lowercase().as_str() {
            "none" | "" => Self::None,
            "low" => Self::Low,
            "moderate" => Self::Moderate,
            "high" => Self::High,
            "critical" => Self::Critical,
            other => {
                warn!("Unknown fatigue severity '{other}', treating as none");
                Self::None
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No Fatigue",
            Self::Low => "Mild Fatigue",
            Self::Moderate => "Moderate Fatigue",
            Self::High => "High Fatigue",
            Self::Critical => "Critical Fatigue",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::None => "check_circle",
            Self::Low => "info",
            Self::Moderate => "warning_amber",
            Self::High => "warning",
            Self::Critical => "dangerous",
        }
    }

    pub const fn color(self) -> StandardColor {
        match self {
            Self::None => StandardColor::Green,
            Self::Low => StandardColor::Yellow,
            Self::Moderate => StandardColor::DarkYellow,
            Self::High => StandardColor::Red,
            Self::Critical => StandardColor::DarkRed,
        }
    }
}

impl fmt::Display for FatigueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl<'de> Deserialize<'de> for FatigueSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(Self::classify(raw.as_deref()))
    }
}

/// Stop-exercise is only ever offered for a critical alert, and only when the host can stop.
pub const fn offers_stop_exercise(severity: FatigueSeverity, has_stop_handler: bool) -> bool {
    matches!(severity, FatigueSeverity::Critical) && has_stop_handler
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatigueAction {
    AcceptSuggestion,
    ContinueAsPlanned,
    StopExercise,
}

impl fmt::Display for FatigueAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AcceptSuggestion => write!(f, "accept suggestion"),
            Self::ContinueAsPlanned => write!(f, "continue as planned"),
            Self::StopExercise => write!(f, "stop exercise"),
        }
    }
}

pub fn available_actions(severity: FatigueSeverity, has_stop_handler: bool) -> Vec<FatigueAction> {
    let mut actions = vec![FatigueAction::AcceptSuggestion, FatigueAction::ContinueAsPlanned];
    if offers_stop_exercise(severity, has_stop_handler) {
        actions.push(FatigueAction::StopExercise);
    }
    actions
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FatigueAlertData {
    pub fatigue_detected: bool,
    pub severity: FatigueSeverity,
    /// Percent.
    pub suggested_weight_reduction: i32,
    /// kg.
    pub suggested_weight: f64,
    pub reasoning: String,
    pub indicators: Vec<String>,
    pub confidence: f64,
}

impl FatigueAlertData {
    /// # Errors
    /// Returns the `serde_json` error when the payload is not a fatigue record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn actions(&self, has_stop_handler: bool) -> Vec<FatigueAction> {
        available_actions(self.severity, has_stop_handler)
    }

    /// Maps the tapped action to what the host applies.
    /// # Errors
    /// Returns `Error::ActionNotOffered` for an action this alert never showed.
    pub fn respond(&self, action: FatigueAction, has_stop_handler: bool) -> Result<FatigueResponse, Error> {
        if !self.actions(has_stop_handler).contains(&action) {
            return Err(Error::ActionNotOffered {
                action,
                severity: self.severity,
            });
        }
        debug!("Fatigue alert ({}) answered with '{action}'", self.severity);
        Ok(match action {
            FatigueAction::AcceptSuggestion => FatigueResponse::AcceptedReduction {
                weight_kg: self.suggested_weight,
            },
            FatigueAction::ContinueAsPlanned => FatigueResponse::ContinuedAsPlanned,
            FatigueAction::StopExercise => FatigueResponse::StoppedExercise,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FatigueResponse {
    AcceptedReduction { weight_kg: f64 },
    ContinuedAsPlanned,
    StoppedExercise,
}

//src/parsed.rs
// Sets and exercises produced by the upstream workout-text parser.
use crate::units::{self, Units, WeightUnit, KG_TO_LBS};
use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetToLog {
    pub weight: f64,
    pub reps: u32,
    #[serde(default)]
    pub unit: WeightUnit,
    #[serde(default)]
    pub is_bodyweight: bool,
    #[serde(default)]
    pub is_failure: bool,
    #[serde(default)]
    pub is_warmup: bool,
    #[serde(default)]
    pub original_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SetToLog {
    /// Weight actually lifted, in the set's own unit. Bodyweight sets always count as 0.
    pub fn effective_weight(&self) -> f64 {
        if self.is_bodyweight {
            0.0
        } else {
            self.weight
        }
    }

    pub fn effective_weight_kg(&self) -> f64 {
        self.unit.to_kg(self.effective_weight())
    }

    /// Returns a copy with the edit applied. Unparseable fields keep their previous value.
    #[must_use]
    pub fn edited(&self, edit: &SetEdit<'_>) -> Self {
        let mut next = self.clone();
        if let Some(input) = edit.weight_input {
            next.weight = parse_weight(input).unwrap_or_else(|| {
                warn!("Ignoring invalid weight input '{}'", input.trim());
                self.weight
            });
        }
        if let Some(input) = edit.reps_input {
            next.reps = parse_or_keep(input, self.reps, "reps");
        }
        if let Some(unit) = edit.unit {
            next.unit = unit;
        }
        if let Some(flag) = edit.is_bodyweight {
            next.is_bodyweight = flag;
        }
        if let Some(flag) = edit.is_failure {
            next.is_failure = flag;
        }
        if let Some(flag) = edit.is_warmup {
            next.is_warmup = flag;
        }
        if let Some(notes) = edit.notes {
            next.notes = normalize_notes(notes);
        }
        next
    }

    /// One-line summary used in confirmation tables, e.g. "100.0 kg x 5".
    pub fn summary(&self) -> String {
        let mut text = if self.is_bodyweight {
            format!("BW x {}", self.reps)
        } else {
            format!("{:.1} {} x {}", self.weight, self.unit, self.reps)
        };
        if self.is_warmup {
            text.push_str(" (warmup)");
        }
        if self.is_failure {
            text.push_str(" (failure)");
        }
        text
    }
}

/// Raw text coming from the edit fields of a set row. `None` leaves a field untouched.
#[derive(Default, Debug, Clone, Copy)]
pub struct SetEdit<'a> {
    pub weight_input: Option<&'a str>,
    pub reps_input: Option<&'a str>,
    pub unit: Option<WeightUnit>,
    pub is_bodyweight: Option<bool>,
    pub is_failure: Option<bool>,
    pub is_warmup: Option<bool>,
    pub notes: Option<&'a str>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseToAdd {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    pub is_bodyweight: bool,
    #[serde(default)]
    pub original_text: String,
    #[serde(default = "full_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

const fn full_confidence() -> f64 {
    1.0
}

impl ExerciseToAdd {
    pub fn is_low_confidence(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }

    /// Weight in the active display unit, derived from the other field when only one is set.
    pub fn display_weight(&self, units: Units) -> Option<f64> {
        if self.is_bodyweight {
            return None;
        }
        match units {
            Units::Metric => self.weight_kg.or_else(|| self.weight_lbs.map(|w| w / KG_TO_LBS)),
            Units::Imperial => self.weight_lbs.or_else(|| self.weight_kg.map(|w| w * KG_TO_LBS)),
        }
    }

    /// Stores a weight typed in `units`; that field becomes the source of truth and the
    /// other one is derived from it.
    pub fn set_display_weight(&mut self, display_weight: f64, units: Units) {
        let kg = units::to_canonical_kg(display_weight, units.use_kg());
        match units {
            Units::Metric => {
                self.weight_kg = Some(display_weight);
                self.weight_lbs = Some(kg * KG_TO_LBS);
            }
            Units::Imperial => {
                self.weight_lbs = Some(display_weight);
                self.weight_kg = Some(kg);
            }
        }
    }

    pub fn clear_weight(&mut self) {
        self.weight_kg = None;
        self.weight_lbs = None;
    }

    /// Returns a copy with the edit applied. The weight input is read in `units`.
    #[must_use]
    pub fn edited(&self, edit: &ExerciseEdit<'_>, units: Units) -> Self {
        let mut next = self.clone();
        if let Some(name) = edit.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                warn!("Ignoring empty exercise name edit for '{}'", self.name);
            } else {
                next.name = trimmed.to_string();
            }
        }
        if let Some(input) = edit.sets_input {
            next.sets = parse_at_least_one(input, self.sets, "sets");
        }
        if let Some(input) = edit.reps_input {
            next.reps = parse_at_least_one(input, self.reps, "reps");
        }
        if let Some(flag) = edit.is_bodyweight {
            next.is_bodyweight = flag;
        }
        if let Some(input) = edit.weight_input {
            if input.trim().is_empty() {
                next.clear_weight();
            } else {
                match parse_weight(input) {
                    Some(weight) => next.set_display_weight(weight, units),
                    None => warn!("Ignoring invalid weight input '{}'", input.trim()),
                }
            }
        }
        if let Some(input) = edit.rest_input {
            next.rest_seconds = if input.trim().is_empty() {
                None
            } else {
                parse_non_negative(input).or(self.rest_seconds)
            };
        }
        if let Some(notes) = edit.notes {
            next.notes = normalize_notes(notes);
        }
        next
    }

    pub fn summary(&self, units: Units) -> String {
        let load = match self.display_weight(units) {
            Some(w) => format!(" @ {:.1} {}", w, units.weight_unit()),
            None if self.is_bodyweight => " @ BW".to_string(),
            None => String::new(),
        };
        format!("{} {}x{}{}", self.name, self.sets, self.reps, load)
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct ExerciseEdit<'a> {
    pub name: Option<&'a str>,
    pub sets_input: Option<&'a str>,
    pub reps_input: Option<&'a str>,
    /// Empty string clears the weight.
    pub weight_input: Option<&'a str>,
    /// Empty string clears the rest time.
    pub rest_input: Option<&'a str>,
    pub is_bodyweight: Option<bool>,
    pub notes: Option<&'a str>,
}

/// Output of the upstream parser for a single free-text message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInput {
    #[serde(default)]
    pub sets: Vec<SetToLog>,
    #[serde(default)]
    pub exercises: Vec<ExerciseToAdd>,
}

impl ParsedInput {
    /// # Errors
    /// Returns the `serde_json` error when the payload does not match the parser schema.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.exercises.is_empty()
    }
}

fn parse_non_negative<T>(input: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    input
        .trim()
        .parse::<T>()
        .ok()
        .filter(|value| *value >= T::default())
}

/// Weights must be finite as well as non-negative; "inf" parses as an `f64`.
fn parse_weight(input: &str) -> Option<f64> {
    parse_non_negative::<f64>(input).filter(|value| value.is_finite())
}

fn parse_or_keep<T>(input: &str, previous: T, field: &str) -> T
where
    T: FromStr + PartialOrd + Default + Copy,
{
    parse_non_negative(input).unwrap_or_else(|| {
        warn!("Ignoring invalid {field} input '{}'", input.trim());
        previous
    })
}

fn parse_at_least_one(input: &str, previous: u32, field: &str) -> u32 {
    match parse_non_negative::<u32>(input) {
        Some(value) if value >= 1 => value,
        _ => {
            warn!("Ignoring invalid {field} input '{}'", input.trim());
            previous
        }
    }
}

fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

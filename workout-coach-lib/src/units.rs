//src/units.rs
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KG_TO_LBS: f64 = 2.20462;

/// Display preference for the whole app. `Metric` means weights are shown in kg.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric, // kg
    Imperial, // lbs
}

impl Units {
    pub const fn use_kg(self) -> bool {
        matches!(self, Self::Metric)
    }

    pub const fn weight_unit(self) -> WeightUnit {
        match self {
            Self::Metric => WeightUnit::Kg,
            Self::Imperial => WeightUnit::Lbs,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

/// Unit attached to a single parsed weight value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub const fn is_kg(self) -> bool {
        matches!(self, Self::Kg)
    }

    /// Converts a value expressed in this unit to kilograms.
    pub fn to_kg(self, weight: f64) -> f64 {
        to_canonical_kg(weight, self.is_kg())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for WeightUnit {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilograms" => Ok(Self::Kg),
            "lb" | "lbs" | "pounds" => Ok(Self::Lbs),
            _ => Err(format!("Unknown weight unit: {value}")),
        }
    }
}

/// Converts a canonical kilogram value into the active display unit.
pub fn to_display(weight_kg: f64, use_kg: bool) -> f64 {
    if use_kg {
        weight_kg
    } else {
        weight_kg * KG_TO_LBS
    }
}

/// Inverse of [`to_display`].
pub fn to_canonical_kg(display_weight: f64, use_kg: bool) -> f64 {
    if use_kg {
        display_weight
    } else {
        display_weight / KG_TO_LBS
    }
}

/// Formats a kilogram value in the user's units, one decimal place.
pub fn format_weight(weight_kg: f64, units: Units) -> String {
    format!(
        "{:.1} {}",
        to_display(weight_kg, units.use_kg()),
        units.weight_unit()
    )
}

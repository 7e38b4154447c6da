//src/quit.rs
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum QuitReason {
    TooTired,
    OutOfTime,
    NotFeelingWell,
    EquipmentUnavailable,
    Injury,
    Other,
    QuickExit,
}

impl QuitReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooTired => "too_tired",
            Self::OutOfTime => "out_of_time",
            Self::NotFeelingWell => "not_feeling_well",
            Self::EquipmentUnavailable => "equipment_unavailable",
            Self::Injury => "injury",
            Self::Other => "other",
            Self::QuickExit => "quick_exit",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TooTired => "Too tired",
            Self::OutOfTime => "Out of time",
            Self::NotFeelingWell => "Not feeling well",
            Self::EquipmentUnavailable => "Equipment unavailable",
            Self::Injury => "Injury or pain",
            Self::Other => "Other",
            Self::QuickExit => "Quick exit",
        }
    }
}

impl fmt::Display for QuitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for QuitReason {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let wanted = value.trim().to_lowercase();
        Self::iter()
            .find(|r| r.code() == wanted)
            .ok_or_else(|| format!("Unknown quit reason: {value}"))
    }
}

/// The quit dialog ships in two shapes that are kept apart until one is retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuitDialogVariant {
    /// Reason chips plus an optional note.
    #[default]
    ReasonPicker,
    /// Single confirm button, recorded as a quick exit.
    QuickExit,
}

impl QuitDialogVariant {
    pub fn reasons(self) -> Vec<QuitReason> {
        match self {
            Self::ReasonPicker => QuitReason::iter()
                .filter(|r| *r != QuitReason::QuickExit)
                .collect(),
            Self::QuickExit => vec![QuitReason::QuickExit],
        }
    }

    pub const fn accepts_note(self) -> bool {
        matches!(self, Self::ReasonPicker)
    }

    /// Builds the dialog result. A reason the variant doesn't show falls back to its
    /// first option; the note is dropped where the variant has no note field.
    pub fn finish(self, reason: QuitReason, note: Option<&str>) -> QuitWorkoutResult {
        let offered = self.reasons();
        let reason = if offered.contains(&reason) {
            reason
        } else {
            debug!("Quit reason {reason} not offered by {self:?}, using {}", offered[0]);
            offered[0]
        };
        let note = if self.accepts_note() {
            note.map(str::trim)
                .filter(|n| !n.is_empty())
                .map(ToString::to_string)
        } else {
            None
        };
        QuitWorkoutResult { reason, note }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuitWorkoutResult {
    pub reason: QuitReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

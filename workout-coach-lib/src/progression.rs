//src/progression.rs
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum RepProgressionType {
    #[default]
    Straight,
    Pyramid,
    ReversePyramid,
    DropSet,
    Wave,
    Cluster,
    RestPause,
    Amrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionInfo {
    pub display_name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl RepProgressionType {
    pub const fn info(self) -> ProgressionInfo {
        match self {
            Self::Straight => ProgressionInfo {
                display_name: "Straight Sets",
                description: "Same weight and reps on every set",
                icon: "horizontal_rule",
            },
            Self::Pyramid => ProgressionInfo {
                display_name: "Pyramid",
                description: "Weight goes up while reps come down each set",
                icon: "trending_up",
            },
            Self::ReversePyramid => ProgressionInfo {
                display_name: "Reverse Pyramid",
                description: "Heaviest set first, then lighter with more reps",
                icon: "trending_down",
            },
            Self::DropSet => ProgressionInfo {
                display_name: "Drop Set",
                description: "Strip weight right after failure and keep going",
                icon: "south",
            },
            Self::Wave => ProgressionInfo {
                display_name: "Wave Loading",
                description: "Rep targets rise and fall in repeating waves",
                icon: "waves",
            },
            Self::Cluster => ProgressionInfo {
                display_name: "Cluster Sets",
                description: "Short intra-set rests to move heavier loads",
                icon: "grain",
            },
            Self::RestPause => ProgressionInfo {
                display_name: "Rest-Pause",
                description: "Brief pauses near failure to squeeze out extra reps",
                icon: "pause_circle",
            },
            Self::Amrap => ProgressionInfo {
                display_name: "AMRAP",
                description: "As many reps as possible on the final set",
                icon: "all_inclusive",
            },
        }
    }

    pub const fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub const fn description(self) -> &'static str {
        self.info().description
    }

    pub const fn icon(self) -> &'static str {
        self.info().icon
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Pyramid => "pyramid",
            Self::ReversePyramid => "reverse_pyramid",
            Self::DropSet => "drop_set",
            Self::Wave => "wave",
            Self::Cluster => "cluster",
            Self::RestPause => "rest_pause",
            Self::Amrap => "amrap",
        }
    }
}

/// Every progression type with its display metadata, in menu order.
pub fn catalog() -> Vec<(RepProgressionType, ProgressionInfo)> {
    RepProgressionType::iter().map(|t| (t, t.info())).collect()
}

impl fmt::Display for RepProgressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for RepProgressionType {
    type Err = String;

    // Accepts wire names ("drop_set"), camelCase ("dropSet") and display names ("Drop Set").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        Self::iter()
            .find(|t| squash(t.wire_name()) == wanted || squash(t.display_name()) == wanted)
            .ok_or_else(|| format!("Unknown progression type: {s}"))
    }
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Emitted when the picker closes on a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionChange {
    pub previous: RepProgressionType,
    pub selected: RepProgressionType,
}

impl ProgressionChange {
    pub fn is_change(&self) -> bool {
        self.previous != self.selected
    }
}

/// The progression chooser shown under an exercise: a collapsed row that expands into
/// the full list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionPicker {
    current: RepProgressionType,
    expanded: bool,
}

impl ProgressionPicker {
    pub const fn new(current: RepProgressionType) -> Self {
        Self {
            current,
            expanded: false,
        }
    }

    pub const fn current(&self) -> RepProgressionType {
        self.current
    }

    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Options to render: only the current one while collapsed, all of them when expanded.
    pub fn visible_options(&self) -> Vec<RepProgressionType> {
        if self.expanded {
            RepProgressionType::iter().collect()
        } else {
            vec![self.current]
        }
    }

    pub fn select(self, selected: RepProgressionType) -> ProgressionChange {
        debug!("Progression changed from {} to {selected}", self.current);
        ProgressionChange {
            previous: self.current,
            selected,
        }
    }
}

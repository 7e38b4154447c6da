// src/lib.rs
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod config;
pub mod fatigue;
pub mod parsed;
pub mod progression;
pub mod quit;
pub mod rest;
pub mod selection;
pub mod submission;
pub mod suggestion;
pub mod units;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, Error as ConfigError, StandardColor, Theme,
};
pub use fatigue::{
    Error as FatigueError, FatigueAction, FatigueAlertData, FatigueResponse, FatigueSeverity,
};
pub use parsed::{ExerciseEdit, ExerciseToAdd, ParsedInput, SetEdit, SetToLog};
pub use progression::{ProgressionChange, ProgressionInfo, ProgressionPicker, RepProgressionType};
pub use quit::{QuitDialogVariant, QuitReason, QuitWorkoutResult};
pub use rest::RestPeriod;
pub use selection::{
    confirm_label_for, ConfirmationResult, ConfirmationSheet, Error as SelectionError,
    SetSelectionModel,
};
pub use submission::{Error as SubmissionError, Notice, SubmissionGuard};
pub use suggestion::{
    Reconciliation, RestContext, SuggestionDecision, SuggestionType, WeightSuggestion,
};
pub use units::{Units, WeightUnit, KG_TO_LBS};

pub struct AppService {
    pub config: Config,
    pub config_path: PathBuf,
}

impl AppService {
    /// Loads (or creates) the config file.
    /// # Errors
    /// Returns `anyhow::Error` if the config path cannot be determined or the file is invalid.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;
        info!("Loaded config from {}", config_path.display());
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidRestSeconds` if `seconds` is 0.
    /// - `ConfigError` variants if saving fails.
    pub fn set_default_rest_seconds(&mut self, seconds: u32) -> Result<(), ConfigError> {
        if seconds == 0 {
            return Err(ConfigError::InvalidRestSeconds);
        }
        self.config.default_rest_seconds = seconds;
        self.save_config()
    }

    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn set_default_progression(
        &mut self,
        progression: RepProgressionType,
    ) -> Result<(), ConfigError> {
        self.config.default_progression = progression;
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidConfidenceThreshold` outside [0, 1].
    /// - `ConfigError` variants if saving fails.
    pub fn set_low_confidence_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidConfidenceThreshold(threshold));
        }
        self.config.low_confidence_threshold = threshold;
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidColor` for unknown color names.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()
    }

    // --- Weight display ---

    pub fn display_weight(&self, weight_kg: f64) -> f64 {
        units::to_display(weight_kg, self.config.units.use_kg())
    }

    pub fn canonical_weight(&self, display_weight: f64) -> f64 {
        units::to_canonical_kg(display_weight, self.config.units.use_kg())
    }

    pub fn format_weight(&self, weight_kg: f64) -> String {
        units::format_weight(weight_kg, self.config.units)
    }

    // --- Confirmation sheet ---

    /// Reads upstream parser output from a JSON file.
    /// # Errors
    /// Returns `anyhow::Error` if the file cannot be read, is not valid parser output,
    /// or contains nothing to confirm.
    pub fn load_parsed_input(&self, path: &Path) -> Result<ParsedInput> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read parser output from {path:?}"))?;
        let parsed = ParsedInput::from_json(&content)
            .with_context(|| format!("Failed to parse parser output in {path:?}"))?;
        if parsed.is_empty() {
            bail!("No sets or exercises found in {path:?}");
        }
        Ok(parsed)
    }

    pub fn open_confirmation_sheet(&self, parsed: ParsedInput) -> ConfirmationSheet {
        ConfirmationSheet::open(parsed.sets, parsed.exercises)
    }

    /// Indices of exercises the parser was unsure about.
    pub fn low_confidence_exercises(&self, exercises: &[ExerciseToAdd]) -> Vec<usize> {
        exercises
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_low_confidence(self.config.low_confidence_threshold))
            .map(|(i, _)| i)
            .collect()
    }

    /// Applies an edit to one exercise row, reading the weight in the configured units.
    /// # Errors
    /// Returns `SelectionError::IndexOutOfRange` for an invalid row.
    pub fn edit_exercise(
        &self,
        sheet: &mut ConfirmationSheet,
        index: usize,
        edit: &ExerciseEdit<'_>,
    ) -> Result<(), SelectionError> {
        let current = sheet.exercises.items().get(index).ok_or(
            SelectionError::IndexOutOfRange {
                index,
                len: sheet.exercises.len(),
            },
        )?;
        let edited = current.edited(edit, self.config.units);
        debug!("Edited exercise {index}: {}", edited.summary(self.config.units));
        sheet.exercises.replace(index, edited)
    }

    /// # Errors
    /// Returns `SelectionError::IndexOutOfRange` for an invalid row.
    pub fn edit_set(
        &self,
        sheet: &mut ConfirmationSheet,
        index: usize,
        edit: &SetEdit<'_>,
    ) -> Result<(), SelectionError> {
        let current = sheet
            .sets
            .items()
            .get(index)
            .ok_or(SelectionError::IndexOutOfRange {
                index,
                len: sheet.sets.len(),
            })?;
        let edited = current.edited(edit);
        sheet.sets.replace(index, edited)
    }

    // --- Rest period ---

    pub fn review_suggestion(
        &self,
        current_weight_kg: f64,
        suggestion: &WeightSuggestion,
    ) -> Reconciliation {
        suggestion::reconcile(current_weight_kg, suggestion, self.config.units)
    }

    /// Starts a rest countdown, using the configured default when no time is given.
    pub fn start_rest(
        &self,
        context: RestContext,
        rest_seconds: Option<u32>,
        now: DateTime<Utc>,
    ) -> RestPeriod {
        let seconds = rest_seconds.unwrap_or(self.config.default_rest_seconds);
        debug!(
            "Rest started for exercise {} set {}: {seconds}s",
            context.exercise_id, context.set_index
        );
        RestPeriod::start(context, seconds, now)
    }

    pub fn progression_picker(&self, current: Option<RepProgressionType>) -> ProgressionPicker {
        ProgressionPicker::new(current.unwrap_or(self.config.default_progression))
    }
}

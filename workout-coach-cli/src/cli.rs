//workout-coach-cli/src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use workout_coach_lib::{QuitReason, RepProgressionType, WeightUnit};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rest-period coaching helpers for an active workout", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionTypeCli {
    Increase,
    Decrease,
    Maintain,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FatigueActionCli {
    Accept,
    Continue,
    Stop,
}

/// A weight with an optional unit suffix, e.g. "100", "100kg", "225 lbs".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightArg {
    pub value: f64,
    pub unit: Option<WeightUnit>,
}

pub fn parse_weight_arg(s: &str) -> Result<WeightArg, String> {
    let trimmed = s.trim();
    let split_at = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split_at);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("Invalid weight '{s}'. Use a number like 100 or 225lbs."))?;
    if value < 0.0 {
        return Err("Weight cannot be negative".to_string());
    }
    let unit = if suffix.trim().is_empty() {
        None
    } else {
        Some(WeightUnit::try_from(suffix)?)
    };
    Ok(WeightArg { value, unit })
}

pub fn parse_progression(s: &str) -> Result<RepProgressionType, String> {
    s.parse()
}

pub fn parse_quit_reason(s: &str) -> Result<QuitReason, String> {
    QuitReason::try_from(s)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a weight between kg and lbs
    Convert {
        /// Weight, optionally with unit (e.g. "100", "225lbs"). Without a unit your configured units are assumed.
        #[arg(value_parser = parse_weight_arg)]
        weight: WeightArg,
    },
    /// Review parsed sets/exercises from a JSON file and print what would be confirmed
    Review {
        /// Path to the parser output (JSON with "sets" and "exercises")
        file: PathBuf,
        /// Untick a set by its row number (repeatable)
        #[arg(long = "skip-set", value_name = "INDEX")]
        skip_sets: Vec<usize>,
        /// Untick an exercise by its row number (repeatable)
        #[arg(long = "skip-exercise", value_name = "INDEX")]
        skip_exercises: Vec<usize>,
        /// Press the select/deselect-all toggle for both lists before skipping
        #[arg(long)]
        toggle_all: bool,
    },
    /// Compare a weight suggestion with the current weight
    Suggest {
        /// Current working weight (in your configured units unless suffixed)
        #[arg(short, long, value_parser = parse_weight_arg)]
        current: WeightArg,
        /// Read the suggestion from a JSON file instead of flags
        #[arg(long, conflicts_with_all = &["suggested", "type_"])]
        file: Option<PathBuf>,
        /// Suggested weight (in your configured units unless suffixed)
        #[arg(short, long, value_parser = parse_weight_arg, requires = "type_")]
        suggested: Option<WeightArg>,
        /// Direction reported by the coach
        #[arg(short, long = "type", value_enum)]
        type_: Option<SuggestionTypeCli>,
        /// Why the coach suggests it
        #[arg(long, default_value = "")]
        reason: String,
        /// Apply the suggestion instead of dismissing it
        #[arg(long)]
        accept: bool,
    },
    /// Classify a fatigue alert and list the actions it offers
    Fatigue {
        /// Read the alert from a JSON file
        #[arg(long, conflicts_with = "severity")]
        file: Option<PathBuf>,
        /// Severity label (none, low, moderate, high, critical)
        #[arg(long)]
        severity: Option<String>,
        /// The host can stop the current exercise
        #[arg(long)]
        stop_handler: bool,
        /// Respond to the alert with this action
        #[arg(long, value_enum)]
        action: Option<FatigueActionCli>,
    },
    /// List rep progression types, optionally choosing one
    Progressions {
        /// Progression currently in use (defaults to the configured one)
        #[arg(long, value_parser = parse_progression)]
        current: Option<RepProgressionType>,
        /// Progression to switch to
        #[arg(long, value_parser = parse_progression)]
        select: Option<RepProgressionType>,
    },
    /// Show a rest countdown
    Rest {
        /// Planned rest in seconds (defaults to the configured rest time)
        #[arg(short, long)]
        seconds: Option<u32>,
        /// Seconds already elapsed
        #[arg(short, long, default_value_t = 0)]
        elapsed: u32,
        /// Extra seconds added to the countdown
        #[arg(long, default_value_t = 0)]
        extend: u32,
    },
    /// Record why a workout was ended early
    Quit {
        /// Reason code (too_tired, out_of_time, not_feeling_well, equipment_unavailable, injury, other)
        #[arg(short, long, value_parser = parse_quit_reason, required_unless_present = "quick")]
        reason: Option<QuitReason>,
        /// Optional free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Use the one-tap dialog (records quick_exit)
        #[arg(long, conflicts_with_all = &["reason", "note"])]
        quick: bool,
    },
    /// Set preferred units (Metric/Imperial)
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Set the default rest time in seconds
    SetRest { seconds: u32 },
    /// Set the default rep progression
    SetProgression {
        #[arg(value_parser = parse_progression)]
        progression: RepProgressionType,
    },
    /// Set the table header color (e.g. Green, DarkCyan)
    SetHeaderColor { color: String },
    /// Show the path to the configuration file
    ConfigPath,
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

//workout-coach-cli/src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::fs;
use std::io::{self, stdout};

use workout_coach_lib::{
    fatigue, progression, suggestion, units, AppService, ConfirmationResult, ConfirmationSheet,
    FatigueAction, FatigueAlertData, FatigueResponse, FatigueSeverity, QuitDialogVariant,
    RestContext, SuggestionDecision, SuggestionType, Units, WeightSuggestion,
};

fn main() -> Result<()> {
    env_logger::init();

    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {}...", shell);
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    let header_color = Color::from(service.config.theme.header());

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Convert { weight } => {
            let unit = weight
                .unit
                .unwrap_or_else(|| service.config.units.weight_unit());
            let kg = unit.to_kg(weight.value);
            println!(
                "{:.2} {} = {:.2} kg = {:.2} lbs",
                weight.value,
                unit,
                kg,
                units::to_display(kg, false)
            );
        }
        cli::Commands::Review {
            file,
            skip_sets,
            skip_exercises,
            toggle_all,
        } => {
            let parsed = service.load_parsed_input(&file)?;
            let mut sheet = service.open_confirmation_sheet(parsed);
            if toggle_all {
                sheet.sets.toggle_all();
                sheet.exercises.toggle_all();
            }
            for index in skip_sets {
                sheet
                    .sets
                    .toggle(index)
                    .with_context(|| format!("Cannot toggle set row {index}"))?;
            }
            for index in skip_exercises {
                sheet
                    .exercises
                    .toggle(index)
                    .with_context(|| format!("Cannot toggle exercise row {index}"))?;
            }

            if !export_csv {
                print_sheet_table(&service, &sheet, header_color);
                println!("[{}]", sheet.confirm_label());
            }
            match sheet.confirm() {
                Ok(result) if export_csv => print_confirmation_csv(&result, service.config.units)?,
                Ok(result) => println!(
                    "Confirmed {} set(s) and {} exercise(s).",
                    result.sets.len(),
                    result.exercises.len()
                ),
                Err(_) => bail!("Nothing selected. Untick fewer rows to confirm."),
            }
        }
        cli::Commands::Suggest {
            current,
            file,
            suggested,
            type_,
            reason,
            accept,
        } => {
            let current_kg = weight_arg_to_kg(&service, current);
            let suggestion = match (file, suggested, type_) {
                (Some(path), _, _) => {
                    let content = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read suggestion from {path:?}"))?;
                    WeightSuggestion::from_json(&content)
                        .with_context(|| format!("Invalid suggestion in {path:?}"))?
                }
                (None, Some(weight), Some(kind)) => WeightSuggestion {
                    type_: cli_type_to_suggestion_type(kind),
                    suggested_weight: weight_arg_to_kg(&service, weight),
                    confidence: 1.0,
                    reason,
                    encouragement: String::new(),
                    ai_powered: false,
                    context: None,
                },
                _ => bail!("Provide either --file or both --suggested and --type."),
            };
            print_suggestion(&service, current_kg, &suggestion, accept);
        }
        cli::Commands::Fatigue {
            file,
            severity,
            stop_handler,
            action,
        } => {
            let alert = match file {
                Some(path) => {
                    let content = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read fatigue alert from {path:?}"))?;
                    FatigueAlertData::from_json(&content)
                        .with_context(|| format!("Invalid fatigue alert in {path:?}"))?
                }
                None => {
                    let severity = FatigueSeverity::classify(severity.as_deref());
                    FatigueAlertData {
                        fatigue_detected: severity != FatigueSeverity::None,
                        severity,
                        ..Default::default()
                    }
                }
            };
            print_fatigue(&service, &alert, stop_handler);
            if let Some(action) = action {
                let response = alert.respond(cli_action_to_fatigue_action(action), stop_handler)?;
                match response {
                    FatigueResponse::AcceptedReduction { weight_kg } => {
                        println!("Next set weight: {}", service.format_weight(weight_kg));
                    }
                    FatigueResponse::ContinuedAsPlanned => println!("Continuing as planned."),
                    FatigueResponse::StoppedExercise => println!("Exercise stopped."),
                }
            }
        }
        cli::Commands::Progressions { current, select } => {
            let picker = service.progression_picker(current);
            match select {
                Some(selected) => {
                    let change = picker.select(selected);
                    if change.is_change() {
                        println!(
                            "Progression changed: {} -> {}",
                            change.previous.display_name(),
                            change.selected.display_name()
                        );
                    } else {
                        println!("Progression unchanged: {}", change.selected.display_name());
                    }
                }
                None if export_csv => print_progressions_csv()?,
                None => print_progressions_table(picker.current(), header_color),
            }
        }
        cli::Commands::Rest {
            seconds,
            elapsed,
            extend,
        } => {
            let now = Utc::now();
            let started_at = now - Duration::seconds(i64::from(elapsed));
            let mut rest = service.start_rest(
                RestContext {
                    exercise_id: 0,
                    set_index: 0,
                },
                seconds,
                started_at,
            );
            rest.extend(extend);
            if rest.is_complete(now) {
                println!("Rest complete. Time for the next set!");
            } else {
                println!(
                    "Rest remaining: {} (of {})",
                    rest.format_remaining(now),
                    workout_coach_lib::rest::format_clock(rest.total_seconds())
                );
            }
        }
        cli::Commands::Quit {
            reason,
            note,
            quick,
        } => {
            let result = if quick {
                QuitDialogVariant::QuickExit.finish(workout_coach_lib::QuitReason::QuickExit, None)
            } else {
                let reason = reason.context("A quit reason is required")?;
                QuitDialogVariant::ReasonPicker.finish(reason, note.as_deref())
            };
            println!("Workout ended: {} ({})", result.reason.label(), result.reason);
            if let Some(note) = result.note {
                println!("Note: {}", note);
            }
        }
        cli::Commands::SetUnits { units } => {
            let lib_units = match units {
                cli::UnitsCli::Metric => Units::Metric,
                cli::UnitsCli::Imperial => Units::Imperial,
            };
            match service.set_units(lib_units) {
                Ok(()) => println!("Successfully set default units to: {:?}", lib_units),
                Err(e) => bail!("Error setting units: {}", e),
            }
        }
        cli::Commands::SetRest { seconds } => match service.set_default_rest_seconds(seconds) {
            Ok(()) => println!("Set default rest to {} second(s). Config updated.", seconds),
            Err(e) => bail!("Error setting rest time: {}", e),
        },
        cli::Commands::SetProgression { progression } => {
            match service.set_default_progression(progression) {
                Ok(()) => println!(
                    "Set default progression to {}. Config updated.",
                    progression.display_name()
                ),
                Err(e) => bail!("Error setting progression: {}", e),
            }
        }
        cli::Commands::SetHeaderColor { color } => match service.set_header_color(&color) {
            Ok(()) => println!(
                "Set header color to {}. Config updated.",
                service.config.theme.header_color
            ),
            Err(e) => bail!("Error setting header color: {}", e),
        },
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

// --- CLI Specific Helper Functions ---

/// Weights typed without a unit are read in the configured units.
fn weight_arg_to_kg(service: &AppService, arg: cli::WeightArg) -> f64 {
    match arg.unit {
        Some(unit) => unit.to_kg(arg.value),
        None => service.canonical_weight(arg.value),
    }
}

fn cli_type_to_suggestion_type(cli_type: cli::SuggestionTypeCli) -> SuggestionType {
    match cli_type {
        cli::SuggestionTypeCli::Increase => SuggestionType::Increase,
        cli::SuggestionTypeCli::Decrease => SuggestionType::Decrease,
        cli::SuggestionTypeCli::Maintain => SuggestionType::Maintain,
    }
}

fn cli_action_to_fatigue_action(cli_action: cli::FatigueActionCli) -> FatigueAction {
    match cli_action {
        cli::FatigueActionCli::Accept => FatigueAction::AcceptSuggestion,
        cli::FatigueActionCli::Continue => FatigueAction::ContinueAsPlanned,
        cli::FatigueActionCli::Stop => FatigueAction::StopExercise,
    }
}

fn print_sheet_table(service: &AppService, sheet: &ConfirmationSheet, header_color: Color) {
    let units = service.config.units;
    let low_confidence = service.low_confidence_exercises(sheet.exercises.items());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Kind").fg(header_color),
            Cell::new("Selected").fg(header_color),
            Cell::new("Details").fg(header_color),
            Cell::new("Source").fg(header_color),
        ]);

    for (i, set) in sheet.sets.items().iter().enumerate() {
        let selected = sheet.sets.is_selected(i).unwrap_or(false);
        table.add_row(vec![
            Cell::new(i),
            Cell::new("Set"),
            Cell::new(if selected { "[x]" } else { "[ ]" }),
            Cell::new(set.summary()),
            Cell::new(&set.original_input),
        ]);
    }
    for (i, exercise) in sheet.exercises.items().iter().enumerate() {
        let selected = sheet.exercises.is_selected(i).unwrap_or(false);
        let mut details = exercise.summary(units);
        if let Some(rest) = exercise.rest_seconds {
            details.push_str(&format!(", rest {}", workout_coach_lib::rest::format_clock(rest)));
        }
        let mut source = Cell::new(&exercise.original_text);
        if low_confidence.contains(&i) {
            source = Cell::new(format!("{} (low confidence)", exercise.original_text))
                .fg(Color::Yellow);
        }
        table.add_row(vec![
            Cell::new(i),
            Cell::new("Exercise"),
            Cell::new(if selected { "[x]" } else { "[ ]" }),
            Cell::new(details),
            source,
        ]);
    }

    println!("{table}");
}

fn print_confirmation_csv(result: &ConfirmationResult, units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let weight_header = format!("Weight_{}", units.weight_unit().label());

    writer.write_record([
        "Kind",
        "Name",
        "Sets",
        "Reps",
        weight_header.as_str(),
        "Bodyweight",
        "Notes",
    ])?;

    for set in &result.sets {
        let display = units::to_display(set.effective_weight_kg(), units.use_kg());
        writer.write_record([
            "set".to_string(),
            String::new(),
            "1".to_string(),
            set.reps.to_string(),
            format!("{:.2}", display),
            set.is_bodyweight.to_string(),
            set.notes.clone().unwrap_or_default(),
        ])?;
    }
    for exercise in &result.exercises {
        writer.write_record([
            "exercise".to_string(),
            exercise.name.clone(),
            exercise.sets.to_string(),
            exercise.reps.to_string(),
            exercise
                .display_weight(units)
                .map_or_else(String::new, |w| format!("{:.2}", w)),
            exercise.is_bodyweight.to_string(),
            exercise.notes.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn print_suggestion(
    service: &AppService,
    current_kg: f64,
    suggestion: &WeightSuggestion,
    accept: bool,
) {
    let reconciliation = service.review_suggestion(current_kg, suggestion);
    println!(
        "Suggestion: {} to {}",
        suggestion.type_,
        service.format_weight(suggestion.suggested_weight)
    );
    if !suggestion.reason.is_empty() {
        println!("Reason: {}", suggestion.reason);
    }
    if !suggestion.encouragement.is_empty() {
        println!("{}", suggestion.encouragement);
    }
    if reconciliation.has_change {
        println!("Change: {}", reconciliation.formatted_delta);
    } else {
        println!("Change: none");
    }

    if !suggestion.offers_accept() && accept {
        println!("Nothing to apply for a maintain suggestion.");
    }
    match suggestion::decide(current_kg, suggestion, accept) {
        SuggestionDecision::Accepted { weight_kg } => {
            println!("Accepted. Next set: {}", service.format_weight(weight_kg));
        }
        SuggestionDecision::Dismissed { weight_kg } => {
            println!("Keeping {}", service.format_weight(weight_kg));
        }
    }
}

fn print_fatigue(service: &AppService, alert: &FatigueAlertData, stop_handler: bool) {
    let severity = alert.severity;
    let severity_cell = Cell::new(severity.label()).fg(Color::from(severity.color()));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .add_row(vec![Cell::new("Severity"), severity_cell])
        .add_row(vec![Cell::new("Icon"), Cell::new(severity.icon())]);
    if alert.suggested_weight > 0.0 {
        table.add_row(vec![
            Cell::new("Suggested weight"),
            Cell::new(format!(
                "{} (-{}%)",
                service.format_weight(alert.suggested_weight),
                alert.suggested_weight_reduction
            )),
        ]);
    }
    if !alert.reasoning.is_empty() {
        table.add_row(vec![Cell::new("Reasoning"), Cell::new(&alert.reasoning)]);
    }
    if !alert.indicators.is_empty() {
        table.add_row(vec![
            Cell::new("Indicators"),
            Cell::new(alert.indicators.join(", ")),
        ]);
    }
    let actions: Vec<String> = alert
        .actions(stop_handler)
        .iter()
        .map(ToString::to_string)
        .collect();
    table.add_row(vec![Cell::new("Actions"), Cell::new(actions.join(" | "))]);
    println!("{table}");

    if severity == FatigueSeverity::Critical && !fatigue::offers_stop_exercise(severity, stop_handler) {
        println!("Stop exercise unavailable: no stop handler.");
    }
}

fn print_progressions_table(current: workout_coach_lib::RepProgressionType, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("").fg(header_color),
            Cell::new("Code").fg(header_color),
            Cell::new("Name").fg(header_color),
            Cell::new("Description").fg(header_color),
        ]);

    for (kind, info) in progression::catalog() {
        table.add_row(vec![
            Cell::new(if kind == current { "*" } else { "" }),
            Cell::new(kind),
            Cell::new(info.display_name),
            Cell::new(info.description),
        ]);
    }

    println!("{table}");
}

fn print_progressions_csv() -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Code", "Name", "Description", "Icon"])?;
    for (kind, info) in progression::catalog() {
        writer.write_record([
            kind.wire_name(),
            info.display_name,
            info.description,
            info.icon,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

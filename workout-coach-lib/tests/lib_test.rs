use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use workout_coach_lib::{
    confirm_label_for, fatigue, parse_color, suggestion, units, AppService, Config, ConfigError,
    ConfirmationSheet, ExerciseEdit, ExerciseToAdd, FatigueAction, FatigueAlertData,
    FatigueError, FatigueResponse, FatigueSeverity, Notice, ParsedInput, ProgressionPicker,
    QuitDialogVariant, QuitReason, RepProgressionType, RestContext, SelectionError, SetEdit,
    SetSelectionModel, SetToLog, StandardColor, SubmissionError, SubmissionGuard,
    SuggestionDecision, SuggestionType, Units, WeightSuggestion, WeightUnit,
};

// Helper function to create a test service backed by a throwaway config file
fn create_test_service(name: &str) -> AppService {
    let dir = std::env::temp_dir().join(format!(
        "workout-coach-test-{}-{}",
        std::process::id(),
        name
    ));
    AppService {
        config: Config::default(),
        config_path: dir.join("config.toml"),
    }
}

fn set(weight: f64, reps: u32) -> SetToLog {
    SetToLog {
        weight,
        reps,
        unit: WeightUnit::Kg,
        original_input: format!("{weight}x{reps}"),
        ..Default::default()
    }
}

fn exercise(name: &str, weight_kg: Option<f64>, confidence: f64) -> ExerciseToAdd {
    ExerciseToAdd {
        name: name.to_string(),
        sets: 3,
        reps: 10,
        weight_kg,
        weight_lbs: weight_kg.map(|w| w * units::KG_TO_LBS),
        rest_seconds: None,
        is_bodyweight: false,
        original_text: name.to_lowercase(),
        confidence,
        notes: None,
    }
}

fn suggestion_of(type_: SuggestionType, suggested_weight: f64) -> WeightSuggestion {
    WeightSuggestion {
        type_,
        suggested_weight,
        confidence: 0.8,
        reason: "Last set felt easy".to_string(),
        encouragement: "Nice work".to_string(),
        ai_powered: true,
        context: None,
    }
}

fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

// --- Units ---

#[test]
fn test_unit_round_trip() {
    for w in [0.0, 0.5, 2.5, 20.0, 61.25, 100.0, 142.5, 327.3] {
        let lbs = units::to_display(w, false);
        assert_close(units::to_canonical_kg(lbs, false), w);
        assert_eq!(units::to_display(w, true), w);
        assert_eq!(units::to_canonical_kg(w, true), w);
    }
}

#[test]
fn test_unit_conversion_factor() {
    assert_close(units::to_display(100.0, false), 220.462);
    assert_close(units::to_canonical_kg(220.462, false), 100.0);
    // Negative values pass straight through
    assert_close(units::to_display(-10.0, false), -22.0462);
    assert_eq!(units::format_weight(100.0, Units::Imperial), "220.5 lbs");
    assert_eq!(units::format_weight(100.0, Units::Metric), "100.0 kg");
    assert_close(WeightUnit::Lbs.to_kg(220.462), 100.0);
}

// --- Parsed input ---

#[test]
fn test_bodyweight_set_counts_as_zero() {
    let mut pullups = set(15.0, 8);
    pullups.is_bodyweight = true;
    assert_eq!(pullups.effective_weight(), 0.0);
    assert_eq!(pullups.effective_weight_kg(), 0.0);
    assert_eq!(pullups.summary(), "BW x 8");
}

#[test]
fn test_parsed_input_from_json() -> Result<()> {
    let json = r#"{
        "sets": [
            {"weight": 225, "reps": 5, "unit": "lbs", "isBodyweight": false,
             "isFailure": true, "isWarmup": false, "originalInput": "225x5 to failure"}
        ],
        "exercises": [
            {"name": "Lat Pulldown", "sets": 3, "reps": 12, "weightKg": 50.0,
             "restSeconds": 90, "isBodyweight": false, "originalText": "lat pulldown 3x12 50kg",
             "confidence": 0.65}
        ]
    }"#;
    let parsed = ParsedInput::from_json(json)?;
    assert_eq!(parsed.sets.len(), 1);
    assert_eq!(parsed.sets[0].unit, WeightUnit::Lbs);
    assert!(parsed.sets[0].is_failure);
    assert_close(parsed.sets[0].effective_weight_kg(), 225.0 / units::KG_TO_LBS);

    let pulldown = &parsed.exercises[0];
    assert_eq!(pulldown.rest_seconds, Some(90));
    assert!(pulldown.is_low_confidence(0.7));
    assert_close(pulldown.display_weight(Units::Imperial).unwrap(), 50.0 * units::KG_TO_LBS);
    Ok(())
}

#[test]
fn test_set_edit_falls_back_on_bad_input() {
    let original = set(100.0, 5);
    let edited = original.edited(&SetEdit {
        weight_input: Some("abc"),
        reps_input: Some("8"),
        notes: Some("  paused  "),
        ..Default::default()
    });
    assert_eq!(edited.weight, 100.0);
    assert_eq!(edited.reps, 8);
    assert_eq!(edited.notes.as_deref(), Some("paused"));

    let negative = original.edited(&SetEdit {
        weight_input: Some("-5"),
        reps_input: Some("-1"),
        ..Default::default()
    });
    assert_eq!(negative, original);
}

#[test]
fn test_exercise_weight_sync_on_edit() {
    let squat = exercise("Squat", Some(100.0), 0.9);

    let edited = squat.edited(
        &ExerciseEdit {
            weight_input: Some("225"),
            ..Default::default()
        },
        Units::Imperial,
    );
    assert_eq!(edited.weight_lbs, Some(225.0));
    assert_close(edited.weight_kg.unwrap(), 225.0 / units::KG_TO_LBS);

    let metric = edited.edited(
        &ExerciseEdit {
            weight_input: Some("110"),
            sets_input: Some("0"), // sets must stay >= 1
            reps_input: Some("6"),
            ..Default::default()
        },
        Units::Metric,
    );
    assert_eq!(metric.weight_kg, Some(110.0));
    assert_close(metric.weight_lbs.unwrap(), 110.0 * units::KG_TO_LBS);
    assert_eq!(metric.sets, 3);
    assert_eq!(metric.reps, 6);

    let cleared = metric.edited(
        &ExerciseEdit {
            weight_input: Some(""),
            rest_input: Some("120"),
            ..Default::default()
        },
        Units::Metric,
    );
    assert_eq!(cleared.weight_kg, None);
    assert_eq!(cleared.weight_lbs, None);
    assert_eq!(cleared.rest_seconds, Some(120));
}

#[test]
fn test_exercise_edit_keeps_weight_on_garbage() {
    let row = exercise("Row", Some(60.0), 0.9);
    let edited = row.edited(
        &ExerciseEdit {
            weight_input: Some("sixty"),
            name: Some("   "),
            ..Default::default()
        },
        Units::Metric,
    );
    assert_eq!(edited.weight_kg, Some(60.0));
    assert_eq!(edited.name, "Row");
}

#[test]
fn test_non_finite_weight_edits_keep_previous() -> Result<()> {
    let original = set(100.0, 5);
    for input in ["inf", "infinity", "NaN", "-inf"] {
        let edited = original.edited(&SetEdit {
            weight_input: Some(input),
            ..Default::default()
        });
        assert_eq!(edited.weight, 100.0, "set weight changed for '{input}'");

        let press = exercise("Press", Some(40.0), 0.9);
        let edited = press.edited(
            &ExerciseEdit {
                weight_input: Some(input),
                ..Default::default()
            },
            Units::Metric,
        );
        assert_eq!(edited.weight_kg, Some(40.0), "kg changed for '{input}'");
        assert_eq!(edited.weight_lbs, press.weight_lbs, "lbs changed for '{input}'");
    }
    Ok(())
}

#[test]
fn test_invalid_weight_edit_leaves_both_fields_untouched() -> Result<()> {
    // Only kg came back from the parser
    let curl = ExerciseToAdd {
        weight_lbs: None,
        ..exercise("Curl", Some(100.0), 0.9)
    };
    for units in [Units::Metric, Units::Imperial] {
        let edited = curl.edited(
            &ExerciseEdit {
                weight_input: Some("heavy"),
                ..Default::default()
            },
            units,
        );
        assert_eq!(edited.weight_kg, Some(100.0));
        assert_eq!(edited.weight_lbs, None);
        assert_eq!(edited, curl);
    }
    Ok(())
}

// --- Selection ---

#[test]
fn test_selection_starts_all_selected() -> Result<()> {
    let model = SetSelectionModel::new(vec![set(60.0, 10), set(70.0, 8), set(80.0, 6)]);
    assert_eq!(model.selected_count(), 3);
    assert!(model.all_selected());
    assert!(model.is_selected(2)?);
    Ok(())
}

#[test]
fn test_toggle_is_idempotent_in_pairs() -> Result<()> {
    let mut model = SetSelectionModel::new(vec![set(60.0, 10), set(70.0, 8)]);
    model.toggle(1)?;
    assert!(!model.is_selected(1)?);
    model.toggle(1)?;
    assert!(model.is_selected(1)?);
    assert_eq!(model.selected_count(), 2);
    Ok(())
}

#[test]
fn test_toggle_out_of_range_is_rejected() {
    let mut model = SetSelectionModel::new(vec![set(60.0, 10)]);
    assert_eq!(
        model.toggle(3),
        Err(SelectionError::IndexOutOfRange { index: 3, len: 1 })
    );
    assert_eq!(model.selected_count(), 1);
    assert!(model.replace(1, set(0.0, 0)).is_err());
}

#[test]
fn test_toggle_all_symmetry() -> Result<()> {
    let mut model = SetSelectionModel::new(vec![set(60.0, 10), set(70.0, 8), set(80.0, 6)]);
    model.toggle_all();
    assert_eq!(model.selected_count(), 0);
    model.toggle_all();
    assert!(model.all_selected());

    // Partial selection goes to all, not none
    model.toggle(0)?;
    model.toggle_all();
    assert!(model.all_selected());
    Ok(())
}

#[test]
fn test_replace_keeps_selection() -> Result<()> {
    let mut model = SetSelectionModel::new(vec![set(60.0, 10), set(70.0, 8)]);
    model.toggle(0)?;
    model.replace(0, set(65.0, 10))?;
    model.replace(1, set(72.5, 8))?;
    assert!(!model.is_selected(0)?);
    assert!(model.is_selected(1)?);
    assert_eq!(model.items()[0].weight, 65.0);
    assert_eq!(model.into_selected(), vec![set(72.5, 8)]);
    Ok(())
}

#[test]
fn test_confirm_labels() {
    assert_eq!(confirm_label_for(2, 0), "Log 2 sets");
    assert_eq!(confirm_label_for(0, 0), "Select items");
    assert_eq!(confirm_label_for(1, 1), "Log 1 set & Add 1 exercise");
    assert_eq!(confirm_label_for(0, 3), "Add 3 exercises");
    assert_eq!(confirm_label_for(1, 0), "Log 1 set");
}

#[test]
fn test_confirmation_sheet_result() -> Result<()> {
    let mut sheet = ConfirmationSheet::open(
        vec![set(60.0, 10), set(70.0, 8)],
        vec![exercise("Curl", Some(15.0), 0.9)],
    );
    assert_eq!(sheet.confirm_label(), "Log 2 sets & Add 1 exercise");

    sheet.sets.toggle(0)?;
    assert_eq!(sheet.confirm_label(), "Log 1 set & Add 1 exercise");
    assert!(sheet.is_confirm_enabled());

    let result = sheet.confirm().expect("selection is not empty");
    assert_eq!(result.sets, vec![set(70.0, 8)]);
    assert_eq!(result.exercises.len(), 1);
    assert_eq!(result.exercises[0].name, "Curl");
    Ok(())
}

#[test]
fn test_confirmation_sheet_disabled_when_empty() {
    let mut sheet = ConfirmationSheet::open(vec![set(60.0, 10)], vec![exercise("Dip", None, 0.9)]);
    sheet.sets.toggle_all();
    sheet.exercises.toggle_all();
    assert!(!sheet.is_confirm_enabled());
    assert_eq!(sheet.confirm_label(), "Select items");

    let sheet = sheet.confirm().expect_err("nothing selected");
    assert_eq!(sheet.total_selected(), 0);
    sheet.cancel();
}

#[test]
fn test_service_edits_rows_in_display_units() -> Result<()> {
    let mut service = create_test_service("edits");
    service.config.units = Units::Imperial;
    let mut sheet = service.open_confirmation_sheet(ParsedInput {
        sets: vec![set(100.0, 5)],
        exercises: vec![exercise("Bench", Some(80.0), 0.5), exercise("Row", None, 0.95)],
    });

    service.edit_exercise(
        &mut sheet,
        0,
        &ExerciseEdit {
            weight_input: Some("185"),
            ..Default::default()
        },
    )?;
    assert_eq!(sheet.exercises.items()[0].weight_lbs, Some(185.0));

    service.edit_set(
        &mut sheet,
        0,
        &SetEdit {
            reps_input: Some("6"),
            ..Default::default()
        },
    )?;
    assert_eq!(sheet.sets.items()[0].reps, 6);

    assert!(service
        .edit_set(&mut sheet, 5, &SetEdit::default())
        .is_err());
    assert_eq!(service.low_confidence_exercises(sheet.exercises.items()), vec![0]);
    Ok(())
}

// --- Weight suggestions ---

#[test]
fn test_suggestion_change_threshold() {
    let at_threshold = suggestion::reconcile(0.0, &suggestion_of(SuggestionType::Increase, 0.1), Units::Metric);
    assert!(!at_threshold.has_change);

    let over = suggestion::reconcile(0.0, &suggestion_of(SuggestionType::Increase, 0.11), Units::Metric);
    assert!(over.has_change);
    assert_close(over.delta, 0.11);
}

#[test]
fn test_small_step_is_not_a_change_at_any_weight() -> Result<()> {
    for (current, suggested) in [(20.0, 20.1), (60.0, 60.1), (100.0, 100.1), (100.0, 99.9)] {
        let rec = suggestion::reconcile(
            current,
            &suggestion_of(SuggestionType::Increase, suggested),
            Units::Metric,
        );
        assert!(!rec.has_change, "{current} -> {suggested} counted as a change");
        assert_eq!(rec.formatted_delta, "0.0 kg");
    }

    let over = suggestion::reconcile(60.0, &suggestion_of(SuggestionType::Increase, 60.11), Units::Metric);
    assert!(over.has_change);
    assert_eq!(over.formatted_delta, "+0.1 kg");
    Ok(())
}

#[test]
fn test_unchanged_delta_has_no_sign() -> Result<()> {
    let below = suggestion_of(SuggestionType::Maintain, 99.97);
    assert_eq!(suggestion::reconcile(100.0, &below, Units::Metric).formatted_delta, "0.0 kg");
    assert_eq!(suggestion::reconcile(100.0, &below, Units::Imperial).formatted_delta, "0.0 lbs");

    let above = suggestion_of(SuggestionType::Maintain, 100.05);
    assert_eq!(suggestion::reconcile(100.0, &above, Units::Metric).formatted_delta, "0.0 kg");
    Ok(())
}

#[test]
fn test_reconcile_formats_delta_in_display_units() {
    let up = suggestion_of(SuggestionType::Increase, 102.5);
    let metric = suggestion::reconcile(100.0, &up, Units::Metric);
    assert_close(metric.delta, 2.5);
    assert_eq!(metric.formatted_delta, "+2.5 kg");

    let down = suggestion_of(SuggestionType::Decrease, 95.0);
    let imperial = suggestion::reconcile(100.0, &down, Units::Imperial);
    assert_close(imperial.delta, -5.0);
    assert_eq!(imperial.formatted_delta, "-11.0 lbs");
}

#[test]
fn test_direction_comes_from_suggestion_type() {
    // Upstream may call it "maintain" with a tiny nonzero delta
    let maintain = suggestion_of(SuggestionType::Maintain, 100.05);
    let rec = suggestion::reconcile(100.0, &maintain, Units::Metric);
    assert!(!rec.has_change);
    assert_eq!(maintain.type_, SuggestionType::Maintain);
    assert!(!maintain.offers_accept());

    let odd = suggestion_of(SuggestionType::Decrease, 105.0);
    assert!(odd.offers_accept());
    assert_eq!(odd.type_, SuggestionType::Decrease);
}

#[test]
fn test_accept_and_dismiss() {
    let up = suggestion_of(SuggestionType::Increase, 105.0);
    assert_eq!(suggestion::accept(&up), 105.0);
    assert_eq!(suggestion::dismiss(100.0), 100.0);

    assert_eq!(
        suggestion::decide(100.0, &up, true),
        SuggestionDecision::Accepted { weight_kg: 105.0 }
    );
    assert_eq!(
        suggestion::decide(100.0, &up, false),
        SuggestionDecision::Dismissed { weight_kg: 100.0 }
    );

    let maintain = suggestion_of(SuggestionType::Maintain, 100.0);
    let decision = suggestion::decide(100.0, &maintain, true);
    assert_eq!(decision, SuggestionDecision::Dismissed { weight_kg: 100.0 });
    assert_eq!(decision.weight_kg(), 100.0);
}

#[test]
fn test_suggestion_from_json() -> Result<()> {
    let json = r#"{"type": "decrease", "suggestedWeight": 92.5, "confidence": 0.7,
        "reason": "RIR 0 on last set", "encouragement": "Stay strong", "aiPowered": false,
        "context": {"exerciseId": 12, "setIndex": 2}}"#;
    let s = WeightSuggestion::from_json(json)?;
    assert_eq!(s.type_, SuggestionType::Decrease);
    assert_eq!(
        s.context,
        Some(RestContext {
            exercise_id: 12,
            set_index: 2
        })
    );
    Ok(())
}

// --- Fatigue ---

#[test]
fn test_fatigue_classification() {
    assert_eq!(FatigueSeverity::classify(Some("CRITICAL")), FatigueSeverity::Critical);
    assert_eq!(FatigueSeverity::classify(Some(" moderate ")), FatigueSeverity::Moderate);
    assert_eq!(FatigueSeverity::classify(Some("High")), FatigueSeverity::High);
    assert_eq!(FatigueSeverity::classify(Some("low")), FatigueSeverity::Low);
    assert_eq!(FatigueSeverity::classify(Some("bogus")), FatigueSeverity::None);
    assert_eq!(FatigueSeverity::classify(None), FatigueSeverity::None);
}

#[test]
fn test_stop_exercise_gating() {
    assert!(fatigue::offers_stop_exercise(FatigueSeverity::Critical, true));
    assert!(!fatigue::offers_stop_exercise(FatigueSeverity::Critical, false));
    assert!(!fatigue::offers_stop_exercise(FatigueSeverity::High, true));
    assert!(!fatigue::offers_stop_exercise(FatigueSeverity::High, false));

    assert_eq!(
        fatigue::available_actions(FatigueSeverity::Moderate, true),
        vec![FatigueAction::AcceptSuggestion, FatigueAction::ContinueAsPlanned]
    );
    assert!(fatigue::available_actions(FatigueSeverity::Critical, true)
        .contains(&FatigueAction::StopExercise));
}

#[test]
fn test_fatigue_alert_from_json() -> Result<()> {
    let json = r#"{"fatigueDetected": true, "severity": "Critical",
        "suggestedWeightReduction": 15, "suggestedWeight": 85.0,
        "reasoning": "Rep speed dropped sharply", "indicators": ["rep_drop", "rpe_spike"],
        "confidence": 0.82}"#;
    let alert = FatigueAlertData::from_json(json)?;
    assert_eq!(alert.severity, FatigueSeverity::Critical);
    assert_eq!(alert.indicators, vec!["rep_drop", "rpe_spike"]);
    assert_eq!(alert.severity.color(), StandardColor::DarkRed);

    let unknown = FatigueAlertData::from_json(r#"{"fatigueDetected": true, "severity": null}"#)?;
    assert_eq!(unknown.severity, FatigueSeverity::None);
    let odd = FatigueAlertData::from_json(r#"{"severity": "extreme"}"#)?;
    assert_eq!(odd.severity, FatigueSeverity::None);
    Ok(())
}

#[test]
fn test_fatigue_responses() -> Result<()> {
    let alert = FatigueAlertData {
        fatigue_detected: true,
        severity: FatigueSeverity::High,
        suggested_weight_reduction: 10,
        suggested_weight: 90.0,
        ..Default::default()
    };
    assert_eq!(
        alert.respond(FatigueAction::AcceptSuggestion, true)?,
        FatigueResponse::AcceptedReduction { weight_kg: 90.0 }
    );
    assert_eq!(
        alert.respond(FatigueAction::ContinueAsPlanned, true)?,
        FatigueResponse::ContinuedAsPlanned
    );
    assert_eq!(
        alert.respond(FatigueAction::StopExercise, true),
        Err(FatigueError::ActionNotOffered {
            action: FatigueAction::StopExercise,
            severity: FatigueSeverity::High,
        })
    );

    let critical = FatigueAlertData {
        severity: FatigueSeverity::Critical,
        ..alert
    };
    assert_eq!(
        critical.respond(FatigueAction::StopExercise, true)?,
        FatigueResponse::StoppedExercise
    );
    assert!(critical.respond(FatigueAction::StopExercise, false).is_err());
    Ok(())
}

// --- Rep progressions ---

#[test]
fn test_progression_catalog_is_total() {
    let catalog = workout_coach_lib::progression::catalog();
    assert_eq!(catalog.len(), 8);
    for (t, info) in &catalog {
        assert!(!info.display_name.is_empty());
        assert!(!info.description.is_empty());
        assert!(!info.icon.is_empty());
        assert_eq!(t.to_string().parse::<RepProgressionType>(), Ok(*t));
    }
    assert_eq!(RepProgressionType::DropSet.display_name(), "Drop Set");
    assert_eq!("reversePyramid".parse::<RepProgressionType>(), Ok(RepProgressionType::ReversePyramid));
    assert_eq!("Rest-Pause".parse::<RepProgressionType>(), Ok(RepProgressionType::RestPause));
    assert!("superset".parse::<RepProgressionType>().is_err());
}

#[test]
fn test_progression_picker() {
    let mut picker = ProgressionPicker::new(RepProgressionType::Straight);
    assert_eq!(picker.visible_options(), vec![RepProgressionType::Straight]);
    picker.toggle_expanded();
    assert!(picker.is_expanded());
    assert_eq!(picker.visible_options().len(), 8);

    let change = picker.select(RepProgressionType::Amrap);
    assert_eq!(change.previous, RepProgressionType::Straight);
    assert_eq!(change.selected, RepProgressionType::Amrap);
    assert!(change.is_change());

    let same = ProgressionPicker::new(RepProgressionType::Wave).select(RepProgressionType::Wave);
    assert!(!same.is_change());
}

#[test]
fn test_service_picker_uses_default_progression() {
    let mut service = create_test_service("picker");
    service.config.default_progression = RepProgressionType::Pyramid;
    assert_eq!(service.progression_picker(None).current(), RepProgressionType::Pyramid);
    assert_eq!(
        service.progression_picker(Some(RepProgressionType::Cluster)).current(),
        RepProgressionType::Cluster
    );
}

// --- Quit flow ---

#[test]
fn test_quit_reason_codes() {
    for code in [
        "too_tired",
        "out_of_time",
        "not_feeling_well",
        "equipment_unavailable",
        "injury",
        "other",
        "quick_exit",
    ] {
        let reason = QuitReason::try_from(code).expect("known code");
        assert_eq!(reason.code(), code);
    }
    assert!(QuitReason::try_from("bored").is_err());
}

#[test]
fn test_quit_dialog_variants() {
    let picker = QuitDialogVariant::ReasonPicker;
    assert!(!picker.reasons().contains(&QuitReason::QuickExit));
    let result = picker.finish(QuitReason::Injury, Some("  tweaked shoulder "));
    assert_eq!(result.reason, QuitReason::Injury);
    assert_eq!(result.note.as_deref(), Some("tweaked shoulder"));
    assert_eq!(picker.finish(QuitReason::Other, Some("   ")).note, None);

    let quick = QuitDialogVariant::QuickExit;
    let result = quick.finish(QuitReason::TooTired, Some("ignored"));
    assert_eq!(result.reason, QuitReason::QuickExit);
    assert_eq!(result.note, None);
}

// --- Rest period ---

#[test]
fn test_rest_countdown() {
    let service = create_test_service("rest");
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
    let ctx = RestContext {
        exercise_id: 3,
        set_index: 1,
    };
    let mut rest = service.start_rest(ctx, None, start);
    assert_eq!(rest.planned_seconds, 90);
    assert_eq!(rest.format_remaining(start), "1:30");
    assert_eq!(rest.remaining_seconds(start + Duration::seconds(85)), 5);

    rest.extend(30);
    assert_eq!(rest.format_remaining(start + Duration::seconds(85)), "0:35");
    assert!(rest.is_complete(start + Duration::seconds(200)));
    // Clock skew before the start never adds time
    assert_eq!(rest.remaining_seconds(start - Duration::seconds(10)), 120);
}

// --- Submission guard ---

#[test]
fn test_submission_guard_blocks_duplicates() {
    let mut guard = SubmissionGuard::new("Share");
    assert!(guard.begin().is_ok());
    assert_eq!(
        guard.begin(),
        Err(SubmissionError::AlreadyInFlight("Share".to_string()))
    );

    let (value, notice) = guard.finish::<u32, String>(Ok(7));
    assert_eq!(value, Some(7));
    assert!(!notice.is_failure());
    assert!(!guard.is_in_flight());

    guard.begin().expect("guard is free again");
    let (value, notice) = guard.finish::<u32, &str>(Err("network unreachable"));
    assert_eq!(value, None);
    assert_eq!(
        notice,
        Notice::Failure("Share failed: network unreachable".to_string())
    );

    guard.begin().expect("guard is free after failure");
    guard.abandon();
    assert!(!guard.is_in_flight());
}

// --- Config ---

#[test]
fn test_config_operations() -> Result<()> {
    let mut service = create_test_service("config");
    service.set_units(Units::Imperial)?;
    service.set_default_rest_seconds(120)?;
    service.set_default_progression(RepProgressionType::DropSet)?;
    service.set_header_color("darkcyan")?;

    let reloaded = workout_coach_lib::load_config_util(service.get_config_path())?;
    assert_eq!(reloaded.units, Units::Imperial);
    assert_eq!(reloaded.default_rest_seconds, 120);
    assert_eq!(reloaded.default_progression, RepProgressionType::DropSet);
    assert_eq!(reloaded.theme.header_color, "DarkCyan");

    assert!(matches!(
        service.set_default_rest_seconds(0),
        Err(ConfigError::InvalidRestSeconds)
    ));
    assert!(matches!(
        service.set_low_confidence_threshold(1.5),
        Err(ConfigError::InvalidConfidenceThreshold(_))
    ));
    assert!(matches!(
        service.set_header_color("chartreuse"),
        Err(ConfigError::InvalidColor(_))
    ));

    if let Some(dir) = service.config_path.parent() {
        std::fs::remove_dir_all(dir)?;
    }
    Ok(())
}

#[test]
fn test_missing_config_fields_use_defaults() -> Result<()> {
    let config: Config = toml::from_str("units = \"imperial\"\n")?;
    assert_eq!(config.units, Units::Imperial);
    assert_eq!(config.default_rest_seconds, 90);
    assert_eq!(config.low_confidence_threshold, 0.7);
    assert_eq!(config.theme.header(), StandardColor::Green);
    assert_eq!(parse_color("DARKRED")?, StandardColor::DarkRed);
    Ok(())
}

#[test]
fn test_service_weight_display() {
    let mut service = create_test_service("display");
    assert_eq!(service.format_weight(60.0), "60.0 kg");
    service.config.units = Units::Imperial;
    assert_close(service.display_weight(60.0), 60.0 * units::KG_TO_LBS);
    assert_close(service.canonical_weight(service.display_weight(60.0)), 60.0);
}

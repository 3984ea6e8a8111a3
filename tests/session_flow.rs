//! Full-session flows across drill modes
//!
//! Exercises timing, scoring, mode switching, and the serialized
//! shapes the shell consumes.

use fretboard_trainer_wasm::models::fretboard::{positions_of, Position};
use fretboard_trainer_wasm::models::game_state::{GameState, EXERCISE_TIME};
use fretboard_trainer_wasm::quiz::QuizInput;
use fretboard_trainer_wasm::session::tests_support::RecordingShell;
use fretboard_trainer_wasm::utils::random::ScriptedRandom;
use fretboard_trainer_wasm::SessionController;

/// Click any position sounding the current target note
fn answer_current_note(controller: &mut SessionController, shell: &mut RecordingShell) {
    let target = controller.state().current_note.unwrap();
    let position = positions_of(controller.tuning(), controller.state().fret_range, target)
        .first()
        .copied()
        .unwrap();
    controller.handle_fret_click(position.string, position.fret, shell);
}

#[test]
fn timed_find_note_session_accumulates_score() {
    let mut controller =
        SessionController::with_random(Box::new(ScriptedRandom::new(&[0, 1, 2, 3])));
    let mut shell = RecordingShell::default();
    controller.start(&mut shell);

    for _ in 0..3 {
        answer_current_note(&mut controller, &mut shell);
    }
    assert_eq!(controller.state().score, 3);
    assert_eq!(controller.state().attempts, 3);
    assert_eq!(shell.corrects, 3);

    // Run the clock out
    for _ in 0..EXERCISE_TIME {
        controller.tick(&mut shell);
    }
    assert!(!controller.state().is_playing);

    let summary = &shell.summaries[0];
    assert_eq!(summary.score, 3);
    assert_eq!(summary.attempts, 3);
    assert_eq!(summary.accuracy_percent, 100);
    assert_eq!(summary.duration_secs, EXERCISE_TIME);

    // Input after the session ends is inert
    answer_current_note(&mut controller, &mut shell);
    assert_eq!(controller.state().score, 3);
}

#[test]
fn name_note_session_with_flat_spelling() {
    let mut controller =
        SessionController::with_random(Box::new(ScriptedRandom::new(&[2, 6])));
    let mut shell = RecordingShell::default();
    controller.set_drill_mode("name_note", &mut shell).unwrap();
    controller.set_note_naming("flats").unwrap();
    controller.start(&mut shell);

    // Position draw 2 = high E string, fret 2 = F# / G♭
    assert_eq!(controller.state().current_position, Some(Position::new(0, 2)));
    assert_eq!(controller.state().current_note_name(), Some("G♭"));
    assert_eq!(shell.prompts.last().unwrap(), "What note is highlighted?");

    // A sharp-spelled answer still matches
    controller.handle_note_button("F#".parse().unwrap(), &mut shell);
    assert_eq!(controller.state().score, 1);
}

#[test]
fn mode_switch_mid_session_invalidates_deferred_work() {
    let mut controller =
        SessionController::with_random(Box::new(ScriptedRandom::new(&[0, 0, 0])));
    let mut shell = RecordingShell::default();
    controller
        .set_drill_mode("find_all_instances", &mut shell)
        .unwrap();
    controller.set_use_random_range(false);
    controller.start(&mut shell);

    for pos in controller.state().current_positions.clone() {
        controller.handle_fret_click(pos.string, pos.fret, &mut shell);
    }
    controller.submit(&mut shell);
    let (_, task_id) = *shell.scheduled.last().unwrap();

    // Switching modes swaps the quiz and drops the continuation
    controller.set_drill_mode("find_note", &mut shell).unwrap();
    assert!(shell.prompts.last().unwrap().starts_with("Find: "));
    let target = controller.state().current_note;

    controller.fire_scheduled(task_id, &mut shell);
    assert_eq!(controller.state().current_note, target);

    // The new mode judges clicks immediately
    answer_current_note(&mut controller, &mut shell);
    assert_eq!(controller.state().score, 2);
}

#[test]
fn note_names_follow_spelling_preference() {
    let mut controller = SessionController::with_random(Box::new(ScriptedRandom::new(&[])));
    controller.set_note_naming("flats").unwrap();
    assert_eq!(controller.note_name_at(0, 1).unwrap(), "F");
    assert_eq!(controller.note_name_at(0, 2).unwrap(), "G♭");

    controller.set_note_naming("sharps").unwrap();
    assert_eq!(controller.note_name_at(0, 2).unwrap(), "F#");
    assert!(controller.note_name_at(40, 0).is_err());
}

#[test]
fn serialized_shapes_for_the_shell() {
    let state = GameState::default();
    let state_json = serde_json::to_value(&state).unwrap();
    assert_eq!(state_json["drill_mode"], "find_note");
    assert_eq!(state_json["spelling"], "sharps");
    assert_eq!(state_json["is_playing"], false);

    let input = QuizInput::Fret {
        position: Position::new(1, 5),
        note: "E".parse().unwrap(),
    };
    let input_json = serde_json::to_value(input).unwrap();
    assert_eq!(input_json["kind"], "fret");
    assert_eq!(input_json["position"]["string"], 1);
    assert_eq!(input_json["note"], "E");

    let submit_json = serde_json::to_value(QuizInput::Submit).unwrap();
    assert_eq!(submit_json["kind"], "submit");
}

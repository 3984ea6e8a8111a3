//! Find-all-instances protocol tests
//!
//! Drives the two-phase select/submit protocol end to end through the
//! session controller, with scripted randomness and a recording shell.

use fretboard_trainer_wasm::models::fretboard::{positions_of, Position};
use fretboard_trainer_wasm::session::tests_support::RecordingShell;
use fretboard_trainer_wasm::utils::random::ScriptedRandom;
use fretboard_trainer_wasm::SessionController;

fn find_all_controller(script: &[usize]) -> (SessionController, RecordingShell) {
    let mut controller = SessionController::with_random(Box::new(ScriptedRandom::new(script)));
    let mut shell = RecordingShell::default();
    controller
        .set_drill_mode("find_all_instances", &mut shell)
        .unwrap();
    controller.set_use_random_range(false);
    (controller, shell)
}

fn answer_key(controller: &SessionController) -> Vec<Position> {
    controller.state().current_positions.clone()
}

#[test]
fn perfect_submission_advances_after_short_delay() {
    let (mut controller, mut shell) = find_all_controller(&[0, 5]);
    controller.start(&mut shell);

    let key = answer_key(&controller);
    assert!(!key.is_empty());
    assert!(shell.prompts.last().unwrap().starts_with("Select ALL C notes"));

    // Select every answer-key position
    for pos in &key {
        controller.handle_fret_click(pos.string, pos.fret, &mut shell);
        assert!(controller.is_position_selected(pos.string, pos.fret));
    }
    assert!(controller.submit_button().unwrap().enabled);

    controller.submit(&mut shell);

    assert_eq!(shell.corrects, 1);
    assert_eq!(controller.state().score, 1);
    let report = shell.last_report.as_ref().unwrap();
    assert!(report.correct);
    assert_eq!(report.accuracy, 1.0);

    // Evaluation freezes the selections
    controller.handle_fret_click(key[0].string, key[0].fret, &mut shell);
    assert!(controller.is_position_selected(key[0].string, key[0].fret));
    assert!(!controller.submit_button().unwrap().enabled);

    // The success continuation was armed with the short delay
    let (delay, task_id) = *shell.scheduled.last().unwrap();
    assert_eq!(delay, 300);

    controller.fire_scheduled(task_id, &mut shell);

    // A fresh question: new target, selections gone
    assert!(controller.state().current_note.is_some());
    assert!(!controller.is_position_selected(key[0].string, key[0].fret));
    assert!(!controller.submit_button().unwrap().enabled);
}

#[test]
fn imperfect_submission_allows_retry_with_selections_intact() {
    let (mut controller, mut shell) = find_all_controller(&[0]);
    controller.start(&mut shell);

    let key = answer_key(&controller);
    assert!(key.len() >= 2);

    controller.handle_fret_click(key[0].string, key[0].fret, &mut shell);
    controller.submit(&mut shell);

    assert_eq!(shell.incorrects, 1);
    assert_eq!(controller.state().score, 0);
    assert_eq!(controller.state().attempts, 1);

    let report = shell.last_report.clone().unwrap();
    assert!(!report.correct);
    assert!((report.accuracy - 1.0 / key.len() as f64).abs() < 1e-9);
    assert_eq!(report.missed.len(), key.len() - 1);
    assert!(report.incorrect.is_empty());

    // Mid-evaluation edits are ignored
    controller.handle_fret_click(key[1].string, key[1].fret, &mut shell);
    assert!(!controller.is_position_selected(key[1].string, key[1].fret));

    // The retry continuation uses the longer delay
    let (delay, task_id) = *shell.scheduled.last().unwrap();
    assert_eq!(delay, 2000);
    controller.fire_scheduled(task_id, &mut shell);

    // Selections survived the failed submit and are editable again
    assert!(controller.is_position_selected(key[0].string, key[0].fret));
    for pos in &key[1..] {
        controller.handle_fret_click(pos.string, pos.fret, &mut shell);
    }
    controller.submit(&mut shell);

    assert_eq!(shell.corrects, 1);
    assert_eq!(controller.state().score, 1);
    assert_eq!(controller.state().attempts, 2);
}

#[test]
fn extra_selection_fails_even_with_full_key_covered() {
    let (mut controller, mut shell) = find_all_controller(&[0]);
    controller.start(&mut shell);

    let key = answer_key(&controller);
    let extra = fretboard_trainer_wasm::models::fretboard::all_positions(
        controller.tuning(),
        controller.state().fret_range,
    )
    .into_iter()
    .find(|pos| !key.contains(pos))
    .unwrap();

    for pos in key.iter().chain(std::iter::once(&extra)) {
        controller.handle_fret_click(pos.string, pos.fret, &mut shell);
    }
    controller.submit(&mut shell);

    let report = shell.last_report.as_ref().unwrap();
    assert!(!report.correct);
    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.incorrect, vec![extra]);
}

#[test]
fn double_toggle_clears_selection() {
    let (mut controller, mut shell) = find_all_controller(&[0]);
    controller.start(&mut shell);

    let pos = Position::new(2, 4);
    controller.handle_fret_click(pos.string, pos.fret, &mut shell);
    assert!(controller.is_position_selected(pos.string, pos.fret));
    controller.handle_fret_click(pos.string, pos.fret, &mut shell);
    assert!(!controller.is_position_selected(pos.string, pos.fret));
    assert!(!controller.submit_button().unwrap().enabled);
}

#[test]
fn reset_invalidates_pending_continuation() {
    let (mut controller, mut shell) = find_all_controller(&[0, 7]);
    controller.start(&mut shell);

    for pos in answer_key(&controller) {
        controller.handle_fret_click(pos.string, pos.fret, &mut shell);
    }
    controller.submit(&mut shell);
    let (_, task_id) = *shell.scheduled.last().unwrap();

    controller.reset(&mut shell);
    assert!(controller.state().current_note.is_none());

    // The stale continuation must not start a question in the fresh state
    controller.fire_scheduled(task_id, &mut shell);
    assert!(controller.state().current_note.is_none());
    assert_eq!(shell.corrects, 1);
}

#[test]
fn random_sub_range_narrows_the_question() {
    let mut controller =
        SessionController::with_random(Box::new(ScriptedRandom::new(&[2, 4, 0])));
    let mut shell = RecordingShell::default();
    controller
        .set_drill_mode("find_all_instances", &mut shell)
        .unwrap();
    controller.set_use_random_range(true);
    controller.start(&mut shell);

    // Scripted draws: size = 3 + 2 = 5, start = 0 + 4, note = C
    assert_eq!(
        shell.prompts.last().unwrap(),
        "Select ALL C notes between frets 4-8"
    );
    for pos in &controller.state().current_positions {
        assert!((4..=8).contains(&pos.fret));
    }

    // The key matches a full-board scan restricted to the sub-range
    let expected = positions_of(
        controller.tuning(),
        fretboard_trainer_wasm::models::fretboard::FretRange::new(4, 8),
        "C".parse().unwrap(),
    );
    assert_eq!(controller.state().current_positions, expected);
}

#[test]
fn narrow_user_range_is_used_unchanged() {
    let mut controller =
        SessionController::with_random(Box::new(ScriptedRandom::new(&[3])));
    let mut shell = RecordingShell::default();
    controller
        .set_drill_mode("find_all_instances", &mut shell)
        .unwrap();
    controller.set_use_random_range(true);
    controller.set_fret_range(4, 8); // 5 frets, too narrow to subdivide
    controller.start(&mut shell);

    // Only the note draw consumed a scripted value
    assert_eq!(
        shell.prompts.last().unwrap(),
        "Select ALL D# notes between frets 4-8"
    );
}

//! WASM API for the trainer engine
//!
//! The engine is a singleton: controller state lives behind a
//! `lazy_static` mutex, while the JS callback handles live in a
//! `thread_local` because `js_sys::Function` is not `Send`. The shell
//! registers its callbacks once via `initTrainer`, then drives the
//! engine with the one-second `tick`, input forwarding, and
//! `fireScheduled` for the deferred timeouts the core asks it to arm.
//!
//! Callback invocations are queued while the engine lock is held and
//! dispatched to JS only after it is released, so a shell callback may
//! synchronously call back into this API (the shell's re-render path
//! queries selection state) without deadlocking.

use crate::api::helpers::{config_error, serialize, serialize_lossy};
use crate::models::fretboard::{fret_marker, FretMarker, MAX_FRET};
use crate::models::tuning::TuningPreset;
use crate::quiz::{AnswerReport, Callbacks, QuizFactory, QuizInput};
use crate::session::{SessionController, SessionSummary};
use crate::{wasm_info, wasm_log};
use js_sys::Function;
use lazy_static::lazy_static;
use serde::Serialize;
use std::cell::RefCell;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

// WASM-owned engine state (canonical source of truth)
lazy_static! {
    static ref CONTROLLER: Mutex<Option<SessionController>> = Mutex::new(None);
}

thread_local! {
    // js_sys::Function is !Send, so callback handles stay thread-local
    static CALLBACKS: RefCell<Option<JsCallbacks>> = RefCell::new(None);
}

/// Shell callback handles registered at init
struct JsCallbacks {
    on_correct: Function,
    on_incorrect: Function,
    update_prompt: Function,
    update_ui: Function,
    schedule_deferred: Function,
    session_finished: Function,
}

impl JsCallbacks {
    fn invoke1(func: &Function, arg: &JsValue) {
        if let Err(e) = func.call1(&JsValue::NULL, arg) {
            crate::api::helpers::log_error(&format!("shell callback threw: {:?}", e));
        }
    }

    fn invoke2(func: &Function, a: &JsValue, b: &JsValue) {
        if let Err(e) = func.call2(&JsValue::NULL, a, b) {
            crate::api::helpers::log_error(&format!("shell callback threw: {:?}", e));
        }
    }

    fn dispatch(&self, event: ShellEvent) {
        match event {
            ShellEvent::Correct(input, report) => Self::invoke2(
                &self.on_correct,
                &serialize_lossy(&input),
                &serialize_lossy(&report),
            ),
            ShellEvent::Incorrect(input, report) => Self::invoke2(
                &self.on_incorrect,
                &serialize_lossy(&input),
                &serialize_lossy(&report),
            ),
            ShellEvent::Prompt(text) => {
                Self::invoke1(&self.update_prompt, &JsValue::from_str(&text))
            }
            ShellEvent::UpdateUi => Self::invoke1(&self.update_ui, &JsValue::UNDEFINED),
            ShellEvent::Schedule { delay_ms, task_id } => Self::invoke2(
                &self.schedule_deferred,
                &JsValue::from(delay_ms),
                &JsValue::from(task_id),
            ),
            ShellEvent::Finished(summary) => {
                Self::invoke1(&self.session_finished, &serialize_lossy(&summary))
            }
        }
    }
}

/// One queued shell notification
enum ShellEvent {
    Correct(QuizInput, AnswerReport),
    Incorrect(QuizInput, AnswerReport),
    Prompt(String),
    UpdateUi,
    Schedule { delay_ms: u32, task_id: u32 },
    Finished(SessionSummary),
}

/// Callback sink that queues events while the engine lock is held
#[derive(Default)]
struct EventQueue {
    events: Vec<ShellEvent>,
}

impl Callbacks for EventQueue {
    fn on_correct(&mut self, input: &QuizInput, report: &AnswerReport) {
        self.events.push(ShellEvent::Correct(*input, report.clone()));
    }

    fn on_incorrect(&mut self, input: &QuizInput, report: &AnswerReport) {
        self.events.push(ShellEvent::Incorrect(*input, report.clone()));
    }

    fn update_prompt(&mut self, text: &str) {
        self.events.push(ShellEvent::Prompt(text.to_string()));
    }

    fn update_ui(&mut self) {
        self.events.push(ShellEvent::UpdateUi);
    }

    fn schedule_deferred(&mut self, delay_ms: u32, task_id: u32) {
        self.events.push(ShellEvent::Schedule { delay_ms, task_id });
    }

    fn session_finished(&mut self, summary: &SessionSummary) {
        self.events.push(ShellEvent::Finished(summary.clone()));
    }
}

/// Run an engine operation, then flush queued callbacks to the shell
fn with_engine<R>(
    f: impl FnOnce(&mut SessionController, &mut dyn Callbacks) -> R,
) -> Result<R, JsValue> {
    let mut queue = EventQueue::default();
    let result = {
        let mut guard = CONTROLLER
            .lock()
            .map_err(|_| JsValue::from_str("engine lock poisoned"))?;
        let controller = guard
            .as_mut()
            .ok_or_else(|| JsValue::from_str("trainer not initialized; call initTrainer first"))?;
        f(controller, &mut queue)
        // guard drops here, before any shell callback runs
    };

    CALLBACKS.with(|callbacks| {
        let callbacks = callbacks.borrow();
        let callbacks = callbacks
            .as_ref()
            .ok_or_else(|| JsValue::from_str("trainer not initialized; call initTrainer first"))?;
        for event in queue.events {
            callbacks.dispatch(event);
        }
        Ok::<(), JsValue>(())
    })?;
    Ok(result)
}

/// Run a read-only query against the controller
fn with_controller<R>(f: impl FnOnce(&SessionController) -> R) -> Result<R, JsValue> {
    let guard = CONTROLLER
        .lock()
        .map_err(|_| JsValue::from_str("engine lock poisoned"))?;
    let controller = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("trainer not initialized; call initTrainer first"))?;
    Ok(f(controller))
}

/// Run a configuration mutation against the controller
fn with_controller_mut<R>(f: impl FnOnce(&mut SessionController) -> R) -> Result<R, JsValue> {
    let mut guard = CONTROLLER
        .lock()
        .map_err(|_| JsValue::from_str("engine lock poisoned"))?;
    let controller = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("trainer not initialized; call initTrainer first"))?;
    Ok(f(controller))
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Initialize the trainer engine and register the shell callbacks
#[wasm_bindgen(js_name = initTrainer)]
pub fn init_trainer(
    on_correct: Function,
    on_incorrect: Function,
    update_prompt: Function,
    update_ui: Function,
    schedule_deferred: Function,
    session_finished: Function,
) -> Result<(), JsValue> {
    wasm_info!("initTrainer called");

    let mut guard = CONTROLLER
        .lock()
        .map_err(|_| JsValue::from_str("engine lock poisoned"))?;
    *guard = Some(SessionController::new());
    drop(guard);

    CALLBACKS.with(|callbacks| {
        *callbacks.borrow_mut() = Some(JsCallbacks {
            on_correct,
            on_incorrect,
            update_prompt,
            update_ui,
            schedule_deferred,
            session_finished,
        });
    });
    Ok(())
}

/// Begin a timed session with the configured drill mode
#[wasm_bindgen(js_name = startExercise)]
pub fn start_exercise() -> Result<(), JsValue> {
    wasm_info!("startExercise called");
    with_engine(|controller, callbacks| controller.start(callbacks))
}

/// Abandon the session and restore defaults
#[wasm_bindgen(js_name = resetExercise)]
pub fn reset_exercise() -> Result<(), JsValue> {
    wasm_info!("resetExercise called");
    with_engine(|controller, callbacks| controller.reset(callbacks))
}

/// One-second clock tick; returns the remaining session time
#[wasm_bindgen(js_name = tick)]
pub fn tick() -> Result<u32, JsValue> {
    with_engine(|controller, callbacks| controller.tick(callbacks))
}

/// Fire a deferred task previously armed via the schedule callback
#[wasm_bindgen(js_name = fireScheduled)]
pub fn fire_scheduled(task_id: u32) -> Result<(), JsValue> {
    wasm_log!("fireScheduled: task {}", task_id);
    with_engine(|controller, callbacks| controller.fire_scheduled(task_id, callbacks))
}

// ============================================================================
// Input
// ============================================================================

/// Forward a fretboard click
#[wasm_bindgen(js_name = handleNoteClick)]
pub fn handle_note_click(string: usize, fret: u8) -> Result<(), JsValue> {
    with_engine(|controller, callbacks| controller.handle_fret_click(string, fret, callbacks))
}

/// Forward a note-button press (note name in either spelling)
#[wasm_bindgen(js_name = handleNoteButton)]
pub fn handle_note_button(note: &str) -> Result<(), JsValue> {
    let note = note.parse().map_err(config_error)?;
    with_engine(|controller, callbacks| controller.handle_note_button(note, callbacks))
}

/// Submit the current selections for evaluation
#[wasm_bindgen(js_name = submitAnswer)]
pub fn submit_answer() -> Result<(), JsValue> {
    with_engine(|controller, callbacks| controller.submit(callbacks))
}

// ============================================================================
// Configuration
// ============================================================================

/// Select the drill mode; swaps the active quiz immediately
#[wasm_bindgen(js_name = setDrillMode)]
pub fn set_drill_mode(mode_id: &str) -> Result<(), JsValue> {
    wasm_log!("setDrillMode: {}", mode_id);
    with_engine(|controller, callbacks| controller.set_drill_mode(mode_id, callbacks))?
        .map_err(config_error)
}

/// Set the fret range; returns the normalized range actually stored
#[wasm_bindgen(js_name = setFretRange)]
pub fn set_fret_range(start: u8, end: u8) -> Result<JsValue, JsValue> {
    let range = with_controller_mut(|controller| controller.set_fret_range(start, end))?;
    serialize(&range, "fret range serialization error")
}

/// Select a tuning preset by identifier
#[wasm_bindgen(js_name = setTuningPreset)]
pub fn set_tuning_preset(preset_id: &str) -> Result<(), JsValue> {
    wasm_log!("setTuningPreset: {}", preset_id);
    with_controller_mut(|controller| controller.set_tuning_preset(preset_id))?
        .map_err(config_error)
}

/// Select sharp or flat note naming
#[wasm_bindgen(js_name = setNoteNaming)]
pub fn set_note_naming(spelling: &str) -> Result<(), JsValue> {
    with_controller_mut(|controller| controller.set_note_naming(spelling))?.map_err(config_error)
}

/// Toggle random sub-ranging for find-all-instances questions
#[wasm_bindgen(js_name = setRandomRange)]
pub fn set_random_range(enabled: bool) -> Result<(), JsValue> {
    with_controller_mut(|controller| controller.set_use_random_range(enabled))
}

// ============================================================================
// Shell-support queries
// ============================================================================

/// The complete game state, for re-rendering
#[wasm_bindgen(js_name = getGameState)]
pub fn get_game_state() -> Result<JsValue, JsValue> {
    let state = with_controller(|controller| controller.state().clone())?;
    serialize(&state, "game state serialization error")
}

/// Whether a position is selected (find-all-instances mode)
#[wasm_bindgen(js_name = isPositionSelected)]
pub fn is_position_selected(string: usize, fret: u8) -> Result<bool, JsValue> {
    with_controller(|controller| controller.is_position_selected(string, fret))
}

/// Submit-button state, or null outside find-all-instances mode
#[wasm_bindgen(js_name = getSubmitButton)]
pub fn get_submit_button() -> Result<JsValue, JsValue> {
    match with_controller(|controller| controller.submit_button())? {
        Some(button) => serialize(&button, "submit button serialization error"),
        None => Ok(JsValue::NULL),
    }
}

/// Rendered note name at a position, in the active tuning and spelling
///
/// The shell uses this to label fretboard cells when building the board.
#[wasm_bindgen(js_name = noteAtPosition)]
pub fn note_at_position(string: usize, fret: u8) -> Result<String, JsValue> {
    with_controller(|controller| controller.note_name_at(string, fret))?
        .map(str::to_string)
        .map_err(config_error)
}

/// The 12 note names in the active spelling, for the note buttons
#[wasm_bindgen(js_name = getNoteNames)]
pub fn get_note_names() -> Result<JsValue, JsValue> {
    let names = with_controller(|controller| controller.state().spelling.names().to_vec())?;
    serialize(&names, "note name serialization error")
}

#[derive(Serialize)]
struct PresetInfo {
    value: &'static str,
    label: &'static str,
    strings: usize,
}

/// The selectable drill modes, as (value, label) pairs
#[wasm_bindgen(js_name = getSupportedModes)]
pub fn get_supported_modes() -> Result<JsValue, JsValue> {
    serialize(
        &QuizFactory::supported_modes(),
        "mode list serialization error",
    )
}

/// The selectable tuning presets
#[wasm_bindgen(js_name = getTuningPresets)]
pub fn get_tuning_presets() -> Result<JsValue, JsValue> {
    let presets: Vec<PresetInfo> = TuningPreset::all()
        .iter()
        .map(|preset| PresetInfo {
            value: preset.as_str(),
            label: preset.label(),
            strings: preset.tuning().string_count(),
        })
        .collect();
    serialize(&presets, "preset list serialization error")
}

#[derive(Serialize)]
struct MarkerInfo {
    fret: u8,
    marker: FretMarker,
}

/// Fret inlay markers, for drawing the board decorations
#[wasm_bindgen(js_name = getFretMarkers)]
pub fn get_fret_markers() -> Result<JsValue, JsValue> {
    let markers: Vec<MarkerInfo> = (0..=MAX_FRET)
        .filter_map(|fret| fret_marker(fret).map(|marker| MarkerInfo { fret, marker }))
        .collect();
    serialize(&markers, "marker list serialization error")
}

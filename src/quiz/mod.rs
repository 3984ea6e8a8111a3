//! Quiz modes for the Fretboard Trainer
//!
//! This module implements the drill-mode protocol: a closed set of quiz
//! variants behind one dispatch enum, the callback contract the
//! presentation shell implements, and the factory that maps mode
//! identifiers to quiz instances.
//!
//! Quiz methods never own shared state; they receive a `QuizContext`
//! granting exclusive, temporary access to the game state, the tuning,
//! the random source, and the shell callbacks for the duration of one
//! call.

pub mod find_all;
pub mod find_note;
pub mod name_note;

pub use find_all::FindAllInstancesQuiz;
pub use find_note::FindNoteQuiz;
pub use name_note::NameNoteQuiz;

use crate::errors::TrainerError;
use crate::models::fretboard::Position;
use crate::models::game_state::{DrillMode, GameState};
use crate::models::pitch::PitchClass;
use crate::models::tuning::Tuning;
use crate::session::SessionSummary;
use crate::utils::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One user action, as forwarded by the shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuizInput {
    /// Click on a fretboard position
    Fret { position: Position, note: PitchClass },
    /// Press of a note button
    Note { note: PitchClass },
    /// Explicit answer submission
    Submit,
}

impl QuizInput {
    /// The note identity carried by this input, if any
    pub fn note(&self) -> Option<PitchClass> {
        match self {
            QuizInput::Fret { note, .. } => Some(*note),
            QuizInput::Note { note } => Some(*note),
            QuizInput::Submit => None,
        }
    }
}

/// Outcome of judging one answer
///
/// `missed` and `incorrect` are only populated by the find-all-instances
/// mode; the single-answer modes resolve with accuracy 1.0 or 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerReport {
    pub correct: bool,
    pub accuracy: f64,
    /// Positions the user had selected when the answer was judged
    pub positions: Vec<Position>,
    /// Answer-key positions the user failed to select
    pub missed: Vec<Position>,
    /// Selected positions that are not in the answer key
    pub incorrect: Vec<Position>,
}

impl AnswerReport {
    /// Report for a single-answer resolution
    pub fn resolved(correct: bool) -> Self {
        AnswerReport {
            correct,
            accuracy: if correct { 1.0 } else { 0.0 },
            positions: Vec::new(),
            missed: Vec::new(),
            incorrect: Vec::new(),
        }
    }
}

/// Submit-button state exposed for the shell (find-all-instances mode)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitButton {
    pub text: &'static str,
    pub visible: bool,
    pub enabled: bool,
}

/// Core-to-shell callback contract
///
/// Implemented by the presentation layer adapter. Scoring side effects
/// live in the core; these callbacks drive feedback, prompts, and
/// re-rendering only, plus arming the deferred timeouts the core asks
/// for.
pub trait Callbacks {
    /// A correct resolution was judged
    fn on_correct(&mut self, input: &QuizInput, report: &AnswerReport);

    /// An incorrect resolution was judged
    fn on_incorrect(&mut self, input: &QuizInput, report: &AnswerReport);

    /// Push the current human-readable instruction
    fn update_prompt(&mut self, text: &str);

    /// Re-render highlight/selection state from the game state
    fn update_ui(&mut self);

    /// Arm a timeout that calls `fire_scheduled(task_id)` after `delay_ms`
    fn schedule_deferred(&mut self, delay_ms: u32, task_id: u32);

    /// The session clock reached zero
    fn session_finished(&mut self, summary: &SessionSummary);
}

/// Deferred continuations a quiz can request after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Advance to the next question (short success delay)
    NextQuestion,
    /// Re-open the current question for editing (longer retry delay)
    ClearSubmitted,
}

impl DeferredTask {
    pub fn delay_ms(&self) -> u32 {
        match self {
            DeferredTask::NextQuestion => 300,
            DeferredTask::ClearSubmitted => 2000,
        }
    }
}

/// Generation-stamped deferred-task registry
///
/// Replaces the fire-and-forget timeouts of a naive implementation:
/// every pending task carries the generation it was scheduled under, and
/// `invalidate` (called on reset, mode switch, and session end) makes
/// every outstanding task a no-op when it eventually fires.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u32,
    generation: u32,
    pending: HashMap<u32, (u32, DeferredTask)>,
}

impl Scheduler {
    /// Register a task under the current generation, returning its id
    pub fn enqueue(&mut self, task: DeferredTask) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.insert(id, (self.generation, task));
        id
    }

    /// Remove and return the task, unless it is unknown or stale
    pub fn take(&mut self, id: u32) -> Option<DeferredTask> {
        let (generation, task) = self.pending.remove(&id)?;
        if generation == self.generation {
            Some(task)
        } else {
            None
        }
    }

    /// Drop all pending tasks and invalidate any still in flight
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Exclusive, temporary access to shared state for one quiz call
pub struct QuizContext<'a> {
    pub state: &'a mut GameState,
    pub tuning: &'a Tuning,
    pub rng: &'a mut dyn RandomSource,
    pub callbacks: &'a mut dyn Callbacks,
    pub scheduler: &'a mut Scheduler,
}

impl QuizContext<'_> {
    /// Uniform draw from the 12 pitch classes
    pub fn random_note(&mut self) -> PitchClass {
        PitchClass::new(self.rng.pick(12) as u8)
    }

    /// Record a correct resolution and notify the shell
    pub fn report_correct(&mut self, input: &QuizInput, report: &AnswerReport) {
        self.state.score += 1;
        self.state.attempts += 1;
        self.callbacks.on_correct(input, report);
    }

    /// Record an incorrect resolution and notify the shell
    pub fn report_incorrect(&mut self, input: &QuizInput, report: &AnswerReport) {
        self.state.attempts += 1;
        self.callbacks.on_incorrect(input, report);
    }

    pub fn update_prompt(&mut self, text: &str) {
        self.callbacks.update_prompt(text);
    }

    pub fn update_ui(&mut self) {
        self.callbacks.update_ui();
    }

    /// Register a deferred task and ask the shell to arm its timeout
    pub fn schedule(&mut self, task: DeferredTask) {
        let id = self.scheduler.enqueue(task);
        self.callbacks.schedule_deferred(task.delay_ms(), id);
    }
}

/// The active quiz variant
///
/// The mode set is fixed, so variants are a closed enum dispatched by
/// match rather than an open trait hierarchy.
#[derive(Debug)]
pub enum Quiz {
    FindNote(FindNoteQuiz),
    NameNote(NameNoteQuiz),
    FindAllInstances(FindAllInstancesQuiz),
}

impl Quiz {
    /// The drill mode this quiz implements
    pub fn mode(&self) -> DrillMode {
        match self {
            Quiz::FindNote(_) => DrillMode::FindNote,
            Quiz::NameNote(_) => DrillMode::NameNote,
            Quiz::FindAllInstances(_) => DrillMode::FindAllInstances,
        }
    }

    /// Select a new target and announce the question
    pub fn start_question(&mut self, ctx: &mut QuizContext) {
        match self {
            Quiz::FindNote(quiz) => quiz.start_question(ctx),
            Quiz::NameNote(quiz) => quiz.start_question(ctx),
            Quiz::FindAllInstances(quiz) => quiz.start_question(ctx),
        }
    }

    /// Judge one user action
    pub fn handle_input(&mut self, ctx: &mut QuizContext, input: &QuizInput) {
        match self {
            Quiz::FindNote(quiz) => quiz.handle_input(ctx, input),
            Quiz::NameNote(quiz) => quiz.handle_input(ctx, input),
            Quiz::FindAllInstances(quiz) => quiz.handle_input(ctx, input),
        }
    }

    /// Clear mode-local and shared question state
    pub fn reset(&mut self, state: &mut GameState) {
        match self {
            Quiz::FindNote(quiz) => quiz.reset(state),
            Quiz::NameNote(quiz) => quiz.reset(state),
            Quiz::FindAllInstances(quiz) => quiz.reset(state),
        }
    }

    /// Execute a deferred continuation that survived generation checking
    pub fn fire_deferred(&mut self, ctx: &mut QuizContext, task: DeferredTask) {
        if let Quiz::FindAllInstances(quiz) = self {
            quiz.fire_deferred(ctx, task);
        }
    }

    /// Selection membership for UI highlighting
    pub fn is_selected(&self, position: Position) -> bool {
        match self {
            Quiz::FindAllInstances(quiz) => quiz.is_selected(position),
            _ => false,
        }
    }

    /// Submit-button state, for modes that have one
    pub fn submit_button(&self) -> Option<SubmitButton> {
        match self {
            Quiz::FindAllInstances(quiz) => Some(quiz.submit_button()),
            _ => None,
        }
    }
}

/// Drill-mode entry for the shell's mode selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeInfo {
    pub value: &'static str,
    pub label: &'static str,
}

/// Creates the appropriate quiz for a drill-mode identifier
pub struct QuizFactory;

impl QuizFactory {
    /// Construction dispatch over the closed mode-identifier set
    ///
    /// Fails with `TrainerError::UnknownDrillMode` for any unrecognized
    /// identifier; there is no silent default.
    pub fn create(mode_id: &str) -> Result<Quiz, TrainerError> {
        Ok(Self::for_mode(mode_id.parse()?))
    }

    /// Construct the quiz for an already-validated mode
    pub fn for_mode(mode: DrillMode) -> Quiz {
        match mode {
            DrillMode::FindNote => Quiz::FindNote(FindNoteQuiz::default()),
            DrillMode::NameNote => Quiz::NameNote(NameNoteQuiz::default()),
            DrillMode::FindAllInstances => {
                Quiz::FindAllInstances(FindAllInstancesQuiz::default())
            }
        }
    }

    /// The selectable modes, in menu order
    pub fn supported_modes() -> Vec<ModeInfo> {
        [
            DrillMode::FindNote,
            DrillMode::NameNote,
            DrillMode::FindAllInstances,
        ]
        .iter()
        .map(|mode| ModeInfo {
            value: mode.as_str(),
            label: mode.label(),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creates_each_mode() {
        for info in QuizFactory::supported_modes() {
            let quiz = QuizFactory::create(info.value).unwrap();
            assert_eq!(quiz.mode().as_str(), info.value);
        }
    }

    #[test]
    fn test_factory_rejects_unknown_mode() {
        assert_eq!(
            QuizFactory::create("bogus").unwrap_err(),
            TrainerError::UnknownDrillMode("bogus".to_string())
        );
    }

    #[test]
    fn test_supported_modes_listing() {
        let modes = QuizFactory::supported_modes();
        assert_eq!(modes.len(), 3);
        assert_eq!(modes[0].value, "find_note");
        assert_eq!(modes[0].label, "Find Note");
    }

    #[test]
    fn test_scheduler_generation_guard() {
        let mut scheduler = Scheduler::default();
        let id = scheduler.enqueue(DeferredTask::NextQuestion);
        scheduler.invalidate();
        assert_eq!(scheduler.take(id), None);

        let id = scheduler.enqueue(DeferredTask::ClearSubmitted);
        assert_eq!(scheduler.take(id), Some(DeferredTask::ClearSubmitted));
        // A task can only be taken once
        assert_eq!(scheduler.take(id), None);
    }

    #[test]
    fn test_input_note_extraction() {
        let fret = QuizInput::Fret {
            position: Position::new(0, 1),
            note: PitchClass::new(5),
        };
        assert_eq!(fret.note(), Some(PitchClass::new(5)));
        assert_eq!(QuizInput::Submit.note(), None);
    }
}

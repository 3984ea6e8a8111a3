//! Session control
//!
//! The SessionController owns the game state, the active quiz, the
//! random source, and the deferred-task scheduler. The shell drives it
//! with a one-second tick and forwards user input; the controller
//! routes input to the active quiz, applies scoring, and swaps quiz
//! instances when the drill mode changes.

use crate::errors::TrainerError;
use crate::models::fretboard::{note_at, FretRange, Position};
use crate::models::game_state::{DrillMode, GameState, EXERCISE_TIME};
use crate::models::pitch::PitchClass;
use crate::models::tuning::{Tuning, TuningPreset};
use crate::quiz::{Callbacks, Quiz, QuizContext, QuizFactory, QuizInput, SubmitButton};
use crate::utils::random::{EntropyRandom, RandomSource};
use serde::Serialize;

/// End-of-session result pushed to the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub score: u32,
    pub attempts: u32,
    /// Rounded percentage, 0 when nothing was attempted
    pub accuracy_percent: u32,
    pub duration_secs: u32,
}

/// Drives timing, scoring, and mode switching for one trainer instance
pub struct SessionController {
    state: GameState,
    tuning_preset: TuningPreset,
    quiz: Option<Quiz>,
    rng: Box<dyn RandomSource>,
    scheduler: crate::quiz::Scheduler,
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_random(Box::new(EntropyRandom::new()))
    }

    /// Controller with an injected random source (deterministic tests)
    pub fn with_random(rng: Box<dyn RandomSource>) -> Self {
        SessionController {
            state: GameState::default(),
            tuning_preset: TuningPreset::Standard6,
            quiz: None,
            rng,
            scheduler: crate::quiz::Scheduler::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &'static Tuning {
        self.tuning_preset.tuning()
    }

    pub fn tuning_preset(&self) -> TuningPreset {
        self.tuning_preset
    }

    /// Run one quiz call with exclusive access to the shared state
    fn with_quiz(
        &mut self,
        callbacks: &mut dyn Callbacks,
        f: impl FnOnce(&mut Quiz, &mut QuizContext),
    ) {
        let tuning = self.tuning_preset.tuning();
        let SessionController {
            state,
            quiz,
            rng,
            scheduler,
            ..
        } = self;
        if let Some(quiz) = quiz.as_mut() {
            let mut ctx = QuizContext {
                state,
                tuning,
                rng: rng.as_mut(),
                callbacks,
                scheduler,
            };
            f(quiz, &mut ctx);
        }
    }

    /// Begin a timed session with the configured drill mode
    pub fn start(&mut self, callbacks: &mut dyn Callbacks) {
        self.scheduler.invalidate();
        self.state.reset_session();
        self.state.is_playing = true;
        self.quiz = Some(QuizFactory::for_mode(self.state.drill_mode));

        log::info!(
            "session started: mode={}, frets {}-{}",
            self.state.drill_mode.as_str(),
            self.state.fret_range.start,
            self.state.fret_range.end
        );

        self.with_quiz(callbacks, |quiz, ctx| quiz.start_question(ctx));
    }

    /// One-second clock tick; returns the remaining time
    pub fn tick(&mut self, callbacks: &mut dyn Callbacks) -> u32 {
        if !self.state.is_playing {
            return self.state.time_left;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            self.finish(callbacks);
        }
        self.state.time_left
    }

    fn finish(&mut self, callbacks: &mut dyn Callbacks) {
        self.state.is_playing = false;
        self.scheduler.invalidate();

        let summary = self.summary();
        log::info!(
            "session finished: {}/{} ({}%)",
            summary.score,
            summary.attempts,
            summary.accuracy_percent
        );

        callbacks.update_prompt("Exercise Complete!");
        callbacks.session_finished(&summary);
        callbacks.update_ui();
    }

    /// Result of the session so far
    pub fn summary(&self) -> SessionSummary {
        let accuracy_percent = if self.state.attempts > 0 {
            ((self.state.score as f64 / self.state.attempts as f64) * 100.0).round() as u32
        } else {
            0
        };
        SessionSummary {
            score: self.state.score,
            attempts: self.state.attempts,
            accuracy_percent,
            duration_secs: EXERCISE_TIME - self.state.time_left,
        }
    }

    /// Abandon the session and restore defaults, keeping configuration
    pub fn reset(&mut self, callbacks: &mut dyn Callbacks) {
        self.scheduler.invalidate();
        self.state.reset_session();
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.reset(&mut self.state);
        }

        callbacks.update_prompt("Click \"Start Exercise\" to begin!");
        callbacks.update_ui();
    }

    /// Fretboard click entry point
    ///
    /// Clicks while idle, outside the configured fret range, or off the
    /// string list are silently ignored; they are not answer attempts.
    pub fn handle_fret_click(&mut self, string: usize, fret: u8, callbacks: &mut dyn Callbacks) {
        if !self.state.is_playing {
            return;
        }
        if !self.state.fret_range.contains(fret) {
            return;
        }
        let Ok(note) = note_at(self.tuning(), string, fret) else {
            return;
        };

        let input = QuizInput::Fret {
            position: Position::new(string, fret),
            note,
        };
        self.with_quiz(callbacks, |quiz, ctx| quiz.handle_input(ctx, &input));
    }

    /// Note-button entry point
    pub fn handle_note_button(&mut self, note: PitchClass, callbacks: &mut dyn Callbacks) {
        if !self.state.is_playing {
            return;
        }
        let input = QuizInput::Note { note };
        self.with_quiz(callbacks, |quiz, ctx| quiz.handle_input(ctx, &input));
    }

    /// Explicit answer submission
    pub fn submit(&mut self, callbacks: &mut dyn Callbacks) {
        if !self.state.is_playing {
            return;
        }
        self.with_quiz(callbacks, |quiz, ctx| quiz.handle_input(ctx, &QuizInput::Submit));
    }

    /// Execute a deferred task armed via `Callbacks::schedule_deferred`
    ///
    /// Stale tasks (scheduled before a reset, mode switch, or session
    /// end) are dropped without touching state.
    pub fn fire_scheduled(&mut self, task_id: u32, callbacks: &mut dyn Callbacks) {
        let Some(task) = self.scheduler.take(task_id) else {
            return;
        };
        self.with_quiz(callbacks, |quiz, ctx| quiz.fire_deferred(ctx, task));
    }

    /// Switch drill modes, swapping the active quiz immediately
    pub fn set_drill_mode(
        &mut self,
        mode_id: &str,
        callbacks: &mut dyn Callbacks,
    ) -> Result<(), TrainerError> {
        let mode: DrillMode = mode_id.parse()?;
        if mode == self.state.drill_mode {
            return Ok(());
        }

        log::debug!("drill mode: {} -> {}", self.state.drill_mode.as_str(), mode.as_str());
        self.state.drill_mode = mode;
        self.scheduler.invalidate();
        self.state.clear_question();

        if self.state.is_playing {
            self.quiz = Some(QuizFactory::for_mode(mode));
            self.with_quiz(callbacks, |quiz, ctx| quiz.start_question(ctx));
        } else {
            self.quiz = None;
        }
        Ok(())
    }

    /// Store a fret range, normalizing inverted bounds; returns the
    /// range actually stored
    pub fn set_fret_range(&mut self, start: u8, end: u8) -> FretRange {
        self.state.fret_range = FretRange::new(start, end).normalized();
        self.state.fret_range
    }

    pub fn set_tuning_preset(&mut self, preset_id: &str) -> Result<(), TrainerError> {
        self.tuning_preset = preset_id.parse()?;
        Ok(())
    }

    pub fn set_note_naming(&mut self, spelling: &str) -> Result<(), TrainerError> {
        self.state.spelling = spelling.parse()?;
        Ok(())
    }

    pub fn set_use_random_range(&mut self, enabled: bool) {
        self.state.use_random_range = enabled;
    }

    /// Selection membership of a position (find-all-instances mode)
    pub fn is_position_selected(&self, string: usize, fret: u8) -> bool {
        self.quiz
            .as_ref()
            .map(|quiz| quiz.is_selected(Position::new(string, fret)))
            .unwrap_or(false)
    }

    /// Submit-button state for the active quiz, if it has one
    pub fn submit_button(&self) -> Option<SubmitButton> {
        self.quiz.as_ref().and_then(|quiz| quiz.submit_button())
    }

    /// Note name at a position in the active tuning and spelling
    pub fn note_name_at(&self, string: usize, fret: u8) -> Result<&'static str, TrainerError> {
        note_at(self.tuning(), string, fret).map(|note| note.name(self.state.spelling))
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

pub mod tests_support {
    //! Recording callback implementation shared by unit and
    //! integration tests

    use super::SessionSummary;
    use crate::quiz::{AnswerReport, Callbacks, QuizInput};

    /// Shell stand-in that records every callback invocation
    #[derive(Debug, Default)]
    pub struct RecordingShell {
        pub corrects: usize,
        pub incorrects: usize,
        pub prompts: Vec<String>,
        pub ui_refreshes: usize,
        /// (delay_ms, task_id) pairs the core asked to arm
        pub scheduled: Vec<(u32, u32)>,
        pub summaries: Vec<SessionSummary>,
        pub last_report: Option<AnswerReport>,
        pub last_input: Option<QuizInput>,
    }

    impl Callbacks for RecordingShell {
        fn on_correct(&mut self, input: &QuizInput, report: &AnswerReport) {
            self.corrects += 1;
            self.last_input = Some(*input);
            self.last_report = Some(report.clone());
        }

        fn on_incorrect(&mut self, input: &QuizInput, report: &AnswerReport) {
            self.incorrects += 1;
            self.last_input = Some(*input);
            self.last_report = Some(report.clone());
        }

        fn update_prompt(&mut self, text: &str) {
            self.prompts.push(text.to_string());
        }

        fn update_ui(&mut self) {
            self.ui_refreshes += 1;
        }

        fn schedule_deferred(&mut self, delay_ms: u32, task_id: u32) {
            self.scheduled.push((delay_ms, task_id));
        }

        fn session_finished(&mut self, summary: &SessionSummary) {
            self.summaries.push(summary.clone());
        }
    }
}

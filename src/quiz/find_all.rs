//! Find All Instances quiz
//!
//! The user must select every position sounding the target note inside
//! the question's fret range, then submit. Evaluation is exact set
//! equality; partial credit is reported as accuracy but never passes.
//! Each question may narrow the search to a random sub-range so the
//! board stays visually scannable even when the configured range is
//! wide.

use crate::models::fretboard::{positions_of, FretRange, Position};
use crate::models::game_state::GameState;
use crate::quiz::{AnswerReport, DeferredTask, QuizContext, QuizInput, SubmitButton};
use crate::utils::random::RandomSource;
use std::collections::BTreeSet;

/// Sub-ranges shorter than this are used as-is
const MIN_SPLITTABLE_FRETS: u8 = 5;
/// Bounds for the random sub-range length
const MIN_RANGE_SIZE: u8 = 3;
const MAX_RANGE_SIZE: u8 = 8;

#[derive(Debug, Default)]
pub struct FindAllInstancesQuiz {
    /// Positions toggled for the current question
    selected: BTreeSet<Position>,

    /// Set while a submission is being evaluated; edits are ignored
    submitted: bool,

    /// Fret range of the current question
    question_range: FretRange,
}

impl FindAllInstancesQuiz {
    /// Random sub-range for one question
    ///
    /// A user range of five frets or fewer is returned unchanged.
    /// Otherwise the sub-range length is uniform in
    /// [3, min(8, total)] and its start is uniform among the positions
    /// that keep it inside the user range.
    pub fn generate_random_fret_range(
        user_range: FretRange,
        rng: &mut dyn RandomSource,
    ) -> FretRange {
        let total_frets = user_range.len();
        if total_frets <= MIN_SPLITTABLE_FRETS {
            return user_range;
        }

        let max_size = MAX_RANGE_SIZE.min(total_frets);
        let size = MIN_RANGE_SIZE + rng.pick((max_size - MIN_RANGE_SIZE + 1) as usize) as u8;

        let max_start = user_range.end - size + 1;
        let start =
            user_range.start + rng.pick((max_start - user_range.start + 1) as usize) as u8;

        FretRange::new(start, start + size - 1)
    }

    pub fn start_question(&mut self, ctx: &mut QuizContext) {
        self.question_range = if ctx.state.use_random_range {
            Self::generate_random_fret_range(ctx.state.fret_range, ctx.rng)
        } else {
            ctx.state.fret_range
        };

        let note = ctx.random_note();
        ctx.state.current_note = Some(note);
        ctx.state.current_positions = positions_of(ctx.tuning, self.question_range, note);
        ctx.state.current_position = None;

        self.selected.clear();
        self.submitted = false;

        let prompt = format!(
            "Select ALL {} notes between frets {}-{}",
            note.name(ctx.state.spelling),
            self.question_range.start,
            self.question_range.end
        );
        ctx.update_prompt(&prompt);
        ctx.update_ui();
    }

    pub fn handle_input(&mut self, ctx: &mut QuizContext, input: &QuizInput) {
        // Don't allow changes after submission
        if self.submitted {
            return;
        }

        match input {
            QuizInput::Submit => self.submit_answer(ctx),
            QuizInput::Fret { position, .. } => {
                // Toggle selection
                if !self.selected.remove(position) {
                    self.selected.insert(*position);
                }
                ctx.update_ui();
            }
            QuizInput::Note { .. } => {}
        }
    }

    fn submit_answer(&mut self, ctx: &mut QuizContext) {
        self.submitted = true;
        let report = self.check_answer(&ctx.state.current_positions);

        if report.correct {
            ctx.report_correct(&QuizInput::Submit, &report);
            // Start a new question after a short delay
            ctx.schedule(DeferredTask::NextQuestion);
        } else {
            ctx.report_incorrect(&QuizInput::Submit, &report);
            // Allow retry with the selections intact
            ctx.schedule(DeferredTask::ClearSubmitted);
        }
    }

    /// Judge the current selections against the answer key
    ///
    /// An empty answer key counts as trivially perfect.
    pub fn check_answer(&self, answer_key: &[Position]) -> AnswerReport {
        let key: BTreeSet<Position> = answer_key.iter().copied().collect();

        let correctly_selected = self.selected.intersection(&key).count();
        let missed: Vec<Position> = key.difference(&self.selected).copied().collect();
        let incorrect: Vec<Position> = self.selected.difference(&key).copied().collect();

        let accuracy = if key.is_empty() {
            1.0
        } else {
            correctly_selected as f64 / key.len() as f64
        };

        AnswerReport {
            correct: missed.is_empty() && incorrect.is_empty(),
            accuracy,
            positions: self.selected.iter().copied().collect(),
            missed,
            incorrect,
        }
    }

    pub fn fire_deferred(&mut self, ctx: &mut QuizContext, task: DeferredTask) {
        match task {
            DeferredTask::NextQuestion => self.start_question(ctx),
            DeferredTask::ClearSubmitted => {
                self.submitted = false;
                ctx.update_ui();
            }
        }
    }

    /// Membership query for UI highlighting
    pub fn is_selected(&self, position: Position) -> bool {
        self.selected.contains(&position)
    }

    pub fn submit_button(&self) -> SubmitButton {
        SubmitButton {
            text: "Submit Answer",
            visible: true,
            enabled: !self.selected.is_empty() && !self.submitted,
        }
    }

    /// The fret range of the active question
    pub fn question_range(&self) -> FretRange {
        self.question_range
    }

    pub fn reset(&mut self, state: &mut GameState) {
        state.clear_question();
        self.selected.clear();
        self.submitted = false;
    }
}

//! Name Note quiz
//!
//! One position is highlighted; the user identifies its note. The
//! judged identity is the pitch class, so an answer in the opposite
//! spelling still counts.

use crate::models::fretboard::{note_at, random_position};
use crate::models::game_state::GameState;
use crate::quiz::{AnswerReport, QuizContext, QuizInput};

#[derive(Debug, Default)]
pub struct NameNoteQuiz;

impl NameNoteQuiz {
    pub fn start_question(&mut self, ctx: &mut QuizContext) {
        let position = random_position(ctx.tuning, ctx.state.fret_range, ctx.rng);
        let Ok(note) = note_at(ctx.tuning, position.string, position.fret) else {
            return;
        };

        ctx.state.current_position = Some(position);
        ctx.state.current_note = Some(note);
        ctx.state.current_positions.clear();

        // Highlight the position
        ctx.update_ui();
        ctx.update_prompt("What note is highlighted?");
    }

    pub fn handle_input(&mut self, ctx: &mut QuizContext, input: &QuizInput) {
        let Some(note) = input.note() else {
            return;
        };

        if Some(note) == ctx.state.current_note {
            ctx.report_correct(input, &AnswerReport::resolved(true));
            // Move to next question
            self.start_question(ctx);
        } else {
            ctx.report_incorrect(input, &AnswerReport::resolved(false));
        }
    }

    pub fn reset(&mut self, state: &mut GameState) {
        state.clear_question();
    }
}

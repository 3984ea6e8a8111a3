//! Find Note quiz
//!
//! The prompt names a note; the user clicks any one position sounding
//! that note. Every matching position inside the configured fret range
//! is acceptable, and the first correct click advances the question.

use crate::models::fretboard::positions_of;
use crate::models::game_state::GameState;
use crate::quiz::{AnswerReport, QuizContext, QuizInput};

#[derive(Debug, Default)]
pub struct FindNoteQuiz;

impl FindNoteQuiz {
    pub fn start_question(&mut self, ctx: &mut QuizContext) {
        let note = ctx.random_note();
        ctx.state.current_note = Some(note);
        ctx.state.current_positions = positions_of(ctx.tuning, ctx.state.fret_range, note);
        ctx.state.current_position = None;

        let prompt = format!("Find: {}", note.name(ctx.state.spelling));
        ctx.update_prompt(&prompt);
    }

    pub fn handle_input(&mut self, ctx: &mut QuizContext, input: &QuizInput) {
        let QuizInput::Fret { note, .. } = input else {
            return;
        };

        if Some(*note) == ctx.state.current_note {
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

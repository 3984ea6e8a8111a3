//! Shared trainer state
//!
//! This module contains the GameState struct which represents the complete
//! state of a training session: the clock, the score, and the active
//! question's target note and positions.
//!
//! This is the WASM-owned source of truth, owned by the session controller
//! and mutated per-question by the active quiz mode.

use crate::models::fretboard::{FretRange, Position};
use crate::models::pitch::{NoteSpelling, PitchClass};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::TrainerError;

/// Session length in seconds
pub const EXERCISE_TIME: u32 = 60;

/// The active drill-mode identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrillMode {
    #[default]
    FindNote,
    NameNote,
    FindAllInstances,
}

impl DrillMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrillMode::FindNote => "find_note",
            DrillMode::NameNote => "name_note",
            DrillMode::FindAllInstances => "find_all_instances",
        }
    }

    /// Human-readable label for the mode selector
    pub fn label(&self) -> &'static str {
        match self {
            DrillMode::FindNote => "Find Note",
            DrillMode::NameNote => "Name Note",
            DrillMode::FindAllInstances => "Find All Instances",
        }
    }
}

impl FromStr for DrillMode {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "find_note" => Ok(DrillMode::FindNote),
            "name_note" => Ok(DrillMode::NameNote),
            "find_all_instances" => Ok(DrillMode::FindAllInstances),
            _ => Err(TrainerError::UnknownDrillMode(s.to_string())),
        }
    }
}

/// Complete trainer state (WASM-owned source of truth)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Whether a timed session is running
    pub is_playing: bool,

    /// Seconds remaining in the session
    pub time_left: u32,

    /// Correct answers this session
    pub score: u32,

    /// Total judged answers this session
    pub attempts: u32,

    /// Target note of the active question
    pub current_note: Option<PitchClass>,

    /// Correct-answer positions of the active question
    pub current_positions: Vec<Position>,

    /// Highlighted position (name-note mode only)
    pub current_position: Option<Position>,

    /// Active drill mode
    pub drill_mode: DrillMode,

    /// User-configured fret range
    pub fret_range: FretRange,

    /// Note-spelling preference
    pub spelling: NoteSpelling,

    /// Whether find-all-instances questions use a random sub-range
    pub use_random_range: bool,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            is_playing: false,
            time_left: EXERCISE_TIME,
            score: 0,
            attempts: 0,
            current_note: None,
            current_positions: Vec::new(),
            current_position: None,
            drill_mode: DrillMode::default(),
            fret_range: FretRange::default(),
            spelling: NoteSpelling::default(),
            use_random_range: true,
        }
    }
}

impl GameState {
    /// Clear per-question state
    pub fn clear_question(&mut self) {
        self.current_note = None;
        self.current_positions.clear();
        self.current_position = None;
    }

    /// Restore session defaults, keeping configuration (mode, range,
    /// spelling, tuning preference) intact
    pub fn reset_session(&mut self) {
        self.is_playing = false;
        self.time_left = EXERCISE_TIME;
        self.score = 0;
        self.attempts = 0;
        self.clear_question();
    }

    /// Rendered name of the current target note, per the active spelling
    pub fn current_note_name(&self) -> Option<&'static str> {
        self.current_note.map(|n| n.name(self.spelling))
    }
}

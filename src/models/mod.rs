//! Models module for the Fretboard Trainer
//!
//! This module contains the data models for the trainer core:
//! pitch classes, tunings, fretboard geometry, and the shared
//! game state mutated by the active quiz mode.

pub mod fretboard;
pub mod game_state;
pub mod pitch;
pub mod tuning;

// Re-export commonly used types
pub use fretboard::*;
pub use game_state::*;
pub use pitch::*;
pub use tuning::*;

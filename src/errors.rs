//! Error types for the trainer core
//!
//! Only fatal configuration problems are modeled as errors: an identifier
//! outside one of the closed sets (drill mode, tuning preset, note spelling,
//! note name) or a string index that does not exist in the active tuning.
//! Degenerate fret ranges recover to a fallback position and out-of-range
//! clicks are ignored, so neither appears here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainerError {
    /// Unrecognized drill-mode identifier passed to the quiz factory
    #[error("unknown drill mode: '{0}'. Expected one of: find_note, name_note, find_all_instances")]
    UnknownDrillMode(String),

    /// Unrecognized tuning preset identifier
    #[error("unknown tuning preset: '{0}'. Expected one of: standard_6, drop_d, standard_7")]
    UnknownTuningPreset(String),

    /// Unrecognized note-spelling preference
    #[error("unknown note spelling: '{0}'. Expected 'sharps' or 'flats'")]
    UnknownNoteSpelling(String),

    /// A note name that is not one of the 12 pitch classes in either spelling
    #[error("unknown note name: '{0}'")]
    UnknownNote(String),

    /// String index outside the active tuning
    #[error("string index {index} out of bounds ({count} strings)")]
    StringOutOfBounds { index: usize, count: usize },
}

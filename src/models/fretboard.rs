//! Fretboard geometry and note arithmetic
//!
//! Pure functions over (tuning, string, fret): computing the pitch class
//! at a position, enumerating the positions inside a fret range, and
//! drawing a uniformly random position. Enumeration order is strings
//! outer / frets inner, so results are deterministic for a given range.

use crate::errors::TrainerError;
use crate::models::pitch::PitchClass;
use crate::models::tuning::Tuning;
use crate::utils::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Highest fret on the board (fret 0 is the open string)
pub const MAX_FRET: u8 = 24;

/// One playable position: string index (0 = highest-pitched string) and fret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub string: usize,
    pub fret: u8,
}

impl Position {
    pub fn new(string: usize, fret: u8) -> Self {
        Position { string, fret }
    }
}

/// Inclusive fret range constraining the eligible position space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretRange {
    pub start: u8,
    pub end: u8,
}

impl FretRange {
    pub fn new(start: u8, end: u8) -> Self {
        FretRange { start, end }
    }

    /// Swap inverted bounds and clamp to the board
    pub fn normalized(&self) -> FretRange {
        let (mut start, mut end) = (self.start, self.end);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        FretRange {
            start: start.min(MAX_FRET),
            end: end.min(MAX_FRET),
        }
    }

    /// Number of frets covered (inclusive); 0 for an inverted range
    pub fn len(&self) -> u8 {
        if self.start > self.end {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, fret: u8) -> bool {
        fret >= self.start && fret <= self.end
    }
}

impl Default for FretRange {
    fn default() -> Self {
        FretRange {
            start: 0,
            end: MAX_FRET,
        }
    }
}

/// Fret inlay decoration kinds (standard guitar markers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FretMarker {
    Dot,
    DoubleDot,
}

/// Inlay marker at a fret, if any
pub fn fret_marker(fret: u8) -> Option<FretMarker> {
    match fret {
        3 | 5 | 7 | 9 | 15 | 17 | 19 | 21 => Some(FretMarker::Dot),
        12 | 24 => Some(FretMarker::DoubleDot),
        _ => None,
    }
}

/// Pitch class sounding at a fret on a string
///
/// `(open semitone + fret) mod 12`; total for any fret, errors only when
/// the string index does not exist in the tuning.
pub fn note_at(tuning: &Tuning, string_index: usize, fret: u8) -> Result<PitchClass, TrainerError> {
    let open = tuning
        .open_note(string_index)
        .ok_or(TrainerError::StringOutOfBounds {
            index: string_index,
            count: tuning.string_count(),
        })?;
    Ok(open.transposed(fret % 12))
}

/// All positions in the range, strings outer / frets inner
pub fn all_positions(tuning: &Tuning, range: FretRange) -> Vec<Position> {
    let mut positions = Vec::new();
    for string_index in 0..tuning.string_count() {
        for fret in range.start..=range.end.min(MAX_FRET) {
            positions.push(Position::new(string_index, fret));
        }
    }
    positions
}

/// All positions in the range sounding the given pitch class
pub fn positions_of(tuning: &Tuning, range: FretRange, note: PitchClass) -> Vec<Position> {
    all_positions(tuning, range)
        .into_iter()
        .filter(|pos| {
            note_at(tuning, pos.string, pos.fret)
                .map(|n| n == note)
                .unwrap_or(false)
        })
        .collect()
}

/// Uniformly random position in the range
///
/// An empty position space (inverted or out-of-bounds range, reachable via
/// user misconfiguration) falls back to the open first string instead of
/// erroring.
pub fn random_position(tuning: &Tuning, range: FretRange, rng: &mut dyn RandomSource) -> Position {
    let positions = all_positions(tuning, range);
    if positions.is_empty() {
        return Position::new(0, 0);
    }
    positions[rng.pick(positions.len())]
}

//! Pitch-class representation and spelling
//!
//! A pitch class is one of the 12 equivalence classes of musical pitch
//! modulo octave. Identity is the semitone index 0-11; sharp vs flat
//! spelling is a display concern only and never participates in
//! answer checking.

use crate::errors::TrainerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sharp-form note names, indexed by semitone (0 = C)
pub const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat-form note names, indexed by semitone (0 = C)
pub const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "D♭", "D", "E♭", "E", "F", "G♭", "G", "A♭", "A", "B♭", "B",
];

/// Note-spelling preference for rendered names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteSpelling {
    #[default]
    Sharps,
    Flats,
}

impl NoteSpelling {
    /// The 12 note names in this spelling, indexed by semitone
    pub fn names(&self) -> &'static [&'static str; 12] {
        match self {
            NoteSpelling::Sharps => &NOTE_NAMES_SHARP,
            NoteSpelling::Flats => &NOTE_NAMES_FLAT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteSpelling::Sharps => "sharps",
            NoteSpelling::Flats => "flats",
        }
    }
}

impl FromStr for NoteSpelling {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sharps" => Ok(NoteSpelling::Sharps),
            "flats" => Ok(NoteSpelling::Flats),
            _ => Err(TrainerError::UnknownNoteSpelling(s.to_string())),
        }
    }
}

/// One of the 12 pitch classes, stored as a semitone index 0-11
///
/// Two pitch classes are equal iff their semitone indices are equal,
/// so `F#` and `G♭` compare equal regardless of spelling preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Create a pitch class from any semitone count (wrapped mod 12)
    pub fn new(semitone: u8) -> Self {
        PitchClass(semitone % 12)
    }

    /// The semitone index 0-11
    pub fn semitone(&self) -> u8 {
        self.0
    }

    /// The pitch class `interval` semitones above this one
    pub fn transposed(&self, interval: u8) -> PitchClass {
        PitchClass::new(self.0.wrapping_add(interval % 12))
    }

    /// Rendered name in the given spelling
    pub fn name(&self, spelling: NoteSpelling) -> &'static str {
        spelling.names()[self.0 as usize]
    }

    /// All 12 pitch classes in semitone order
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..12).map(PitchClass)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(NoteSpelling::Sharps))
    }
}

impl FromStr for PitchClass {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept either spelling, with 'b' or '♭' for flats
        let normalized = s.trim().replace('b', "♭");
        for (i, name) in NOTE_NAMES_SHARP.iter().enumerate() {
            if name.eq_ignore_ascii_case(s.trim()) {
                return Ok(PitchClass(i as u8));
            }
        }
        for (i, name) in NOTE_NAMES_FLAT.iter().enumerate() {
            if *name == normalized {
                return Ok(PitchClass(i as u8));
            }
        }
        Err(TrainerError::UnknownNote(s.to_string()))
    }
}

// Pitch classes cross the WASM boundary as their sharp-form name;
// deserialization accepts either spelling.
impl Serialize for PitchClass {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name(NoteSpelling::Sharps))
    }
}

impl<'de> Deserialize<'de> for PitchClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semitone_wraps_mod_12() {
        assert_eq!(PitchClass::new(12), PitchClass::new(0));
        assert_eq!(PitchClass::new(13).semitone(), 1);
    }

    #[test]
    fn test_transposed() {
        let e = "E".parse::<PitchClass>().unwrap();
        assert_eq!(e.transposed(1).name(NoteSpelling::Sharps), "F");
        assert_eq!(e.transposed(12), e);
    }

    #[test]
    fn test_spelling_changes_name_not_identity() {
        let fs = "F#".parse::<PitchClass>().unwrap();
        let gb = "G♭".parse::<PitchClass>().unwrap();
        assert_eq!(fs, gb);
        assert_eq!(fs.name(NoteSpelling::Sharps), "F#");
        assert_eq!(fs.name(NoteSpelling::Flats), "G♭");
    }

    #[test]
    fn test_parse_ascii_flat() {
        assert_eq!(
            "Eb".parse::<PitchClass>().unwrap(),
            "D#".parse::<PitchClass>().unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "H".parse::<PitchClass>(),
            Err(TrainerError::UnknownNote("H".to_string()))
        );
    }

    #[test]
    fn test_serde_roundtrip_sharp_name() {
        let note = PitchClass::new(10);
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, "\"A#\"");
        let back: PitchClass = serde_json::from_str("\"B♭\"").unwrap();
        assert_eq!(back, note);
    }
}

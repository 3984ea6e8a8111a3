//! Tunings and tuning presets
//!
//! A tuning is an ordered list of strings, index 0 being the
//! highest-pitched string. Presets cover the stock instruments the
//! trainer ships with; the shell selects one by identifier.

use crate::errors::TrainerError;
use crate::models::pitch::PitchClass;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One guitar string: display label, open pitch class, and octave
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringSpec {
    /// Label shown beside the string (e.g. "E")
    pub label: String,

    /// Pitch class of the open string
    pub open: PitchClass,

    /// Octave of the open string (scientific pitch notation)
    pub octave: i8,
}

impl StringSpec {
    fn new(name: &str, octave: i8) -> Self {
        let open = name.parse().expect("preset note name");
        StringSpec {
            label: name.to_string(),
            open,
            octave,
        }
    }
}

/// An ordered set of strings, index 0 = highest pitch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    pub strings: Vec<StringSpec>,
}

impl Tuning {
    /// Number of strings
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Open pitch class of a string, if the index is valid
    pub fn open_note(&self, string_index: usize) -> Option<PitchClass> {
        self.strings.get(string_index).map(|s| s.open)
    }
}

/// Enumerated tuning presets selectable from the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TuningPreset {
    #[serde(rename = "standard_6")]
    Standard6,
    #[serde(rename = "drop_d")]
    DropD,
    #[serde(rename = "standard_7")]
    Standard7,
}

static STANDARD_6: Lazy<Tuning> = Lazy::new(|| Tuning {
    strings: vec![
        StringSpec::new("E", 4),
        StringSpec::new("B", 3),
        StringSpec::new("G", 3),
        StringSpec::new("D", 3),
        StringSpec::new("A", 2),
        StringSpec::new("E", 2),
    ],
});

static DROP_D: Lazy<Tuning> = Lazy::new(|| Tuning {
    strings: vec![
        StringSpec::new("E", 4),
        StringSpec::new("B", 3),
        StringSpec::new("G", 3),
        StringSpec::new("D", 3),
        StringSpec::new("A", 2),
        StringSpec::new("D", 2),
    ],
});

static STANDARD_7: Lazy<Tuning> = Lazy::new(|| Tuning {
    strings: vec![
        StringSpec::new("E", 4),
        StringSpec::new("B", 3),
        StringSpec::new("G", 3),
        StringSpec::new("D", 3),
        StringSpec::new("A", 2),
        StringSpec::new("E", 2),
        StringSpec::new("B", 1),
    ],
});

impl TuningPreset {
    /// The preset's string set
    pub fn tuning(&self) -> &'static Tuning {
        match self {
            TuningPreset::Standard6 => &STANDARD_6,
            TuningPreset::DropD => &DROP_D,
            TuningPreset::Standard7 => &STANDARD_7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TuningPreset::Standard6 => "standard_6",
            TuningPreset::DropD => "drop_d",
            TuningPreset::Standard7 => "standard_7",
        }
    }

    /// Human-readable label for the preset selector
    pub fn label(&self) -> &'static str {
        match self {
            TuningPreset::Standard6 => "Standard (6-string)",
            TuningPreset::DropD => "Drop D",
            TuningPreset::Standard7 => "Standard (7-string)",
        }
    }

    /// All selectable presets
    pub fn all() -> &'static [TuningPreset] {
        &[
            TuningPreset::Standard6,
            TuningPreset::DropD,
            TuningPreset::Standard7,
        ]
    }
}

impl FromStr for TuningPreset {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard_6" => Ok(TuningPreset::Standard6),
            "drop_d" => Ok(TuningPreset::DropD),
            "standard_7" => Ok(TuningPreset::Standard7),
            _ => Err(TrainerError::UnknownTuningPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pitch::NoteSpelling;

    #[test]
    fn test_standard_6_open_strings() {
        let tuning = TuningPreset::Standard6.tuning();
        let names: Vec<&str> = tuning
            .strings
            .iter()
            .map(|s| s.open.name(NoteSpelling::Sharps))
            .collect();
        assert_eq!(names, ["E", "B", "G", "D", "A", "E"]);
        assert_eq!(tuning.strings[0].octave, 4);
        assert_eq!(tuning.strings[5].octave, 2);
    }

    #[test]
    fn test_drop_d_lowest_string() {
        let tuning = TuningPreset::DropD.tuning();
        assert_eq!(tuning.open_note(5), Some("D".parse().unwrap()));
    }

    #[test]
    fn test_standard_7_has_seven_strings() {
        assert_eq!(TuningPreset::Standard7.tuning().string_count(), 7);
    }

    #[test]
    fn test_preset_parse_roundtrip() {
        for preset in TuningPreset::all() {
            assert_eq!(preset.as_str().parse::<TuningPreset>().unwrap(), *preset);
        }
        assert!(matches!(
            "ukulele".parse::<TuningPreset>(),
            Err(TrainerError::UnknownTuningPreset(_))
        ));
    }

    #[test]
    fn test_open_note_out_of_bounds() {
        assert_eq!(TuningPreset::Standard6.tuning().open_note(6), None);
    }
}

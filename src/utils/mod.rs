//! Utility modules for the Fretboard Trainer

pub mod random;

pub use random::{EntropyRandom, RandomSource, ScriptedRandom};

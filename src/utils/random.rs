//! Random-draw abstraction
//!
//! Quiz logic draws notes, positions, and sub-ranges through the
//! `RandomSource` trait so it stays deterministic under test. The
//! production source is an entropy-seeded `StdRng`; on wasm32 the
//! entropy comes from the browser via `getrandom`'s js backend.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform random draws
///
/// `Send` is required because the engine singleton lives behind a `Mutex`.
pub trait RandomSource: Send {
    /// Uniform draw in `[0, upper)`; `upper` must be non-zero
    fn pick(&mut self, upper: usize) -> usize;
}

/// Entropy-seeded production source
pub struct EntropyRandom(StdRng);

impl EntropyRandom {
    pub fn new() -> Self {
        EntropyRandom(StdRng::from_entropy())
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn pick(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }
}

/// Scripted source replaying a fixed sequence, for deterministic tests
///
/// Each scripted value is reduced modulo `upper`; an exhausted script
/// keeps returning 0.
pub struct ScriptedRandom {
    values: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(values: &[usize]) -> Self {
        ScriptedRandom {
            values: values.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, upper: usize) -> usize {
        debug_assert!(upper > 0);
        match self.values.pop_front() {
            Some(v) => v % upper,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_random_stays_in_bounds() {
        let mut rng = EntropyRandom::new();
        for _ in 0..100 {
            assert!(rng.pick(12) < 12);
        }
    }

    #[test]
    fn test_scripted_random_replays_then_zeroes() {
        let mut rng = ScriptedRandom::new(&[3, 25]);
        assert_eq!(rng.pick(12), 3);
        assert_eq!(rng.pick(12), 1);
        assert_eq!(rng.pick(12), 0);
    }
}

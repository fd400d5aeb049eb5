//! Injectable randomness.
//!
//! Spins and fallback jitter draw from a `RandomSource` instead of a
//! global generator, so tests can replay exact values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform values in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Production source backed by `StdRng`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `Some(seed)` gives a reproducible generator, `None` an OS-seeded one.
    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::with_seed(s),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` so a script can never push a draw
/// outside the range a real generator produces.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Every draw returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

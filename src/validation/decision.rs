//! Injectable source of the simulation's random choices.
//!
//! # Design Decisions
//! - Every draw (scenario, failure kind, latency, search output) goes through
//!   [`DecisionSource`] so tests can pin each branch
//! - [`SeededDecisions`] is reproducible when given a seed
//! - [`ScriptedDecisions`] replays fixed answers in order

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random draws.
pub trait DecisionSource: Send {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform integer in `low..=high`.
    fn between(&mut self, low: u64, high: u64) -> u64;

    /// Uniform real in `low..=high`.
    fn between_f64(&mut self, low: f64, high: f64) -> f64;
}

/// Pseudo-random decisions backed by a standard RNG.
pub struct SeededDecisions {
    rng: StdRng,
}

impl SeededDecisions {
    /// Reproducible sequence for a given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }
}

impl DecisionSource for SeededDecisions {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn between(&mut self, low: u64, high: u64) -> u64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn between_f64(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays queued answers, then falls back to the low end of each range.
///
/// Answers are clamped into the requested range, so a script written for one
/// call shape never produces an out-of-range value.
#[derive(Debug, Default, Clone)]
pub struct ScriptedDecisions {
    picks: VecDeque<usize>,
    integers: VecDeque<u64>,
    reals: VecDeque<f64>,
}

impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers for [`DecisionSource::pick`].
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Queue answers for [`DecisionSource::between`].
    pub fn with_integers(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.integers.extend(values);
        self
    }

    /// Queue answers for [`DecisionSource::between_f64`].
    pub fn with_reals(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.reals.extend(values);
        self
    }
}

impl DecisionSource for ScriptedDecisions {
    fn pick(&mut self, len: usize) -> usize {
        let last = len.saturating_sub(1);
        self.picks.pop_front().unwrap_or(0).min(last)
    }

    fn between(&mut self, low: u64, high: u64) -> u64 {
        self.integers
            .pop_front()
            .unwrap_or(low)
            .clamp(low, high.max(low))
    }

    fn between_f64(&mut self, low: f64, high: f64) -> f64 {
        self.reals
            .pop_front()
            .unwrap_or(low)
            .clamp(low, high.max(low))
    }
}

//! Injectable randomness.
//!
//! Every random draw in the core goes through [`RandomSource`], so spawn
//! gating and bolt shapes can be replayed from a seed or scripted outright.

use rand::{Rng, RngCore};

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;

    /// Bernoulli trial: true with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted. Used to pin down
/// spawn decisions exactly. An empty script draws `0.0` every time.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        ScriptedRandom { values, cursor: 0 }
    }

    /// Always returns `value`.
    pub fn constant(value: f32) -> Self {
        ScriptedRandom::new(vec![value])
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        let v = match self.values.len() {
            0 => 0.0,
            n => self.values[self.cursor % n],
        };
        self.cursor += 1;
        v
    }
}

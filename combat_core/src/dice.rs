//! Dice sources
//!
//! Resolution never touches an RNG directly. It asks a [`RandomSource`] for
//! two kinds of game roll: a plain sum of N S-sided dice, and the open-ended
//! 4dF+ check roll every skill check uses.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Supplier of game rolls. Each call is exactly one game-roll event.
pub trait RandomSource {
    /// Sum of `count` dice with `sides` faces each
    fn roll_sum(&mut self, count: u32, sides: u32) -> i32;

    /// Open-ended 4dF+ check roll
    fn roll_open_ended(&mut self) -> i32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn roll_sum(&mut self, count: u32, sides: u32) -> i32 {
        (**self).roll_sum(count, sides)
    }

    fn roll_open_ended(&mut self) -> i32 {
        (**self).roll_open_ended()
    }
}

/// RNG-backed dice
#[derive(Debug, Clone)]
pub struct RngDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        RngDice { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    fn fudge(&mut self) -> i32 {
        self.rng.gen_range(-1..=1)
    }

    fn four_fudge(&mut self) -> [i32; 4] {
        [self.fudge(), self.fudge(), self.fudge(), self.fudge()]
    }

    /// Count of faces matching `face` on a fresh 4dF, continuing while all four match
    fn explosion(&mut self, face: i32) -> i32 {
        let mut total = 0;
        loop {
            let matched = self.four_fudge().iter().filter(|&&d| d == face).count() as i32;
            total += matched;
            if matched < 4 {
                return total;
            }
        }
    }
}

impl RngDice<ChaCha8Rng> {
    /// Reproducible dice for replays and tests
    pub fn seeded(seed: u64) -> Self {
        RngDice::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RngDice<rand::rngs::ThreadRng> {
    pub fn thread_local() -> Self {
        RngDice::new(rand::thread_rng())
    }
}

impl<R: Rng> RandomSource for RngDice<R> {
    fn roll_sum(&mut self, count: u32, sides: u32) -> i32 {
        if sides == 0 {
            tracing::warn!(count, "roll_sum called with zero-sided dice");
            return 0;
        }
        let total: i32 = (0..count)
            .map(|_| self.rng.gen_range(1..=sides) as i32)
            .sum();
        tracing::trace!(count, sides, total, "roll sum");
        total
    }

    fn roll_open_ended(&mut self) -> i32 {
        let base: i32 = self.four_fudge().iter().sum();
        let total = match base {
            4 => base + self.explosion(1),
            -4 => base - self.explosion(-1),
            _ => base,
        };
        tracing::trace!(base, total, "roll 4dF+");
        total
    }
}

/// Pre-scripted dice for tests and replays
///
/// Each roll kind has its own queue. When a queue runs dry the configured
/// default is returned (1 for sums, 0 for open-ended checks).
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    sums: VecDeque<i32>,
    open_ended: VecDeque<i32>,
    default_sum: i32,
    default_open_ended: i32,
    sum_calls: usize,
    open_ended_calls: usize,
}

impl Default for ScriptedDice {
    fn default() -> Self {
        ScriptedDice {
            sums: VecDeque::new(),
            open_ended: VecDeque::new(),
            default_sum: 1,
            default_open_ended: 0,
            sum_calls: 0,
            open_ended_calls: 0,
        }
    }
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue open-ended check results
    pub fn with_open_ended(mut self, rolls: impl IntoIterator<Item = i32>) -> Self {
        self.open_ended.extend(rolls);
        self
    }

    /// Queue dice-sum results
    pub fn with_sums(mut self, rolls: impl IntoIterator<Item = i32>) -> Self {
        self.sums.extend(rolls);
        self
    }

    pub fn with_default_sum(mut self, value: i32) -> Self {
        self.default_sum = value;
        self
    }

    pub fn with_default_open_ended(mut self, value: i32) -> Self {
        self.default_open_ended = value;
        self
    }

    pub fn push_open_ended(&mut self, roll: i32) {
        self.open_ended.push_back(roll);
    }

    pub fn push_sum(&mut self, roll: i32) {
        self.sums.push_back(roll);
    }

    pub fn sum_calls(&self) -> usize {
        self.sum_calls
    }

    pub fn open_ended_calls(&self) -> usize {
        self.open_ended_calls
    }

    /// Scripted rolls not yet consumed, as (sums, open-ended)
    pub fn remaining(&self) -> (usize, usize) {
        (self.sums.len(), self.open_ended.len())
    }
}

impl RandomSource for ScriptedDice {
    fn roll_sum(&mut self, _count: u32, _sides: u32) -> i32 {
        self.sum_calls += 1;
        self.sums.pop_front().unwrap_or(self.default_sum)
    }

    fn roll_open_ended(&mut self) -> i32 {
        self.open_ended_calls += 1;
        self.open_ended.pop_front().unwrap_or(self.default_open_ended)
    }
}

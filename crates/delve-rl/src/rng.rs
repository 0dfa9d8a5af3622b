//! Deterministic dice.
//!
//! [`Dice`] is a linear congruential generator with the glibc constants.
//! Every level layout is a pure function of the dice state, so the raw state
//! ([`RngState`]: the seed and the current value) is what gets saved, never
//! just the seed.

use std::time::{SystemTime, UNIX_EPOCH};

const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
const MODULUS: u64 = 1 << 31;

/// Persistable dice state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RngState {
    /// The seed the sequence started from.
    pub seed: u64,
    /// The last generated raw value (equal to `seed` before the first draw).
    pub value: u64,
}

/// Reproducible random source.
///
/// Every generator takes it as `&mut Dice`, so draws happen in one
/// well-defined order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dice {
    state: RngState,
}

impl Dice {
    pub fn new(seed: u64) -> Self {
        Self {
            state: RngState { seed, value: seed },
        }
    }

    /// Seed from the current Unix time in seconds.
    pub fn from_time() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        log::debug!("seeding dice from clock: {secs}");
        Self::new(secs)
    }

    /// Resume a sequence exactly where [`state`](Self::state) left it.
    pub fn from_state(state: RngState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> RngState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.state.seed
    }

    /// Advance the generator and return a value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        let v = self.state.value % MODULUS;
        self.state.value = (MULTIPLIER * v + INCREMENT) % MODULUS;
        self.state.value as f64 / MODULUS as f64
    }

    /// Integer in `[0, hi)`.
    pub fn range(&mut self, hi: i32) -> i32 {
        self.range_between(0, hi)
    }

    /// Integer in `[lo, hi)`.
    ///
    /// Always consumes one draw. The result is `lo + trunc(u * (hi - lo))`
    /// with truncation toward zero, so an inverted range yields values in
    /// `(hi, lo]`.
    pub fn range_between(&mut self, lo: i32, hi: i32) -> i32 {
        let span = f64::from(hi) - f64::from(lo);
        (self.next_unit() * span) as i32 + lo
    }

    /// Uniformly pick one element. Returns `None` for an empty slice
    /// without consuming a draw.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.range(items.len() as i32) as usize;
        items.get(i)
    }

    /// Pick one item with probability proportional to its weight.
    pub fn weighted_choice<'a, T>(&mut self, items: &'a [(f64, T)]) -> Option<&'a T> {
        let cumulative = cumulative_weights(items);
        self.pick_cumulative(items, &cumulative)
    }

    /// `k` independent weighted picks.
    pub fn weighted_choices<'a, T>(&mut self, items: &'a [(f64, T)], k: usize) -> Vec<&'a T> {
        let cumulative = cumulative_weights(items);
        (0..k)
            .filter_map(|_| self.pick_cumulative(items, &cumulative))
            .collect()
    }

    fn pick_cumulative<'a, T>(&mut self, items: &'a [(f64, T)], cumulative: &[f64]) -> Option<&'a T> {
        let total = *cumulative.last()?;
        let x = self.next_unit() * total;
        // First index whose running total exceeds the draw, clamped to the
        // last item.
        let hi = cumulative.len() - 1;
        let i = cumulative[..hi].partition_point(|&c| c <= x);
        items.get(i).map(|(_, item)| item)
    }
}

fn cumulative_weights<T>(items: &[(f64, T)]) -> Vec<f64> {
    items
        .iter()
        .scan(0.0, |acc, (w, _)| {
            *acc += w;
            Some(*acc)
        })
        .collect()
}

//! Seeded random source for deterministic battle resolution.
//!
//! Every random draw in the engine (damage variance, critical rolls, turn
//! tie-breaks, enemy intents, summon targets) comes from a [`SeededRng`].
//! Nothing in the core reads ambient or system randomness.
//!
//! # Sub-streams
//!
//! Independent concerns never share a stream. A stream is forked from the
//! root *seed* plus a label, not from the parent's current position, so
//! drawing from one stream never shifts another:
//!
//! ```
//! # use battle_core::env::{RandomSource, SeededRng};
//! let mut root = SeededRng::new(7);
//! let before = root.derive("damage").next_u32();
//! root.next_u32();
//! let after = root.derive("damage").next_u32();
//! assert_eq!(before, after);
//! ```

use sha2::{Digest, Sha256};

/// Errors raised by argument validation on random draws.
///
/// Validation happens before any draw, so a rejected call leaves the stream
/// position unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RngError {
    #[error("invalid integer range: max {max} is less than min {min}")]
    InvalidRange { min: i64, max: i64 },

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("cannot choose from an empty list")]
    EmptyChoice,

    #[error("weights length {weights} does not match items length {items}")]
    WeightCountMismatch { items: usize, weights: usize },

    #[error("weights must be finite, non-negative and sum to a positive value")]
    InvalidWeights,
}

impl crate::error::BattleError for RngError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "RNG_INVALID_RANGE",
            Self::InvalidProbability(_) => "RNG_INVALID_PROBABILITY",
            Self::EmptyChoice => "RNG_EMPTY_CHOICE",
            Self::WeightCountMismatch { .. } => "RNG_WEIGHT_COUNT_MISMATCH",
            Self::InvalidWeights => "RNG_INVALID_WEIGHTS",
        }
    }
}

/// Source of deterministic random values.
///
/// Implementors only provide [`RandomSource::next_u32`]; every other
/// operation is derived from it so all sources agree on how draws are
/// consumed.
pub trait RandomSource {
    /// Next raw 32-bit output. Advances the stream by one draw.
    fn next_u32(&mut self) -> u32;

    /// Next 64-bit output built from two draws.
    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    /// Uniform float in `[0, 1)` with 53 bits of precision.
    fn float(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.next_u64() >> 11) as f64 * SCALE
    }

    /// Uniform index in `0..n`. Returns 0 without drawing when `n <= 1`.
    fn below(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        ((self.next_u64() as u128 * n as u128) >> 64) as usize
    }

    /// Uniform integer in `[min, max]` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidRange`] if `max < min`.
    fn int(&mut self, min: i64, max: i64) -> Result<i64, RngError> {
        if max < min {
            return Err(RngError::InvalidRange { min, max });
        }
        let span = (max as i128 - min as i128 + 1) as u128;
        let draw = self.next_u64() as u128;
        let offset = if span > u64::MAX as u128 {
            draw
        } else {
            (draw * span) >> 64
        };
        Ok((min as i128 + offset as i128) as i64)
    }

    /// Returns true with probability `p`.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidProbability`] if `p` is not within `[0, 1]`
    /// (including NaN).
    fn bool(&mut self, p: f64) -> Result<bool, RngError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(RngError::InvalidProbability(p));
        }
        Ok(self.float() < p)
    }

    /// Returns true with probability `percent / 100`. Always consumes one draw.
    fn roll_percent(&mut self, percent: u8) -> bool {
        (self.below(100) as u8) < percent
    }
}

/// Picks one element uniformly.
///
/// # Errors
///
/// Returns [`RngError::EmptyChoice`] for an empty slice (without drawing).
pub fn choose<'a, T, R: RandomSource + ?Sized>(
    rng: &mut R,
    items: &'a [T],
) -> Result<&'a T, RngError> {
    if items.is_empty() {
        return Err(RngError::EmptyChoice);
    }
    Ok(&items[rng.below(items.len())])
}

/// Picks one element with probability proportional to its weight.
///
/// # Errors
///
/// Rejects empty input, mismatched lengths, and weights that are negative,
/// non-finite or sum to zero. Nothing is drawn on rejection.
pub fn choose_weighted<'a, T, R: RandomSource + ?Sized>(
    rng: &mut R,
    items: &'a [T],
    weights: &[f64],
) -> Result<&'a T, RngError> {
    if items.is_empty() {
        return Err(RngError::EmptyChoice);
    }
    if items.len() != weights.len() {
        return Err(RngError::WeightCountMismatch {
            items: items.len(),
            weights: weights.len(),
        });
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(RngError::InvalidWeights);
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(RngError::InvalidWeights);
    }

    let mut target = rng.float() * total;
    for (item, weight) in items.iter().zip(weights) {
        if target < *weight {
            return Ok(item);
        }
        target -= weight;
    }
    // Float accumulation can leave `target` a hair above the last weight.
    let last = weights.iter().rposition(|w| *w > 0.0).unwrap_or(items.len() - 1);
    Ok(&items[last])
}

/// Fisher-Yates shuffle driven by `rng`.
pub fn shuffle_in_place<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output)
/// bound to a root seed.
///
/// The root seed is kept alongside the moving state so that labelled
/// sub-streams can be derived at any point without depending on how many
/// draws the parent has made.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeededRng {
    seed: u64,
    state: u64,
    draws: u64,
}

impl SeededRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a stream from a root seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            state: mix_seed(seed),
            draws: 0,
        }
    }

    /// Restores a stream captured with [`SeededRng::seed`], [`SeededRng::state`]
    /// and [`SeededRng::draws`].
    pub fn from_parts(seed: u64, state: u64, draws: u64) -> Self {
        Self { seed, state, draws }
    }

    /// Root seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current internal state.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Number of 32-bit draws consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Forks an independent stream identified by `label`.
    pub fn derive(&self, label: &str) -> SeededRng {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(label.as_bytes());
        SeededRng::new(digest_to_seed(&hasher.finalize()))
    }

    /// Forks an independent stream identified by `(label, index)`, e.g.
    /// `("queue-round", round_number)`.
    pub fn derive_indexed(&self, label: &str, index: u64) -> SeededRng {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(index.to_le_bytes());
        hasher.update(label.as_bytes());
        SeededRng::new(digest_to_seed(&hasher.finalize()))
    }

    /// Advance the PCG state by one step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        self.draws += 1;
        Self::pcg_output(self.state)
    }
}

/// SplitMix64 finalizer so that nearby seeds start far apart in state space.
fn mix_seed(seed: u64) -> u64 {
    let mut hash = seed ^ 0x9e3779b97f4a7c15;
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;
    hash
}

fn digest_to_seed(digest: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

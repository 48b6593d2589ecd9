//! Whole-number percentages used by statuses, splash and rewards.

/// A percentage in `0..=100`.
///
/// Stored as an integer so that reductions like
/// `floor(floor(base × (1 − r)) × (1 − d))` are exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Percent(u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("percent {0} exceeds 100")]
pub struct PercentOutOfRange(pub u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const HALF: Percent = Percent(50);
    pub const FULL: Percent = Percent(100);

    pub const fn new(value: u8) -> Option<Self> {
        if value <= 100 { Some(Self(value)) } else { None }
    }

    /// Clamps `value` into range.
    pub const fn saturating(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `floor(value × p / 100)`
    pub const fn of(self, value: u32) -> u32 {
        (value as u64 * self.0 as u64 / 100) as u32
    }

    /// `floor(value × (1 − p / 100))`
    pub const fn reduce(self, value: u32) -> u32 {
        (value as u64 * (100 - self.0) as u64 / 100) as u32
    }
}

impl TryFrom<u8> for Percent {
    type Error = PercentOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Percent::new(value).ok_or(PercentOutOfRange(value))
    }
}

impl From<Percent> for u8 {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl core::fmt::Display for Percent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//! Status effect variants carried by units.

use bitflags::bitflags;

use super::{Element, Percent};
use crate::error::ValidationErrors;
use crate::stats::StatKind;

/// A status effect attached to a unit.
///
/// Every variant except [`StatusEffect::AutoRevive`] carries a `duration`
/// counted in rounds. Statuses are kept in insertion order; several entries of
/// the same kind may coexist, except `Immunity` which is unique per unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum StatusEffect {
    /// Multiplies `stat` by `1 + modifier/100`. `modifier >= 0`.
    Buff {
        stat: StatKind,
        modifier: i16,
        duration: u32,
    },
    /// Multiplies `stat` by `1 + modifier/100`. `modifier <= 0`.
    Debuff {
        stat: StatKind,
        modifier: i16,
        duration: u32,
    },
    Poison {
        damage_per_turn: u32,
        duration: u32,
    },
    Burn {
        damage_per_turn: u32,
        duration: u32,
    },
    /// Blocks the unit's action.
    Freeze { duration: u32 },
    /// Blocks the unit's action.
    Stun { duration: u32 },
    /// The unit's action fails with a configured chance.
    Paralyze { duration: u32 },
    HealOverTime {
        heal_per_turn: u32,
        duration: u32,
    },
    DamageReduction { percent: Percent, duration: u32 },
    ElementalResistance {
        element: Element,
        modifier: Percent,
        duration: u32,
    },
    /// Blocks one hit per charge.
    Shield {
        remaining_charges: u32,
        duration: u32,
    },
    Invulnerable { duration: u32 },
    /// Blocks application of other statuses. `all` blocks every kind,
    /// otherwise only the kinds in `types`.
    Immunity {
        all: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        types: StatusKinds,
        duration: u32,
    },
    /// Restores `hp_percent` of max HP when the unit would be knocked out.
    AutoRevive {
        hp_percent: Percent,
        uses_remaining: u32,
    },
}

/// Discriminant of a [`StatusEffect`], used for immunity and events.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum StatusKind {
    Buff,
    Debuff,
    Poison,
    Burn,
    Freeze,
    Stun,
    Paralyze,
    HealOverTime,
    DamageReduction,
    ElementalResistance,
    Shield,
    Invulnerable,
    Immunity,
    AutoRevive,
}

bitflags! {
    /// Set of status kinds, used as the block list of an immunity.
    ///
    /// Serialized as a list of kind names, e.g. `["poison", "burn"]`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(into = "Vec<StatusKind>", from = "Vec<StatusKind>")
    )]
    pub struct StatusKinds: u16 {
        const BUFF = 1 << 0;
        const DEBUFF = 1 << 1;
        const POISON = 1 << 2;
        const BURN = 1 << 3;
        const FREEZE = 1 << 4;
        const STUN = 1 << 5;
        const PARALYZE = 1 << 6;
        const HEAL_OVER_TIME = 1 << 7;
        const DAMAGE_REDUCTION = 1 << 8;
        const ELEMENTAL_RESISTANCE = 1 << 9;
        const SHIELD = 1 << 10;
        const INVULNERABLE = 1 << 11;
        const IMMUNITY = 1 << 12;
        const AUTO_REVIVE = 1 << 13;
    }
}

impl From<StatusKind> for StatusKinds {
    fn from(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Buff => Self::BUFF,
            StatusKind::Debuff => Self::DEBUFF,
            StatusKind::Poison => Self::POISON,
            StatusKind::Burn => Self::BURN,
            StatusKind::Freeze => Self::FREEZE,
            StatusKind::Stun => Self::STUN,
            StatusKind::Paralyze => Self::PARALYZE,
            StatusKind::HealOverTime => Self::HEAL_OVER_TIME,
            StatusKind::DamageReduction => Self::DAMAGE_REDUCTION,
            StatusKind::ElementalResistance => Self::ELEMENTAL_RESISTANCE,
            StatusKind::Shield => Self::SHIELD,
            StatusKind::Invulnerable => Self::INVULNERABLE,
            StatusKind::Immunity => Self::IMMUNITY,
            StatusKind::AutoRevive => Self::AUTO_REVIVE,
        }
    }
}

impl FromIterator<StatusKind> for StatusKinds {
    fn from_iter<I: IntoIterator<Item = StatusKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(StatusKinds::empty(), |acc, kind| acc | kind.into())
    }
}

impl From<Vec<StatusKind>> for StatusKinds {
    fn from(kinds: Vec<StatusKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<StatusKinds> for Vec<StatusKind> {
    fn from(kinds: StatusKinds) -> Self {
        use strum::IntoEnumIterator;
        StatusKind::iter()
            .filter(|kind| kinds.contains((*kind).into()))
            .collect()
    }
}

impl StatusKinds {
    pub fn contains_kind(&self, kind: StatusKind) -> bool {
        self.contains(kind.into())
    }
}

impl StatusEffect {
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::Buff { .. } => StatusKind::Buff,
            Self::Debuff { .. } => StatusKind::Debuff,
            Self::Poison { .. } => StatusKind::Poison,
            Self::Burn { .. } => StatusKind::Burn,
            Self::Freeze { .. } => StatusKind::Freeze,
            Self::Stun { .. } => StatusKind::Stun,
            Self::Paralyze { .. } => StatusKind::Paralyze,
            Self::HealOverTime { .. } => StatusKind::HealOverTime,
            Self::DamageReduction { .. } => StatusKind::DamageReduction,
            Self::ElementalResistance { .. } => StatusKind::ElementalResistance,
            Self::Shield { .. } => StatusKind::Shield,
            Self::Invulnerable { .. } => StatusKind::Invulnerable,
            Self::Immunity { .. } => StatusKind::Immunity,
            Self::AutoRevive { .. } => StatusKind::AutoRevive,
        }
    }

    /// Remaining rounds, or `None` for use-counted statuses.
    pub const fn duration(&self) -> Option<u32> {
        match self {
            Self::Buff { duration, .. }
            | Self::Debuff { duration, .. }
            | Self::Poison { duration, .. }
            | Self::Burn { duration, .. }
            | Self::Freeze { duration }
            | Self::Stun { duration }
            | Self::Paralyze { duration }
            | Self::HealOverTime { duration, .. }
            | Self::DamageReduction { duration, .. }
            | Self::ElementalResistance { duration, .. }
            | Self::Shield { duration, .. }
            | Self::Invulnerable { duration }
            | Self::Immunity { duration, .. } => Some(*duration),
            Self::AutoRevive { .. } => None,
        }
    }

    pub fn duration_mut(&mut self) -> Option<&mut u32> {
        match self {
            Self::Buff { duration, .. }
            | Self::Debuff { duration, .. }
            | Self::Poison { duration, .. }
            | Self::Burn { duration, .. }
            | Self::Freeze { duration }
            | Self::Stun { duration }
            | Self::Paralyze { duration }
            | Self::HealOverTime { duration, .. }
            | Self::DamageReduction { duration, .. }
            | Self::ElementalResistance { duration, .. }
            | Self::Shield { duration, .. }
            | Self::Invulnerable { duration }
            | Self::Immunity { duration, .. } => Some(duration),
            Self::AutoRevive { .. } => None,
        }
    }

    /// True for harmful statuses removed by cleansing abilities.
    pub const fn is_negative(&self) -> bool {
        matches!(
            self,
            Self::Poison { .. }
                | Self::Burn { .. }
                | Self::Freeze { .. }
                | Self::Stun { .. }
                | Self::Paralyze { .. }
                | Self::Debuff { .. }
        )
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match self {
            Self::Buff { modifier, .. } if *modifier < 0 => {
                errors.push("modifier", "buff modifier must be non-negative");
            }
            Self::Debuff { modifier, .. } if *modifier > 0 => {
                errors.push("modifier", "debuff modifier must be non-positive");
            }
            Self::Shield {
                remaining_charges: 0,
                ..
            } => errors.push("remainingCharges", "shield must have at least one charge"),
            Self::AutoRevive {
                uses_remaining: 0, ..
            } => errors.push("usesRemaining", "auto-revive must have at least one use"),
            Self::Immunity { all: false, types, .. } if types.is_empty() => {
                errors.push("types", "immunity without `all` must list blocked kinds");
            }
            _ => {}
        }
        if self.duration() == Some(0) {
            errors.push("duration", "duration must be at least 1");
        }
        errors
    }
}

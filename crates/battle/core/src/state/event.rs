//! Structured battle log entries.
//!
//! Events are appended in resolution order and are the only thing a renderer
//! needs to replay a round. They carry ids, never references into state.

use super::{BattleStatus, Element, StatusKind};

/// Which defensive layer fully negated a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum BlockedBy {
    Invulnerable,
    Shield,
}

/// Why an actor did not act this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SkipReason {
    KnockedOut,
    Frozen,
    Stunned,
    Paralyzed,
    /// Every candidate target was knocked out.
    NoTargets,
    /// The queued ability is no longer usable by the actor.
    UnknownAbility,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
    },
    DjinnActivated {
        djinn_id: String,
    },
    Summon {
        djinn_ids: Vec<String>,
        damage: u32,
        target_ids: Vec<String>,
    },
    DjinnRecovered {
        djinn_id: String,
    },
    ActionStarted {
        actor_id: String,
        ability_id: Option<String>,
        target_ids: Vec<String>,
    },
    ActionSkipped {
        actor_id: String,
        reason: SkipReason,
    },
    /// Damage dealt to one target. `raw` is pre-mitigation, `amount` is HP lost.
    Hit {
        source_id: Option<String>,
        target_id: String,
        element: Element,
        raw: u32,
        amount: u32,
        critical: bool,
        splash: bool,
        blocked_by: Option<BlockedBy>,
    },
    Healed {
        source_id: Option<String>,
        target_id: String,
        amount: u32,
        revived: bool,
    },
    StatusApplied {
        target_id: String,
        status: StatusKind,
    },
    /// Application was silently prevented by immunity.
    StatusBlocked {
        target_id: String,
        status: StatusKind,
    },
    StatusCleansed {
        target_id: String,
        removed: u32,
    },
    StatusExpired {
        target_id: String,
        status: StatusKind,
    },
    AutoRevived {
        unit_id: String,
        hp: u32,
    },
    KnockedOut {
        unit_id: String,
    },
    /// An enemy crossed its encounter phase-change threshold.
    PhaseChanged {
        enemy_id: String,
        ability_id: String,
    },
    /// `survivors` lists the player units standing before the post-battle heal.
    BattleEnded {
        status: BattleStatus,
        survivors: Vec<String>,
    },
}

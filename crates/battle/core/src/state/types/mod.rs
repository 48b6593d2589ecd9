//! Value types that make up battle state.

mod element;
mod percent;
mod queue;
mod status;
mod team;
mod unit;

pub use element::Element;
pub use percent::{Percent, PercentOutOfRange};
pub use queue::{ActionQueue, QueueError, QueuedAction};
pub use status::{StatusEffect, StatusKind, StatusKinds};
pub use team::{DjinnState, DjinnTracker, Team};
pub use unit::{BattleStatistics, Equipment, EquipmentLoadout, EquipmentSlot, Unit};

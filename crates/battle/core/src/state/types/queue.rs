//! Planned player actions for the current round.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// A planned action. `ability_id = None` is a basic attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct QueuedAction {
    pub unit_id: String,
    pub ability_id: Option<String>,
    pub target_ids: Vec<String>,
    pub mana_cost: u8,
}

impl QueuedAction {
    pub fn basic_attack(unit_id: impl Into<String>, target_ids: Vec<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            ability_id: None,
            target_ids,
            mana_cost: 0,
        }
    }

    pub fn is_basic_attack(&self) -> bool {
        self.ability_id.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("team size {0} is outside 1..={max}", max = BattleConfig::MAX_PARTY_SIZE)]
    InvalidTeamSize(usize),

    #[error("slot {index} is out of range for a queue of {len}")]
    SlotOutOfRange { index: usize, len: usize },
}

/// One slot per player unit, index-aligned with the team roster.
///
/// The length is fixed when the queue is built and always equals the team
/// size; slots are only ever filled or emptied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionQueue {
    slots: ArrayVec<Option<QueuedAction>, { BattleConfig::MAX_PARTY_SIZE }>,
}

impl ActionQueue {
    /// Creates an all-empty queue for a team of `team_size` units.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidTeamSize`] unless `1 <= team_size <= MAX_PARTY_SIZE`.
    pub fn new(team_size: usize) -> Result<Self, QueueError> {
        if team_size == 0 || team_size > BattleConfig::MAX_PARTY_SIZE {
            return Err(QueueError::InvalidTeamSize(team_size));
        }
        let mut slots = ArrayVec::new();
        for _ in 0..team_size {
            slots.push(None);
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueuedAction> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Fills `index` and returns the action it replaced.
    pub fn set(
        &mut self,
        index: usize,
        action: QueuedAction,
    ) -> Result<Option<QueuedAction>, QueueError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(QueueError::SlotOutOfRange { index, len })?;
        Ok(slot.replace(action))
    }

    /// Empties `index` and returns what was there.
    pub fn clear(&mut self, index: usize) -> Result<Option<QueuedAction>, QueueError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(QueueError::SlotOutOfRange { index, len })?;
        Ok(slot.take())
    }

    /// Slots in roster order.
    pub fn slots(&self) -> impl Iterator<Item = Option<&QueuedAction>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Index of the first empty slot, or `len()` when every slot is filled.
    pub fn first_empty(&self) -> usize {
        self.slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len())
    }

    /// Mana already committed by the filled slots.
    pub fn total_mana_cost(&self) -> u32 {
        self.slots
            .iter()
            .flatten()
            .map(|a| u32::from(a.mana_cost))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_fixed_at_construction() {
        assert_eq!(ActionQueue::new(0), Err(QueueError::InvalidTeamSize(0)));
        assert_eq!(ActionQueue::new(5), Err(QueueError::InvalidTeamSize(5)));

        let mut queue = ActionQueue::new(3).unwrap();
        assert_eq!(queue.len(), 3);
        assert_eq!(
            queue.set(3, QueuedAction::basic_attack("x", vec![])),
            Err(QueueError::SlotOutOfRange { index: 3, len: 3 })
        );
        queue.clear(1).unwrap();
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn cursor_tracks_first_empty_slot() {
        let mut queue = ActionQueue::new(2).unwrap();
        assert_eq!(queue.first_empty(), 0);
        queue.set(0, QueuedAction::basic_attack("a", vec![])).unwrap();
        assert_eq!(queue.first_empty(), 1);
        queue.set(1, QueuedAction::basic_attack("b", vec![])).unwrap();
        assert_eq!(queue.first_empty(), 2);
        assert_eq!(queue.total_mana_cost(), 0);
    }
}

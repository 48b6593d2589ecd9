//! Djinn state machine and team synergy.
//!
//! ```text
//! Set ──activate──▶ Standby ──summon──▶ Recovery ──timer / battle end──▶ Set
//! ```
//!
//! Only `Set` and `Standby` djinn count toward synergy.

mod synergy;

use std::collections::BTreeMap;

pub use synergy::{synergy_bonus, synergy_for_histogram};

use crate::error::{BattleError, ErrorSeverity};
use crate::state::{DjinnState, DjinnTracker, Team};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DjinnError {
    #[error("djinn '{0}' is not owned by the team")]
    UnknownDjinn(String),

    #[error("djinn '{id}' cannot go from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: DjinnState,
        to: DjinnState,
    },
}

impl BattleError for DjinnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownDjinn(_) => ErrorSeverity::Validation,
            Self::InvalidTransition { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownDjinn(_) => "DJINN_UNKNOWN",
            Self::InvalidTransition { .. } => "DJINN_INVALID_TRANSITION",
        }
    }
}

impl DjinnTracker {
    fn transition(&mut self, to: DjinnState, round: u32) -> Result<(), DjinnError> {
        let allowed = matches!(
            (self.state, to),
            (DjinnState::Set, DjinnState::Standby)
                | (DjinnState::Standby, DjinnState::Recovery)
                | (DjinnState::Recovery, DjinnState::Set)
        );
        if !allowed {
            return Err(DjinnError::InvalidTransition {
                id: self.id.clone(),
                from: self.state,
                to,
            });
        }
        self.state = to;
        if to != DjinnState::Set {
            self.last_activated_turn = Some(round);
        }
        Ok(())
    }

    /// `Set → Standby`.
    pub fn activate(&mut self, round: u32) -> Result<(), DjinnError> {
        self.transition(DjinnState::Standby, round)
    }

    /// `Standby → Recovery`, after joining a summon.
    pub fn begin_recovery(&mut self, round: u32) -> Result<(), DjinnError> {
        self.transition(DjinnState::Recovery, round)
    }

    /// `Recovery → Set`.
    pub fn recover(&mut self) -> Result<(), DjinnError> {
        let round = self.last_activated_turn.unwrap_or_default();
        self.transition(DjinnState::Set, round)
    }
}

/// Looks up a tracker by id.
pub fn tracker_mut<'a>(team: &'a mut Team, id: &str) -> Result<&'a mut DjinnTracker, DjinnError> {
    team.djinn_trackers
        .get_mut(id)
        .ok_or_else(|| DjinnError::UnknownDjinn(id.to_string()))
}

/// Counts every recovery timer down by one round and returns the ids of djinn
/// that returned to `Set`.
pub fn tick_recovery(team: &mut Team, timers: &mut BTreeMap<String, u32>) -> Vec<String> {
    let mut recovered = Vec::new();
    timers.retain(|id, remaining| {
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return true;
        }
        let back_to_set = team
            .djinn_trackers
            .get_mut(id)
            .is_some_and(|tracker| tracker.recover().is_ok());
        if back_to_set {
            recovered.push(id.clone());
        }
        false
    });
    recovered
}

/// Battle end: every djinn goes back to `Set`, whatever its state.
pub fn reset_all(team: &mut Team, timers: &mut BTreeMap<String, u32>) {
    for tracker in team.djinn_trackers.values_mut() {
        tracker.state = DjinnState::Set;
    }
    timers.clear();
}

//! Error types for battle engine operations.
//!
//! Every engine operation validates before it touches the working copy, and
//! the working copy is discarded on error, so a failed call never changes the
//! caller's state.

use crate::djinn::DjinnError;
use crate::env::OracleError;
use crate::error::{BattleError, ErrorSeverity, ValidationErrors};
use crate::state::{BattlePhase, DjinnState, QueueError};

/// Errors from planning-phase operations (queueing actions and djinn).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    #[error("operation requires the planning phase, battle is in {0}")]
    WrongPhase(BattlePhase),

    #[error("unit index {index} is out of range for a team of {len}")]
    UnitIndexOutOfRange { index: usize, len: usize },

    #[error("unit '{0}' is knocked out and cannot act")]
    UnitKnockedOut(String),

    #[error("unit '{unit_id}' cannot use ability '{ability_id}'")]
    UnknownAbility { unit_id: String, ability_id: String },

    #[error("not enough mana: need {required}, have {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("action needs at least one target")]
    MissingTarget,

    #[error("invalid target '{target_id}': {reason}")]
    InvalidTarget {
        target_id: String,
        reason: &'static str,
    },

    #[error("djinn '{0}' is not owned by the team")]
    UnknownDjinn(String),

    #[error("djinn '{id}' is in {state} and cannot be queued")]
    DjinnUnavailable { id: String, state: DjinnState },

    #[error("djinn '{0}' is already queued this round")]
    DjinnAlreadyQueued(String),

    #[error("djinn '{0}' is not queued")]
    DjinnNotQueued(String),

    #[error("at most {max} djinn can be queued per round")]
    TooManyDjinn { max: usize },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl BattleError for PlanningError {
    fn severity(&self) -> ErrorSeverity {
        use PlanningError::*;
        match self {
            InsufficientMana { .. }
            | DjinnUnavailable { .. }
            | DjinnAlreadyQueued(_)
            | TooManyDjinn { .. }
            | UnitKnockedOut(_) => ErrorSeverity::Recoverable,

            WrongPhase(_)
            | UnitIndexOutOfRange { .. }
            | UnknownAbility { .. }
            | MissingTarget
            | InvalidTarget { .. }
            | UnknownDjinn(_)
            | DjinnNotQueued(_) => ErrorSeverity::Validation,

            Queue(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use PlanningError::*;
        match self {
            WrongPhase(_) => "PLANNING_WRONG_PHASE",
            UnitIndexOutOfRange { .. } => "PLANNING_UNIT_INDEX_OUT_OF_RANGE",
            UnitKnockedOut(_) => "PLANNING_UNIT_KNOCKED_OUT",
            UnknownAbility { .. } => "PLANNING_UNKNOWN_ABILITY",
            InsufficientMana { .. } => "PLANNING_INSUFFICIENT_MANA",
            MissingTarget => "PLANNING_MISSING_TARGET",
            InvalidTarget { .. } => "PLANNING_INVALID_TARGET",
            UnknownDjinn(_) => "PLANNING_UNKNOWN_DJINN",
            DjinnUnavailable { .. } => "PLANNING_DJINN_UNAVAILABLE",
            DjinnAlreadyQueued(_) => "PLANNING_DJINN_ALREADY_QUEUED",
            DjinnNotQueued(_) => "PLANNING_DJINN_NOT_QUEUED",
            TooManyDjinn { .. } => "PLANNING_TOO_MANY_DJINN",
            Queue(_) => "PLANNING_QUEUE",
        }
    }
}

/// Errors from [`super::BattleEngine::execute_round`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteRoundError {
    #[error("rounds can only execute from the planning phase, battle is in {0}")]
    WrongPhase(BattlePhase),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Djinn(#[from] DjinnError),
}

impl BattleError for ExecuteRoundError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase(_) => ErrorSeverity::Validation,
            Self::Queue(_) | Self::Djinn(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase(_) => "EXECUTE_WRONG_PHASE",
            Self::Queue(_) => "EXECUTE_QUEUE",
            Self::Djinn(_) => "EXECUTE_DJINN",
        }
    }
}

/// Errors from building a new battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("team size {0} is outside 1..=4")]
    InvalidTeamSize(usize),

    #[error("a battle needs at least one enemy")]
    NoEnemies,

    #[error("unit id '{0}' appears more than once")]
    DuplicateUnitId(String),

    #[error("encounter is invalid: {0}")]
    InvalidEncounter(ValidationErrors),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidTeamSize(_) | Self::NoEnemies | Self::DuplicateUnitId(_) => {
                ErrorSeverity::Validation
            }
            Self::InvalidEncounter(_) | Self::Oracle(_) => ErrorSeverity::Fatal,
            Self::Queue(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTeamSize(_) => "SETUP_INVALID_TEAM_SIZE",
            Self::NoEnemies => "SETUP_NO_ENEMIES",
            Self::DuplicateUnitId(_) => "SETUP_DUPLICATE_UNIT_ID",
            Self::InvalidEncounter(_) => "SETUP_INVALID_ENCOUNTER",
            Self::Oracle(_) => "SETUP_ORACLE",
            Self::Queue(_) => "SETUP_QUEUE",
        }
    }
}

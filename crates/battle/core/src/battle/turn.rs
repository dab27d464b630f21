//! Turn phases, turn mode, status flags and fatal errors.

use bitflags::bitflags;

use crate::error::{BattleFault, ErrorContext, ErrorSeverity};
use crate::state::{InflictError, PersonIndex};

/// Phase of the battle state machine.
///
/// ```text
/// BEGIN → GENERAL_UPKEEP → UPKEEP → SELECT_ACTION_ALLY → SELECT_ACTION_ENEMY
///       → ORDER_ACTIONS → PROCESS_ACTIONS → CLEAN_UP
///       → (BATTLE_VICTORY | BATTLE_LOSS | GENERAL_UPKEEP) → DESTRUCT
/// ```
///
/// The two SELECT phases swap places when foes go first.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnState {
    #[default]
    Begin,
    GeneralUpkeep,
    Upkeep,
    SelectActionAlly,
    SelectActionEnemy,
    OrderActions,
    ProcessActions,
    CleanUp,
    BattleVictory,
    BattleLoss,
    Destruct,
}

impl TurnState {
    /// Phases during which both sides must have a living member.
    pub const fn is_in_turn(self) -> bool {
        matches!(
            self,
            Self::GeneralUpkeep
                | Self::Upkeep
                | Self::SelectActionAlly
                | Self::SelectActionEnemy
                | Self::OrderActions
                | Self::ProcessActions
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::BattleVictory | Self::BattleLoss | Self::Destruct)
    }
}

/// Which side selects first each turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnMode {
    #[default]
    FriendsFirst,
    FoesFirst,
}

bitflags! {
    /// Battle-wide status.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BattleStatus: u16 {
        /// The current phase finished; the next `update` advances.
        const PHASE_DONE       = 1 << 0;
        /// No boss among the foes; RUN is allowed.
        const RANDOM_ENCOUNTER = 1 << 1;
        const VICTORY          = 1 << 2;
        const LOSS             = 1 << 3;
        const ESCAPED          = 1 << 4;
        const ERROR_STATE      = 1 << 5;
        /// `on_battle_finished` has been delivered.
        const REPORTED         = 1 << 6;

        const OUTCOME = Self::VICTORY.bits()
            | Self::LOSS.bits()
            | Self::ESCAPED.bits()
            | Self::ERROR_STATE.bits();
    }
}

impl BattleStatus {
    #[inline]
    pub fn has(&self, flag: Self) -> bool {
        self.contains(flag)
    }

    #[inline]
    pub fn clear(&mut self, flag: Self) {
        self.remove(flag);
    }
}

/// Errors the battle surfaces to its driver.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("{side} party has no members")]
    EmptyParty { side: &'static str },

    #[error("no person at index {0}")]
    UnknownPerson(PersonIndex),

    #[error("battle already holds {} ailments", crate::config::BattleConfig::MAX_AILMENTS_PER_BATTLE)]
    AilmentCapacity,

    #[error(transparent)]
    Inflict(#[from] InflictError),

    #[error("plan user {user} is no longer able to act")]
    StalePlan { user: PersonIndex, context: ErrorContext },
}

impl BattleFault for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyParty { .. } => ErrorSeverity::Fatal,
            Self::UnknownPerson(_) => ErrorSeverity::Validation,
            Self::AilmentCapacity | Self::Inflict(_) => ErrorSeverity::Recoverable,
            Self::StalePlan { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::StalePlan { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyParty { .. } => "BATTLE_EMPTY_PARTY",
            Self::UnknownPerson(_) => "BATTLE_UNKNOWN_PERSON",
            Self::AilmentCapacity => "BATTLE_AILMENT_CAPACITY",
            Self::Inflict(e) => e.error_code(),
            Self::StalePlan { .. } => "BATTLE_STALE_PLAN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_turn_phases() {
        assert!(TurnState::Upkeep.is_in_turn());
        assert!(TurnState::ProcessActions.is_in_turn());
        assert!(!TurnState::CleanUp.is_in_turn());
        assert!(TurnState::BattleLoss.is_terminal());
        assert_eq!(TurnState::SelectActionAlly.to_string(), "SELECT_ACTION_ALLY");
    }

    #[test]
    fn error_classification() {
        let fatal = BattleError::EmptyParty { side: "foe" };
        assert_eq!(fatal.severity(), ErrorSeverity::Fatal);
        assert_eq!(fatal.error_code(), "BATTLE_EMPTY_PARTY");

        let stale = BattleError::StalePlan {
            user: PersonIndex::friend(2),
            context: ErrorContext::new(3).with_actor(PersonIndex::friend(2)),
        };
        assert_eq!(stale.context().map(|c| c.turn), Some(3));
        assert!(stale.severity().is_internal());
    }
}

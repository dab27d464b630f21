//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. `EquipError`, `ActionError`) live in their
//! respective modules beside the operations they validate. This module only
//! provides the classification shared by all of them.
//!
//! # Taxonomy
//!
//! - Saturation (stat clamps, exp overflow, ailment caps) never surfaces: the
//!   value is clamped and the operation reports success.
//! - Precondition failures return `Err(..)` and leave no trace in the event
//!   buffer.
//! - Invariant breaks inside a running battle drop the offending plan.
//! - Fatal errors stop the battle (`ERROR_STATE`).

use crate::state::PersonIndex;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - a different input may succeed.
    ///
    /// Examples: consumable not in inventory, skill on cooldown
    Recoverable,

    /// Validation error - the request itself is malformed.
    ///
    /// Examples: equipping a helmet in an arm slot, inverted ailment duration
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: plan user died between selection and processing
    Internal,

    /// Fatal error - the battle cannot continue.
    ///
    /// Examples: empty party, party over capacity
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or a dead battle.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to battle errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Person that triggered the error (if applicable).
    pub actor: Option<PersonIndex>,

    /// Turn counter at the time of the error.
    pub turn: u32,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context for the given turn.
    #[must_use]
    pub const fn new(turn: u32) -> Self {
        Self {
            actor: None,
            turn,
            message: None,
        }
    }

    /// Attaches an actor to this context (builder pattern).
    #[must_use]
    pub const fn with_actor(mut self, actor: PersonIndex) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all battle-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleFault: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }

    #[test]
    fn context_builder_attaches_fields() {
        let ctx = ErrorContext::new(4)
            .with_actor(PersonIndex::foe(2))
            .with_message("dead user");
        assert_eq!(ctx.turn, 4);
        assert_eq!(ctx.actor, Some(PersonIndex::foe(2)));
        assert_eq!(ctx.message, Some("dead user"));
    }
}

//! Actions - the atomic effects skills are built from.
//!
//! An [`Action`] is an immutable value: one effect (alter, assign, damage,
//! revive, inflict, relieve) plus its magnitude, variance and hit chance.
//! Actions are only constructible through [`ActionBuilder`], which enforces
//! the value invariants; the text format lives in the content crate.

mod builder;
mod error;

pub use builder::ActionBuilder;
pub use error::ActionError;

use crate::state::AilmentKind;
use crate::stats::{Attribute, ElementSet};

/// Discriminant of an action's effect, used by parsers and logs.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ActionKind {
    Alter,
    Assign,
    Inflict,
    Relieve,
    Revive,
    Damage,
}

/// What an action does to each target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEffect {
    /// Add `base ± variance` to an attribute. A negative base on VITA is damage.
    Alter { attribute: Attribute },
    /// Set an attribute to `base`.
    Assign { attribute: Attribute },
    /// Stat-driven damage to an attribute (VITA in practice).
    Damage { attribute: Attribute },
    /// Bring a KO'd, revivable target back with `base ± variance` VITA.
    Revive,
    /// Attach an ailment lasting `[min_duration, max_duration]` turns.
    ///
    /// `0..=0` means the ailment never expires on its own.
    Inflict {
        ailment: AilmentKind,
        min_duration: u32,
        max_duration: u32,
    },
    /// Remove a matching ailment.
    Relieve { ailment: AilmentKind },
}

impl ActionEffect {
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Alter { .. } => ActionKind::Alter,
            Self::Assign { .. } => ActionKind::Assign,
            Self::Damage { .. } => ActionKind::Damage,
            Self::Revive => ActionKind::Revive,
            Self::Inflict { .. } => ActionKind::Inflict,
            Self::Relieve { .. } => ActionKind::Relieve,
        }
    }
}

/// Magnitude of an action's base or variance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magnitude {
    /// Flat amount.
    Amount(i32),
    /// Percentage of a reference value.
    Percent(i32),
}

impl Magnitude {
    pub const ZERO: Self = Self::Amount(0);

    pub const fn is_percent(&self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// Raw number, without interpreting it.
    pub const fn value(&self) -> i32 {
        match self {
            Self::Amount(v) | Self::Percent(v) => *v,
        }
    }

    /// Resolve against a reference: flat amounts ignore it, percents scale it.
    pub fn resolve(&self, reference: f64) -> f64 {
        match self {
            Self::Amount(v) => f64::from(*v),
            Self::Percent(p) => reference * f64::from(*p) / 100.0,
        }
    }
}

impl Default for Magnitude {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A single atomic effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    id: u32,
    effect: ActionEffect,
    ignore_atk: ElementSet,
    ignore_def: ElementSet,
    base: Magnitude,
    variance: Magnitude,
    chance: Option<u32>,
}

impl Action {
    /// Start building an action.
    pub fn builder(id: u32, effect: ActionEffect) -> ActionBuilder {
        ActionBuilder::new(id, effect)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn effect(&self) -> &ActionEffect {
        &self.effect
    }

    pub fn kind(&self) -> ActionKind {
        self.effect.kind()
    }

    /// Elements whose offensive slots this action ignores on the user.
    pub fn ignore_atk(&self) -> ElementSet {
        self.ignore_atk
    }

    /// Elements whose defensive slots this action ignores on the target.
    pub fn ignore_def(&self) -> ElementSet {
        self.ignore_def
    }

    pub fn base(&self) -> Magnitude {
        self.base
    }

    pub fn variance(&self) -> Magnitude {
        self.variance
    }

    /// Own hit chance, if the action overrides its skill's chance.
    pub fn chance(&self) -> Option<u32> {
        self.chance
    }

    /// Attribute the action reads or writes, when it has one.
    pub fn attribute(&self) -> Option<Attribute> {
        match self.effect {
            ActionEffect::Alter { attribute }
            | ActionEffect::Assign { attribute }
            | ActionEffect::Damage { attribute } => Some(attribute),
            ActionEffect::Revive => Some(Attribute::Vita),
            ActionEffect::Inflict { .. } | ActionEffect::Relieve { .. } => None,
        }
    }

    /// True when the action goes through the damage formula.
    pub fn is_damaging(&self) -> bool {
        match self.effect {
            ActionEffect::Damage { .. } => true,
            ActionEffect::Alter {
                attribute: Attribute::Vita,
            } => self.base.value() < 0,
            _ => false,
        }
    }

    /// True for VITA restoration on a living target.
    pub fn is_healing(&self) -> bool {
        matches!(
            self.effect,
            ActionEffect::Alter {
                attribute: Attribute::Vita
            }
        ) && self.base.value() > 0
    }

    pub fn is_revive(&self) -> bool {
        matches!(self.effect, ActionEffect::Revive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_vita_alter_is_damage() {
        let hit = Action::builder(1, ActionEffect::Alter { attribute: Attribute::Vita })
            .base(Magnitude::Amount(-40))
            .build()
            .unwrap();
        assert!(hit.is_damaging());
        assert!(!hit.is_healing());

        let heal = Action::builder(2, ActionEffect::Alter { attribute: Attribute::Vita })
            .base(Magnitude::Percent(25))
            .build()
            .unwrap();
        assert!(heal.is_healing());
        assert!(!heal.is_damaging());
    }

    #[test]
    fn magnitude_resolution() {
        assert_eq!(Magnitude::Amount(12).resolve(500.0), 12.0);
        assert_eq!(Magnitude::Percent(50).resolve(200.0), 100.0);
        assert_eq!(Magnitude::Percent(-10).resolve(200.0), -20.0);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("inflict".parse::<ActionKind>().unwrap(), ActionKind::Inflict);
        assert_eq!(ActionKind::Damage.to_string(), "DAMAGE");
    }

    #[test]
    fn revive_targets_vita() {
        let revive = Action::builder(3, ActionEffect::Revive)
            .base(Magnitude::Percent(50))
            .build()
            .unwrap();
        assert_eq!(revive.attribute(), Some(Attribute::Vita));
        assert_eq!(revive.kind(), ActionKind::Revive);
    }
}

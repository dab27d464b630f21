use crate::stats::ElementSet;

use super::{Action, ActionEffect, ActionError, Magnitude};

/// Validating builder; the only way to obtain an [`Action`].
///
/// ```text
/// base percent      ≤ 100
/// variance percent  ≤ 1000, variance ≥ 0
/// inflict duration  max ≥ min
/// chance            ≤ 100
/// ```
#[derive(Clone, Debug)]
pub struct ActionBuilder {
    id: u32,
    effect: ActionEffect,
    ignore_atk: ElementSet,
    ignore_def: ElementSet,
    base: Magnitude,
    variance: Magnitude,
    chance: Option<u32>,
}

impl ActionBuilder {
    pub fn new(id: u32, effect: ActionEffect) -> Self {
        Self {
            id,
            effect,
            ignore_atk: ElementSet::empty(),
            ignore_def: ElementSet::empty(),
            base: Magnitude::ZERO,
            variance: Magnitude::ZERO,
            chance: None,
        }
    }

    pub fn base(mut self, base: Magnitude) -> Self {
        self.base = base;
        self
    }

    pub fn variance(mut self, variance: Magnitude) -> Self {
        self.variance = variance;
        self
    }

    pub fn chance(mut self, chance: u32) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn ignore_atk(mut self, elements: ElementSet) -> Self {
        self.ignore_atk = elements;
        self
    }

    pub fn ignore_def(mut self, elements: ElementSet) -> Self {
        self.ignore_def = elements;
        self
    }

    pub fn build(self) -> Result<Action, ActionError> {
        if let Magnitude::Percent(p) = self.base
            && p > 100
        {
            return Err(ActionError::BasePercentOutOfRange(p));
        }
        if self.variance.value() < 0 {
            return Err(ActionError::NegativeVariance(self.variance.value()));
        }
        if let Magnitude::Percent(p) = self.variance
            && p > 1000
        {
            return Err(ActionError::VariancePercentOutOfRange(p));
        }
        if let ActionEffect::Inflict {
            min_duration,
            max_duration,
            ..
        } = self.effect
            && max_duration < min_duration
        {
            return Err(ActionError::InvertedDuration {
                min: min_duration,
                max: max_duration,
            });
        }
        if let Some(chance) = self.chance
            && chance > 100
        {
            return Err(ActionError::ChanceOutOfRange(chance));
        }

        Ok(Action {
            id: self.id,
            effect: self.effect,
            ignore_atk: self.ignore_atk,
            ignore_def: self.ignore_def,
            base: self.base,
            variance: self.variance,
            chance: self.chance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AilmentKind;
    use crate::stats::Attribute;

    #[test]
    fn rejects_out_of_range_percentages() {
        let effect = ActionEffect::Alter {
            attribute: Attribute::Vita,
        };
        assert_eq!(
            ActionBuilder::new(1, effect)
                .base(Magnitude::Percent(101))
                .build(),
            Err(ActionError::BasePercentOutOfRange(101))
        );
        assert_eq!(
            ActionBuilder::new(1, effect)
                .variance(Magnitude::Percent(1001))
                .build(),
            Err(ActionError::VariancePercentOutOfRange(1001))
        );
        assert!(
            ActionBuilder::new(1, effect)
                .variance(Magnitude::Percent(1000))
                .build()
                .is_ok()
        );
    }

    #[test]
    fn rejects_inverted_duration() {
        let effect = ActionEffect::Inflict {
            ailment: AilmentKind::Poison,
            min_duration: 4,
            max_duration: 2,
        };
        assert_eq!(
            ActionBuilder::new(9, effect).build(),
            Err(ActionError::InvertedDuration { min: 4, max: 2 })
        );
    }

    #[test]
    fn carries_every_field() {
        let action = ActionBuilder::new(
            5,
            ActionEffect::Damage {
                attribute: Attribute::Vita,
            },
        )
        .base(Magnitude::Amount(15))
        .variance(Magnitude::Percent(10))
        .chance(90)
        .ignore_def(ElementSet::ELEMENTAL)
        .build()
        .unwrap();

        assert_eq!(action.id(), 5);
        assert_eq!(action.base(), Magnitude::Amount(15));
        assert_eq!(action.variance(), Magnitude::Percent(10));
        assert_eq!(action.chance(), Some(90));
        assert!(action.ignore_def().has(crate::stats::Element::Fire));
        assert!(action.ignore_atk().is_empty());
    }
}

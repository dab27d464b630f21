//! Skills - ordered action lists with scope, cost, cooldown and elements.
//!
//! Skills are immutable once built and shared between persons through
//! `Arc<Skill>`; a [`SkillSet`] pairs them with the level that unlocks them.

mod scope;
mod set;

pub use scope::{ActionScope, Side, TargetCount};
pub use set::{SkillSet, SkillSetElement, SkillSetError};

use std::sync::Arc;

use bitflags::bitflags;

use crate::action::Action;
use crate::stats::Element;

bitflags! {
    /// Broad classification used by the AI and by reflection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SkillFlags: u8 {
        const OFFENSIVE = 1 << 0;
        const DEFENSIVE = 1 << 1;
        const HEALING   = 1 << 2;
    }
}

/// An ordered sequence of actions applied to the chosen targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Skill {
    id: u32,
    name: String,
    description: String,
    scope: ActionScope,
    actions: Vec<Arc<Action>>,
    cost: u32,
    cooldown: u32,
    chance: u32,
    primary: Element,
    secondary: Element,
    flags: SkillFlags,
    value: u32,
}

impl Skill {
    /// New skill with no actions, 100% chance and no cost.
    pub fn new(id: u32, name: impl Into<String>, scope: ActionScope) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            scope,
            actions: Vec::new(),
            cost: 0,
            cooldown: 0,
            chance: 100,
            primary: Element::Physical,
            secondary: Element::Physical,
            flags: SkillFlags::empty(),
            value: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_action(mut self, action: Arc<Action>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Arc<Action>>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown = turns;
        self
    }

    /// Hit chance in percent, capped at 100.
    pub fn with_chance(mut self, chance: u32) -> Self {
        self.chance = chance.min(100);
        self
    }

    pub fn with_elements(mut self, primary: Element, secondary: Element) -> Self {
        self.primary = primary;
        self.secondary = secondary;
        self
    }

    pub fn with_flags(mut self, flags: SkillFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn scope(&self) -> ActionScope {
        self.scope
    }

    pub fn actions(&self) -> &[Arc<Action>] {
        &self.actions
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn chance(&self) -> u32 {
        self.chance
    }

    pub fn primary(&self) -> Element {
        self.primary
    }

    pub fn secondary(&self) -> Element {
        self.secondary
    }

    /// AI priority weight.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Explicit flags, or flags inferred from the actions when none were set.
    pub fn flags(&self) -> SkillFlags {
        if !self.flags.is_empty() {
            return self.flags;
        }
        let mut flags = SkillFlags::empty();
        for action in &self.actions {
            if action.is_damaging() {
                flags |= SkillFlags::OFFENSIVE;
            } else if action.is_healing() || action.is_revive() {
                flags |= SkillFlags::HEALING | SkillFlags::DEFENSIVE;
            }
        }
        flags
    }

    pub fn is_offensive(&self) -> bool {
        self.flags().contains(SkillFlags::OFFENSIVE)
    }

    pub fn is_defensive(&self) -> bool {
        self.flags()
            .intersects(SkillFlags::DEFENSIVE | SkillFlags::HEALING)
    }

    /// Offensive skill whose primary element is physical (a plain attack).
    pub fn is_physical_attack(&self) -> bool {
        self.is_offensive() && !self.primary.is_elemental()
    }

    /// Offensive elemental skills are the ones REFLECT bounces back.
    pub fn is_reflectable(&self) -> bool {
        self.is_offensive() && self.primary.is_elemental()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionEffect, Magnitude};
    use crate::stats::Attribute;

    fn strike() -> Arc<Action> {
        Arc::new(
            Action::builder(1, ActionEffect::Damage { attribute: Attribute::Vita })
                .base(Magnitude::Amount(10))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn flags_inferred_from_actions() {
        let skill = Skill::new(1, "Strike", ActionScope::OneEnemy).with_action(strike());
        assert!(skill.is_offensive());
        assert!(skill.is_physical_attack());
        assert!(!skill.is_reflectable());

        let fire = skill.clone().with_elements(Element::Fire, Element::Physical);
        assert!(fire.is_reflectable());
    }

    #[test]
    fn explicit_flags_win() {
        let skill = Skill::new(2, "Odd", ActionScope::OneEnemy)
            .with_action(strike())
            .with_flags(SkillFlags::DEFENSIVE);
        assert!(!skill.is_offensive());
        assert!(skill.is_defensive());
    }

    #[test]
    fn chance_is_capped() {
        let skill = Skill::new(3, "Sure", ActionScope::User).with_chance(150);
        assert_eq!(skill.chance(), 100);
    }
}

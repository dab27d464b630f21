//! Per-turn decorated views of what a person may do.
//!
//! [`BattleSkill`] and [`BattleItem`] pair a definition with its live target
//! set and a [`ValidStatus`]. They are rebuilt each time a person starts
//! deciding, so statuses always reflect the current battle state.

use std::sync::Arc;

use crate::skill::Skill;
use crate::state::{BattleFlags, Item, PersonIndex};

use super::plan::ActionType;
use super::roster::Roster;

/// Why an option is or is not selectable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidStatus {
    Valid,
    NotAffordable,
    Silenced,
    OnCooldown,
    NoTargets,
    Invalid,
}

impl ValidStatus {
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A skill with its legal targets for this decision.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleSkill {
    pub skill: Arc<Skill>,
    /// QTDR the user would pay.
    pub cost: u32,
    /// Candidates in canonical order.
    pub targets: Vec<PersonIndex>,
    pub status: ValidStatus,
}

/// An inventory stack with the legal targets of its skill of use.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleItem {
    pub item: Arc<Item>,
    pub count: u16,
    pub targets: Vec<PersonIndex>,
    pub status: ValidStatus,
}

impl BattleItem {
    pub fn skill(&self) -> Option<&Arc<Skill>> {
        self.item.use_skill()
    }
}

/// Skills `user` knows, each with a status.
///
/// Status precedence: silence, permission and scope, cooldown, cost, targets.
pub fn battle_skills(roster: &Roster, user: PersonIndex) -> Vec<BattleSkill> {
    let Some(person) = roster.get(user) else {
        return Vec::new();
    };
    let silenced = person.is_silenced();

    person
        .known_skills()
        .into_iter()
        .map(|skill| {
            let targets = roster.candidates(skill.scope(), user);
            let permission = if skill.is_physical_attack() {
                BattleFlags::ATK_ENABLED
            } else {
                BattleFlags::SKL_ENABLED
            };
            let status = if silenced {
                ValidStatus::Silenced
            } else if !person.has_flag(permission) || skill.actions().is_empty() {
                ValidStatus::Invalid
            } else if person.cooldown(skill.id()) > 0 {
                ValidStatus::OnCooldown
            } else if !person.can_afford(&skill) {
                ValidStatus::NotAffordable
            } else if targets.is_empty() {
                ValidStatus::NoTargets
            } else {
                ValidStatus::Valid
            };
            BattleSkill {
                cost: person.effective_cost(&skill),
                skill,
                targets,
                status,
            }
        })
        .collect()
}

/// Battle-ready stacks of the user's party inventory.
pub fn battle_items(roster: &Roster, user: PersonIndex) -> Vec<BattleItem> {
    let Some(person) = roster.get(user) else {
        return Vec::new();
    };
    let allowed = person.has_flag(BattleFlags::ITM_ENABLED);

    roster
        .party_of(user)
        .inventory()
        .take_battle_items()
        .into_iter()
        .map(|entry| {
            let targets = entry
                .item
                .use_skill()
                .map(|skill| roster.candidates(skill.scope(), user))
                .unwrap_or_default();
            let status = if !allowed {
                ValidStatus::Invalid
            } else if targets.is_empty() {
                ValidStatus::NoTargets
            } else {
                ValidStatus::Valid
            };
            BattleItem {
                item: entry.item,
                count: entry.count,
                targets,
                status,
            }
        })
        .collect()
}

/// Action types `user` may pick this turn, in menu order.
///
/// PASS is always offered when nothing else is.
pub fn valid_action_types(
    roster: &Roster,
    user: PersonIndex,
    skills: &[BattleSkill],
    items: &[BattleItem],
    random_encounter: bool,
) -> Vec<ActionType> {
    let Some(person) = roster.get(user) else {
        return vec![ActionType::Pass];
    };

    let mut types: Vec<ActionType> = ActionType::ALL
        .into_iter()
        .filter(|&kind| match kind {
            ActionType::Skill => skills.iter().any(|s| s.status.is_valid()),
            ActionType::Item => items.iter().any(|i| i.status.is_valid()),
            ActionType::Guard => {
                person.has_flag(BattleFlags::GRD_ENABLED) && !roster.guard_candidates(user).is_empty()
            }
            ActionType::Run => person.has_flag(BattleFlags::RUN_ENABLED) && random_encounter,
            other => person.has_flag(other.permission()),
        })
        .collect();

    if types.is_empty() {
        types.push(ActionType::Pass);
    }
    types
}

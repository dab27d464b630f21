//! Read-only view the AI decides from.

use crate::battle::{ActionType, BattleItem, BattleSkill, Roster};
use crate::state::{Person, PersonIndex};

/// Everything a foe may look at while deciding.
///
/// Options are built once per decision by the battle and shared with the
/// chance, option and target layers.
pub struct AiContext<'a> {
    /// The person deciding.
    pub user: PersonIndex,
    pub roster: &'a Roster,
    pub action_types: &'a [ActionType],
    pub skills: &'a [BattleSkill],
    pub items: &'a [BattleItem],
}

impl<'a> AiContext<'a> {
    pub fn new(
        user: PersonIndex,
        roster: &'a Roster,
        action_types: &'a [ActionType],
        skills: &'a [BattleSkill],
        items: &'a [BattleItem],
    ) -> Self {
        Self {
            user,
            roster,
            action_types,
            skills,
            items,
        }
    }

    pub fn person(&self) -> Option<&'a Person> {
        self.roster.get(self.user)
    }

    pub fn allows(&self, kind: ActionType) -> bool {
        self.action_types.contains(&kind)
    }

    /// QTDR percent of the user (100 when unknown).
    pub fn qtdr_percent(&self) -> f64 {
        self.person().map_or(100.0, Person::qtdr_percent)
    }

    /// Valid skills with their index in `skills`.
    pub fn valid_skills(&self) -> impl Iterator<Item = (usize, &'a BattleSkill)> {
        self.skills
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status.is_valid())
    }

    /// Valid items with their index in `items`.
    pub fn valid_items(&self) -> impl Iterator<Item = (usize, &'a BattleItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.status.is_valid())
    }
}

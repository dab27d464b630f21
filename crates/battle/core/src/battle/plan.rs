//! Action types and recorded plans.

use std::sync::Arc;

use crate::skill::Skill;
use crate::state::{BattleFlags, Item, PersonIndex};

/// What a person does with a turn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Skill,
    Item,
    Defend,
    Guard,
    Implode,
    Run,
    Pass,
}

impl ActionType {
    /// Menu and enumeration order.
    pub const ALL: [ActionType; 7] = [
        Self::Skill,
        Self::Item,
        Self::Defend,
        Self::Guard,
        Self::Implode,
        Self::Run,
        Self::Pass,
    ];

    /// Permission flag that enables this type.
    pub const fn permission(self) -> BattleFlags {
        match self {
            Self::Skill => BattleFlags::SKL_ENABLED.union(BattleFlags::ATK_ENABLED),
            Self::Item => BattleFlags::ITM_ENABLED,
            Self::Defend => BattleFlags::DEF_ENABLED,
            Self::Guard => BattleFlags::GRD_ENABLED,
            Self::Implode => BattleFlags::IMP_ENABLED,
            Self::Run => BattleFlags::RUN_ENABLED,
            Self::Pass => BattleFlags::PAS_ENABLED,
        }
    }

    /// Ordering rank: stances first, then items, then skills, then the rest.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Defend | Self::Guard => 0,
            Self::Item => 1,
            Self::Skill | Self::Implode => 2,
            Self::Run | Self::Pass => 3,
        }
    }

    /// Types that go through the target layer.
    pub const fn needs_targets(self) -> bool {
        matches!(self, Self::Skill | Self::Item | Self::Guard)
    }
}

/// A validated `(user, action, targets)` tuple awaiting ORDER_ACTIONS.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionPlan {
    pub user: PersonIndex,
    pub kind: ActionType,
    pub skill: Option<Arc<Skill>>,
    pub item: Option<Arc<Item>>,
    pub targets: Vec<PersonIndex>,
    /// QTDR already taken from the user.
    pub qtdr_paid: u32,
    /// Tie breaker drawn when the plan was recorded.
    pub jitter: u32,
}

impl ActionPlan {
    pub fn new(user: PersonIndex, kind: ActionType) -> Self {
        Self {
            user,
            kind,
            skill: None,
            item: None,
            targets: Vec::new(),
            qtdr_paid: 0,
            jitter: 0,
        }
    }

    /// PASS aimed at the user.
    pub fn pass(user: PersonIndex) -> Self {
        let mut plan = Self::new(user, ActionType::Pass);
        plan.targets = vec![user];
        plan
    }

    /// Skill whose actions the plan performs: the skill itself or the item's
    /// skill of use.
    pub fn effective_skill(&self) -> Option<&Arc<Skill>> {
        self.skill
            .as_ref()
            .or_else(|| self.item.as_ref().and_then(|item| item.use_skill()))
    }
}

/// Stable ordering of plans.
///
/// ```text
/// key = (type rank ↑, user MMTM ↓, jitter ↑)
/// ```
pub fn order_plans(plans: &mut [ActionPlan], momentum: impl Fn(PersonIndex) -> i32) {
    plans.sort_by_key(|plan| {
        (
            plan.kind.rank(),
            std::cmp::Reverse(momentum(plan.user)),
            plan.jitter,
        )
    });
}

use crate::skill::SkillSet;
use crate::stats::AttributeSet;

use super::ailment::AilmentKind;
use super::flags::BattleFlags;

/// A battle class or race.
///
/// Each person combines two categories; both contribute base and top stats,
/// skills, action permissions and ailment immunities.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    id: u32,
    name: String,
    base_stats: AttributeSet,
    top_stats: AttributeSet,
    skills: SkillSet,
    permissions: BattleFlags,
    immunities: Vec<AilmentKind>,
    /// Percent of `temp_max.VITA` regained at each upkeep.
    vita_regen: u32,
    /// Percent of `temp_max.QTDR` regained at each upkeep.
    qtdr_regen: u32,
}

impl Category {
    /// New category allowed every action type but implode.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base_stats: AttributeSet::personal(),
            top_stats: AttributeSet::personal(),
            skills: SkillSet::new(),
            permissions: BattleFlags::ACTIONS.difference(BattleFlags::IMP_ENABLED),
            immunities: Vec::new(),
            vita_regen: 0,
            qtdr_regen: 0,
        }
    }

    /// Stats at level 1 and at the maximum level.
    pub fn with_stats(mut self, base: AttributeSet, top: AttributeSet) -> Self {
        self.base_stats = base.with_personal(true);
        self.top_stats = top.with_personal(true);
        self
    }

    pub fn with_skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }

    /// Restricts action types; non-action bits are ignored.
    pub fn with_permissions(mut self, permissions: BattleFlags) -> Self {
        self.permissions = permissions & BattleFlags::ACTIONS;
        self
    }

    pub fn with_immunities(mut self, immunities: impl IntoIterator<Item = AilmentKind>) -> Self {
        self.immunities = immunities.into_iter().collect();
        self
    }

    pub fn with_regen(mut self, vita_percent: u32, qtdr_percent: u32) -> Self {
        self.vita_regen = vita_percent;
        self.qtdr_regen = qtdr_percent;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_stats(&self) -> &AttributeSet {
        &self.base_stats
    }

    pub fn top_stats(&self) -> &AttributeSet {
        &self.top_stats
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn permissions(&self) -> BattleFlags {
        self.permissions
    }

    pub fn is_immune(&self, kind: AilmentKind) -> bool {
        self.immunities.contains(&kind)
    }

    pub fn vita_regen(&self) -> u32 {
        self.vita_regen
    }

    pub fn qtdr_regen(&self) -> u32 {
        self.qtdr_regen
    }
}

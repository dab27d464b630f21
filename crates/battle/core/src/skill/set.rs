//! Skill sets: skills paired with the level that unlocks them.

use std::ops::{AddAssign, SubAssign};
use std::sync::Arc;

use crate::config::BattleConfig;
use crate::error::{BattleFault, ErrorSeverity};

use super::Skill;

/// Errors from skill set mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkillSetError {
    #[error("skill set is full ({capacity} skills)")]
    Full { capacity: usize },

    #[error("skill {0} is not in the set")]
    NotFound(u32),
}

impl BattleFault for SkillSetError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Full { .. } => ErrorSeverity::Recoverable,
            Self::NotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Full { .. } => "SKILL_SET_FULL",
            Self::NotFound(_) => "SKILL_SET_NOT_FOUND",
        }
    }
}

/// One entry of a [`SkillSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct SkillSetElement {
    pub skill: Arc<Skill>,
    pub level_required: u32,
    pub enabled: bool,
    pub silenced: bool,
}

impl SkillSetElement {
    pub fn new(skill: Arc<Skill>, level_required: u32) -> Self {
        Self {
            skill,
            level_required,
            enabled: true,
            silenced: false,
        }
    }

    /// Usable at `level` (unlocked, enabled, not silenced).
    pub fn usable_at(&self, level: u32) -> bool {
        self.enabled && !self.silenced && self.level_required <= level
    }
}

/// Ordered collection of skills, unique by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillSet {
    elements: Vec<SkillSetElement>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillSetElement> {
        self.elements.iter()
    }

    pub fn contains(&self, skill_id: u32) -> bool {
        self.position(skill_id).is_some()
    }

    pub fn get(&self, skill_id: u32) -> Option<&SkillSetElement> {
        self.position(skill_id).map(|i| &self.elements[i])
    }

    fn position(&self, skill_id: u32) -> Option<usize> {
        self.elements.iter().position(|e| e.skill.id() == skill_id)
    }

    /// Adds a skill; a duplicate id keeps the lower `level_required`.
    pub fn add(&mut self, skill: Arc<Skill>, level_required: u32) -> Result<(), SkillSetError> {
        self.insert(SkillSetElement::new(skill, level_required), false)
    }

    fn insert(&mut self, element: SkillSetElement, bypass: bool) -> Result<(), SkillSetError> {
        if let Some(i) = self.position(element.skill.id()) {
            let existing = &mut self.elements[i];
            existing.level_required = existing.level_required.min(element.level_required);
            return Ok(());
        }
        if !bypass && self.elements.len() >= BattleConfig::MAX_SKILLS {
            return Err(SkillSetError::Full {
                capacity: BattleConfig::MAX_SKILLS,
            });
        }
        self.elements.push(element);
        Ok(())
    }

    /// Union with `other`. Without `bypass`, stops at capacity and reports it.
    pub fn add_set(&mut self, other: &SkillSet, bypass: bool) -> Result<(), SkillSetError> {
        for element in &other.elements {
            self.insert(element.clone(), bypass)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, skill_id: u32) -> Result<SkillSetElement, SkillSetError> {
        let i = self
            .position(skill_id)
            .ok_or(SkillSetError::NotFound(skill_id))?;
        Ok(self.elements.remove(i))
    }

    /// Removes every id present in `other`; ids missing here are ignored.
    pub fn remove_set(&mut self, other: &SkillSet) {
        self.elements.retain(|e| !other.contains(e.skill.id()));
    }

    pub fn set_enabled(&mut self, skill_id: u32, enabled: bool) -> Result<(), SkillSetError> {
        let i = self
            .position(skill_id)
            .ok_or(SkillSetError::NotFound(skill_id))?;
        self.elements[i].enabled = enabled;
        Ok(())
    }

    pub fn set_silenced(&mut self, silenced: bool) {
        for element in &mut self.elements {
            element.silenced = silenced;
        }
    }

    /// Skills usable at `level`, in set order.
    pub fn usable(&self, level: u32) -> impl Iterator<Item = &Arc<Skill>> {
        self.elements
            .iter()
            .filter(move |e| e.usable_at(level))
            .map(|e| &e.skill)
    }
}

impl AddAssign<&SkillSet> for SkillSet {
    fn add_assign(&mut self, rhs: &SkillSet) {
        // Bypass never fails.
        let _ = self.add_set(rhs, true);
    }
}

impl SubAssign<&SkillSet> for SkillSet {
    fn sub_assign(&mut self, rhs: &SkillSet) {
        self.remove_set(rhs);
    }
}

impl FromIterator<(Arc<Skill>, u32)> for SkillSet {
    fn from_iter<I: IntoIterator<Item = (Arc<Skill>, u32)>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for (skill, level) in iter {
            let _ = set.insert(SkillSetElement::new(skill, level), true);
        }
        set
    }
}

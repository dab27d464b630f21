//! Skill catalog loader.

use std::path::Path;

use anyhow::Context;
use battle_core::skill::ActionScope;
use battle_core::stats::Element;
use battle_core::{ContentRegistry, Skill};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One skill as written in `skills.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scope: ActionScope,
    /// Action ids, in application order.
    pub actions: Vec<u32>,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default = "full_chance")]
    pub chance: u32,
    #[serde(default)]
    pub primary: Element,
    #[serde(default)]
    pub secondary: Element,
    #[serde(default)]
    pub value: u32,
}

fn full_chance() -> u32 {
    100
}

impl SkillSpec {
    /// Build the skill against already-registered actions.
    ///
    /// An action id that is not registered (usually a rejected action line)
    /// is logged and left out; the skill keeps its remaining actions.
    pub fn resolve(self, registry: &ContentRegistry) -> Skill {
        let mut actions = Vec::with_capacity(self.actions.len());
        for id in &self.actions {
            match registry.action(*id) {
                Ok(action) => actions.push(action),
                Err(error) => {
                    tracing::warn!(skill = self.id, action = *id, %error, "skill action dropped");
                }
            }
        }
        Skill::new(self.id, self.name, self.scope)
            .with_description(self.description)
            .with_actions(actions)
            .with_cost(self.cost)
            .with_cooldown(self.cooldown)
            .with_chance(self.chance)
            .with_elements(self.primary, self.secondary)
            .with_value(self.value)
    }
}

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillSpec>,
}

/// Loader for skill catalog from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load skill catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<SkillSpec>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillSpec>> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        Ok(catalog.skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::action::{Action, ActionEffect, Magnitude};
    use battle_core::stats::Attribute;

    const CATALOG: &str = r#"(
        skills: [
            (
                id: 10,
                name: "Ember",
                scope: ONE_ENEMY,
                actions: [1, 99],
                cost: 6,
                primary: Fire,
            ),
        ],
    )"#;

    #[test]
    fn defaults_fill_the_gaps() {
        let specs = SkillLoader::parse(CATALOG).unwrap();
        assert_eq!(specs.len(), 1);
        let spec = &specs[0];
        assert_eq!(spec.scope, ActionScope::OneEnemy);
        assert_eq!(spec.chance, 100);
        assert_eq!(spec.cooldown, 0);
        assert_eq!(spec.primary, Element::Fire);
        assert_eq!(spec.secondary, Element::Physical);
    }

    #[test]
    fn unknown_actions_are_left_out() {
        let mut registry = ContentRegistry::new();
        registry
            .insert_action(
                Action::builder(1, ActionEffect::Damage { attribute: Attribute::Vita })
                    .base(Magnitude::Amount(12))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let skill = SkillLoader::parse(CATALOG).unwrap().remove(0).resolve(&registry);
        assert_eq!(skill.actions().len(), 1);
        assert_eq!(skill.cost(), 6);
        assert!(skill.is_offensive());
    }
}

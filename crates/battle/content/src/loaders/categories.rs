//! Category (class and race) catalog loader.

use std::path::Path;

use anyhow::Context;
use battle_core::skill::SkillSet;
use battle_core::state::{AilmentKind, BattleFlags};
use battle_core::stats::Attribute;
use battle_core::{Category, ContentRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, stats_from};

/// One category as written in `categories.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub id: u32,
    pub name: String,
    /// Stats at level 1.
    #[serde(default)]
    pub base: Vec<(Attribute, i32)>,
    /// Stats at the maximum level.
    #[serde(default)]
    pub top: Vec<(Attribute, i32)>,
    /// `(skill id, level required)` pairs.
    #[serde(default)]
    pub skills: Vec<(u32, u32)>,
    /// Action types this category allows; every type but IMPLODE when absent.
    #[serde(default)]
    pub permissions: Option<BattleFlags>,
    #[serde(default)]
    pub immunities: Vec<AilmentKind>,
    #[serde(default)]
    pub vita_regen: u32,
    #[serde(default)]
    pub qtdr_regen: u32,
}

impl CategorySpec {
    pub fn resolve(self, registry: &ContentRegistry) -> LoadResult<Category> {
        let mut skills = SkillSet::new();
        for (skill_id, level) in &self.skills {
            let skill = registry
                .skill(*skill_id)
                .with_context(|| format!("category {} teaches an unknown skill", self.id))?;
            skills
                .add(skill, *level)
                .with_context(|| format!("category {}", self.id))?;
        }

        let mut category = Category::new(self.id, self.name)
            .with_stats(stats_from(&self.base, true), stats_from(&self.top, true))
            .with_skills(skills)
            .with_immunities(self.immunities)
            .with_regen(self.vita_regen, self.qtdr_regen);
        if let Some(permissions) = self.permissions {
            category = category.with_permissions(permissions);
        }
        Ok(category)
    }
}

/// Category catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub categories: Vec<CategorySpec>,
}

/// Loader for category catalog from RON files.
pub struct CategoryLoader;

impl CategoryLoader {
    /// Load category catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<CategorySpec>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CategorySpec>> {
        let catalog: CategoryCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse category catalog RON: {}", e))?;

        Ok(catalog.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_and_regen() {
        let spec = CategoryLoader::parse(
            r#"(categories: [
                (
                    id: 1,
                    name: "Hermit",
                    base: [(VITA, 40)],
                    top: [(VITA, 400)],
                    permissions: Some("PAS_ENABLED | DEF_ENABLED | ALIVE"),
                    immunities: [POISON],
                    vita_regen: 5,
                ),
            ])"#,
        )
        .unwrap()
        .remove(0);

        let hermit = spec.resolve(&ContentRegistry::new()).unwrap();
        assert_eq!(hermit.permissions(), BattleFlags::PAS_ENABLED | BattleFlags::DEF_ENABLED);
        assert!(hermit.is_immune(AilmentKind::Poison));
        assert_eq!(hermit.vita_regen(), 5);
        assert_eq!(hermit.qtdr_regen(), 0);
        assert_eq!(hermit.top_stats().get(Attribute::Vita), 400);
    }
}

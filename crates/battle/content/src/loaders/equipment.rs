//! Equipment catalog loader.

use std::path::Path;

use anyhow::Context;
use battle_core::skill::SkillSet;
use battle_core::state::EquipSlot;
use battle_core::stats::Attribute;
use battle_core::{ContentRegistry, Equipment};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, stats_from};

/// One equipment piece as written in `equipment.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSpec {
    pub id: u32,
    pub name: String,
    pub slot: EquipSlot,
    #[serde(default)]
    pub two_handed: bool,
    #[serde(default)]
    pub stats: Vec<(Attribute, i32)>,
    /// `(skill id, level required)` pairs granted while equipped.
    #[serde(default)]
    pub skills: Vec<(u32, u32)>,
}

impl EquipmentSpec {
    pub fn resolve(self, registry: &ContentRegistry) -> LoadResult<Equipment> {
        let mut skills = SkillSet::new();
        for (skill_id, level) in &self.skills {
            let skill = registry
                .skill(*skill_id)
                .with_context(|| format!("equipment {} grants an unknown skill", self.id))?;
            skills
                .add(skill, *level)
                .with_context(|| format!("equipment {}", self.id))?;
        }

        let mut equipment = Equipment::new(self.id, self.name, self.slot)
            .with_stats(stats_from(&self.stats, false))
            .with_skills(skills);
        if self.two_handed {
            equipment = equipment.two_handed();
        }
        Ok(equipment)
    }
}

/// Equipment catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    pub equipment: Vec<EquipmentSpec>,
}

/// Loader for equipment catalog from RON files.
pub struct EquipmentLoader;

impl EquipmentLoader {
    /// Load equipment catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<EquipmentSpec>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EquipmentSpec>> {
        let catalog: EquipmentCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse equipment catalog RON: {}", e))?;

        Ok(catalog.equipment)
    }
}

//! Item catalog loader.

use std::path::Path;

use anyhow::Context;
use battle_core::{ContentRegistry, Item, ItemFlags};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One item as written in `items.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub flags: ItemFlags,
    /// Skill applied when the item is used in battle.
    #[serde(default)]
    pub use_skill: Option<u32>,
    #[serde(default)]
    pub value: u32,
}

impl ItemSpec {
    /// Build the item, resolving its skill of use.
    pub fn resolve(self, registry: &ContentRegistry) -> LoadResult<Item> {
        let mut item = Item::new(self.id, self.name, self.flags).with_value(self.value);
        if let Some(skill_id) = self.use_skill {
            let skill = registry
                .skill(skill_id)
                .with_context(|| format!("item {} uses an unknown skill", self.id))?;
            item = item.with_use_skill(skill);
        }
        Ok(item)
    }
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemSpec>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemSpec>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemSpec>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_missing_skills() {
        let specs = ItemLoader::parse(
            r#"(items: [
                (id: 70, name: "Tonic", flags: "CONSUMED | BATTLE_READY", use_skill: Some(5)),
                (id: 71, name: "Key", flags: "KEY_ITEM"),
            ])"#,
        )
        .unwrap();
        assert_eq!(specs[0].flags, ItemFlags::CONSUMED | ItemFlags::BATTLE_READY);
        assert_eq!(specs[1].use_skill, None);

        let registry = ContentRegistry::new();
        let key = specs[1].clone().resolve(&registry).unwrap();
        assert!(key.use_skill().is_none());
        assert!(specs[0].clone().resolve(&registry).is_err());
    }
}

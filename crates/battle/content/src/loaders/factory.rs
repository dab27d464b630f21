//! Content factory for building a registry from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use battle_core::{Action, BattleConfig, ContentRegistry};

use crate::loaders::{
    ActionLoader, CategoryLoader, CategorySpec, ConfigLoader, EquipmentLoader, EquipmentSpec,
    ItemLoader, ItemSpec, LoadResult, SkillLoader, SkillSpec,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── actions.csv
/// ├── skills.ron
/// ├── items.ron
/// ├── equipment.ron
/// └── categories.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the action definitions from `actions.csv`.
    pub fn load_actions(&self) -> LoadResult<Vec<Action>> {
        ActionLoader::load(&self.data_dir.join("actions.csv"))
    }

    /// Load skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillSpec>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemSpec>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load equipment catalog from `equipment.ron`.
    pub fn load_equipment(&self) -> LoadResult<Vec<EquipmentSpec>> {
        EquipmentLoader::load(&self.data_dir.join("equipment.ron"))
    }

    /// Load class and race categories from `categories.ron`.
    pub fn load_categories(&self) -> LoadResult<Vec<CategorySpec>> {
        CategoryLoader::load(&self.data_dir.join("categories.ron"))
    }

    /// Load every catalog and link them into one registry.
    ///
    /// Files are read in dependency order: actions, skills, items,
    /// equipment, categories. Duplicate ids and references to unknown
    /// skills are errors; skills that name a rejected action lose only that
    /// action.
    pub fn load_registry(&self) -> LoadResult<ContentRegistry> {
        let mut registry = ContentRegistry::new();

        for action in self.load_actions()? {
            registry.insert_action(action).context("actions.csv")?;
        }
        for spec in self.load_skills()? {
            let skill = spec.resolve(&registry);
            registry.insert_skill(skill).context("skills.ron")?;
        }
        for spec in self.load_items()? {
            let item = spec.resolve(&registry)?;
            registry.insert_item(item).context("items.ron")?;
        }
        for spec in self.load_equipment()? {
            let equipment = spec.resolve(&registry)?;
            registry.insert_equipment(equipment).context("equipment.ron")?;
        }
        for spec in self.load_categories()? {
            let category = spec.resolve(&registry)?;
            registry.insert_category(category).context("categories.ron")?;
        }

        let [actions, skills, items, equipment, categories] = registry.counts();
        tracing::debug!(
            data_dir = %self.data_dir.display(),
            actions,
            skills,
            items,
            equipment,
            categories,
            "content registry loaded"
        );
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let factory = ContentFactory::new("/nonexistent/battle-data");
        let error = factory.load_registry().unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}

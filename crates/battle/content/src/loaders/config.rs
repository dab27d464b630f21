//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Every field is optional; missing ones keep their
    /// [`BattleConfig::default`] value.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_defaults() {
        let config = ConfigLoader::parse(
            "run_chance = 75\npoison_percent = 10.0\n\n[ai]\nrandom_skill_chance = 0.5\n",
        )
        .unwrap();
        let defaults = BattleConfig::default();

        assert_eq!(config.run_chance, 75);
        assert_eq!(config.poison_percent, 10.0);
        assert_eq!(config.ai.random_skill_chance, 0.5);
        assert_eq!(config.crit_multiplier, defaults.crit_multiplier);
        assert_eq!(config.ai.priority_item_chance, defaults.ai.priority_item_chance);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ConfigLoader::parse("run_chance = \"often\"").is_err());
    }
}

//! Content loaders for reading battle data from files.
//!
//! Each loader reads one file into plain `*Spec` records; the
//! [`ContentFactory`] resolves their id references against a
//! [`ContentRegistry`](battle_core::ContentRegistry).

pub mod actions;
pub mod categories;
pub mod config;
pub mod equipment;
pub mod factory;
pub mod items;
pub mod skills;

pub use actions::ActionLoader;
pub use categories::{CategoryLoader, CategorySpec};
pub use config::ConfigLoader;
pub use equipment::{EquipmentLoader, EquipmentSpec};
pub use factory::ContentFactory;
pub use items::{ItemLoader, ItemSpec};
pub use skills::{SkillLoader, SkillSpec};

use std::path::Path;

use battle_core::stats::{Attribute, AttributeSet};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Stat blocks are written as `(ATTRIBUTE, value)` pairs.
pub(crate) fn stats_from(pairs: &[(Attribute, i32)], personal: bool) -> AttributeSet {
    AttributeSet::from_pairs(pairs, personal)
}

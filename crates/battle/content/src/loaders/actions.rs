//! Action file loader.

use std::path::Path;

use battle_core::Action;

use crate::loaders::{LoadResult, read_file};
use crate::text::parse_actions;

/// Loader for `actions.csv`.
pub struct ActionLoader;

impl ActionLoader {
    /// Load every valid action of a text file.
    ///
    /// Malformed lines are logged and skipped; only an unreadable file is an
    /// error.
    pub fn load(path: &Path) -> LoadResult<Vec<Action>> {
        let content = read_file(path)?;
        let actions = parse_actions(&content);
        tracing::debug!(path = %path.display(), count = actions.len(), "actions loaded");
        Ok(actions)
    }
}

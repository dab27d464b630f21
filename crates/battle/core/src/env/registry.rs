use std::collections::HashMap;
use std::sync::Arc;

use crate::action::Action;
use crate::error::{BattleFault, ErrorSeverity};
use crate::skill::Skill;
use crate::state::{Category, Equipment, Item};

/// Registry insert and lookup failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate {kind} id {id}")]
    Duplicate { kind: &'static str, id: u32 },

    #[error("unknown {kind} id {id}")]
    Missing { kind: &'static str, id: u32 },
}

impl BattleFault for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate { .. } => "REGISTRY_DUPLICATE",
            Self::Missing { .. } => "REGISTRY_MISSING",
        }
    }
}

/// Shared, immutable content keyed by id.
///
/// Everything handed out is an `Arc` clone, so definitions outlive any battle
/// that references them.
#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    actions: HashMap<u32, Arc<Action>>,
    skills: HashMap<u32, Arc<Skill>>,
    items: HashMap<u32, Arc<Item>>,
    equipment: HashMap<u32, Arc<Equipment>>,
    categories: HashMap<u32, Arc<Category>>,
}

fn insert_unique<T>(
    map: &mut HashMap<u32, Arc<T>>,
    kind: &'static str,
    id: u32,
    value: T,
) -> Result<Arc<T>, RegistryError> {
    if map.contains_key(&id) {
        return Err(RegistryError::Duplicate { kind, id });
    }
    let value = Arc::new(value);
    map.insert(id, Arc::clone(&value));
    Ok(value)
}

fn lookup<T>(map: &HashMap<u32, Arc<T>>, kind: &'static str, id: u32) -> Result<Arc<T>, RegistryError> {
    map.get(&id)
        .cloned()
        .ok_or(RegistryError::Missing { kind, id })
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    pub fn insert_action(&mut self, action: Action) -> Result<Arc<Action>, RegistryError> {
        let id = action.id();
        insert_unique(&mut self.actions, "action", id, action)
    }

    pub fn insert_skill(&mut self, skill: Skill) -> Result<Arc<Skill>, RegistryError> {
        let id = skill.id();
        insert_unique(&mut self.skills, "skill", id, skill)
    }

    pub fn insert_item(&mut self, item: Item) -> Result<Arc<Item>, RegistryError> {
        let id = item.game_id();
        insert_unique(&mut self.items, "item", id, item)
    }

    pub fn insert_equipment(&mut self, equipment: Equipment) -> Result<Arc<Equipment>, RegistryError> {
        let id = equipment.id();
        insert_unique(&mut self.equipment, "equipment", id, equipment)
    }

    pub fn insert_category(&mut self, category: Category) -> Result<Arc<Category>, RegistryError> {
        let id = category.id();
        insert_unique(&mut self.categories, "category", id, category)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn action(&self, id: u32) -> Result<Arc<Action>, RegistryError> {
        lookup(&self.actions, "action", id)
    }

    pub fn skill(&self, id: u32) -> Result<Arc<Skill>, RegistryError> {
        lookup(&self.skills, "skill", id)
    }

    pub fn item(&self, id: u32) -> Result<Arc<Item>, RegistryError> {
        lookup(&self.items, "item", id)
    }

    pub fn equipment(&self, id: u32) -> Result<Arc<Equipment>, RegistryError> {
        lookup(&self.equipment, "equipment", id)
    }

    pub fn category(&self, id: u32) -> Result<Arc<Category>, RegistryError> {
        lookup(&self.categories, "category", id)
    }

    /// Number of actions, skills, items, equipment pieces and categories.
    pub fn counts(&self) -> [usize; 5] {
        [
            self.actions.len(),
            self.skills.len(),
            self.items.len(),
            self.equipment.len(),
            self.categories.len(),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.counts().iter().all(|&n| n == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionEffect, Magnitude};
    use crate::skill::ActionScope;
    use crate::stats::Attribute;

    fn heal(id: u32) -> Action {
        Action::builder(id, ActionEffect::Alter { attribute: Attribute::Vita })
            .base(Magnitude::Amount(30))
            .build()
            .unwrap()
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut registry = ContentRegistry::new();
        registry.insert_action(heal(1)).unwrap();
        let err = registry.insert_action(heal(1)).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate { kind: "action", id: 1 });
        assert_eq!(err.error_code(), "REGISTRY_DUPLICATE");
    }

    #[test]
    fn lookups_share_the_same_allocation() {
        let mut registry = ContentRegistry::new();
        let action = registry.insert_action(heal(4)).unwrap();
        let skill = Skill::new(9, "Mend", ActionScope::OneAlly).with_action(registry.action(4).unwrap());
        registry.insert_skill(skill).unwrap();

        let fetched = registry.skill(9).unwrap();
        assert!(Arc::ptr_eq(&fetched.actions()[0], &action));
        assert!(matches!(
            registry.item(9),
            Err(RegistryError::Missing { kind: "item", id: 9 })
        ));
        assert_eq!(registry.counts(), [1, 1, 0, 0, 0]);
    }
}

//! Items and the party inventory.

use std::sync::Arc;

use bitflags::bitflags;

use crate::error::{BattleFault, ErrorSeverity};
use crate::skill::Skill;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ItemFlags: u8 {
        /// Used up when used in battle.
        const CONSUMED     = 1 << 0;
        const HEALING_ITEM = 1 << 1;
        const OFFENSIVE    = 1 << 2;
        const DEFENSIVE    = 1 << 3;
        /// Selectable from the battle menu.
        const BATTLE_READY = 1 << 4;
        const KEY_ITEM     = 1 << 5;
    }
}

/// An item definition. Shared through `Arc<Item>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    game_id: u32,
    name: String,
    flags: ItemFlags,
    use_skill: Option<Arc<Skill>>,
    value: u32,
}

impl Item {
    pub fn new(game_id: u32, name: impl Into<String>, flags: ItemFlags) -> Self {
        Self {
            game_id,
            name: name.into(),
            flags,
            use_skill: None,
            value: 0,
        }
    }

    pub fn with_use_skill(mut self, skill: Arc<Skill>) -> Self {
        self.use_skill = Some(skill);
        self
    }

    /// Credit value.
    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> ItemFlags {
        self.flags
    }

    pub fn use_skill(&self) -> Option<&Arc<Skill>> {
        self.use_skill.as_ref()
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_consumed(&self) -> bool {
        self.flags.contains(ItemFlags::CONSUMED)
    }

    /// Usable in battle: battle-ready, not a key item and carrying a skill.
    pub fn is_battle_usable(&self) -> bool {
        self.flags.contains(ItemFlags::BATTLE_READY)
            && !self.flags.contains(ItemFlags::KEY_ITEM)
            && self.use_skill.is_some()
    }
}

/// Inventory precondition failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("item {0} is not in the inventory")]
    NotFound(u32),

    #[error("item {item}: requested {requested}, have {available}")]
    Insufficient {
        item: u32,
        requested: u16,
        available: u16,
    },
}

impl BattleFault for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "INVENTORY_NOT_FOUND",
            Self::Insufficient { .. } => "INVENTORY_INSUFFICIENT",
        }
    }
}

/// One stack of identical items.
#[derive(Clone, Debug, PartialEq)]
pub struct InventoryEntry {
    pub item: Arc<Item>,
    pub count: u16,
}

/// Items and credits shared by a party.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
    credits: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn add_credits(&mut self, amount: u64) {
        self.credits = self.credits.saturating_add(amount);
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn count_of(&self, game_id: u32) -> u16 {
        self.entries
            .iter()
            .find(|e| e.item.game_id() == game_id)
            .map_or(0, |e| e.count)
    }

    /// Adds `count` copies, stacking with an existing entry.
    pub fn add(&mut self, item: Arc<Item>, count: u16) {
        if count == 0 {
            return;
        }
        match self
            .entries
            .iter_mut()
            .find(|e| e.item.game_id() == item.game_id())
        {
            Some(entry) => entry.count = entry.count.saturating_add(count),
            None => self.entries.push(InventoryEntry { item, count }),
        }
    }

    /// Removes `count` copies. Empty stacks are kept so a cancel can restore
    /// them in place.
    pub fn consume(&mut self, game_id: u32, count: u16) -> Result<(), InventoryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.item.game_id() == game_id)
            .ok_or(InventoryError::NotFound(game_id))?;
        if entry.count < count {
            return Err(InventoryError::Insufficient {
                item: game_id,
                requested: count,
                available: entry.count,
            });
        }
        entry.count -= count;
        Ok(())
    }

    /// Reverses a [`consume`](Self::consume).
    pub fn restore(&mut self, item: Arc<Item>, count: u16) {
        self.add(item, count);
    }

    /// Battle-usable stacks with at least one copy, in inventory order.
    pub fn take_battle_items(&self) -> Vec<InventoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.count > 0 && e.item.is_battle_usable())
            .cloned()
            .collect()
    }

    /// Drops empty stacks.
    pub fn compact(&mut self) {
        self.entries.retain(|e| e.count > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::ActionScope;

    fn potion() -> Arc<Item> {
        Arc::new(
            Item::new(10, "Potion", ItemFlags::CONSUMED | ItemFlags::BATTLE_READY)
                .with_use_skill(Arc::new(Skill::new(1, "Mend", ActionScope::OneAlly))),
        )
    }

    #[test]
    fn consume_and_restore() {
        let mut inv = Inventory::new();
        inv.add(potion(), 2);
        inv.consume(10, 1).unwrap();
        assert_eq!(inv.count_of(10), 1);
        assert_eq!(
            inv.consume(10, 2),
            Err(InventoryError::Insufficient {
                item: 10,
                requested: 2,
                available: 1
            })
        );
        inv.restore(potion(), 1);
        assert_eq!(inv.count_of(10), 2);
        assert_eq!(inv.consume(99, 1), Err(InventoryError::NotFound(99)));
    }

    #[test]
    fn battle_items_skip_key_and_empty() {
        let mut inv = Inventory::new();
        inv.add(potion(), 1);
        inv.add(Arc::new(Item::new(11, "Key", ItemFlags::KEY_ITEM)), 1);
        assert_eq!(inv.take_battle_items().len(), 1);

        inv.consume(10, 1).unwrap();
        assert!(inv.take_battle_items().is_empty());
        inv.compact();
        assert_eq!(inv.entries().len(), 1);
    }
}

//! Battle participants and what they carry.
//!
//! - [`Person`]: the battler with its stat layers, flags and ailments
//! - [`Party`]: up to five persons plus a shared [`Inventory`]
//! - [`Category`]: class or race data a person is built from
//! - [`Item`], [`Equipment`]: shared definitions referenced through `Arc`

mod ailment;
mod category;
mod equipment;
mod flags;
mod item;
mod party;
mod person;

pub use ailment::{Ailment, AilmentDuration, AilmentKind, TickEffect};
pub use category::Category;
pub use equipment::{EquipError, EquipSlot, EquipSlots, Equipment};
pub use flags::{BattleFlags, PersonFlags};
pub use item::{Inventory, InventoryEntry, InventoryError, Item, ItemFlags};
pub use party::{Party, PartyType, PersonIndex, sort_canonical};
pub use person::{InflictError, InflictOutcome, Person, PersonError, PersonSpec};

#[cfg(test)]
pub(crate) use person::tests::{flat_category, person_with};

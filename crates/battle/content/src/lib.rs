//! Data-driven battle content.
//!
//! - Action text parsing (always available, see [`text`])
//! - RON catalogs for skills, items, equipment and categories
//! - `BattleConfig` overrides from TOML
//!
//! Everything loads into a [`battle_core::ContentRegistry`]; battles never
//! read files themselves.

pub mod text;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use text::{ParseError, parse_action, parse_actions};

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionLoader, CategoryLoader, CategorySpec, ConfigLoader, ContentFactory, EquipmentLoader,
    EquipmentSpec, ItemLoader, ItemSpec, SkillLoader, SkillSpec,
};

//! Environment handed to the battle core from the outside.
//!
//! - [`BattleRng`]: the single source of randomness
//! - [`BattleContext`]: id allocation and the exp curve
//! - [`ContentRegistry`]: shared, immutable actions, skills, items and categories

mod context;
mod registry;
mod rng;

pub use context::BattleContext;
pub use registry::{ContentRegistry, RegistryError};
pub use rng::{BattleRng, PcgRng};

#[cfg(test)]
pub(crate) use rng::tests::ScriptedRng;

//! Turn-based battle rules shared by the game client and offline tools.
//!
//! `battle-core` owns the battle state machine ([`battle::Battle`]), the
//! persons and parties that fight in it, and the pure combat formulas. It
//! performs no I/O: content arrives as already-built values (see
//! [`env::ContentRegistry`]) and every random number is drawn from the
//! [`env::BattleRng`] handed to the battle.
pub mod action;
pub mod ai;
pub mod battle;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod skill;
pub mod state;
pub mod stats;

pub use action::{Action, ActionBuilder, ActionEffect, ActionError, ActionKind, Magnitude};
pub use ai::{AiContext, AiDecision, AiDifficulty, AiModule};
pub use battle::{
    ActionPlan, ActionType, Battle, BattleError, BattleEvent, BattleMenu, BattleObserver,
    BattleOutcome, BattleStatus, EventBuffer, EventKind, InputKey, MenuLayer, OutcomeKind,
    Rewards, Roster, TurnMode, TurnState,
};
pub use config::{AiTuning, BattleConfig};
pub use env::{BattleContext, BattleRng, ContentRegistry, PcgRng, RegistryError};
pub use error::{BattleFault, ErrorContext, ErrorSeverity};
pub use skill::{ActionScope, Skill, SkillSet};
pub use state::{
    Ailment, AilmentDuration, AilmentKind, BattleFlags, Category, EquipSlot, Equipment, Inventory,
    Item, ItemFlags, Party, PartyType, Person, PersonFlags, PersonIndex, PersonSpec,
};
pub use stats::{Attribute, AttributeSet, Curve, Element};

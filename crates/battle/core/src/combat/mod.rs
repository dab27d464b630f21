//! Combat resolution.
//!
//! Pure formulas for hit, dodge, damage, criticals and magnitudes. The battle
//! module decides *when* they run and applies the results to persons.
//!
//! # Core Functions
//!
//! - `dodge_chance` / `calculate_hit_chance` / `check_hit`: the hit roll
//! - `raw_damage` .. `roll_damage`: the damage pipeline
//! - `roll_amount`: heal, revive, alter and assign magnitudes

pub mod damage;
pub mod hit;

pub use damage::{
    DamageRoll, apply_base, crit_chance, elemental_modifier, raw_damage, roll_amount, roll_damage,
    roll_variance,
};
pub use hit::{calculate_hit_chance, check_hit, dodge_chance};

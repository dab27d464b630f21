//! Layer 1: which action type.
//!
//! # Formula
//!
//! ```text
//! chance(t) = max(0, base(t) + U(-v, +v))
//! SKILL    base × offensive_factor    (an offensive skill is valid)
//!          base × defensive_factor    (only defensive skills are valid)
//! ITEM     base + (100 - QTDR%) × item_lean_factor
//! GUARD    guard_chance    DEFEND  defend_chance    IMPLODE  implode_chance
//! PASS     only when every other chance is 0
//! ```
//!
//! The type is drawn with probability `chance(t) / Σ chance`.

use arrayvec::ArrayVec;

use crate::battle::ActionType;
use crate::config::AiTuning;
use crate::env::BattleRng;
use crate::state::BattleFlags;

use super::AiDifficulty;
use super::context::AiContext;

/// Weighted action types for one decision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeChances {
    entries: ArrayVec<(ActionType, f64), 7>,
}

impl TypeChances {
    pub fn entries(&self) -> &[(ActionType, f64)] {
        &self.entries
    }

    pub fn get(&self, kind: ActionType) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0.0, |(_, c)| *c)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    fn push(&mut self, kind: ActionType, chance: f64) {
        if chance > 0.0 {
            self.entries.push((kind, chance));
        }
    }

    /// Draw a type proportionally to its chance; PASS when nothing weighs.
    pub fn sample(&self, rng: &mut dyn BattleRng) -> ActionType {
        let total = self.total();
        if total <= 0.0 {
            return ActionType::Pass;
        }
        let mut roll = rng.unit() * total;
        for &(kind, chance) in &self.entries {
            if roll < chance {
                return kind;
            }
            roll -= chance;
        }
        self.entries
            .last()
            .map_or(ActionType::Pass, |(kind, _)| *kind)
    }
}

fn jitter(base: f64, variance: f64, rng: &mut dyn BattleRng) -> f64 {
    (base + (rng.unit() * 2.0 - 1.0) * variance).max(0.0)
}

/// Chances of every type the user can take right now.
pub fn type_chances(
    ctx: &AiContext<'_>,
    difficulty: AiDifficulty,
    tuning: &AiTuning,
    rng: &mut dyn BattleRng,
) -> TypeChances {
    let mut chances = TypeChances::default();
    let v = tuning.chance_variance;

    if ctx.allows(ActionType::Skill) {
        let base = match difficulty {
            AiDifficulty::Random => tuning.random_skill_chance,
            AiDifficulty::Priority => tuning.priority_skill_chance,
        };
        let offensive = ctx.valid_skills().any(|(_, s)| s.skill.is_offensive());
        let defensive = ctx.valid_skills().any(|(_, s)| s.skill.is_defensive());
        let factor = if offensive {
            tuning.offensive_factor
        } else if defensive {
            tuning.defensive_factor
        } else {
            1.0
        };
        chances.push(ActionType::Skill, jitter(base * factor, v, rng));
    }

    if ctx.allows(ActionType::Item) {
        let base = match difficulty {
            AiDifficulty::Random => tuning.random_item_chance,
            AiDifficulty::Priority => tuning.priority_item_chance,
        };
        let lean = (100.0 - ctx.qtdr_percent()).max(0.0) * tuning.item_lean_factor;
        chances.push(ActionType::Item, jitter(base + lean, v, rng));
    }

    let guarding = ctx
        .person()
        .is_some_and(|p| p.has_flag(BattleFlags::GUARDING));
    if ctx.allows(ActionType::Guard) && !guarding {
        chances.push(ActionType::Guard, jitter(tuning.guard_chance, v, rng));
    }

    if ctx.allows(ActionType::Defend) {
        chances.push(ActionType::Defend, jitter(tuning.defend_chance, v, rng));
    }

    if ctx.allows(ActionType::Implode) {
        chances.push(ActionType::Implode, jitter(tuning.implode_chance, v, rng));
    }

    chances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    #[test]
    fn sampling_walks_cumulative_weights() {
        let mut chances = TypeChances::default();
        chances.push(ActionType::Skill, 0.6);
        chances.push(ActionType::Defend, 0.4);
        chances.push(ActionType::Guard, 0.0);
        assert_eq!(chances.entries().len(), 2);

        // unit() = 0.5 → roll 0.5 < 0.6
        let mut rng = ScriptedRng::new(vec![1 << 31]);
        assert_eq!(chances.sample(&mut rng), ActionType::Skill);

        // unit() = 0.75 → roll 0.75 - 0.6 = 0.15 < 0.4
        let mut rng = ScriptedRng::new(vec![3 << 30]);
        assert_eq!(chances.sample(&mut rng), ActionType::Defend);
    }

    #[test]
    fn empty_chances_pass() {
        let mut rng = ScriptedRng::new(vec![0]);
        assert_eq!(TypeChances::default().sample(&mut rng), ActionType::Pass);
    }

    #[test]
    fn jitter_is_symmetric_and_floored() {
        // unit() = 0 → base - v
        let mut rng = ScriptedRng::new(vec![0]);
        assert!((jitter(0.5, 0.05, &mut rng) - 0.45).abs() < 1e-9);
        let mut rng = ScriptedRng::new(vec![0]);
        assert_eq!(jitter(0.01, 0.05, &mut rng), 0.0);
    }
}

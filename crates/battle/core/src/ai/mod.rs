//! Foe decision-making.
//!
//! Each decision runs three layers over an [`AiContext`]:
//!
//! 1. **Type** ([`chances`]): weighted draw among the action types the foe
//!    may take.
//! 2. **Option**: which skill or item. Random picks uniformly; Priority draws
//!    proportionally to `value × offensive/defensive factor`.
//! 3. **Targets** ([`targets`]): interpret the option's scope.
//!
//! Every draw comes from the battle's PRNG, so decisions replay exactly.

mod chances;
mod context;
mod targets;

pub use chances::{TypeChances, type_chances};
pub use context::AiContext;
pub use targets::{select_targets, select_ward};

use crate::battle::ActionType;
use crate::config::AiTuning;
use crate::env::BattleRng;
use crate::skill::Skill;
use crate::state::PersonIndex;

/// How a foe weighs its options.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AiDifficulty {
    #[default]
    Random,
    Priority,
}

/// Output of one decision. Frozen once returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiDecision {
    pub kind: ActionType,
    /// Index into the context's skills or items, for SKILL and ITEM.
    pub index: Option<usize>,
    pub targets: Vec<PersonIndex>,
}

impl AiDecision {
    fn pass(user: PersonIndex) -> Self {
        Self {
            kind: ActionType::Pass,
            index: None,
            targets: vec![user],
        }
    }
}

/// Per-foe decision procedure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiModule {
    difficulty: AiDifficulty,
}

impl AiModule {
    pub fn new(difficulty: AiDifficulty) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> AiDifficulty {
        self.difficulty
    }

    /// Pick an action type, an option and targets.
    pub fn calculate_action(
        &self,
        ctx: &AiContext<'_>,
        tuning: &AiTuning,
        rng: &mut dyn BattleRng,
    ) -> AiDecision {
        let chances = type_chances(ctx, self.difficulty, tuning, rng);
        let kind = if chances.total() > 0.0 {
            chances.sample(rng)
        } else if ctx.allows(ActionType::Pass) || ctx.action_types.is_empty() {
            ActionType::Pass
        } else {
            ctx.action_types[0]
        };

        let decision = match kind {
            ActionType::Skill => {
                let options: Vec<(usize, &Skill, u32)> = ctx
                    .valid_skills()
                    .map(|(i, s)| (i, s.skill.as_ref(), s.skill.value()))
                    .collect();
                self.pick(&options, tuning, rng).map(|index| {
                    let choice = &ctx.skills[index];
                    let targets = select_targets(
                        ctx,
                        choice.skill.scope(),
                        &choice.targets,
                        self.difficulty,
                        rng,
                    );
                    AiDecision {
                        kind,
                        index: Some(index),
                        targets,
                    }
                })
            }
            ActionType::Item => {
                let options: Vec<(usize, &Skill, u32)> = ctx
                    .valid_items()
                    .filter_map(|(i, it)| it.skill().map(|s| (i, s.as_ref(), it.item.value())))
                    .collect();
                self.pick(&options, tuning, rng).and_then(|index| {
                    let choice = &ctx.items[index];
                    let scope = choice.skill()?.scope();
                    let targets =
                        select_targets(ctx, scope, &choice.targets, self.difficulty, rng);
                    Some(AiDecision {
                        kind,
                        index: Some(index),
                        targets,
                    })
                })
            }
            other => Some(AiDecision {
                kind: other,
                index: None,
                targets: targets::stance_targets(ctx, other, rng),
            }),
        };

        let decision = decision
            .filter(|d| !d.targets.is_empty())
            .unwrap_or_else(|| AiDecision::pass(ctx.user));
        tracing::debug!(
            user = %ctx.user,
            difficulty = %self.difficulty,
            kind = %decision.kind,
            index = ?decision.index,
            targets = ?decision.targets,
            "ai decision"
        );
        decision
    }

    /// Choose among `(index, skill, value)` options.
    fn pick(
        &self,
        options: &[(usize, &Skill, u32)],
        tuning: &AiTuning,
        rng: &mut dyn BattleRng,
    ) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        if self.difficulty == AiDifficulty::Random {
            return Some(options[rng.index(options.len())].0);
        }

        let weights: Vec<f64> = options
            .iter()
            .map(|(_, skill, value)| {
                let factor = if skill.is_offensive() {
                    tuning.offensive_factor
                } else {
                    tuning.defensive_factor
                };
                f64::from(*value) * factor
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Some(options[rng.index(options.len())].0);
        }

        let mut roll = rng.unit() * total;
        for (option, weight) in options.iter().zip(&weights) {
            if roll < *weight {
                return Some(option.0);
            }
            roll -= weight;
        }
        options.last().map(|o| o.0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::action::{Action, ActionEffect, Magnitude};
    use crate::battle::{BattleSkill, Roster, ValidStatus, battle_items, battle_skills, valid_action_types};
    use crate::env::{PcgRng, ScriptedRng};
    use crate::skill::ActionScope;
    use crate::state::{BattleFlags, Party, PartyType, person_with};
    use crate::stats::Attribute;

    fn strike(value: u32, scope: ActionScope) -> Arc<Skill> {
        let action = Action::builder(1, ActionEffect::Damage { attribute: Attribute::Vita })
            .base(Magnitude::Amount(5))
            .build()
            .unwrap();
        Arc::new(
            Skill::new(value, format!("strike-{value}"), scope)
                .with_action(Arc::new(action))
                .with_value(value),
        )
    }

    /// One foe (-1) against three friends with VITA 30, 10 and 20.
    fn roster(skills: &[Arc<Skill>]) -> Roster {
        let mut friends = Party::new(PartyType::Sleuth);
        for vita in [30, 10, 20] {
            friends.add_member(person_with(&[(Attribute::Vita, vita)])).unwrap();
        }
        let mut foe = person_with(&[(Attribute::Vita, 40), (Attribute::Qtdr, 10)]);
        for skill in skills {
            foe.learn_skill(Arc::clone(skill), 1).unwrap();
        }
        let mut foes = Party::new(PartyType::RegularFoe);
        foes.add_member(foe).unwrap();
        Roster::new(friends, foes)
    }

    #[test]
    fn priority_targets_the_weakest_enemy() {
        let roster = roster(&[strike(5, ActionScope::OneEnemy)]);
        let user = PersonIndex::foe(1);
        let skills = battle_skills(&roster, user);
        let ctx = AiContext::new(user, &roster, &[ActionType::Skill], &skills, &[]);
        let mut rng = PcgRng::new(3);

        let ai = AiModule::new(AiDifficulty::Priority);
        for _ in 0..8 {
            let decision = ai.calculate_action(&ctx, &AiTuning::default(), &mut rng);
            assert_eq!(decision.kind, ActionType::Skill);
            assert_eq!(decision.index, Some(0));
            assert_eq!(decision.targets, vec![PersonIndex::friend(2)]);
        }
    }

    #[test]
    fn two_target_scopes_pick_distinct() {
        let roster = roster(&[strike(5, ActionScope::TwoEnemies)]);
        let user = PersonIndex::foe(1);
        let skills = battle_skills(&roster, user);
        let ctx = AiContext::new(user, &roster, &[ActionType::Skill], &skills, &[]);
        let mut rng = PcgRng::new(11);

        for _ in 0..16 {
            let decision = AiModule::default().calculate_action(&ctx, &AiTuning::default(), &mut rng);
            assert_eq!(decision.targets.len(), 2);
            assert_ne!(decision.targets[0], decision.targets[1]);
            assert!(decision.targets.iter().all(|t| t.is_friend()));
        }
    }

    #[test]
    fn priority_weights_by_value() {
        let roster = roster(&[strike(1, ActionScope::OneEnemy), strike(99, ActionScope::OneEnemy)]);
        let user = PersonIndex::foe(1);
        let skills = battle_skills(&roster, user);

        // Roll 0.5 of a total of 100 lands in the heavy skill.
        let mut rng = ScriptedRng::new(vec![1 << 31]);
        let ai = AiModule::new(AiDifficulty::Priority);
        assert_eq!(ai.pick(
            &[(0, skills[0].skill.as_ref(), 1), (1, skills[1].skill.as_ref(), 99)],
            &AiTuning::default(),
            &mut rng,
        ), Some(1));
    }

    #[test]
    fn nothing_valid_means_pass() {
        let roster = roster(&[]);
        let user = PersonIndex::foe(1);
        let skills: Vec<BattleSkill> = Vec::new();
        let ctx = AiContext::new(user, &roster, &[ActionType::Pass], &skills, &[]);
        let mut rng = PcgRng::new(5);
        let decision = AiModule::default().calculate_action(&ctx, &AiTuning::default(), &mut rng);
        assert_eq!(decision.kind, ActionType::Pass);
        assert_eq!(decision.targets, vec![user]);
    }

    #[test]
    fn unaffordable_skills_are_never_chosen() {
        let pricey = Arc::new(
            Skill::new(7, "Nova", ActionScope::AllEnemies)
                .with_action(strike(1, ActionScope::OneEnemy).actions()[0].clone())
                .with_cost(50),
        );
        let roster = roster(&[pricey]);
        let user = PersonIndex::foe(1);
        let skills = battle_skills(&roster, user);
        assert_eq!(skills[0].status, ValidStatus::NotAffordable);

        let items = battle_items(&roster, user);
        let types = valid_action_types(&roster, user, &skills, &items, true);
        assert!(!types.contains(&ActionType::Skill));

        let ctx = AiContext::new(user, &roster, &types, &skills, &items);
        let mut rng = PcgRng::new(9);
        for _ in 0..16 {
            let decision = AiModule::default().calculate_action(&ctx, &AiTuning::default(), &mut rng);
            assert_ne!(decision.kind, ActionType::Skill);
            assert_ne!(decision.kind, ActionType::Guard);
        }
        assert!(roster.get(user).unwrap().has_flag(BattleFlags::DEF_ENABLED));
    }
}

//! SELECT_ACTION_ALLY and SELECT_ACTION_ENEMY.
//!
//! Allies decide one at a time through the menu, foes all at once through
//! their AI module. Either way a person with TWO_SKILLS or THREE_SKILLS is
//! queued once per cast, and the cost of each plan is taken before the next
//! decision is built.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::ai::{AiContext, AiDecision};
use crate::state::{BattleFlags, Person, PersonIndex};

use super::options::{BattleItem, BattleSkill, battle_items, battle_skills, valid_action_types};
use super::plan::{ActionPlan, ActionType};
use super::{Battle, BattleStatus};

impl Battle {
    pub(super) fn begin_ally_selection(&mut self) {
        self.ally_queue = self.casters(self.roster.friend_indices());
        self.input.clear();
        self.next_ally();
    }

    /// Hand the menu to the next ally in the queue, or finish the phase.
    fn next_ally(&mut self) {
        while let Some(&actor) = self.ally_queue.front() {
            if self.roster.is_alive(actor) {
                let (types, skills, items) = self.options_for(actor);
                self.menu.set_actor(actor, types, skills, items);
                return;
            }
            self.ally_queue.pop_front();
        }
        self.menu.clear();
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    pub(super) fn drain_input(&mut self) {
        while !self.status.has(BattleStatus::PHASE_DONE) {
            let Some(key) = self.input.pop_front() else {
                break;
            };
            if let Some(plan) = self.menu.handle(key, &mut self.roster) {
                self.ally_queue.pop_front();
                self.record_plan(plan);
                self.next_ally();
            }
        }
    }

    pub(super) fn select_enemy_actions(&mut self) {
        let queue = self.casters(self.roster.foe_indices());
        for user in queue {
            if !self.roster.is_alive(user) {
                continue;
            }
            let (types, skills, items) = self.options_for(user);
            let ai = self
                .roster
                .get(user)
                .and_then(Person::ai)
                .cloned()
                .unwrap_or_default();
            let decision = {
                let ctx = AiContext::new(user, &self.roster, &types, &skills, &items);
                ai.calculate_action(&ctx, &self.config.ai, self.rng.as_mut())
            };
            let plan = self.plan_from_decision(user, decision, &skills, &items);
            self.record_plan(plan);
        }
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    /// Living persons able to act this turn, once per cast.
    fn casters(&self, indices: impl Iterator<Item = PersonIndex>) -> VecDeque<PersonIndex> {
        let mut queue = VecDeque::new();
        for index in indices {
            let Some(person) = self.roster.get(index) else {
                continue;
            };
            if !person.is_alive() || person.has_flag(BattleFlags::SKIP_NEXT_TURN) {
                continue;
            }
            let casts = if person.has_flag(BattleFlags::THREE_SKILLS) {
                3
            } else if person.has_flag(BattleFlags::TWO_SKILLS) {
                2
            } else {
                1
            };
            queue.extend(std::iter::repeat_n(index, casts));
        }
        queue
    }

    fn options_for(&self, user: PersonIndex) -> (Vec<ActionType>, Vec<BattleSkill>, Vec<BattleItem>) {
        let skills = battle_skills(&self.roster, user);
        let items = battle_items(&self.roster, user);
        let random_encounter = self.status.has(BattleStatus::RANDOM_ENCOUNTER);
        let types = valid_action_types(&self.roster, user, &skills, &items, random_encounter);
        (types, skills, items)
    }

    /// Turn an AI decision into a plan, paying its cost up front.
    fn plan_from_decision(
        &mut self,
        user: PersonIndex,
        decision: AiDecision,
        skills: &[BattleSkill],
        items: &[BattleItem],
    ) -> ActionPlan {
        let mut plan = ActionPlan::new(user, decision.kind);
        plan.targets = decision.targets;

        match decision.kind {
            ActionType::Skill => {
                let Some(choice) = decision.index.and_then(|i| skills.get(i)) else {
                    return ActionPlan::pass(user);
                };
                let paid = self
                    .roster
                    .get_mut(user)
                    .is_some_and(|p| p.spend_qtdr(choice.cost).is_ok());
                if !paid {
                    return ActionPlan::pass(user);
                }
                plan.skill = Some(Arc::clone(&choice.skill));
                plan.qtdr_paid = choice.cost;
            }
            ActionType::Item => {
                let Some(choice) = decision.index.and_then(|i| items.get(i)) else {
                    return ActionPlan::pass(user);
                };
                if choice.item.is_consumed() {
                    let inventory = self.roster.party_of_mut(user).inventory_mut();
                    if inventory.consume(choice.item.game_id(), 1).is_err() {
                        return ActionPlan::pass(user);
                    }
                }
                plan.item = Some(Arc::clone(&choice.item));
            }
            _ => {}
        }
        plan
    }

    fn record_plan(&mut self, mut plan: ActionPlan) {
        plan.jitter = self.rng.next_u32();
        tracing::debug!(
            user = %plan.user,
            kind = %plan.kind,
            skill = plan.skill.as_ref().map(|s| s.id()),
            item = plan.item.as_ref().map(|i| i.game_id()),
            targets = ?plan.targets,
            qtdr_paid = plan.qtdr_paid,
            "plan recorded"
        );
        self.plans.push(plan);
    }
}

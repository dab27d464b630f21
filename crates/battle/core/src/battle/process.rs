//! ORDER_ACTIONS and PROCESS_ACTIONS.

use std::sync::Arc;

use crate::error::{BattleFault, ErrorContext};
use crate::state::{BattleFlags, Person, PersonIndex};

use super::events::{BattleEvent, EventKind};
use super::outcome::{OutcomeKind, Rewards};
use super::plan::{ActionPlan, ActionType, order_plans};
use super::{Battle, BattleError, BattleStatus};

impl Battle {
    pub(super) fn order_actions(&mut self) {
        let roster = &self.roster;
        order_plans(&mut self.plans, |user| roster.get(user).map_or(0, Person::momentum));
        tracing::debug!(
            order = ?self.plans.iter().map(|p| (p.user, p.kind)).collect::<Vec<_>>(),
            "plans ordered"
        );
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    /// Perform every plan in order until one side is wiped out or the
    /// friends escape.
    pub(super) fn process_actions(&mut self) {
        let plans = std::mem::take(&mut self.plans);
        for plan in &plans {
            if self.side_wiped() || self.status.has(BattleStatus::ESCAPED) {
                break;
            }
            if !self.roster.is_alive(plan.user) {
                self.skip_plan(plan);
                continue;
            }
            self.settle_stances(plan);
            match plan.kind {
                ActionType::Skill => self.perform_skill(plan),
                ActionType::Item => self.perform_item(plan),
                ActionType::Defend => self.perform_defend(plan.user),
                ActionType::Guard => self.perform_guard(plan),
                ActionType::Implode => self.perform_implode(plan),
                ActionType::Run => self.perform_run(plan.user),
                ActionType::Pass => {
                    self.events
                        .push(BattleEvent::new(EventKind::Pass, Some(plan.user), vec![plan.user]));
                }
            }
        }
        self.plans = plans;
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    /// The user fell before acting: the plan is dropped and an unused item
    /// goes back to the inventory.
    fn skip_plan(&mut self, plan: &ActionPlan) {
        let error = BattleError::StalePlan {
            user: plan.user,
            context: ErrorContext::new(self.turn)
                .with_actor(plan.user)
                .with_message("plan user fell before acting"),
        };
        tracing::debug!(code = error.error_code(), %error, "plan skipped");

        if let Some(item) = plan.item.as_ref().filter(|item| item.is_consumed()) {
            self.roster
                .party_of_mut(plan.user)
                .inventory_mut()
                .restore(Arc::clone(item), 1);
        }
    }

    /// Any plan other than DEFEND drops the defend stance; any plan other
    /// than GUARD releases the ward.
    fn settle_stances(&mut self, plan: &ActionPlan) {
        let user = plan.user;
        let Some(person) = self.roster.get_mut(user) else {
            return;
        };
        if plan.kind != ActionType::Defend && person.has_flag(BattleFlags::DEFENDING) {
            person.battle_flags_mut().clear(BattleFlags::DEFENDING);
            self.events.create_defend(EventKind::DefendBreak, user);
        }
        if plan.kind != ActionType::Guard {
            self.release_ward(user);
        }
    }

    fn release_ward(&mut self, guardian: PersonIndex) {
        let Some(ward) = self.roster.get_mut(guardian).and_then(|p| p.end_guard()) else {
            return;
        };
        if let Some(person) = self.roster.get_mut(ward) {
            person.set_guarded_by(None);
        }
        self.events.create_guard(EventKind::GuardBreak, guardian, ward);
    }

    fn perform_skill(&mut self, plan: &ActionPlan) {
        let user = plan.user;
        let Some(skill) = plan.skill.as_ref() else {
            self.events.create_fizzle(user, plan.targets.clone(), None);
            return;
        };
        let permission = if skill.is_physical_attack() {
            BattleFlags::ATK_ENABLED
        } else {
            BattleFlags::SKL_ENABLED
        };
        let usable = self
            .roster
            .get(user)
            .is_some_and(|p| !p.is_silenced() && p.has_flag(permission));
        if !usable {
            tracing::debug!(%user, skill = skill.id(), "skill no longer usable");
            self.events.create_fizzle(user, plan.targets.clone(), None);
            return;
        }

        self.events
            .create_skill(user, Arc::clone(skill), plan.targets.clone());
        self.apply_skill(user, skill, &plan.targets);
        if let Some(person) = self.roster.get_mut(user) {
            person.start_cooldown(skill.id(), skill.cooldown());
        }
    }

    fn perform_item(&mut self, plan: &ActionPlan) {
        let user = plan.user;
        let Some(item) = plan.item.as_ref() else {
            self.events.create_fizzle(user, plan.targets.clone(), None);
            return;
        };
        if !self.roster.has_flag(user, BattleFlags::ITM_ENABLED) {
            self.events.create_fizzle(user, plan.targets.clone(), None);
            return;
        }

        self.events
            .create_item(user, Arc::clone(item), plan.targets.clone());
        match item.use_skill() {
            Some(skill) => self.apply_skill(user, skill, &plan.targets),
            None => {
                self.events.create_fizzle(user, plan.targets.clone(), None);
            }
        }
    }

    fn perform_defend(&mut self, user: PersonIndex) {
        let Some(person) = self.roster.get_mut(user) else {
            return;
        };
        let kind = if person.has_flag(BattleFlags::DEFENDING) {
            EventKind::DefendPersist
        } else {
            person.battle_flags_mut().insert(BattleFlags::DEFENDING);
            EventKind::DefendBegin
        };
        self.events.create_defend(kind, user);
    }

    fn perform_guard(&mut self, plan: &ActionPlan) {
        let user = plan.user;
        let Some(&ward) = plan.targets.first() else {
            self.events.create_fizzle(user, Vec::new(), None);
            return;
        };
        let already = self.roster.get(user).and_then(Person::guarding) == Some(ward);
        let available = ward != user
            && ward.same_side(user)
            && self.roster.get(ward).is_some_and(|w| {
                w.is_alive() && (!w.has_flag(BattleFlags::GUARDED) || w.guarded_by() == Some(user))
            });
        if !available {
            self.events.create_fizzle(user, vec![ward], None);
            return;
        }

        if !already {
            self.release_ward(user);
            if let Some(person) = self.roster.get_mut(user) {
                person.begin_guard(ward);
            }
            if let Some(person) = self.roster.get_mut(ward) {
                person.set_guarded_by(Some(user));
            }
        }
        self.events.create_guard(EventKind::GuardBegin, user, ward);
    }

    /// Spend the user's remaining VITA on every living opponent.
    fn perform_implode(&mut self, plan: &ActionPlan) {
        let user = plan.user;
        let Some(vita) = self.roster.get(user).map(Person::vita) else {
            return;
        };
        let amount = ((f64::from(vita) * self.config.implode_modifier).round() as i64).clamp(
            i64::from(self.config.min_damage),
            i64::from(self.config.max_damage),
        ) as i32;
        let victims = self.roster.living_opponents(user);
        self.events.push(
            BattleEvent::new(EventKind::Implode, Some(user), victims.clone()).with_amount(amount),
        );
        for victim in victims {
            self.hurt(Some(user), victim, amount, None, false);
        }
        self.kill(Some(user), user);
    }

    fn perform_run(&mut self, user: PersonIndex) {
        let escaped = self.status.has(BattleStatus::RANDOM_ENCOUNTER)
            && self.rng.percent(f64::from(self.config.run_chance));
        if !escaped {
            self.events
                .push(BattleEvent::new(EventKind::RunFail, Some(user), vec![user]));
            return;
        }
        self.events
            .push(BattleEvent::new(EventKind::RunAway, Some(user), vec![user]));
        self.status.insert(BattleStatus::ESCAPED);
        self.finish(OutcomeKind::Escaped, Rewards::default());
    }
}

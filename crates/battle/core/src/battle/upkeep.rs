//! General and personal upkeep.
//!
//! # Personal upkeep
//!
//! Runs for every living person, friends then foes:
//!
//! ```text
//! 1. clear transient flags (skip turn, miss next target, void next attack)
//! 2. count cooldowns down
//! 3. count ailments down, then apply each per-turn effect
//! 4. detach expired ailments (relief events; DEATH_TIMER kills on expiry)
//! 5. category regeneration
//! ```

use crate::state::{AilmentKind, BattleFlags, PersonIndex, TickEffect};
use crate::stats::Attribute;

use super::events::{BattleEvent, EventKind};
use super::{Battle, BattleStatus};

impl Battle {
    /// Hook for battle-wide modifiers. None exist yet.
    pub(super) fn general_upkeep(&mut self) {
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    pub(super) fn upkeep(&mut self) {
        let indices: Vec<PersonIndex> = self.roster.indices().collect();
        for index in indices {
            if self.roster.is_alive(index) {
                self.personal_upkeep(index);
            }
        }
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    fn personal_upkeep(&mut self, index: PersonIndex) {
        let Some(person) = self.roster.get_mut(index) else {
            return;
        };
        person.battle_flags_mut().clear(BattleFlags::TRANSIENT);
        person.tick_cooldowns();
        person.tick_ailments();
        let ticking: Vec<(AilmentKind, Option<PersonIndex>)> = person
            .ailments()
            .iter()
            .map(|a| (a.kind(), a.source()))
            .collect();

        for (kind, source) in ticking {
            if !self.roster.is_alive(index) {
                return;
            }
            self.apply_tick(index, kind, source);
        }

        let Some(person) = self.roster.get_mut(index) else {
            return;
        };
        let expired = person.take_expired();
        for ailment in expired {
            tracing::debug!(person = %index, ailment = %ailment.kind(), "ailment expired");
            self.events.push(
                BattleEvent::new(EventKind::Relieve, ailment.source(), vec![index])
                    .with_ailment(ailment.kind()),
            );
            if ailment.kind() == AilmentKind::DeathTimer && self.roster.is_alive(index) {
                self.kill(ailment.source(), index);
            }
        }

        if self.roster.is_alive(index) {
            self.regenerate(index);
        }
    }

    fn apply_tick(&mut self, index: PersonIndex, kind: AilmentKind, source: Option<PersonIndex>) {
        let effect = kind.tick_effect(&self.config);
        let Some(person) = self.roster.get_mut(index) else {
            return;
        };
        let max_vita = person.temp_max().get(Attribute::Vita);

        match effect {
            TickEffect::None => {}
            TickEffect::Damage(percent) => {
                let amount = percent_of(max_vita, percent);
                tracing::trace!(person = %index, ailment = %kind, amount, "ailment damage");
                self.hurt(source, index, amount, None, false);
            }
            TickEffect::Hibernate(percent) => {
                let gained = person.heal(percent_of(max_vita, percent));
                person.battle_flags_mut().insert(BattleFlags::SKIP_NEXT_TURN);
                self.events
                    .create_action(EventKind::Regen, source, index, None, gained);
            }
            TickEffect::Chance(flag, chance) => {
                if self.rng.percent(f64::from(chance)) {
                    tracing::trace!(person = %index, ailment = %kind, ?flag, "ailment triggered");
                    person.battle_flags_mut().insert(flag);
                }
            }
        }
    }

    /// VITA and QTDR regeneration from both categories.
    fn regenerate(&mut self, index: PersonIndex) {
        let Some(person) = self.roster.get_mut(index) else {
            return;
        };
        let vita_percent = person.battle_class().vita_regen() + person.race_class().vita_regen();
        let qtdr_percent = person.battle_class().qtdr_regen() + person.race_class().qtdr_regen();

        if qtdr_percent > 0 {
            let amount = percent_of(person.temp_max().get(Attribute::Qtdr), f64::from(qtdr_percent));
            person.refund_qtdr(amount.max(0) as u32);
        }
        if vita_percent > 0 {
            let amount = percent_of(person.temp_max().get(Attribute::Vita), f64::from(vita_percent));
            let gained = person.heal(amount);
            if gained > 0 {
                self.events
                    .create_action(EventKind::Regen, Some(index), index, None, gained);
            }
        }
    }
}

/// `round(value × percent / 100)`.
pub(super) fn percent_of(value: i32, percent: f64) -> i32 {
    (f64::from(value) * percent / 100.0).round() as i32
}

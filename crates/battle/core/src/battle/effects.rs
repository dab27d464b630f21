//! Action evaluation - one action against one target.
//!
//! # Per-hit pipeline
//!
//! ```text
//! resolve target → hit roll → dispatch by effect → exactly one event
//! ```
//!
//! - A dead target is swapped for the first live candidate when the scope is
//!   single-target; otherwise the hit misses.
//! - Knocked-out scopes keep their target for every action of the skill, so
//!   a revive can be followed by a heal.
//! - MISS_NEXT_TARGET on the user forces a miss without drawing.
//! - Dodge only applies between opponents.
//! - Damage aimed at a guarded ally lands on the guardian; REFLECT bounces
//!   reflectable skills back onto the user, hit by hit.

use std::sync::Arc;

use crate::action::{Action, ActionEffect, Magnitude};
use crate::combat::{calculate_hit_chance, check_hit, dodge_chance, roll_amount, roll_damage};
use crate::config::BattleConfig;
use crate::skill::Skill;
use crate::state::{Ailment, AilmentDuration, AilmentKind, BattleFlags, InflictError, PersonIndex};
use crate::stats::Attribute;

use super::Battle;
use super::events::{BattleEvent, EventKind};

impl Battle {
    /// Apply every action of `skill` to every target, actions outermost.
    pub(super) fn apply_skill(&mut self, user: PersonIndex, skill: &Arc<Skill>, targets: &[PersonIndex]) {
        let scope = skill.scope();
        let mut targets = targets.to_vec();
        let mut reached = vec![false; targets.len()];

        for action in skill.actions() {
            for slot in 0..targets.len() {
                if !self.roster.is_alive(user) {
                    return;
                }
                let aimed = targets[slot];
                // A revived ally stays the target of the actions after the revive.
                let keep = self.roster.admits(scope, user, aimed) || (reached[slot] && scope.targets_ko());
                let target = if keep {
                    Some(aimed)
                } else if scope.can_retarget() {
                    self.roster.candidates(scope, user).first().copied()
                } else {
                    None
                };
                match target {
                    Some(target) => {
                        targets[slot] = target;
                        reached[slot] = true;
                        self.evaluate(user, target, action, skill);
                    }
                    None => {
                        self.events.create_miss(user, aimed, Some(Arc::clone(action)));
                    }
                }
            }
        }
    }

    /// Roll the hit and apply one action to one target.
    fn evaluate(&mut self, user: PersonIndex, target: PersonIndex, action: &Arc<Action>, skill: &Skill) {
        let Some(attacker) = self.roster.get_mut(user) else {
            return;
        };
        if attacker.has_flag(BattleFlags::MISS_NEXT_TARGET) {
            attacker.battle_flags_mut().clear(BattleFlags::MISS_NEXT_TARGET);
            tracing::trace!(%user, %target, "forced miss");
            self.events.create_miss(user, target, Some(Arc::clone(action)));
            return;
        }
        let user_limb = attacker.stat(Attribute::Limb);

        let dodge = match self.roster.get(target) {
            Some(defender) if !target.same_side(user) => {
                dodge_chance(defender.stat(Attribute::Limb), user_limb, &self.config)
            }
            _ => 0.0,
        };
        let chance = calculate_hit_chance(skill.chance(), action.chance(), dodge);
        let roll = self.rng.unit();
        let hit = check_hit(chance, roll);
        tracing::trace!(%user, %target, action = action.id(), chance, roll, hit, "hit roll");
        if !hit {
            self.events.create_miss(user, target, Some(Arc::clone(action)));
            return;
        }

        if action.is_damaging() {
            self.strike(user, target, action, skill);
            return;
        }
        match *action.effect() {
            ActionEffect::Alter { attribute } | ActionEffect::Damage { attribute } => {
                self.alter(user, target, action, attribute);
            }
            ActionEffect::Assign { attribute } => self.assign(user, target, action, attribute),
            ActionEffect::Revive => self.revive(user, target, action),
            ActionEffect::Inflict {
                ailment,
                min_duration,
                max_duration,
            } => self.inflict(user, target, action, ailment, min_duration, max_duration),
            ActionEffect::Relieve { ailment } => self.relieve(user, target, action, ailment),
        }
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Damage through the stat formula, after guard and reflect redirection.
    fn strike(&mut self, user: PersonIndex, target: PersonIndex, action: &Arc<Action>, skill: &Skill) {
        let victim = self.redirect(user, target, skill);
        let (Some(attacker), Some(defender)) = (self.roster.get(user), self.roster.get(victim)) else {
            return;
        };
        let roll = roll_damage(
            attacker,
            defender,
            action,
            skill.primary(),
            skill.secondary(),
            &self.config,
            self.rng.as_mut(),
        );
        let mut amount = roll.amount;

        if let Some(attacker) = self.roster.get_mut(user)
            && attacker.has_flag(BattleFlags::NEXT_ATK_NO_EFFECT)
        {
            attacker.battle_flags_mut().clear(BattleFlags::NEXT_ATK_NO_EFFECT);
            amount = 0;
        }
        tracing::trace!(%user, %victim, amount, critical = roll.critical, "damage");

        let attribute = action.attribute().unwrap_or(Attribute::Vita);
        if attribute == Attribute::Vita {
            self.hurt(Some(user), victim, amount, Some(Arc::clone(action)), roll.critical);
        } else if let Some(defender) = self.roster.get_mut(victim) {
            let applied = defender.alter_attribute(attribute, -amount);
            self.events
                .create_damage(Some(user), victim, Some(Arc::clone(action)), -applied, roll.critical);
        }
    }

    /// Who actually takes a hit aimed at `target`.
    fn redirect(&self, user: PersonIndex, target: PersonIndex, skill: &Skill) -> PersonIndex {
        let Some(defender) = self.roster.get(target) else {
            return target;
        };
        if defender.has_flag(BattleFlags::REFLECT) && skill.is_reflectable() && target != user {
            return user;
        }
        match defender.guarded_by() {
            Some(guardian) if guardian != user && self.roster.is_alive(guardian) => guardian,
            _ => target,
        }
    }

    fn alter(&mut self, user: PersonIndex, target: PersonIndex, action: &Arc<Action>, attribute: Attribute) {
        let Some(person) = self.roster.get_mut(target) else {
            return;
        };
        if !person.is_alive() {
            self.events.create_fizzle(user, vec![target], Some(Arc::clone(action)));
            return;
        }
        let amount = roll_amount(action, person.temp_max().get(attribute), self.rng.as_mut());
        let applied = person.alter_attribute(attribute, amount);
        let kind = if attribute == Attribute::Vita && amount >= 0 {
            EventKind::Heal
        } else {
            EventKind::Alter
        };
        self.events
            .create_action(kind, Some(user), target, Some(Arc::clone(action)), applied);
    }

    fn assign(&mut self, user: PersonIndex, target: PersonIndex, action: &Arc<Action>, attribute: Attribute) {
        let Some(person) = self.roster.get_mut(target) else {
            return;
        };
        if !person.is_alive() {
            self.events.create_fizzle(user, vec![target], Some(Arc::clone(action)));
            return;
        }
        let links = (person.guarding(), person.guarded_by());
        let value = roll_amount(action, person.temp_max().get(attribute), self.rng.as_mut());
        let applied = person.assign_attribute(attribute, value);
        if person.is_alive() {
            self.events
                .create_action(EventKind::Assign, Some(user), target, Some(Arc::clone(action)), applied);
        } else {
            self.events.create_death(Some(user), target, -applied);
            self.release_links(target, links);
        }
    }

    fn revive(&mut self, user: PersonIndex, target: PersonIndex, action: &Arc<Action>) {
        let Some(person) = self.roster.get_mut(target) else {
            return;
        };
        let amount = roll_amount(action, person.temp_max().get(Attribute::Vita), self.rng.as_mut());
        match person.revive(amount) {
            Ok(vita) => {
                self.events
                    .create_action(EventKind::Revive, Some(user), target, Some(Arc::clone(action)), vita);
            }
            Err(error) => {
                tracing::debug!(%user, %target, %error, "revive fizzled");
                self.events.create_fizzle(user, vec![target], Some(Arc::clone(action)));
            }
        }
    }

    fn inflict(
        &mut self,
        user: PersonIndex,
        target: PersonIndex,
        action: &Arc<Action>,
        kind: AilmentKind,
        min_duration: u32,
        max_duration: u32,
    ) {
        if self.roster.ailment_count() >= BattleConfig::MAX_AILMENTS_PER_BATTLE {
            tracing::warn!(%user, %target, ailment = %kind, "battle ailment cap reached, infliction dropped");
            self.events.create_fizzle(user, vec![target], Some(Arc::clone(action)));
            return;
        }

        let duration = AilmentDuration::draw(min_duration, max_duration, self.rng.as_mut());
        let magnitude = if kind.is_stat_change() {
            match action.base() {
                Magnitude::Percent(p) | Magnitude::Amount(p) if p != 0 => p.abs(),
                _ => self.config.default_buff_percent,
            }
        } else {
            action.base().value()
        };
        let Some(person) = self.roster.get_mut(target) else {
            return;
        };

        match person.inflict(Ailment::new(kind, duration, magnitude, Some(user))) {
            Ok(outcome) => {
                tracing::debug!(%user, %target, ailment = %kind, ?duration, ?outcome, "ailment inflicted");
                self.events.push(
                    BattleEvent::new(EventKind::Inflict, Some(user), vec![target])
                        .with_action(Some(Arc::clone(action)))
                        .with_ailment(kind),
                );
            }
            Err(error) => {
                if error == InflictError::Capacity {
                    tracing::warn!(%user, %target, ailment = %kind, "person ailment cap reached, infliction dropped");
                }
                self.events.create_fizzle(user, vec![target], Some(Arc::clone(action)));
            }
        }
    }

    fn relieve(&mut self, user: PersonIndex, target: PersonIndex, action: &Arc<Action>, kind: AilmentKind) {
        let Some(person) = self.roster.get_mut(target) else {
            return;
        };
        match person.relieve(kind) {
            Some(_) => {
                self.events.push(
                    BattleEvent::new(EventKind::Relieve, Some(user), vec![target])
                        .with_action(Some(Arc::clone(action)))
                        .with_ailment(kind),
                );
            }
            None => {
                self.events.create_fizzle(user, vec![target], Some(Arc::clone(action)));
            }
        }
    }

    // ========================================================================
    // Death bookkeeping
    // ========================================================================

    /// Take `amount` VITA from `victim`, emitting a damage or death event.
    pub(super) fn hurt(
        &mut self,
        user: Option<PersonIndex>,
        victim: PersonIndex,
        amount: i32,
        action: Option<Arc<Action>>,
        critical: bool,
    ) {
        let Some(person) = self.roster.get_mut(victim) else {
            return;
        };
        let links = (person.guarding(), person.guarded_by());
        if person.do_damage(amount) {
            self.events.create_death(user, victim, amount);
            self.release_links(victim, links);
        } else {
            self.events.create_damage(user, victim, action, amount, critical);
        }
    }

    /// Knock `victim` out outright.
    pub(super) fn kill(&mut self, user: Option<PersonIndex>, victim: PersonIndex) {
        let Some(person) = self.roster.get_mut(victim) else {
            return;
        };
        let links = (person.guarding(), person.guarded_by());
        let vita = person.vita();
        person.knock_out();
        self.events.create_death(user, victim, vita);
        self.release_links(victim, links);
    }

    /// Undo the guard links of someone who just fell.
    fn release_links(
        &mut self,
        fallen: PersonIndex,
        (guarding, guarded_by): (Option<PersonIndex>, Option<PersonIndex>),
    ) {
        if let Some(ward) = guarding {
            if let Some(person) = self.roster.get_mut(ward) {
                person.set_guarded_by(None);
            }
            self.events.create_guard(EventKind::GuardBreak, fallen, ward);
        }
        if let Some(guardian) = guarded_by {
            if let Some(person) = self.roster.get_mut(guardian) {
                person.end_guard();
            }
            self.events.create_guard(EventKind::GuardBreak, guardian, fallen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BattleContext, PcgRng};
    use crate::skill::ActionScope;
    use crate::state::{Category, Party, PartyType, Person, PersonSpec, person_with};
    use crate::stats::{AttributeSet, Element};

    fn seeded(friends: &[i32], foes: &[i32], seed: u64) -> Battle {
        let mut a = Party::new(PartyType::Sleuth);
        for &vita in friends {
            a.add_member(person_with(&[(Attribute::Vita, vita)])).unwrap();
        }
        let mut b = Party::new(PartyType::RegularFoe);
        for &vita in foes {
            b.add_member(person_with(&[(Attribute::Vita, vita)])).unwrap();
        }
        Battle::new(a, b, BattleConfig::default(), Box::new(PcgRng::new(seed)))
    }

    fn battle(friends: &[i32], foes: &[i32]) -> Battle {
        seeded(friends, foes, 21)
    }

    fn action(effect: ActionEffect, base: Magnitude) -> Arc<Action> {
        Arc::new(Action::builder(1, effect).base(base).build().unwrap())
    }

    fn strike(amount: i32, scope: ActionScope) -> Skill {
        Skill::new(9, "Strike", scope).with_action(action(
            ActionEffect::Damage { attribute: Attribute::Vita },
            Magnitude::Amount(amount),
        ))
    }

    fn inflicting(kind: AilmentKind) -> Arc<Skill> {
        let effect = ActionEffect::Inflict {
            ailment: kind,
            min_duration: 2,
            max_duration: 3,
        };
        Arc::new(Skill::new(11, "Hex", ActionScope::OneEnemy).with_action(action(effect, Magnitude::ZERO)))
    }

    fn poisoned(turns: u32) -> Ailment {
        Ailment::new(AilmentKind::Poison, AilmentDuration::Turns(turns), 0, None)
    }

    fn kinds(b: &Battle) -> Vec<EventKind> {
        b.event_buffer().iter().map(|(_, e)| e.kind).collect()
    }

    fn vita(b: &Battle, index: PersonIndex) -> i32 {
        b.person(index).unwrap().vita()
    }

    #[test]
    fn revive_then_heal_stays_on_the_same_ally() {
        let mut b = battle(&[100, 100], &[100]);
        let (medic, fallen) = (PersonIndex::friend(1), PersonIndex::friend(2));
        b.person_mut(fallen).unwrap().knock_out();
        let skill = Arc::new(Skill::new(12, "Second Wind", ActionScope::OneAllyKo).with_actions([
            action(ActionEffect::Revive, Magnitude::Percent(50)),
            action(ActionEffect::Alter { attribute: Attribute::Vita }, Magnitude::Amount(20)),
        ]));

        b.apply_skill(medic, &skill, &[fallen]);

        assert_eq!(kinds(&b), vec![EventKind::Revive, EventKind::Heal]);
        assert!(b.person(fallen).unwrap().is_alive());
        assert_eq!(vita(&b, fallen), 70);
    }

    #[test]
    fn revive_restores_half_the_cap() {
        let mut b = battle(&[100, 100], &[100]);
        let fallen = PersonIndex::friend(2);
        b.person_mut(fallen).unwrap().knock_out();
        let skill = Arc::new(
            Skill::new(13, "Rouse", ActionScope::OneAllyKo)
                .with_action(action(ActionEffect::Revive, Magnitude::Percent(50))),
        );

        b.apply_skill(PersonIndex::friend(1), &skill, &[fallen]);

        assert_eq!(b.event_buffer().of_kind(EventKind::Revive).count(), 1);
        assert!(b.person(fallen).unwrap().has_flag(BattleFlags::ALIVE));
        assert_eq!(vita(&b, fallen), 50);
    }

    #[test]
    fn reflect_bounces_elemental_hits() {
        let mut b = battle(&[100], &[100]);
        let (hero, foe) = (PersonIndex::friend(1), PersonIndex::foe(1));
        b.inflict_ailment(foe, Ailment::new(AilmentKind::Reflect, AilmentDuration::Turns(3), 0, None))
            .unwrap();

        let blaze = Arc::new(strike(30, ActionScope::OneEnemy).with_elements(Element::Fire, Element::Fire));
        b.apply_skill(hero, &blaze, &[foe]);
        assert_eq!(vita(&b, hero), 70);
        assert_eq!(vita(&b, foe), 100);

        let punch = Arc::new(strike(30, ActionScope::OneEnemy));
        b.apply_skill(hero, &punch, &[foe]);
        assert_eq!(vita(&b, foe), 70);
    }

    #[test]
    fn guardian_absorbs_damage_aimed_at_ward() {
        let mut b = battle(&[100, 100], &[100]);
        let (guardian, ward, foe) = (PersonIndex::friend(1), PersonIndex::friend(2), PersonIndex::foe(1));
        b.person_mut(guardian).unwrap().begin_guard(ward);
        b.person_mut(ward).unwrap().set_guarded_by(Some(guardian));

        b.apply_skill(foe, &Arc::new(strike(30, ActionScope::OneEnemy)), &[ward]);

        assert_eq!(vita(&b, ward), 100);
        assert_eq!(vita(&b, guardian), 70);
        let hit = b.event_buffer().of_kind(EventKind::Damage).next().unwrap();
        assert_eq!(hit.target(), Some(guardian));
    }

    #[test]
    fn single_target_moves_to_next_living_foe() {
        let mut b = battle(&[100], &[100, 100]);
        let hero = PersonIndex::friend(1);
        b.person_mut(PersonIndex::foe(1)).unwrap().knock_out();

        b.apply_skill(hero, &Arc::new(strike(30, ActionScope::OneEnemy)), &[PersonIndex::foe(1)]);

        assert_eq!(kinds(&b), vec![EventKind::Damage]);
        assert_eq!(vita(&b, PersonIndex::foe(2)), 70);
    }

    #[test]
    fn multi_target_dead_slot_misses() {
        let mut b = battle(&[100], &[100, 100]);
        let hero = PersonIndex::friend(1);
        b.person_mut(PersonIndex::foe(1)).unwrap().knock_out();

        b.apply_skill(
            hero,
            &Arc::new(strike(30, ActionScope::TwoEnemies)),
            &[PersonIndex::foe(1), PersonIndex::foe(2)],
        );

        assert_eq!(kinds(&b), vec![EventKind::Miss, EventKind::Damage]);
        assert_eq!(vita(&b, PersonIndex::foe(2)), 70);
    }

    #[test]
    fn forced_miss_is_spent_on_one_target() {
        let mut b = battle(&[100], &[100]);
        let (hero, foe) = (PersonIndex::friend(1), PersonIndex::foe(1));
        b.person_mut(hero).unwrap().battle_flags_mut().insert(BattleFlags::MISS_NEXT_TARGET);
        let skill = Arc::new(strike(30, ActionScope::OneEnemy));

        b.apply_skill(hero, &skill, &[foe]);
        assert_eq!(kinds(&b), vec![EventKind::Miss]);
        assert!(!b.person(hero).unwrap().has_flag(BattleFlags::MISS_NEXT_TARGET));
        assert_eq!(vita(&b, foe), 100);

        b.apply_skill(hero, &skill, &[foe]);
        assert_eq!(vita(&b, foe), 70);
    }

    #[test]
    fn voided_attack_deals_nothing() {
        let mut b = battle(&[100], &[100]);
        let (hero, foe) = (PersonIndex::friend(1), PersonIndex::foe(1));
        b.person_mut(hero).unwrap().battle_flags_mut().insert(BattleFlags::NEXT_ATK_NO_EFFECT);

        b.apply_skill(hero, &Arc::new(strike(30, ActionScope::OneEnemy)), &[foe]);

        let hit = b.event_buffer().of_kind(EventKind::Damage).next().unwrap();
        assert_eq!(hit.amount, 0);
        assert_eq!(vita(&b, foe), 100);
        assert!(!b.person(hero).unwrap().has_flag(BattleFlags::NEXT_ATK_NO_EFFECT));
    }

    #[test]
    fn inflict_fizzles_on_immune_target() {
        let stats = AttributeSet::from_pairs(&[(Attribute::Vita, 100)], true);
        let class = Arc::new(
            Category::new(3, "Antidote")
                .with_stats(stats.clone(), stats)
                .with_immunities([AilmentKind::Poison]),
        );
        let race = Arc::new(Category::new(4, "Golem"));
        let mut ctx = BattleContext::default();
        let golem = Person::new(&mut ctx, PersonSpec::new(7, "Golem", class, race));

        let mut friends = Party::new(PartyType::Sleuth);
        friends.add_member(person_with(&[(Attribute::Vita, 100)])).unwrap();
        let mut foes = Party::new(PartyType::RegularFoe);
        foes.add_member(golem).unwrap();
        let mut b = Battle::new(friends, foes, BattleConfig::default(), Box::new(PcgRng::new(21)));
        let foe = PersonIndex::foe(1);

        b.apply_skill(PersonIndex::friend(1), &inflicting(AilmentKind::Poison), &[foe]);
        assert_eq!(kinds(&b), vec![EventKind::Fizzle]);
        assert!(!b.person(foe).unwrap().has_ailment(AilmentKind::Poison));

        b.apply_skill(PersonIndex::friend(1), &inflicting(AilmentKind::Burn), &[foe]);
        assert_eq!(b.event_buffer().of_kind(EventKind::Inflict).count(), 1);
    }

    #[test]
    fn inflict_fizzles_once_the_battle_is_saturated() {
        let mut b = battle(&[100; 5], &[100; 5]);
        let everyone: Vec<PersonIndex> = b.roster.indices().collect();
        for &index in &everyone {
            for kind in [
                AilmentKind::Poison,
                AilmentKind::Burn,
                AilmentKind::Silence,
                AilmentKind::Reflect,
                AilmentKind::HalfCost,
            ] {
                b.inflict_ailment(index, Ailment::new(kind, AilmentDuration::Turns(3), 0, None))
                    .unwrap();
            }
        }
        assert_eq!(b.roster.ailment_count(), BattleConfig::MAX_AILMENTS_PER_BATTLE);

        // Even a refresh of an attached kind is refused.
        let foe = PersonIndex::foe(1);
        b.apply_skill(PersonIndex::friend(1), &inflicting(AilmentKind::Poison), &[foe]);

        assert_eq!(kinds(&b), vec![EventKind::Fizzle]);
        assert_eq!(b.person(foe).unwrap().ailments()[0].duration(), AilmentDuration::Turns(3));
    }

    #[test]
    fn relieve_action_detaches_the_ailment() {
        let mut b = battle(&[100, 100], &[100]);
        let (medic, patient) = (PersonIndex::friend(1), PersonIndex::friend(2));
        b.inflict_ailment(patient, poisoned(4)).unwrap();
        let cure = Arc::new(Skill::new(14, "Cure", ActionScope::OneAlly).with_action(action(
            ActionEffect::Relieve { ailment: AilmentKind::Poison },
            Magnitude::ZERO,
        )));

        b.apply_skill(medic, &cure, &[patient]);
        assert_eq!(kinds(&b), vec![EventKind::Relieve]);
        assert!(!b.person(patient).unwrap().has_ailment(AilmentKind::Poison));

        b.apply_skill(medic, &cure, &[patient]);
        assert_eq!(b.event_buffer().of_kind(EventKind::Fizzle).count(), 1);
    }

    #[test]
    fn full_chance_without_dodge_never_misses() {
        for seed in 0..64 {
            let mut b = seeded(&[100], &[1000], seed);
            let skill = Arc::new(strike(1, ActionScope::OneEnemy));
            for _ in 0..8 {
                b.apply_skill(PersonIndex::friend(1), &skill, &[PersonIndex::foe(1)]);
            }
            assert_eq!(b.event_buffer().of_kind(EventKind::Miss).count(), 0, "seed {seed}");
            assert_eq!(b.event_buffer().of_kind(EventKind::Damage).count(), 8);
        }
    }
}

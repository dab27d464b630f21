//! CLEAN_UP, BATTLE_VICTORY, BATTLE_LOSS and DESTRUCT.

use crate::state::{PersonFlags, PersonIndex};

use super::outcome::{BattleOutcome, OutcomeKind, Rewards};
use super::{Battle, BattleStatus, TurnState};

impl Battle {
    /// Close the turn and decide whether the battle goes on.
    ///
    /// With both sides down at once the friends lose.
    pub(super) fn clean_up(&mut self) {
        self.turn = self.turn.saturating_add(1);
        self.events.clear_current();
        self.plans.clear();
        self.menu.clear();

        if !self.roster.friends().any_alive() {
            tracing::debug!(turn = self.turn, "friends defeated");
            self.state = TurnState::BattleLoss;
            self.loss();
        } else if !self.roster.foes().any_alive() {
            tracing::debug!(turn = self.turn, "foes defeated");
            self.state = TurnState::BattleVictory;
            self.victory();
        } else {
            self.status.insert(BattleStatus::PHASE_DONE);
        }
    }

    pub(super) fn victory(&mut self) {
        let rewards = self.collect_rewards();
        self.distribute_rewards(&rewards);
        self.finish(OutcomeKind::Victory, rewards);
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    pub(super) fn loss(&mut self) {
        self.finish(OutcomeKind::Loss, Rewards::default());
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    /// Leave the battle: persons drop battle-only state and the event buffer
    /// is released.
    pub(super) fn destruct(&mut self) {
        for person in self.roster.persons_mut() {
            person.battle_end();
        }
        self.roster.friends_mut().inventory_mut().compact();
        self.roster.foes_mut().inventory_mut().compact();
        self.events.clear_all();
        self.menu.clear();
        self.plans.clear();
        self.ally_queue.clear();
        self.input.clear();
        tracing::debug!(outcome = ?self.outcome.as_ref().map(|o| o.kind), "battle destroyed");
    }

    /// Record the outcome and report it once.
    pub(super) fn finish(&mut self, kind: OutcomeKind, rewards: Rewards) {
        if self.status.has(BattleStatus::REPORTED) {
            return;
        }
        let flag = match kind {
            OutcomeKind::Victory => BattleStatus::VICTORY,
            OutcomeKind::Loss => BattleStatus::LOSS,
            OutcomeKind::Escaped => BattleStatus::ESCAPED,
        };
        self.status.insert(flag | BattleStatus::REPORTED);

        let outcome = BattleOutcome {
            kind,
            turns: self.turn,
            rewards,
        };
        tracing::debug!(
            outcome = %kind,
            turns = outcome.turns,
            exp = outcome.rewards.exp,
            credits = outcome.rewards.credits,
            "battle finished"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.on_battle_finished(&outcome);
        }
        self.outcome = Some(outcome);
    }

    fn collect_rewards(&self) -> Rewards {
        let mut rewards = Rewards::default();
        for foe in self.roster.foes().members() {
            rewards.exp = rewards.exp.saturating_add(foe.exp_drop());
            rewards.credits = rewards.credits.saturating_add(foe.credit_drop());
            for (item, count) in foe.item_drops() {
                rewards.add_item(item.clone(), *count);
            }
        }
        rewards
    }

    /// Split exp between living friends that can gain it; credits and items
    /// go to the party inventory.
    fn distribute_rewards(&mut self, rewards: &Rewards) {
        let recipients: Vec<PersonIndex> = self
            .roster
            .friend_indices()
            .filter(|&i| {
                self.roster.get(i).is_some_and(|p| {
                    p.is_alive() && p.person_flags().has(PersonFlags::CAN_GAIN_EXP)
                })
            })
            .collect();

        if let Some(count) = u64::try_from(recipients.len()).ok().filter(|&n| n > 0) {
            let share = rewards.exp / count;
            let remainder = rewards.exp % count;
            for (n, index) in recipients.into_iter().enumerate() {
                let amount = if n == 0 { share + remainder } else { share };
                let Some(person) = self.roster.get_mut(index) else {
                    continue;
                };
                if let Err(error) = person.add_exp(amount, true) {
                    tracing::debug!(person = %index, %error, "exp not granted");
                }
            }
        }

        let inventory = self.roster.friends_mut().inventory_mut();
        inventory.add_credits(rewards.credits);
        for (item, count) in &rewards.items {
            inventory.add(item.clone(), *count);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::config::BattleConfig;
    use crate::env::{BattleContext, PcgRng};
    use crate::state::{Item, ItemFlags, Party, PartyType, Person, PersonSpec, flat_category};
    use crate::stats::Attribute;
    use crate::battle::BattleObserver;

    struct Recorder(Rc<RefCell<Vec<BattleOutcome>>>);

    impl BattleObserver for Recorder {
        fn on_battle_finished(&mut self, outcome: &BattleOutcome) {
            self.0.borrow_mut().push(outcome.clone());
        }
    }

    fn foe(exp: u64, credits: u64, drops: Vec<(Arc<Item>, u16)>) -> Person {
        let mut ctx = BattleContext::default();
        let mut spec = PersonSpec::new(
            9,
            "Slime",
            flat_category(1, &[(Attribute::Vita, 30)]),
            flat_category(2, &[]),
        );
        spec.exp_drop = exp;
        spec.credit_drop = credits;
        spec.item_drops = drops;
        Person::new(&mut ctx, spec)
    }

    fn hero() -> Person {
        let mut ctx = BattleContext::default();
        let spec = PersonSpec::new(
            1,
            "Hero",
            flat_category(1, &[(Attribute::Vita, 100)]),
            flat_category(2, &[]),
        );
        Person::new(&mut ctx, spec)
    }

    #[test]
    fn victory_pays_out_once() {
        let jelly = Arc::new(Item::new(40, "Jelly", ItemFlags::empty()));
        let mut friends = Party::new(PartyType::Sleuth);
        friends.add_member(hero()).unwrap();
        friends.add_member(hero()).unwrap();
        let mut foes = Party::new(PartyType::RegularFoe);
        foes.add_member(foe(7, 10, vec![(Arc::clone(&jelly), 1)])).unwrap();
        foes.add_member(foe(8, 5, vec![(jelly, 2)])).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut battle = Battle::new(friends, foes, BattleConfig::default(), Box::new(PcgRng::new(8)))
            .with_observer(Box::new(Recorder(Rc::clone(&seen))));
        for foe in [PersonIndex::foe(1), PersonIndex::foe(2)] {
            battle.person_mut(foe).unwrap().knock_out();
        }

        battle.clean_up();
        assert_eq!(battle.current_state(), TurnState::BattleVictory);
        assert!(battle.flag(BattleStatus::VICTORY));

        let outcome = battle.outcome().unwrap().clone();
        assert_eq!(outcome.kind, OutcomeKind::Victory);
        assert_eq!(outcome.turns, 1);
        assert_eq!(outcome.rewards.exp, 15);
        assert_eq!(outcome.rewards.credits, 15);
        assert_eq!(outcome.rewards.items.len(), 1);

        assert_eq!(battle.friends().inventory().credits(), 15);
        assert_eq!(battle.friends().inventory().count_of(40), 3);
        assert_eq!(battle.person(PersonIndex::friend(1)).unwrap().total_exp(), 8);
        assert_eq!(battle.person(PersonIndex::friend(2)).unwrap().total_exp(), 7);

        battle.finish(OutcomeKind::Loss, Rewards::default());
        assert_eq!(seen.borrow().len(), 1);
        assert!(!battle.flag(BattleStatus::LOSS));
    }

    #[test]
    fn mutual_wipe_is_a_loss() {
        let mut friends = Party::new(PartyType::Sleuth);
        friends.add_member(hero()).unwrap();
        let mut foes = Party::new(PartyType::RegularFoe);
        foes.add_member(foe(1, 1, Vec::new())).unwrap();
        let mut battle = Battle::new(friends, foes, BattleConfig::default(), Box::new(PcgRng::new(8)));
        battle.person_mut(PersonIndex::friend(1)).unwrap().knock_out();
        battle.person_mut(PersonIndex::foe(1)).unwrap().knock_out();

        battle.clean_up();
        assert_eq!(battle.current_state(), TurnState::BattleLoss);
        assert_eq!(battle.outcome().map(|o| o.kind), Some(OutcomeKind::Loss));
        assert_eq!(battle.friends().inventory().credits(), 0);
    }

    #[test]
    fn destruct_releases_battle_state() {
        let mut friends = Party::new(PartyType::Sleuth);
        friends.add_member(hero()).unwrap();
        let mut foes = Party::new(PartyType::RegularFoe);
        foes.add_member(foe(1, 1, Vec::new())).unwrap();
        let mut battle = Battle::new(friends, foes, BattleConfig::default(), Box::new(PcgRng::new(8)));
        battle.person_mut(PersonIndex::foe(1)).unwrap().knock_out();

        battle.update(16);
        assert_eq!(battle.current_state(), TurnState::GeneralUpkeep);
        battle.update(16);
        // Nobody on the foe side: upkeep settles the turn on the spot.
        assert_eq!(battle.current_state(), TurnState::BattleVictory);
        battle.update(16);
        assert_eq!(battle.current_state(), TurnState::Destruct);
        assert!(battle.event_buffer().is_empty());
        assert!(!battle.person(PersonIndex::friend(1)).unwrap().has_flag(crate::state::BattleFlags::IN_BATTLE));

        battle.update(16);
        assert_eq!(battle.current_state(), TurnState::Destruct);
    }
}

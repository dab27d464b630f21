//! Both parties addressed through [`PersonIndex`].

use crate::skill::{ActionScope, Side};
use crate::state::{BattleFlags, Party, Person, PersonIndex, sort_canonical};

/// Friends and foes of one battle.
#[derive(Clone, Debug)]
pub struct Roster {
    friends: Party,
    foes: Party,
}

impl Roster {
    pub fn new(friends: Party, foes: Party) -> Self {
        Self { friends, foes }
    }

    pub fn friends(&self) -> &Party {
        &self.friends
    }

    pub fn foes(&self) -> &Party {
        &self.foes
    }

    pub fn friends_mut(&mut self) -> &mut Party {
        &mut self.friends
    }

    pub fn foes_mut(&mut self) -> &mut Party {
        &mut self.foes
    }

    /// The party `index` belongs to.
    pub fn party_of(&self, index: PersonIndex) -> &Party {
        if index.is_friend() { &self.friends } else { &self.foes }
    }

    pub fn party_of_mut(&mut self, index: PersonIndex) -> &mut Party {
        if index.is_friend() {
            &mut self.friends
        } else {
            &mut self.foes
        }
    }

    pub fn get(&self, index: PersonIndex) -> Option<&Person> {
        self.party_of(index).member(index.slot())
    }

    pub fn get_mut(&mut self, index: PersonIndex) -> Option<&mut Person> {
        self.party_of_mut(index).member_mut(index.slot())
    }

    pub fn is_alive(&self, index: PersonIndex) -> bool {
        self.get(index).is_some_and(Person::is_alive)
    }

    pub fn has_flag(&self, index: PersonIndex, flag: BattleFlags) -> bool {
        self.get(index).is_some_and(|p| p.has_flag(flag))
    }

    /// Friend indices in party order.
    pub fn friend_indices(&self) -> impl Iterator<Item = PersonIndex> + '_ {
        (1..=self.friends.len()).map(|p| PersonIndex::friend(p as u8))
    }

    /// Foe indices in party order.
    pub fn foe_indices(&self) -> impl Iterator<Item = PersonIndex> + '_ {
        (1..=self.foes.len()).map(|p| PersonIndex::foe(p as u8))
    }

    /// Every index, friends first.
    pub fn indices(&self) -> impl Iterator<Item = PersonIndex> + '_ {
        self.friend_indices().chain(self.foe_indices())
    }

    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.friends.members().iter().chain(self.foes.members())
    }

    pub fn persons_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.friends
            .members_mut()
            .iter_mut()
            .chain(self.foes.members_mut().iter_mut())
    }

    /// Whether `candidate` qualifies for `scope` when `user` acts.
    pub fn admits(&self, scope: ActionScope, user: PersonIndex, candidate: PersonIndex) -> bool {
        let Some(person) = self.get(candidate) else {
            return false;
        };
        let side = if candidate.same_side(user) {
            Side::Ally
        } else {
            Side::Enemy
        };
        scope.admits(candidate == user, side, person.is_alive())
    }

    /// Every index `scope` admits for `user`, in canonical order.
    pub fn candidates(&self, scope: ActionScope, user: PersonIndex) -> Vec<PersonIndex> {
        let mut out: Vec<PersonIndex> = self
            .indices()
            .filter(|&i| self.admits(scope, user, i))
            .collect();
        sort_canonical(&mut out);
        out
    }

    /// Living allies of `user` that nobody guards yet, in canonical order.
    pub fn guard_candidates(&self, user: PersonIndex) -> Vec<PersonIndex> {
        let mut out: Vec<PersonIndex> = self
            .indices()
            .filter(|&i| i != user && i.same_side(user))
            .filter(|&i| {
                self.get(i)
                    .is_some_and(|p| p.is_alive() && !p.has_flag(BattleFlags::GUARDED))
            })
            .collect();
        sort_canonical(&mut out);
        out
    }

    /// Living members of the other side, in canonical order.
    pub fn living_opponents(&self, user: PersonIndex) -> Vec<PersonIndex> {
        self.candidates(ActionScope::AllEnemies, user)
    }

    /// Ailments carried across both parties.
    pub fn ailment_count(&self) -> usize {
        self.persons().map(|p| p.ailments().len()).sum()
    }

    pub fn into_parties(self) -> (Party, Party) {
        (self.friends, self.foes)
    }
}

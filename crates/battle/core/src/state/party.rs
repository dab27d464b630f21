//! Parties and person indices.
//!
//! Friends are addressed with positive indices `1..=size`, foes with negative
//! indices `-1..=-size`. Index 0 is never valid.

use core::fmt;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

use super::item::Inventory;
use super::person::Person;

/// Signed arena index of a person in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonIndex(i8);

impl PersonIndex {
    /// Left-to-right traversal order of the battle screen.
    pub const CANONICAL_ORDER: [i8; 10] = [-5, -4, -3, -1, -2, 2, 1, 3, 4, 5];

    /// Friend at 1-based `position`.
    pub const fn friend(position: u8) -> Self {
        Self(position as i8)
    }

    /// Foe at 1-based `position`.
    pub const fn foe(position: u8) -> Self {
        Self(-(position as i8))
    }

    /// Validating constructor for raw values.
    pub fn from_raw(raw: i8) -> Option<Self> {
        let limit = BattleConfig::MAX_PARTY_SIZE as i8;
        (raw != 0 && (-limit..=limit).contains(&raw)).then_some(Self(raw))
    }

    pub const fn raw(self) -> i8 {
        self.0
    }

    pub const fn is_friend(self) -> bool {
        self.0 > 0
    }

    pub const fn is_foe(self) -> bool {
        self.0 < 0
    }

    /// Zero-based slot inside the owning party.
    pub const fn slot(self) -> usize {
        (self.0.unsigned_abs() as usize).saturating_sub(1)
    }

    /// True when both indices belong to the same party.
    pub const fn same_side(self, other: PersonIndex) -> bool {
        self.is_friend() == other.is_friend()
    }

    /// Position in [`CANONICAL_ORDER`](Self::CANONICAL_ORDER).
    pub fn canonical_rank(self) -> usize {
        Self::CANONICAL_ORDER
            .iter()
            .position(|&raw| raw == self.0)
            .unwrap_or(usize::MAX)
    }
}

impl fmt::Display for PersonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Sort indices into the canonical screen order.
pub fn sort_canonical(indices: &mut [PersonIndex]) {
    indices.sort_by_key(|idx| idx.canonical_rank());
}

/// What kind of group a party is.
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
pub enum PartyType {
    Sleuth,
    Bearacks,
    #[default]
    RegularFoe,
    MiniBoss,
    Boss,
    FinalBoss,
}

impl PartyType {
    pub const fn is_boss_tier(self) -> bool {
        matches!(self, Self::MiniBoss | Self::Boss | Self::FinalBoss)
    }
}

/// Ordered group of up to [`BattleConfig::MAX_PARTY_SIZE`] persons with a
/// shared inventory.
#[derive(Clone, Debug)]
pub struct Party {
    kind: PartyType,
    members: ArrayVec<Person, { BattleConfig::MAX_PARTY_SIZE }>,
    inventory: Inventory,
}

impl Party {
    pub fn new(kind: PartyType) -> Self {
        Self {
            kind,
            members: ArrayVec::new(),
            inventory: Inventory::default(),
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn kind(&self) -> PartyType {
        self.kind
    }

    /// Appends a member; hands it back when the party is full.
    pub fn add_member(&mut self, person: Person) -> Result<(), Person> {
        self.members.try_push(person).map_err(|e| e.element())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Person] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Person] {
        &mut self.members
    }

    pub fn member(&self, slot: usize) -> Option<&Person> {
        self.members.get(slot)
    }

    pub fn member_mut(&mut self, slot: usize) -> Option<&mut Person> {
        self.members.get_mut(slot)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn any_alive(&self) -> bool {
        self.members.iter().any(Person::is_alive)
    }

    pub fn living_count(&self) -> usize {
        self.members.iter().filter(|p| p.is_alive()).count()
    }

    /// Sum of MMTM over living members.
    pub fn total_momentum(&self) -> i64 {
        self.members
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| i64::from(p.momentum()))
            .sum()
    }

    /// Boss markers come from the party type or from any member's flags.
    pub fn has_boss(&self) -> bool {
        self.kind.is_boss_tier() || self.members.iter().any(Person::is_boss_tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_sides_and_slots() {
        let friend = PersonIndex::friend(3);
        let foe = PersonIndex::foe(2);
        assert!(friend.is_friend());
        assert!(foe.is_foe());
        assert_eq!(friend.slot(), 2);
        assert_eq!(foe.slot(), 1);
        assert!(!friend.same_side(foe));
        assert_eq!(foe.to_string(), "-2");
        assert_eq!(friend.to_string(), "+3");
    }

    #[test]
    fn raw_validation() {
        assert!(PersonIndex::from_raw(0).is_none());
        assert!(PersonIndex::from_raw(6).is_none());
        assert!(PersonIndex::from_raw(-6).is_none());
        assert_eq!(PersonIndex::from_raw(-5), Some(PersonIndex::foe(5)));
    }

    #[test]
    fn canonical_sort_is_screen_order() {
        let mut indices = vec![
            PersonIndex::friend(1),
            PersonIndex::foe(1),
            PersonIndex::friend(2),
            PersonIndex::foe(2),
            PersonIndex::foe(5),
        ];
        sort_canonical(&mut indices);
        let raw: Vec<i8> = indices.iter().map(|i| i.raw()).collect();
        assert_eq!(raw, vec![-5, -1, -2, 2, 1]);
    }
}

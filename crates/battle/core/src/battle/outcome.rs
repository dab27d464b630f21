//! How a battle ended and what the winners took home.

use std::sync::Arc;

use crate::state::Item;

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Victory,
    Loss,
    Escaped,
}

/// Spoils of a victory, summed over every foe.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rewards {
    pub exp: u64,
    pub credits: u64,
    pub items: Vec<(Arc<Item>, u16)>,
}

impl Rewards {
    pub fn is_empty(&self) -> bool {
        self.exp == 0 && self.credits == 0 && self.items.is_empty()
    }

    /// Merge a stack into the item list, folding by game id.
    pub fn add_item(&mut self, item: Arc<Item>, count: u16) {
        if count == 0 {
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|(held, _)| held.game_id() == item.game_id())
        {
            Some((_, held)) => *held = held.saturating_add(count),
            None => self.items.push((item, count)),
        }
    }
}

/// Reported once through [`BattleObserver::on_battle_finished`].
#[derive(Clone, Debug, PartialEq)]
pub struct BattleOutcome {
    pub kind: OutcomeKind,
    /// Completed turns.
    pub turns: u32,
    pub rewards: Rewards,
}

/// Sink for the end of a battle.
///
/// The renderer polls the event buffer; only the final result is pushed.
pub trait BattleObserver {
    fn on_battle_finished(&mut self, outcome: &BattleOutcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ItemFlags;

    #[test]
    fn item_drops_fold_by_id() {
        let gem = Arc::new(Item::new(4, "Gem", ItemFlags::empty()));
        let mut rewards = Rewards::default();
        assert!(rewards.is_empty());

        rewards.add_item(Arc::clone(&gem), 2);
        rewards.add_item(gem, 3);
        rewards.add_item(Arc::new(Item::new(5, "Rock", ItemFlags::empty())), 0);
        assert_eq!(rewards.items.len(), 1);
        assert_eq!(rewards.items[0].1, 5);
    }
}

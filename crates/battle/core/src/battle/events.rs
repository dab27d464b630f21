//! Event buffer - the ordered log of what happened, read by the renderer.
//!
//! Indices are stable for the lifetime of the buffer: dropping performed
//! events at clean-up shifts an internal offset rather than renumbering.
//!
//! ```text
//!   dropped │ live events ............................ │
//!   0..offset │ offset .. performed_cursor .. len       │
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use crate::action::Action;
use crate::skill::Skill;
use crate::state::{AilmentKind, Item, PersonIndex};

/// What a [`BattleEvent`] records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    SkillUse,
    ItemUse,
    Damage,
    CriticalDamage,
    Heal,
    Alter,
    Assign,
    Revive,
    Miss,
    Fizzle,
    Death,
    Inflict,
    Relieve,
    Regen,
    DefendBegin,
    DefendPersist,
    DefendBreak,
    GuardBegin,
    GuardBreak,
    Implode,
    RunAway,
    RunFail,
    Pass,
}

/// One entry in the event buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleEvent {
    pub kind: EventKind,
    pub user: Option<PersonIndex>,
    pub targets: Vec<PersonIndex>,
    pub action: Option<Arc<Action>>,
    pub skill: Option<Arc<Skill>>,
    pub item: Option<Arc<Item>>,
    pub ailment: Option<AilmentKind>,
    pub amount: i32,
    pub happens: bool,
    pub rendered: bool,
    pub performed: bool,
}

impl BattleEvent {
    pub fn new(kind: EventKind, user: Option<PersonIndex>, targets: Vec<PersonIndex>) -> Self {
        Self {
            kind,
            user,
            targets,
            action: None,
            skill: None,
            item: None,
            ailment: None,
            amount: 0,
            happens: true,
            rendered: false,
            performed: false,
        }
    }

    pub fn with_action(mut self, action: Option<Arc<Action>>) -> Self {
        self.action = action;
        self
    }

    pub fn with_skill(mut self, skill: Option<Arc<Skill>>) -> Self {
        self.skill = skill;
        self
    }

    pub fn with_item(mut self, item: Option<Arc<Item>>) -> Self {
        self.item = item;
        self
    }

    pub fn with_ailment(mut self, ailment: AilmentKind) -> Self {
        self.ailment = Some(ailment);
        self
    }

    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    /// First target, for single-target events.
    pub fn target(&self) -> Option<PersonIndex> {
        self.targets.first().copied()
    }
}

/// Append-only event log with render / perform cursors.
#[derive(Clone, Debug, Default)]
pub struct EventBuffer {
    events: VecDeque<BattleEvent>,
    /// Number of events dropped from the front.
    offset: usize,
    performed_cursor: usize,
    rendered_cursor: usize,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and returns its stable index.
    pub fn push(&mut self, event: BattleEvent) -> usize {
        tracing::trace!(kind = %event.kind, user = ?event.user, amount = event.amount, "event");
        self.events.push_back(event);
        self.offset + self.events.len() - 1
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn create_damage(
        &mut self,
        user: Option<PersonIndex>,
        target: PersonIndex,
        action: Option<Arc<Action>>,
        amount: i32,
        critical: bool,
    ) -> usize {
        let kind = if critical {
            EventKind::CriticalDamage
        } else {
            EventKind::Damage
        };
        self.push(
            BattleEvent::new(kind, user, vec![target])
                .with_action(action)
                .with_amount(amount),
        )
    }

    pub fn create_death(&mut self, user: Option<PersonIndex>, target: PersonIndex, amount: i32) -> usize {
        self.push(BattleEvent::new(EventKind::Death, user, vec![target]).with_amount(amount))
    }

    /// `kind` is one of the defend events.
    pub fn create_defend(&mut self, kind: EventKind, user: PersonIndex) -> usize {
        debug_assert!(matches!(
            kind,
            EventKind::DefendBegin | EventKind::DefendPersist | EventKind::DefendBreak
        ));
        self.push(BattleEvent::new(kind, Some(user), vec![user]))
    }

    /// `kind` is one of the guard events.
    pub fn create_guard(&mut self, kind: EventKind, guardian: PersonIndex, ward: PersonIndex) -> usize {
        debug_assert!(matches!(kind, EventKind::GuardBegin | EventKind::GuardBreak));
        self.push(BattleEvent::new(kind, Some(guardian), vec![ward]))
    }

    pub fn create_miss(
        &mut self,
        user: PersonIndex,
        target: PersonIndex,
        action: Option<Arc<Action>>,
    ) -> usize {
        self.push(BattleEvent::new(EventKind::Miss, Some(user), vec![target]).with_action(action))
    }

    pub fn create_skill(&mut self, user: PersonIndex, skill: Arc<Skill>, targets: Vec<PersonIndex>) -> usize {
        self.push(BattleEvent::new(EventKind::SkillUse, Some(user), targets).with_skill(Some(skill)))
    }

    pub fn create_item(&mut self, user: PersonIndex, item: Arc<Item>, targets: Vec<PersonIndex>) -> usize {
        self.push(BattleEvent::new(EventKind::ItemUse, Some(user), targets).with_item(Some(item)))
    }

    /// Generic action outcome (heal, alter, assign, revive, inflict, relieve, regen).
    pub fn create_action(
        &mut self,
        kind: EventKind,
        user: Option<PersonIndex>,
        target: PersonIndex,
        action: Option<Arc<Action>>,
        amount: i32,
    ) -> usize {
        self.push(
            BattleEvent::new(kind, user, vec![target])
                .with_action(action)
                .with_amount(amount),
        )
    }

    pub fn create_fizzle(
        &mut self,
        user: PersonIndex,
        targets: Vec<PersonIndex>,
        action: Option<Arc<Action>>,
    ) -> usize {
        self.push(BattleEvent::new(EventKind::Fizzle, Some(user), targets).with_action(action))
    }

    // ========================================================================
    // Cursors
    // ========================================================================

    /// Stable index of the first event (dropped events are gone).
    pub fn first_index(&self) -> usize {
        self.offset
    }

    /// One past the last stable index.
    pub fn end_index(&self) -> usize {
        self.offset + self.events.len()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BattleEvent> {
        index
            .checked_sub(self.offset)
            .and_then(|i| self.events.get(i))
    }

    /// Live events with their stable indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BattleEvent)> {
        let offset = self.offset;
        self.events.iter().enumerate().map(move |(i, e)| (offset + i, e))
    }

    /// Live events of a given kind.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// First event not yet performed.
    pub fn current_event(&self) -> Option<(usize, &BattleEvent)> {
        self.get(self.performed_cursor)
            .map(|e| (self.performed_cursor, e))
    }

    pub fn performed_cursor(&self) -> usize {
        self.performed_cursor
    }

    pub fn rendered_cursor(&self) -> usize {
        self.rendered_cursor
    }

    /// Mark an event performed. Idempotent; false for unknown indices.
    pub fn set_performed(&mut self, index: usize) -> bool {
        let Some(i) = index.checked_sub(self.offset) else {
            return false;
        };
        let Some(event) = self.events.get_mut(i) else {
            return false;
        };
        event.performed = true;
        while self
            .get(self.performed_cursor)
            .is_some_and(|e| e.performed)
        {
            self.performed_cursor += 1;
        }
        true
    }

    /// Mark an event rendered. Idempotent; false for unknown indices.
    pub fn set_rendered(&mut self, index: usize) -> bool {
        let Some(i) = index.checked_sub(self.offset) else {
            return false;
        };
        let Some(event) = self.events.get_mut(i) else {
            return false;
        };
        event.rendered = true;
        while self.get(self.rendered_cursor).is_some_and(|e| e.rendered) {
            self.rendered_cursor += 1;
        }
        true
    }

    /// Mark every live event performed and rendered.
    pub fn perform_all(&mut self) {
        for event in &mut self.events {
            event.performed = true;
            event.rendered = true;
        }
        self.performed_cursor = self.end_index();
        self.rendered_cursor = self.rendered_cursor.max(self.performed_cursor);
    }

    /// Drop events up to the oldest non-performed one.
    pub fn clear_current(&mut self) {
        while self.events.front().is_some_and(|e| e.performed) {
            self.events.pop_front();
            self.offset += 1;
        }
        self.rendered_cursor = self.rendered_cursor.max(self.offset);
    }

    /// Full reset.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(n: usize) -> EventBuffer {
        let mut buffer = EventBuffer::new();
        for i in 0..n {
            buffer.create_damage(None, PersonIndex::foe(1), None, i as i32, false);
        }
        buffer
    }

    #[test]
    fn performed_cursor_is_monotonic() {
        let mut buffer = buffer_with(3);
        assert_eq!(buffer.current_event().map(|(i, _)| i), Some(0));

        // Out of order: cursor waits for index 0.
        assert!(buffer.set_performed(1));
        assert_eq!(buffer.performed_cursor(), 0);
        assert!(buffer.set_performed(0));
        assert_eq!(buffer.performed_cursor(), 2);
        assert!(buffer.set_performed(0));
        assert_eq!(buffer.performed_cursor(), 2);
        assert!(!buffer.set_performed(9));
    }

    #[test]
    fn indices_survive_clear_current() {
        let mut buffer = buffer_with(3);
        buffer.set_performed(0);
        buffer.set_performed(1);
        buffer.clear_current();

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.first_index(), 2);
        assert!(buffer.get(0).is_none());
        assert_eq!(buffer.get(2).map(|e| e.amount), Some(2));

        let next = buffer.create_miss(PersonIndex::friend(1), PersonIndex::foe(1), None);
        assert_eq!(next, 3);
        assert_eq!(buffer.current_event().map(|(i, _)| i), Some(2));
    }

    #[test]
    fn renderer_may_outrun_performer() {
        let mut buffer = buffer_with(2);
        buffer.set_rendered(0);
        buffer.set_rendered(1);
        assert_eq!(buffer.rendered_cursor(), 2);
        assert_eq!(buffer.performed_cursor(), 0);
    }

    #[test]
    fn clear_all_resets() {
        let mut buffer = buffer_with(2);
        buffer.perform_all();
        buffer.clear_all();
        assert!(buffer.is_empty());
        assert_eq!(buffer.end_index(), 0);
        assert!(buffer.current_event().is_none());
    }

    #[test]
    fn critical_flag_selects_kind() {
        let mut buffer = EventBuffer::new();
        let i = buffer.create_damage(Some(PersonIndex::friend(1)), PersonIndex::foe(1), None, 10, true);
        let event = buffer.get(i).unwrap();
        assert_eq!(event.kind, EventKind::CriticalDamage);
        assert!(event.happens && !event.performed && !event.rendered);
    }
}

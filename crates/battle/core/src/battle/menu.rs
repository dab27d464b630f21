//! Ally selection state machine.
//!
//! ```text
//! TYPE ──SKILL──► ACTION_SKILL ──┐
//!      ──ITEM───► ACTION_ITEM  ──┼──► TARGET ──► VERIFY ──► complete
//!      ──GUARD──────────────────-┘                 ▲
//!      ──DEFEND / IMPLODE / RUN / PASS ────────────┘
//! ```
//!
//! CANCEL pops one layer. Entering VERIFY allocates the cost (QTDR for a
//! skill, one copy for a consumable item); cancelling out of VERIFY gives it
//! back, so a completed selection is the only way an allocation survives.

use std::sync::Arc;

use crate::skill::{ActionScope, Skill, TargetCount};
use crate::state::{Item, PersonIndex};

use super::input::InputKey;
use super::options::{BattleItem, BattleSkill};
use super::plan::{ActionPlan, ActionType};
use super::roster::Roster;

/// Current layer of the menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuLayer {
    #[default]
    Type,
    ActionSkill,
    ActionItem,
    Target,
    Verify,
}

/// What the menu took from the actor or inventory on entering VERIFY.
#[derive(Clone, Debug, PartialEq)]
enum Allocation {
    Qtdr(u32),
    Item(Arc<Item>),
}

/// Menu state for the ally currently deciding.
#[derive(Clone, Debug, Default)]
pub struct BattleMenu {
    actor: Option<PersonIndex>,
    layer: MenuLayer,

    action_types: Vec<ActionType>,
    skills: Vec<BattleSkill>,
    items: Vec<BattleItem>,

    type_cursor: usize,
    action_cursor: usize,
    chosen_type: Option<ActionType>,
    chosen_index: Option<usize>,

    selectable: Vec<PersonIndex>,
    target_cursor: usize,
    selected: Vec<PersonIndex>,

    allocation: Option<Allocation>,
    complete: bool,
}

impl BattleMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new actor with freshly built options.
    pub fn set_actor(
        &mut self,
        actor: PersonIndex,
        action_types: Vec<ActionType>,
        skills: Vec<BattleSkill>,
        items: Vec<BattleItem>,
    ) {
        *self = Self {
            actor: Some(actor),
            action_types,
            skills,
            items,
            ..Self::default()
        };
    }

    /// Drop the actor; any uncommitted allocation must be refunded first.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ========================================================================
    // Published state
    // ========================================================================

    pub fn actor(&self) -> Option<PersonIndex> {
        self.actor
    }

    pub fn layer(&self) -> MenuLayer {
        self.layer
    }

    pub fn valid_action_types(&self) -> &[ActionType] {
        &self.action_types
    }

    pub fn valid_battle_skills(&self) -> &[BattleSkill] {
        &self.skills
    }

    pub fn valid_battle_items(&self) -> &[BattleItem] {
        &self.items
    }

    /// Targets the cursor can move over, in canonical order.
    pub fn selectable_targets(&self) -> &[PersonIndex] {
        &self.selectable
    }

    pub fn selected_targets(&self) -> &[PersonIndex] {
        &self.selected
    }

    pub fn type_cursor(&self) -> usize {
        self.type_cursor
    }

    pub fn action_cursor(&self) -> usize {
        self.action_cursor
    }

    /// Target under the cursor.
    pub fn hovered_target(&self) -> Option<PersonIndex> {
        self.selectable.get(self.target_cursor).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Feed one key. Returns the plan once VERIFY is confirmed.
    ///
    /// The plan's `qtdr_paid` reflects the allocation; its jitter is left to
    /// the battle.
    pub fn handle(&mut self, key: InputKey, roster: &mut Roster) -> Option<ActionPlan> {
        let actor = self.actor?;
        if self.complete {
            return None;
        }
        match (self.layer, key) {
            (_, InputKey::Cancel) => {
                self.cancel(roster);
                None
            }
            (MenuLayer::Type, InputKey::Up | InputKey::Left) => {
                self.type_cursor = step(self.type_cursor, self.action_types.len(), -1);
                None
            }
            (MenuLayer::Type, InputKey::Down | InputKey::Right) => {
                self.type_cursor = step(self.type_cursor, self.action_types.len(), 1);
                None
            }
            (MenuLayer::Type, InputKey::Select) => {
                self.choose_type(actor, roster);
                None
            }
            (MenuLayer::ActionSkill | MenuLayer::ActionItem, InputKey::Up | InputKey::Left) => {
                self.action_cursor = step(self.action_cursor, self.action_len(), -1);
                None
            }
            (MenuLayer::ActionSkill | MenuLayer::ActionItem, InputKey::Down | InputKey::Right) => {
                self.action_cursor = step(self.action_cursor, self.action_len(), 1);
                None
            }
            (MenuLayer::ActionSkill | MenuLayer::ActionItem, InputKey::Char(c)) => {
                self.jump_to(c);
                None
            }
            (MenuLayer::ActionSkill | MenuLayer::ActionItem, InputKey::Select) => {
                self.choose_action(actor, roster);
                None
            }
            (MenuLayer::Target, InputKey::Left | InputKey::Up) => {
                self.move_target(-1);
                None
            }
            (MenuLayer::Target, InputKey::Right | InputKey::Down) => {
                self.move_target(1);
                None
            }
            (MenuLayer::Target, InputKey::Select) => {
                self.choose_target(actor, roster);
                None
            }
            (MenuLayer::Verify, InputKey::Select) => self.confirm(actor),
            _ => None,
        }
    }

    fn action_len(&self) -> usize {
        match self.layer {
            MenuLayer::ActionItem => self.items.len(),
            _ => self.skills.len(),
        }
    }

    // ========================================================================
    // Layer transitions
    // ========================================================================

    fn choose_type(&mut self, actor: PersonIndex, roster: &mut Roster) {
        let Some(&kind) = self.action_types.get(self.type_cursor) else {
            return;
        };
        self.chosen_type = Some(kind);
        self.chosen_index = None;
        self.action_cursor = 0;
        match kind {
            ActionType::Skill => {
                self.action_cursor = self
                    .skills
                    .iter()
                    .position(|s| s.status.is_valid())
                    .unwrap_or(0);
                self.layer = MenuLayer::ActionSkill;
            }
            ActionType::Item => {
                self.action_cursor = self
                    .items
                    .iter()
                    .position(|i| i.status.is_valid())
                    .unwrap_or(0);
                self.layer = MenuLayer::ActionItem;
            }
            ActionType::Guard => {
                self.selectable = roster.guard_candidates(actor);
                self.enter_targets(TargetCount::One);
            }
            ActionType::Implode => {
                self.selected = roster.living_opponents(actor);
                self.enter_verify(actor, roster);
            }
            ActionType::Defend | ActionType::Run | ActionType::Pass => {
                self.selected = vec![actor];
                self.enter_verify(actor, roster);
            }
        }
    }

    fn choose_action(&mut self, actor: PersonIndex, roster: &mut Roster) {
        let index = self.action_cursor;
        let scope = match self.layer {
            MenuLayer::ActionSkill => match self.skills.get(index) {
                Some(s) if s.status.is_valid() => s.skill.scope(),
                _ => return,
            },
            MenuLayer::ActionItem => match self.items.get(index) {
                Some(i) if i.status.is_valid() => match i.skill() {
                    Some(skill) => skill.scope(),
                    None => return,
                },
                _ => return,
            },
            _ => return,
        };
        // Recompute against the live state rather than the cached list.
        let live = roster.candidates(scope, actor);
        if live.is_empty() {
            tracing::debug!(%actor, %scope, "no live targets, staying on the action list");
            return;
        }
        self.chosen_index = Some(index);
        self.selectable = live;

        if scope == ActionScope::User {
            self.selected = vec![actor];
            self.enter_verify(actor, roster);
            return;
        }
        self.enter_targets(scope.count());
    }

    fn enter_targets(&mut self, count: TargetCount) {
        self.layer = MenuLayer::Target;
        self.target_cursor = 0;
        self.selected.clear();
        if count == TargetCount::All {
            self.selected = self.selectable.clone();
        }
    }

    fn scope(&self) -> Option<ActionScope> {
        let index = self.chosen_index?;
        match self.chosen_type? {
            ActionType::Skill => self.skills.get(index).map(|s| s.skill.scope()),
            ActionType::Item => self.items.get(index)?.skill().map(|s| s.scope()),
            ActionType::Guard => Some(ActionScope::OneAllyNotUser),
            _ => None,
        }
    }

    fn target_count(&self) -> TargetCount {
        match self.chosen_type {
            Some(ActionType::Guard) => TargetCount::One,
            _ => self.scope().map_or(TargetCount::None, ActionScope::count),
        }
    }

    fn move_target(&mut self, delta: isize) {
        if self.target_count() == TargetCount::Party {
            // Toggle between the two sides.
            self.target_cursor = usize::from(self.target_cursor == 0);
            return;
        }
        self.target_cursor = step(self.target_cursor, self.selectable.len(), delta);
    }

    fn choose_target(&mut self, actor: PersonIndex, roster: &mut Roster) {
        match self.target_count() {
            TargetCount::None => {}
            TargetCount::One => {
                if let Some(target) = self.hovered_target() {
                    self.selected = vec![target];
                    self.enter_verify(actor, roster);
                }
            }
            TargetCount::Two => {
                let Some(target) = self.hovered_target() else {
                    return;
                };
                if !self.selected.contains(&target) {
                    self.selected.push(target);
                }
                if self.selected.len() >= 2 || self.selected.len() == self.selectable.len() {
                    self.enter_verify(actor, roster);
                }
            }
            TargetCount::All => {
                if !self.selected.is_empty() {
                    self.enter_verify(actor, roster);
                }
            }
            TargetCount::Party => {
                let enemies = self.target_cursor == 0;
                let mut side: Vec<PersonIndex> = self
                    .selectable
                    .iter()
                    .copied()
                    .filter(|t| t.same_side(actor) != enemies)
                    .collect();
                if side.is_empty() {
                    side = self.selectable.clone();
                }
                if !side.is_empty() {
                    self.selected = side;
                    self.enter_verify(actor, roster);
                }
            }
        }
    }

    /// Enter VERIFY, allocating the skill cost or the item copy.
    fn enter_verify(&mut self, actor: PersonIndex, roster: &mut Roster) {
        let allocation = match (self.chosen_type, self.chosen_index) {
            (Some(ActionType::Skill), Some(index)) => {
                let Some(cost) = self.skills.get(index).map(|s| s.cost) else {
                    return;
                };
                let Some(person) = roster.get_mut(actor) else {
                    return;
                };
                if person.spend_qtdr(cost).is_err() {
                    return;
                }
                (cost > 0).then_some(Allocation::Qtdr(cost))
            }
            (Some(ActionType::Item), Some(index)) => {
                let Some(item) = self.items.get(index).map(|i| Arc::clone(&i.item)) else {
                    return;
                };
                if item.is_consumed() {
                    let inventory = roster.party_of_mut(actor).inventory_mut();
                    if inventory.consume(item.game_id(), 1).is_err() {
                        return;
                    }
                    Some(Allocation::Item(item))
                } else {
                    None
                }
            }
            _ => None,
        };
        self.allocation = allocation;
        self.layer = MenuLayer::Verify;
    }

    fn refund(&mut self, actor: PersonIndex, roster: &mut Roster) {
        match self.allocation.take() {
            Some(Allocation::Qtdr(amount)) => {
                if let Some(person) = roster.get_mut(actor) {
                    person.refund_qtdr(amount);
                }
            }
            Some(Allocation::Item(item)) => {
                roster.party_of_mut(actor).inventory_mut().restore(item, 1);
            }
            None => {}
        }
    }

    fn cancel(&mut self, roster: &mut Roster) {
        let Some(actor) = self.actor else {
            return;
        };
        match self.layer {
            MenuLayer::Type => {}
            MenuLayer::ActionSkill | MenuLayer::ActionItem => {
                self.chosen_type = None;
                self.layer = MenuLayer::Type;
            }
            MenuLayer::Target => {
                self.selected.clear();
                self.selectable.clear();
                match self.chosen_type {
                    Some(ActionType::Skill) => self.layer = MenuLayer::ActionSkill,
                    Some(ActionType::Item) => self.layer = MenuLayer::ActionItem,
                    _ => {
                        self.chosen_type = None;
                        self.layer = MenuLayer::Type;
                    }
                }
                self.chosen_index = None;
            }
            MenuLayer::Verify => {
                self.refund(actor, roster);
                let count = self.target_count();
                let direct = matches!(self.scope(), Some(ActionScope::User));
                self.selected.clear();
                match self.chosen_type {
                    Some(ActionType::Skill | ActionType::Item | ActionType::Guard) if !direct => {
                        self.layer = MenuLayer::Target;
                        if count == TargetCount::All {
                            self.selected = self.selectable.clone();
                        }
                    }
                    Some(ActionType::Skill) => {
                        self.chosen_index = None;
                        self.layer = MenuLayer::ActionSkill;
                    }
                    Some(ActionType::Item) => {
                        self.chosen_index = None;
                        self.layer = MenuLayer::ActionItem;
                    }
                    _ => {
                        self.chosen_type = None;
                        self.layer = MenuLayer::Type;
                    }
                }
            }
        }
    }

    fn confirm(&mut self, actor: PersonIndex) -> Option<ActionPlan> {
        let kind = self.chosen_type?;
        let mut plan = ActionPlan::new(actor, kind);
        plan.targets = self.selected.clone();
        match kind {
            ActionType::Skill => {
                plan.skill = Some(Arc::clone(&self.skills.get(self.chosen_index?)?.skill));
            }
            ActionType::Item => {
                plan.item = Some(Arc::clone(&self.items.get(self.chosen_index?)?.item));
            }
            _ => {}
        }
        if let Some(Allocation::Qtdr(amount)) = self.allocation.take() {
            plan.qtdr_paid = amount;
        }
        self.allocation = None;
        self.complete = true;
        Some(plan)
    }

    /// Jump to the next entry whose name starts with `c`, wrapping around.
    fn jump_to(&mut self, c: char) {
        let names: Vec<&str> = match self.layer {
            MenuLayer::ActionItem => self.items.iter().map(|i| i.item.name()).collect(),
            _ => self.skills.iter().map(|s| s.skill.name()).collect(),
        };
        let len = names.len();
        let found = (1..=len)
            .map(|offset| (self.action_cursor + offset) % len)
            .find(|&i| starts_with_ignore_case(names[i], c));
        if let Some(i) = found {
            self.action_cursor = i;
        }
    }

    /// The skill under the cursor, for previews.
    pub fn hovered_skill(&self) -> Option<&Arc<Skill>> {
        match self.layer {
            MenuLayer::ActionSkill => self.skills.get(self.action_cursor).map(|s| &s.skill),
            MenuLayer::ActionItem => self.items.get(self.action_cursor)?.skill(),
            _ => None,
        }
    }
}

fn starts_with_ignore_case(name: &str, c: char) -> bool {
    name.chars()
        .next()
        .is_some_and(|first| first.to_lowercase().eq(c.to_lowercase()))
}

/// Move a cursor by `delta` within `[0, len)`, wrapping.
fn step(cursor: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).rem_euclid(len as isize) as usize
}

//! Battle - the turn state machine.
//!
//! A [`Battle`] owns both parties for the duration of a fight and advances
//! one phase per [`update`](Battle::update) once the current phase reports
//! `PHASE_DONE`. Allies decide through the [`BattleMenu`] fed by
//! [`key_down`](Battle::key_down); foes decide through their AI module. Every
//! effect is appended to the [`EventBuffer`], which the renderer polls.
//!
//! Phase bodies live beside this file, one `impl Battle` block each:
//!
//! - `upkeep`: general and personal upkeep (ailments, cooldowns, regen)
//! - `selection`: ally and foe decisions into [`ActionPlan`]s
//! - `process`: ordering and performing plans
//! - `effects`: evaluating one action against one target
//! - `cleanup`: end of turn, victory, loss and teardown

mod cleanup;
mod effects;
mod events;
mod input;
mod menu;
mod options;
mod outcome;
mod plan;
mod process;
mod roster;
mod selection;
mod turn;
mod upkeep;

pub use events::{BattleEvent, EventBuffer, EventKind};
pub use input::InputKey;
pub use menu::{BattleMenu, MenuLayer};
pub use options::{
    BattleItem, BattleSkill, ValidStatus, battle_items, battle_skills, valid_action_types,
};
pub use outcome::{BattleObserver, BattleOutcome, OutcomeKind, Rewards};
pub use plan::{ActionPlan, ActionType, order_plans};
pub use roster::Roster;
pub use turn::{BattleError, BattleStatus, TurnMode, TurnState};

use std::collections::VecDeque;
use std::fmt;

use crate::ai::AiModule;
use crate::config::BattleConfig;
use crate::env::BattleRng;
use crate::error::BattleFault;
use crate::state::{Ailment, InflictOutcome, Party, Person, PersonIndex};

/// One fight between a friends party and a foes party.
pub struct Battle {
    roster: Roster,
    config: BattleConfig,
    rng: Box<dyn BattleRng>,
    observer: Option<Box<dyn BattleObserver>>,

    state: TurnState,
    status: BattleStatus,
    turn_mode: TurnMode,
    /// Completed turns.
    turn: u32,
    elapsed_ms: u64,

    events: EventBuffer,
    menu: BattleMenu,
    plans: Vec<ActionPlan>,
    /// Allies still to decide this turn, one entry per cast.
    ally_queue: VecDeque<PersonIndex>,
    input: VecDeque<InputKey>,

    outcome: Option<BattleOutcome>,
    error: Option<BattleError>,
}

impl Battle {
    /// Start a battle. Both parties are prepped and BEGIN runs immediately.
    ///
    /// An empty party puts the battle straight into `ERROR_STATE`.
    pub fn new(friends: Party, foes: Party, config: BattleConfig, rng: Box<dyn BattleRng>) -> Self {
        let mut battle = Self {
            roster: Roster::new(friends, foes),
            config,
            rng,
            observer: None,
            state: TurnState::Begin,
            status: BattleStatus::empty(),
            turn_mode: TurnMode::default(),
            turn: 0,
            elapsed_ms: 0,
            events: EventBuffer::new(),
            menu: BattleMenu::new(),
            plans: Vec::new(),
            ally_queue: VecDeque::new(),
            input: VecDeque::new(),
            outcome: None,
            error: None,
        };
        battle.begin();
        battle
    }

    pub fn with_observer(mut self, observer: Box<dyn BattleObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // ========================================================================
    // Driver interface
    // ========================================================================

    /// Advance by one tick.
    ///
    /// Moves to the next phase when the current one is done, then lets the
    /// menu consume queued input while allies are deciding.
    pub fn update(&mut self, elapsed_ms: u64) {
        if self.state == TurnState::Destruct {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);

        if self.status.has(BattleStatus::PHASE_DONE) {
            self.status.clear(BattleStatus::PHASE_DONE);
            let next = self.next_state();
            tracing::debug!(from = %self.state, to = %next, turn = self.turn, "phase transition");
            self.state = next;
            self.run_phase();
        }

        if self.state == TurnState::SelectActionAlly && !self.status.has(BattleStatus::PHASE_DONE) {
            self.drain_input();
        }
    }

    /// Queue a key for the menu. Returns false when no ally is deciding.
    pub fn key_down(&mut self, key: InputKey) -> bool {
        if self.state != TurnState::SelectActionAlly || self.status.has(BattleStatus::PHASE_DONE) {
            tracing::trace!(?key, state = %self.state, "input dropped");
            return false;
        }
        self.input.push_back(key);
        true
    }

    pub fn current_state(&self) -> TurnState {
        self.state
    }

    pub fn turn_mode(&self) -> TurnMode {
        self.turn_mode
    }

    /// Completed turns.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn flag(&self, flag: BattleStatus) -> bool {
        self.status.has(flag)
    }

    pub fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    /// Mark an event performed; see [`EventBuffer::set_performed`].
    pub fn set_event_performed(&mut self, index: usize) -> bool {
        self.events.set_performed(index)
    }

    /// Mark an event rendered; see [`EventBuffer::set_rendered`].
    pub fn set_event_rendered(&mut self, index: usize) -> bool {
        self.events.set_rendered(index)
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    /// The fatal error that stopped the battle, if any.
    pub fn error(&self) -> Option<&BattleError> {
        self.error.as_ref()
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn menu(&self) -> &BattleMenu {
        &self.menu
    }

    /// Plans recorded this turn, in processing order once ordered.
    pub fn plans(&self) -> &[ActionPlan] {
        &self.plans
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn friends(&self) -> &Party {
        self.roster.friends()
    }

    pub fn foes(&self) -> &Party {
        self.roster.foes()
    }

    pub fn person(&self, index: PersonIndex) -> Option<&Person> {
        self.roster.get(index)
    }

    pub fn person_mut(&mut self, index: PersonIndex) -> Option<&mut Person> {
        self.roster.get_mut(index)
    }

    /// Attach an ailment from outside an action, honouring the battle-wide cap.
    pub fn inflict_ailment(
        &mut self,
        index: PersonIndex,
        ailment: Ailment,
    ) -> Result<InflictOutcome, BattleError> {
        if self.roster.get(index).is_none() {
            return Err(BattleError::UnknownPerson(index));
        }
        if self.roster.ailment_count() >= BattleConfig::MAX_AILMENTS_PER_BATTLE {
            return Err(BattleError::AilmentCapacity);
        }
        let person = self
            .roster
            .get_mut(index)
            .ok_or(BattleError::UnknownPerson(index))?;
        Ok(person.inflict(ailment)?)
    }

    /// Hand the parties back, e.g. after DESTRUCT.
    pub fn into_parties(self) -> (Party, Party) {
        self.roster.into_parties()
    }

    // ========================================================================
    // State machine
    // ========================================================================

    fn begin(&mut self) {
        let empty = if self.roster.friends().is_empty() {
            Some("friend")
        } else if self.roster.foes().is_empty() {
            Some("foe")
        } else {
            None
        };
        if let Some(side) = empty {
            self.abort(BattleError::EmptyParty { side });
            return;
        }

        for person in self.roster.persons_mut() {
            person.battle_prep();
        }
        for foe in self.roster.foes_mut().members_mut() {
            if foe.ai().is_none() {
                foe.set_ai(AiModule::default());
            }
        }

        if !self.roster.foes().has_boss() {
            self.status.insert(BattleStatus::RANDOM_ENCOUNTER);
        }

        let friends = self.roster.friends().total_momentum();
        let foes = self.roster.foes().total_momentum();
        self.turn_mode = match friends.cmp(&foes) {
            std::cmp::Ordering::Greater => TurnMode::FriendsFirst,
            std::cmp::Ordering::Less => TurnMode::FoesFirst,
            std::cmp::Ordering::Equal => {
                if self.rng.coin_flip() {
                    TurnMode::FriendsFirst
                } else {
                    TurnMode::FoesFirst
                }
            }
        };

        tracing::debug!(
            friends = self.roster.friends().len(),
            foes = self.roster.foes().len(),
            turn_mode = %self.turn_mode,
            random_encounter = self.status.has(BattleStatus::RANDOM_ENCOUNTER),
            "battle begins"
        );
        self.status.insert(BattleStatus::PHASE_DONE);
    }

    /// Record a fatal error and stop.
    fn abort(&mut self, error: BattleError) {
        tracing::warn!(code = error.error_code(), %error, "battle aborted");
        self.error = Some(error);
        self.status.insert(BattleStatus::ERROR_STATE);
        self.state = TurnState::Destruct;
    }

    fn next_state(&self) -> TurnState {
        let friends_first = self.turn_mode == TurnMode::FriendsFirst;
        match self.state {
            TurnState::Begin => TurnState::GeneralUpkeep,
            TurnState::GeneralUpkeep => TurnState::Upkeep,
            TurnState::Upkeep if friends_first => TurnState::SelectActionAlly,
            TurnState::Upkeep => TurnState::SelectActionEnemy,
            TurnState::SelectActionAlly if friends_first => TurnState::SelectActionEnemy,
            TurnState::SelectActionAlly => TurnState::OrderActions,
            TurnState::SelectActionEnemy if friends_first => TurnState::OrderActions,
            TurnState::SelectActionEnemy => TurnState::SelectActionAlly,
            TurnState::OrderActions => TurnState::ProcessActions,
            TurnState::ProcessActions if self.status.has(BattleStatus::ESCAPED) => {
                TurnState::Destruct
            }
            TurnState::ProcessActions => TurnState::CleanUp,
            TurnState::CleanUp => TurnState::GeneralUpkeep,
            TurnState::BattleVictory | TurnState::BattleLoss | TurnState::Destruct => {
                TurnState::Destruct
            }
        }
    }

    fn run_phase(&mut self) {
        match self.state {
            TurnState::Begin => self.begin(),
            TurnState::GeneralUpkeep => self.general_upkeep(),
            TurnState::Upkeep => {
                self.upkeep();
                self.settle_if_wiped();
            }
            TurnState::SelectActionAlly => self.begin_ally_selection(),
            TurnState::SelectActionEnemy => self.select_enemy_actions(),
            TurnState::OrderActions => self.order_actions(),
            TurnState::ProcessActions => {
                self.process_actions();
                self.settle_if_wiped();
            }
            TurnState::CleanUp => self.clean_up(),
            TurnState::BattleVictory => self.victory(),
            TurnState::BattleLoss => self.loss(),
            TurnState::Destruct => self.destruct(),
        }
    }

    /// A side with nobody standing ends the turn on the spot.
    fn settle_if_wiped(&mut self) {
        if self.status.has(BattleStatus::ESCAPED) || !self.side_wiped() {
            return;
        }
        tracing::debug!(from = %self.state, "side wiped out");
        self.state = TurnState::CleanUp;
        self.clean_up();
    }

    fn side_wiped(&self) -> bool {
        !self.roster.friends().any_alive() || !self.roster.foes().any_alive()
    }
}

impl fmt::Debug for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("state", &self.state)
            .field("status", &self.status)
            .field("turn_mode", &self.turn_mode)
            .field("turn", &self.turn)
            .field("plans", &self.plans.len())
            .field("events", &self.events.len())
            .field("outcome", &self.outcome)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

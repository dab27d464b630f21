//! VITA, QTDR, attribute edits and experience.

use crate::error::{BattleFault, ErrorSeverity};
use crate::state::flags::{BattleFlags, PersonFlags};
use crate::stats::Attribute;

use super::Person;

/// Person-level precondition failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PersonError {
    #[error("person cannot gain experience")]
    CannotGainExp,

    #[error("person is knocked out")]
    NotAlive,

    #[error("person is already alive")]
    AlreadyAlive,

    #[error("person cannot be revived")]
    NotRevivable,

    #[error("needs {needed} QTDR, has {available}")]
    NotAffordable { needed: u32, available: i32 },
}

impl BattleFault for PersonError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CannotGainExp => "PERSON_CANNOT_GAIN_EXP",
            Self::NotAlive => "PERSON_NOT_ALIVE",
            Self::AlreadyAlive => "PERSON_ALREADY_ALIVE",
            Self::NotRevivable => "PERSON_NOT_REVIVABLE",
            Self::NotAffordable { .. } => "PERSON_NOT_AFFORDABLE",
        }
    }
}

impl Person {
    /// Subtract `amount` VITA. Returns true when this blow knocked the person out.
    ///
    /// The caller emits the matching event.
    pub fn do_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.curr.alter(Attribute::Vita, -amount.max(0));
        if self.vita() == 0 {
            self.knock_out();
            return true;
        }
        false
    }

    /// Drop to 0 VITA and lose every ailment and stance.
    pub fn knock_out(&mut self) {
        self.curr.set(Attribute::Vita, 0);
        self.clear_ailments();
        self.battle_flags
            .clear(BattleFlags::ALIVE | BattleFlags::TRANSIENT | BattleFlags::STANCES);
        self.guarding = None;
        self.guarded_by = None;
    }

    /// Restore up to `amount` VITA on a living person; returns the amount gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        self.alter_resource(Attribute::Vita, amount.max(0))
    }

    /// Bring a knocked-out person back with `amount` VITA (at least 1).
    pub fn revive(&mut self, amount: i32) -> Result<i32, PersonError> {
        if self.is_alive() {
            return Err(PersonError::AlreadyAlive);
        }
        if !self.has_flag(BattleFlags::REVIVABLE) {
            return Err(PersonError::NotRevivable);
        }
        let cap = self.temp_max.get(Attribute::Vita).max(1);
        let vita = amount.clamp(1, cap);
        self.curr.set(Attribute::Vita, vita);
        self.battle_flags.insert(BattleFlags::ALIVE);
        Ok(vita)
    }

    pub fn spend_qtdr(&mut self, amount: u32) -> Result<(), PersonError> {
        if i64::from(self.qtdr()) < i64::from(amount) {
            return Err(PersonError::NotAffordable {
                needed: amount,
                available: self.qtdr(),
            });
        }
        self.curr
            .alter(Attribute::Qtdr, -(amount.min(i32::MAX as u32) as i32));
        Ok(())
    }

    /// Give back QTDR, bounded by `temp_max`.
    pub fn refund_qtdr(&mut self, amount: u32) -> i32 {
        self.alter_resource(Attribute::Qtdr, amount.min(i32::MAX as u32) as i32)
    }

    /// Add `delta` to an attribute; returns the change actually applied.
    ///
    /// VITA goes through [`do_damage`](Self::do_damage) / [`heal`](Self::heal)
    /// so death and the temp_max bound stay consistent.
    pub fn alter_attribute(&mut self, attr: Attribute, delta: i32) -> i32 {
        if attr == Attribute::Vita {
            let before = self.vita();
            if delta < 0 {
                self.do_damage(-delta);
            } else {
                self.heal(delta);
            }
            return self.vita() - before;
        }
        self.alter_resource(attr, delta)
    }

    /// Set an attribute; returns the change actually applied.
    ///
    /// Assigning VITA to a knocked-out person has no effect; assigning 0
    /// knocks a living one out.
    pub fn assign_attribute(&mut self, attr: Attribute, value: i32) -> i32 {
        let delta = i64::from(value) - i64::from(self.stat(attr));
        let delta = delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        self.alter_attribute(attr, delta)
    }

    fn alter_resource(&mut self, attr: Attribute, delta: i32) -> i32 {
        let before = self.curr.get(attr);
        self.curr.alter(attr, delta);
        if attr.is_resource() {
            let cap = self.temp_max.get(attr);
            if self.curr.get(attr) > cap {
                self.curr.set(attr, cap);
            }
        }
        self.curr.get(attr) - before
    }

    /// Add experience, bounded by the max-level threshold.
    ///
    /// With `update`, a person that can level up has its level and stats
    /// recomputed. Returns the exp actually added.
    pub fn add_exp(&mut self, amount: u64, update: bool) -> Result<u64, PersonError> {
        if !self.person_flags.has(PersonFlags::CAN_GAIN_EXP) {
            return Err(PersonError::CannotGainExp);
        }
        let max = self.exp_table.max_exp();
        let before = self.total_exp;
        self.total_exp = before.saturating_add(amount).min(max);
        if self.total_exp == max {
            self.person_flags.insert(PersonFlags::MAX_LVL);
        }
        if update && self.person_flags.has(PersonFlags::CAN_LEVEL_UP) {
            let level = self.level;
            self.recompute_stats();
            if self.level > level {
                tracing::debug!(person = self.my_id, from = level, to = self.level, "level up");
            }
        }
        Ok(self.total_exp - before)
    }
}

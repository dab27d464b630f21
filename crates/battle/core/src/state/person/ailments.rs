//! Attaching and detaching ailments.

use crate::config::BattleConfig;
use crate::error::{BattleFault, ErrorSeverity};
use crate::state::ailment::{Ailment, AilmentKind};

use super::Person;

/// Why an infliction did not take.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InflictError {
    #[error("immune to {0}")]
    Immune(AilmentKind),

    #[error("already carrying {} ailments", BattleConfig::MAX_AILMENTS_PER_PERSON)]
    Capacity,

    #[error("person is knocked out")]
    NotAlive,
}

impl BattleFault for InflictError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Immune(_) => "INFLICT_IMMUNE",
            Self::Capacity => "INFLICT_CAPACITY",
            Self::NotAlive => "INFLICT_NOT_ALIVE",
        }
    }
}

/// What a successful infliction did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InflictOutcome {
    Attached,
    /// Same kind already present; its duration was extended.
    Refreshed,
}

impl Person {
    pub fn ailments(&self) -> &[Ailment] {
        &self.ailments
    }

    pub fn has_ailment(&self, kind: AilmentKind) -> bool {
        self.ailments.iter().any(|a| a.kind() == kind)
    }

    pub fn is_silenced(&self) -> bool {
        self.has_ailment(AilmentKind::Silence)
    }

    /// Immunity comes from either category.
    pub fn is_immune(&self, kind: AilmentKind) -> bool {
        self.battle_class.is_immune(kind) || self.race_class.is_immune(kind)
    }

    /// Attach an ailment. An opposite ailment is removed first; the same kind
    /// is refreshed instead of stacked.
    pub fn inflict(&mut self, mut ailment: Ailment) -> Result<InflictOutcome, InflictError> {
        let kind = ailment.kind();
        if !self.is_alive() {
            return Err(InflictError::NotAlive);
        }
        if self.is_immune(kind) {
            return Err(InflictError::Immune(kind));
        }
        if let Some(existing) = self.ailments.iter_mut().find(|a| a.kind() == kind) {
            existing.refresh(ailment.duration());
            return Ok(InflictOutcome::Refreshed);
        }
        if let Some(opposite) = kind.opposite() {
            self.relieve(opposite);
        }
        if self.ailments.is_full() {
            return Err(InflictError::Capacity);
        }

        self.apply_ailment(&mut ailment);
        self.ailments.push(ailment);
        Ok(InflictOutcome::Attached)
    }

    /// Detach an ailment of `kind`, reverting what it changed.
    pub fn relieve(&mut self, kind: AilmentKind) -> Option<Ailment> {
        let index = self.ailments.iter().position(|a| a.kind() == kind)?;
        let ailment = self.ailments.remove(index);
        self.revert_ailment(&ailment);
        Some(ailment)
    }

    /// Detach every ailment.
    pub fn clear_ailments(&mut self) {
        while let Some(ailment) = self.ailments.pop() {
            self.revert_ailment(&ailment);
        }
    }

    /// Count every ailment down one turn.
    pub fn tick_ailments(&mut self) {
        for ailment in &mut self.ailments {
            ailment.tick();
        }
    }

    /// Detach and return the ailments whose duration ran out.
    pub fn take_expired(&mut self) -> Vec<Ailment> {
        let mut expired = Vec::new();
        let mut i = 0;
        while i < self.ailments.len() {
            if self.ailments[i].is_expired() {
                let ailment = self.ailments.remove(i);
                self.revert_ailment(&ailment);
                expired.push(ailment);
            } else {
                i += 1;
            }
        }
        expired
    }

    fn apply_ailment(&mut self, ailment: &mut Ailment) {
        let kind = ailment.kind();

        let granted = kind.granted_flags().difference(self.battle_flags);
        let revoked = kind.revoked_flags().intersection(self.battle_flags);
        self.battle_flags.insert(granted);
        self.battle_flags.remove(revoked);
        ailment.applied_flags = granted;
        ailment.cleared_flags = revoked;

        let (attrs, sign) = kind.stat_change();
        for &attr in attrs {
            let before = self.curr.get(attr);
            let change = (f64::from(before) * f64::from(ailment.magnitude()) / 100.0).round() as i32;
            self.curr.alter(attr, change * sign);
            ailment.stat_delta.set(attr, self.curr.get(attr) - before);
        }
    }

    /// Undo an ailment that is no longer attached. Flags another attached
    /// ailment also grants or revokes are handed over to it instead.
    fn revert_ailment(&mut self, ailment: &Ailment) {
        let mut removed = ailment.applied_flags;
        let mut restored = ailment.cleared_flags;
        for other in &mut self.ailments {
            let kept = removed & other.kind().granted_flags();
            other.applied_flags.insert(kept);
            removed.remove(kept);

            let held = restored & other.kind().revoked_flags();
            other.cleared_flags.insert(held);
            restored.remove(held);
        }
        self.battle_flags.remove(removed);
        self.battle_flags.insert(restored);
        for (attr, delta) in ailment.stat_delta.iter() {
            if delta != 0 {
                self.curr.alter(attr, -delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ailment::AilmentDuration;
    use crate::state::flags::BattleFlags;
    use crate::state::person::tests::person_with;
    use crate::stats::Attribute;

    fn ailment(kind: AilmentKind, turns: u32) -> Ailment {
        Ailment::new(kind, AilmentDuration::Turns(turns), 25, None)
    }

    #[test]
    fn inflict_then_relieve_restores_flags() {
        let mut person = person_with(&[(Attribute::Vita, 100)]);
        let before = person.battle_flags();

        person.inflict(ailment(AilmentKind::Berserk, 3)).unwrap();
        assert!(!person.has_flag(BattleFlags::SKL_ENABLED));
        person.inflict(ailment(AilmentKind::Reflect, 3)).unwrap();
        assert!(person.has_flag(BattleFlags::REFLECT));

        person.relieve(AilmentKind::Reflect).unwrap();
        person.relieve(AilmentKind::Berserk).unwrap();
        assert_eq!(person.battle_flags(), before);
    }

    #[test]
    fn overlapping_lockouts_hold_until_both_are_gone() {
        let mut person = person_with(&[(Attribute::Vita, 100)]);
        let before = person.battle_flags();

        person.inflict(ailment(AilmentKind::Berserk, 3)).unwrap();
        person.inflict(ailment(AilmentKind::Bubbify, 3)).unwrap();
        person.relieve(AilmentKind::Berserk).unwrap();
        assert!(!person.has_flag(BattleFlags::SKL_ENABLED));
        assert!(!person.has_flag(BattleFlags::ITM_ENABLED));
        assert!(person.has_flag(BattleFlags::DEF_ENABLED));
        assert!(person.has_flag(BattleFlags::IS_BUBBY));

        person.relieve(AilmentKind::Bubbify).unwrap();
        assert_eq!(person.battle_flags(), before);

        person.inflict(ailment(AilmentKind::Berserk, 3)).unwrap();
        person.inflict(ailment(AilmentKind::Bubbify, 3)).unwrap();
        person.relieve(AilmentKind::Bubbify).unwrap();
        assert!(!person.has_flag(BattleFlags::SKL_ENABLED));
        assert!(!person.has_flag(BattleFlags::DEF_ENABLED));
        person.relieve(AilmentKind::Berserk).unwrap();
        assert_eq!(person.battle_flags(), before);
    }

    #[test]
    fn buffs_revert_exactly() {
        let mut person = person_with(&[(Attribute::Vita, 100)]);
        person.assign_attribute(Attribute::Phag, 41);
        person.inflict(ailment(AilmentKind::AllAtkBuff, 2)).unwrap();
        assert_eq!(person.stat(Attribute::Phag), 51);

        // Opposite cancels the buff, then applies itself.
        person.inflict(ailment(AilmentKind::AllAtkDebuff, 2)).unwrap();
        assert!(!person.has_ailment(AilmentKind::AllAtkBuff));
        assert_eq!(person.stat(Attribute::Phag), 31);

        person.relieve(AilmentKind::AllAtkDebuff).unwrap();
        assert_eq!(person.stat(Attribute::Phag), 41);
    }

    #[test]
    fn immunity_and_capacity() {
        let mut person = person_with(&[(Attribute::Vita, 100)]);
        for kind in [
            AilmentKind::Poison,
            AilmentKind::Burn,
            AilmentKind::Silence,
            AilmentKind::Reflect,
            AilmentKind::HalfCost,
        ] {
            person.inflict(ailment(kind, 2)).unwrap();
        }
        assert_eq!(
            person.inflict(ailment(AilmentKind::Confuse, 2)),
            Err(InflictError::Capacity)
        );
        assert_eq!(
            person.inflict(ailment(AilmentKind::Poison, 6)),
            Ok(InflictOutcome::Refreshed)
        );
        assert_eq!(person.ailments()[0].duration(), AilmentDuration::Turns(6));
    }

    #[test]
    fn expiry_detaches() {
        let mut person = person_with(&[(Attribute::Vita, 100)]);
        person.inflict(ailment(AilmentKind::Silence, 1)).unwrap();
        person.inflict(ailment(AilmentKind::Poison, 2)).unwrap();
        assert!(person.is_silenced());
        person.tick_ailments();
        let expired = person.take_expired();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind(), AilmentKind::Silence);
        assert!(!person.is_silenced());
        assert!(person.has_ailment(AilmentKind::Poison));
    }

    #[test]
    fn knock_out_clears_ailments() {
        let mut person = person_with(&[(Attribute::Vita, 10)]);
        person.inflict(ailment(AilmentKind::Bubbify, 3)).unwrap();
        assert!(person.has_flag(BattleFlags::IS_BUBBY));
        person.do_damage(10);
        assert!(person.ailments().is_empty());
        assert!(!person.has_flag(BattleFlags::IS_BUBBY));
        assert_eq!(
            person.inflict(ailment(AilmentKind::Poison, 2)),
            Err(InflictError::NotAlive)
        );
    }
}

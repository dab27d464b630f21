//! Equipment and equip slots.

use std::sync::Arc;

use crate::error::{BattleFault, ErrorSeverity};
use crate::skill::SkillSet;
use crate::stats::AttributeSet;

/// Body slot an equipment piece occupies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum EquipSlot {
    Head,
    LArm,
    RArm,
    Body,
    Legs,
}

impl EquipSlot {
    pub const COUNT: usize = <Self as strum::EnumCount>::COUNT;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_arm(self) -> bool {
        matches!(self, Self::LArm | Self::RArm)
    }

    /// The other arm, for arm slots.
    pub const fn other_arm(self) -> Option<EquipSlot> {
        match self {
            Self::LArm => Some(Self::RArm),
            Self::RArm => Some(Self::LArm),
            _ => None,
        }
    }
}

/// Reasons an equip request is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("{equipment} does not fit the {slot} slot")]
    SlotMismatch { equipment: u32, slot: EquipSlot },

    #[error("{0} slot is already occupied")]
    SlotOccupied(EquipSlot),

    #[error("two-handed equipment needs both arms free")]
    ArmsOccupied,

    #[error("{0} slot is empty")]
    SlotEmpty(EquipSlot),
}

impl BattleFault for EquipError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SlotMismatch { .. } => ErrorSeverity::Validation,
            Self::SlotOccupied(_) | Self::ArmsOccupied | Self::SlotEmpty(_) => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotMismatch { .. } => "EQUIP_SLOT_MISMATCH",
            Self::SlotOccupied(_) => "EQUIP_SLOT_OCCUPIED",
            Self::ArmsOccupied => "EQUIP_ARMS_OCCUPIED",
            Self::SlotEmpty(_) => "EQUIP_SLOT_EMPTY",
        }
    }
}

/// An equipment definition. Stat bonuses go into `temp_max`.
#[derive(Clone, Debug, PartialEq)]
pub struct Equipment {
    id: u32,
    name: String,
    slot: EquipSlot,
    two_handed: bool,
    stats: AttributeSet,
    skills: SkillSet,
}

impl Equipment {
    pub fn new(id: u32, name: impl Into<String>, slot: EquipSlot) -> Self {
        Self {
            id,
            name: name.into(),
            slot,
            two_handed: false,
            stats: AttributeSet::delta(),
            skills: SkillSet::new(),
        }
    }

    pub fn two_handed(mut self) -> Self {
        self.two_handed = true;
        self
    }

    pub fn with_stats(mut self, stats: AttributeSet) -> Self {
        self.stats = stats.with_personal(false);
        self
    }

    pub fn with_skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> EquipSlot {
        self.slot
    }

    pub fn is_two_handed(&self) -> bool {
        self.two_handed
    }

    pub fn stats(&self) -> &AttributeSet {
        &self.stats
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    /// Arm equipment fits either arm; everything else only its own slot.
    pub fn fits(&self, slot: EquipSlot) -> bool {
        self.slot == slot || (self.slot.is_arm() && slot.is_arm())
    }
}

/// The five equip slots of a person.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EquipSlots {
    slots: [Option<Arc<Equipment>>; EquipSlot::COUNT],
}

impl EquipSlots {
    pub fn get(&self, slot: EquipSlot) -> Option<&Arc<Equipment>> {
        self.slots[slot.index()].as_ref()
    }

    /// Places `equipment` in `slot`; two-handed pieces take both arms.
    pub fn equip(&mut self, slot: EquipSlot, equipment: Arc<Equipment>) -> Result<(), EquipError> {
        if !equipment.fits(slot) {
            return Err(EquipError::SlotMismatch {
                equipment: equipment.id(),
                slot,
            });
        }
        if self.slots[slot.index()].is_some() {
            return Err(EquipError::SlotOccupied(slot));
        }
        if equipment.is_two_handed() {
            let other = slot.other_arm().ok_or(EquipError::SlotMismatch {
                equipment: equipment.id(),
                slot,
            })?;
            if self.slots[other.index()].is_some() {
                return Err(EquipError::ArmsOccupied);
            }
            self.slots[other.index()] = Some(Arc::clone(&equipment));
        }
        self.slots[slot.index()] = Some(equipment);
        Ok(())
    }

    /// Empties `slot` (both arms for two-handed pieces).
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<Arc<Equipment>, EquipError> {
        let equipment = self.slots[slot.index()]
            .take()
            .ok_or(EquipError::SlotEmpty(slot))?;
        if equipment.is_two_handed()
            && let Some(other) = slot.other_arm()
        {
            self.slots[other.index()] = None;
        }
        Ok(equipment)
    }

    /// Distinct equipped pieces; a two-handed piece appears once.
    pub fn pieces(&self) -> impl Iterator<Item = &Arc<Equipment>> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let piece = slot.as_ref()?;
            let duplicate_arm = i == EquipSlot::RArm.index()
                && piece.is_two_handed()
                && self.slots[EquipSlot::LArm.index()]
                    .as_ref()
                    .is_some_and(|left| Arc::ptr_eq(left, piece));
            (!duplicate_arm).then_some(piece)
        })
    }

    /// Sum of the stat bonuses of every piece.
    pub fn total_stats(&self) -> AttributeSet {
        let mut total = AttributeSet::delta();
        for piece in self.pieces() {
            total += piece.stats();
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Attribute;

    fn sword() -> Arc<Equipment> {
        Arc::new(Equipment::new(1, "Sword", EquipSlot::RArm))
    }

    fn greatsword() -> Arc<Equipment> {
        Arc::new(Equipment::new(2, "Greatsword", EquipSlot::RArm).two_handed())
    }

    #[test]
    fn slot_rules() {
        let mut slots = EquipSlots::default();
        let helmet = Arc::new(Equipment::new(3, "Helmet", EquipSlot::Head));
        assert_eq!(
            slots.equip(EquipSlot::Body, Arc::clone(&helmet)),
            Err(EquipError::SlotMismatch {
                equipment: 3,
                slot: EquipSlot::Body
            })
        );
        slots.equip(EquipSlot::Head, helmet).unwrap();
        slots.equip(EquipSlot::LArm, sword()).unwrap();
        assert_eq!(
            slots.equip(EquipSlot::LArm, sword()),
            Err(EquipError::SlotOccupied(EquipSlot::LArm))
        );
        assert_eq!(
            slots.equip(EquipSlot::RArm, greatsword()),
            Err(EquipError::ArmsOccupied)
        );
    }

    #[test]
    fn two_handed_takes_both_arms_once() {
        let mut slots = EquipSlots::default();
        let big = Arc::new(
            Equipment::new(2, "Greatsword", EquipSlot::LArm)
                .two_handed()
                .with_stats(AttributeSet::from_pairs(&[(Attribute::Phag, 30)], false)),
        );
        slots.equip(EquipSlot::LArm, big).unwrap();
        assert!(slots.get(EquipSlot::RArm).is_some());
        assert_eq!(slots.pieces().count(), 1);
        assert_eq!(slots.total_stats().get(Attribute::Phag), 30);

        slots.unequip(EquipSlot::LArm).unwrap();
        assert!(slots.get(EquipSlot::RArm).is_none());
        assert_eq!(
            slots.unequip(EquipSlot::LArm).unwrap_err(),
            EquipError::SlotEmpty(EquipSlot::LArm)
        );
    }
}

//! Flag sets carried by persons.
//!
//! Both sets are `bitflags` newtypes. Callers go through `has` / `set` /
//! `clear` rather than raw bit operations.

use bitflags::bitflags;

bitflags! {
    /// Per-battle state of a person.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct BattleFlags: u32 {
        const IN_BATTLE          = 1 << 0;
        const ALIVE              = 1 << 1;

        // ===== action permissions =====
        const ATK_ENABLED        = 1 << 2;
        const SKL_ENABLED        = 1 << 3;
        const ITM_ENABLED        = 1 << 4;
        const DEF_ENABLED        = 1 << 5;
        const GRD_ENABLED        = 1 << 6;
        const IMP_ENABLED        = 1 << 7;
        const RUN_ENABLED        = 1 << 8;
        const PAS_ENABLED        = 1 << 9;

        // ===== transient, cleared at personal upkeep =====
        const SKIP_NEXT_TURN     = 1 << 10;
        const MISS_NEXT_TARGET   = 1 << 11;
        const NEXT_ATK_NO_EFFECT = 1 << 12;

        // ===== ailment driven =====
        const IS_BUBBY           = 1 << 13;
        const TWO_SKILLS         = 1 << 14;
        const THREE_SKILLS       = 1 << 15;
        const HALF_COST          = 1 << 16;
        const REFLECT            = 1 << 17;
        const BOND               = 1 << 18;
        const BONDED             = 1 << 19;

        const REVIVABLE          = 1 << 20;

        // ===== stances =====
        const DEFENDING          = 1 << 21;
        const GUARDING           = 1 << 22;
        const GUARDED            = 1 << 23;

        const ACTIONS = Self::ATK_ENABLED.bits()
            | Self::SKL_ENABLED.bits()
            | Self::ITM_ENABLED.bits()
            | Self::DEF_ENABLED.bits()
            | Self::GRD_ENABLED.bits()
            | Self::IMP_ENABLED.bits()
            | Self::RUN_ENABLED.bits()
            | Self::PAS_ENABLED.bits();

        const TRANSIENT = Self::SKIP_NEXT_TURN.bits()
            | Self::MISS_NEXT_TARGET.bits()
            | Self::NEXT_ATK_NO_EFFECT.bits();

        const STANCES = Self::DEFENDING.bits()
            | Self::GUARDING.bits()
            | Self::GUARDED.bits();
    }
}

bitflags! {
    /// Persistent identity of a person outside battle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct PersonFlags: u16 {
        const SLEUTH        = 1 << 0;
        const BEARACKS      = 1 << 1;
        const MAIN          = 1 << 2;
        const MINI_BOSS     = 1 << 3;
        const BOSS          = 1 << 4;
        const FINAL_BOSS    = 1 << 5;
        const CAN_GAIN_EXP  = 1 << 6;
        const CAN_LEVEL_UP  = 1 << 7;
        const MAX_LVL       = 1 << 8;

        const BOSS_TIER = Self::MINI_BOSS.bits()
            | Self::BOSS.bits()
            | Self::FINAL_BOSS.bits();
    }
}

// bitflags already provides `insert` and `set(flag, on)`.
macro_rules! flag_accessors {
    ($ty:ty) => {
        impl $ty {
            #[inline]
            pub fn has(&self, flag: Self) -> bool {
                self.contains(flag)
            }

            #[inline]
            pub fn clear(&mut self, flag: Self) {
                self.remove(flag);
            }
        }
    };
}

flag_accessors!(BattleFlags);
flag_accessors!(PersonFlags);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_round_trip() {
        let mut flags = BattleFlags::empty();
        flags.insert(BattleFlags::ALIVE);
        assert!(flags.has(BattleFlags::ALIVE));
        flags.set(BattleFlags::REFLECT, true);
        flags.clear(BattleFlags::ALIVE);
        assert!(!flags.has(BattleFlags::ALIVE));
        assert!(flags.has(BattleFlags::REFLECT));
    }

    #[test]
    fn groups_cover_members() {
        assert!(BattleFlags::ACTIONS.has(BattleFlags::PAS_ENABLED));
        assert!(BattleFlags::TRANSIENT.has(BattleFlags::MISS_NEXT_TARGET));
        assert!(!BattleFlags::TRANSIENT.has(BattleFlags::ALIVE));
        assert!(PersonFlags::BOSS_TIER.intersects(PersonFlags::FINAL_BOSS));
    }
}

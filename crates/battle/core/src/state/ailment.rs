//! Ailments - turn-bounded effects attached to a person.
//!
//! An ailment is owned by its victim. Whatever it changes on the victim
//! (battle flags, attribute buffs) is recorded on the ailment itself so that
//! removal restores the exact prior state.
//!
//! # Lifecycle
//!
//! ```text
//! INFLICT action ──► attach (duration drawn from [min, max])
//!                        │
//!      personal upkeep: tick ─► per-turn effect ─► expire at 0
//!                        │
//! RELIEVE action / victim death ──► detach (revert recorded changes)
//! ```

use crate::config::BattleConfig;
use crate::env::BattleRng;
use crate::stats::{Attribute, AttributeSet};

use super::flags::BattleFlags;
use super::party::PersonIndex;

/// Ailment catalogue.
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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum AilmentKind {
    // ========================================================================
    // Damage / regen over time
    // ========================================================================
    Poison,
    Burn,
    /// Regenerates but skips every turn.
    Hibernation,

    // ========================================================================
    // Control
    // ========================================================================
    Paralysis,
    Confuse,
    Blindness,
    Dreadstruck,
    Silence,
    /// Only plain physical attacks remain.
    Berserk,
    Bubbify,
    /// Kills the victim when it expires.
    DeathTimer,

    // ========================================================================
    // Flag grants
    // ========================================================================
    DoubleCast,
    TripleCast,
    HalfCost,
    Reflect,
    Bond,
    Bonded,

    // ========================================================================
    // Stat buffs / debuffs
    // ========================================================================
    AllAtkBuff,
    AllAtkDebuff,
    AllDefBuff,
    AllDefDebuff,
    MomentumBuff,
    MomentumDebuff,
    LimbertudeBuff,
    UnbearabilityBuff,
}

const ALL_ATK: &[Attribute] = &[
    Attribute::Phag,
    Attribute::Thag,
    Attribute::Poag,
    Attribute::Piag,
    Attribute::Chag,
    Attribute::Cyag,
    Attribute::Niag,
];

const ALL_DEF: &[Attribute] = &[
    Attribute::Phfd,
    Attribute::Thfd,
    Attribute::Pofd,
    Attribute::Pifd,
    Attribute::Chfd,
    Attribute::Cyfd,
    Attribute::Nifd,
];

/// Per-turn effect of an ailment, resolved against the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickEffect {
    None,
    /// Lose this percentage of `temp_max.VITA`.
    Damage(f64),
    /// Regain this percentage of `temp_max.VITA` and skip the turn.
    Hibernate(f64),
    /// Raise the flag with this percent chance.
    Chance(BattleFlags, u32),
}

impl AilmentKind {
    /// The ailment this one cancels on infliction.
    pub const fn opposite(self) -> Option<AilmentKind> {
        match self {
            Self::AllAtkBuff => Some(Self::AllAtkDebuff),
            Self::AllAtkDebuff => Some(Self::AllAtkBuff),
            Self::AllDefBuff => Some(Self::AllDefDebuff),
            Self::AllDefDebuff => Some(Self::AllDefBuff),
            Self::MomentumBuff => Some(Self::MomentumDebuff),
            Self::MomentumDebuff => Some(Self::MomentumBuff),
            Self::Bond => Some(Self::Bonded),
            Self::Bonded => Some(Self::Bond),
            _ => None,
        }
    }

    /// Flags raised while the ailment is attached.
    pub const fn granted_flags(self) -> BattleFlags {
        match self {
            Self::Bubbify => BattleFlags::IS_BUBBY,
            Self::DoubleCast => BattleFlags::TWO_SKILLS,
            Self::TripleCast => BattleFlags::THREE_SKILLS,
            Self::HalfCost => BattleFlags::HALF_COST,
            Self::Reflect => BattleFlags::REFLECT,
            Self::Bond => BattleFlags::BOND,
            Self::Bonded => BattleFlags::BONDED,
            _ => BattleFlags::empty(),
        }
    }

    /// Flags lowered while the ailment is attached.
    pub const fn revoked_flags(self) -> BattleFlags {
        match self {
            Self::Berserk => BattleFlags::SKL_ENABLED
                .union(BattleFlags::ITM_ENABLED)
                .union(BattleFlags::DEF_ENABLED)
                .union(BattleFlags::GRD_ENABLED)
                .union(BattleFlags::IMP_ENABLED)
                .union(BattleFlags::RUN_ENABLED),
            Self::Bubbify => BattleFlags::SKL_ENABLED.union(BattleFlags::ITM_ENABLED),
            _ => BattleFlags::empty(),
        }
    }

    /// Attributes a buff or debuff scales, with the direction of the change.
    pub const fn stat_change(self) -> (&'static [Attribute], i32) {
        match self {
            Self::AllAtkBuff => (ALL_ATK, 1),
            Self::AllAtkDebuff => (ALL_ATK, -1),
            Self::AllDefBuff => (ALL_DEF, 1),
            Self::AllDefDebuff => (ALL_DEF, -1),
            Self::MomentumBuff => (&[Attribute::Mmtm], 1),
            Self::MomentumDebuff => (&[Attribute::Mmtm], -1),
            Self::LimbertudeBuff => (&[Attribute::Limb], 1),
            Self::UnbearabilityBuff => (&[Attribute::Unbr], 1),
            _ => (&[], 0),
        }
    }

    pub const fn is_stat_change(self) -> bool {
        self.stat_change().1 != 0
    }

    pub fn tick_effect(self, config: &BattleConfig) -> TickEffect {
        match self {
            Self::Poison => TickEffect::Damage(config.poison_percent),
            Self::Burn => TickEffect::Damage(config.burn_percent),
            Self::Hibernation => TickEffect::Hibernate(config.hibernation_regen_percent),
            Self::Paralysis => {
                TickEffect::Chance(BattleFlags::SKIP_NEXT_TURN, config.paralysis_skip_chance)
            }
            Self::Confuse => {
                TickEffect::Chance(BattleFlags::MISS_NEXT_TARGET, config.confuse_miss_chance)
            }
            Self::Blindness => {
                TickEffect::Chance(BattleFlags::MISS_NEXT_TARGET, config.blind_miss_chance)
            }
            Self::Dreadstruck => {
                TickEffect::Chance(BattleFlags::NEXT_ATK_NO_EFFECT, config.dread_void_chance)
            }
            _ => TickEffect::None,
        }
    }
}

/// Remaining lifetime of an ailment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AilmentDuration {
    Turns(u32),
    /// Never expires on its own.
    Infinite,
}

impl AilmentDuration {
    /// Draw a duration uniformly from `[min, max]`; `0..=0` means infinite.
    ///
    /// A finite draw lasts at least one turn.
    pub fn draw(min: u32, max: u32, rng: &mut dyn BattleRng) -> Self {
        if min == 0 && max == 0 {
            Self::Infinite
        } else {
            let min = min.max(1);
            Self::Turns(rng.range_u32(min, max.max(min)))
        }
    }

    pub const fn remaining(&self) -> Option<u32> {
        match self {
            Self::Turns(n) => Some(*n),
            Self::Infinite => None,
        }
    }

    /// The longer of two durations.
    pub fn longest(self, other: Self) -> Self {
        match (self, other) {
            (Self::Turns(a), Self::Turns(b)) => Self::Turns(a.max(b)),
            _ => Self::Infinite,
        }
    }
}

/// An ailment attached to a victim.
#[derive(Clone, Debug, PartialEq)]
pub struct Ailment {
    kind: AilmentKind,
    duration: AilmentDuration,
    /// Buff strength in percent.
    magnitude: i32,
    source: Option<PersonIndex>,

    pub(crate) applied_flags: BattleFlags,
    pub(crate) cleared_flags: BattleFlags,
    pub(crate) stat_delta: AttributeSet,
}

impl Ailment {
    pub fn new(
        kind: AilmentKind,
        duration: AilmentDuration,
        magnitude: i32,
        source: Option<PersonIndex>,
    ) -> Self {
        Self {
            kind,
            duration,
            magnitude,
            source,
            applied_flags: BattleFlags::empty(),
            cleared_flags: BattleFlags::empty(),
            stat_delta: AttributeSet::delta(),
        }
    }

    pub fn kind(&self) -> AilmentKind {
        self.kind
    }

    pub fn duration(&self) -> AilmentDuration {
        self.duration
    }

    pub fn magnitude(&self) -> i32 {
        self.magnitude
    }

    pub fn source(&self) -> Option<PersonIndex> {
        self.source
    }

    /// Attribute changes made on attachment.
    pub fn stat_delta(&self) -> &AttributeSet {
        &self.stat_delta
    }

    /// Counts one turn down; infinite ailments are unaffected.
    pub fn tick(&mut self) {
        if let AilmentDuration::Turns(n) = &mut self.duration {
            *n = n.saturating_sub(1);
        }
    }

    pub fn is_expired(&self) -> bool {
        self.duration == AilmentDuration::Turns(0)
    }

    /// Re-infliction keeps the longer of the two durations.
    pub fn refresh(&mut self, duration: AilmentDuration) {
        self.duration = self.duration.longest(duration);
    }
}

/// Battle configuration constants and tunable parameters.
///
/// Every multiplier used by action evaluation, upkeep and the AI lives here so
/// that a balance pass never has to touch the rules themselves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    // ===== damage formula =====
    pub off_prim_elm_modifier: f64,
    pub off_secd_elm_modifier: f64,
    pub def_prim_elm_modifier: f64,
    pub def_secd_elm_modifier: f64,

    pub prim_elm_adv_modifier: f64,
    pub prim_elm_dis_modifier: f64,
    pub double_elm_adv_modifier: f64,
    pub double_elm_dis_modifier: f64,

    pub base_crit_modifier: f64,
    pub off_crit_modifier: f64,
    pub def_crit_modifier: f64,
    pub crit_multiplier: f64,
    /// UNBR value at which the crit factor reaches 1.0.
    pub max_unbearability: i32,

    pub dodge_modifier: f64,
    pub dodge_per_level_modifier: f64,
    /// Upper bound on dodge, in percent.
    pub max_dodge: f64,

    pub min_damage: i32,
    pub max_damage: i32,

    // ===== non-skill action types =====
    pub defend_modifier: f64,
    pub implode_modifier: f64,
    /// Percent chance a RUN plan succeeds in a random encounter.
    pub run_chance: u32,

    // ===== ailments =====
    pub poison_percent: f64,
    pub burn_percent: f64,
    pub hibernation_regen_percent: f64,
    pub paralysis_skip_chance: u32,
    pub confuse_miss_chance: u32,
    pub blind_miss_chance: u32,
    pub dread_void_chance: u32,
    /// Buff magnitude in percent when the inflicting action carries no base.
    pub default_buff_percent: i32,

    // ===== AI =====
    pub ai: AiTuning,

    // ===== level curve =====
    pub max_level: u32,
    pub min_level_exp: u64,
    pub max_level_exp: u64,
}

/// Base chances the AI module uses when picking an action type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiTuning {
    pub random_skill_chance: f64,
    pub priority_skill_chance: f64,
    pub random_item_chance: f64,
    pub priority_item_chance: f64,
    /// Weight added to the item chance per missing QTDR percent.
    pub item_lean_factor: f64,
    pub guard_chance: f64,
    pub defend_chance: f64,
    pub implode_chance: f64,
    /// Half-width of the uniform jitter applied to every chance.
    pub chance_variance: f64,
    pub offensive_factor: f64,
    pub defensive_factor: f64,
}

impl BattleConfig {
    // ===== compile-time capacities =====
    /// Maximum members in one party (friends use indices 1..=5, foes -1..=-5).
    pub const MAX_PARTY_SIZE: usize = 5;
    pub const MAX_AILMENTS_PER_PERSON: usize = 5;
    pub const MAX_AILMENTS_PER_BATTLE: usize = 50;
    pub const MAX_SKILLS: usize = 64;
    /// Upper bound of every attribute value.
    pub const MAX_ATTRIBUTE: i32 = 99_999;
    /// Lower bound of attributes on non-personal sets (equipment, buffs).
    pub const MIN_ATTRIBUTE: i32 = -99_999;

    pub fn new() -> Self {
        Self {
            off_prim_elm_modifier: 1.00,
            off_secd_elm_modifier: 0.50,
            def_prim_elm_modifier: 0.50,
            def_secd_elm_modifier: 0.25,

            prim_elm_adv_modifier: 1.15,
            prim_elm_dis_modifier: 0.87,
            double_elm_adv_modifier: 1.30,
            double_elm_dis_modifier: 0.74,

            base_crit_modifier: 0.20,
            off_crit_modifier: 1.00,
            def_crit_modifier: 1.00,
            crit_multiplier: 1.50,
            max_unbearability: 1_000,

            dodge_modifier: 0.05,
            dodge_per_level_modifier: 0.01,
            max_dodge: 50.0,

            min_damage: 1,
            max_damage: 29_999,

            defend_modifier: 0.50,
            implode_modifier: 2.00,
            run_chance: 60,

            poison_percent: 8.0,
            burn_percent: 5.0,
            hibernation_regen_percent: 10.0,
            paralysis_skip_chance: 25,
            confuse_miss_chance: 40,
            blind_miss_chance: 50,
            dread_void_chance: 50,
            default_buff_percent: 25,

            ai: AiTuning::default(),

            max_level: 30,
            min_level_exp: 10,
            max_level_exp: 100_000_000,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            random_skill_chance: 0.60,
            priority_skill_chance: 0.50,
            random_item_chance: 0.20,
            priority_item_chance: 0.42,
            item_lean_factor: 0.002,
            guard_chance: 0.05,
            defend_chance: 0.10,
            implode_chance: 0.95,
            chance_variance: 0.05,
            offensive_factor: 1.0,
            defensive_factor: 0.8,
        }
    }
}

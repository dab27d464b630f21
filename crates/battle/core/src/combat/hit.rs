//! Hit chance and dodge.

use crate::config::BattleConfig;

/// Dodge percentage of a target against an attacker.
///
/// # Formula
///
/// ```text
/// factor = max(0, 1 + (target.LIMB - user.LIMB) × dodge_per_level_modifier)
/// dodge  = target.LIMB × dodge_modifier × factor
/// clamped to [0, max_dodge]
/// ```
pub fn dodge_chance(target_limb: i32, user_limb: i32, config: &BattleConfig) -> f64 {
    let diff = f64::from(target_limb) - f64::from(user_limb);
    let factor = (1.0 + diff * config.dodge_per_level_modifier).max(0.0);
    (f64::from(target_limb) * config.dodge_modifier * factor).clamp(0.0, config.max_dodge)
}

/// Effective hit chance in percent.
///
/// The action's own chance overrides the skill's; dodge is subtracted.
pub fn calculate_hit_chance(skill_chance: u32, action_chance: Option<u32>, dodge: f64) -> f64 {
    f64::from(action_chance.unwrap_or(skill_chance)) - dodge
}

/// A hit lands unless `roll × 100 ≥ chance`, with `roll` uniform in `[0, 1)`.
pub fn check_hit(chance: f64, roll: f64) -> bool {
    roll * 100.0 < chance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_limbertude_no_dodge() {
        let config = BattleConfig::default();
        assert_eq!(dodge_chance(0, 40, &config), 0.0);
        let chance = calculate_hit_chance(100, None, 0.0);
        assert!(check_hit(chance, 0.999_999));
    }

    #[test]
    fn dodge_grows_with_limb_gap() {
        let config = BattleConfig::default();
        let even = dodge_chance(100, 100, &config);
        let ahead = dodge_chance(100, 50, &config);
        let behind = dodge_chance(100, 150, &config);
        assert!((even - 5.0).abs() < 1e-9);
        assert!(ahead > even);
        assert!(behind < even);
        assert_eq!(dodge_chance(99_999, 0, &config), config.max_dodge);
    }

    #[test]
    fn action_chance_overrides_skill() {
        assert_eq!(calculate_hit_chance(90, Some(40), 0.0), 40.0);
        assert_eq!(calculate_hit_chance(90, None, 10.0), 80.0);
        assert!(!check_hit(40.0, 0.4));
        assert!(check_hit(40.0, 0.39));
    }
}

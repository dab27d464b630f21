//! Damage and magnitude calculation.

use crate::action::{Action, Magnitude};
use crate::config::BattleConfig;
use crate::env::BattleRng;
use crate::state::{BattleFlags, Person};
use crate::stats::{Attribute, Element, ElementalEdge};

/// Result of the damage pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: i32,
    pub critical: bool,
}

/// Stat difference between attacker and defender for a skill's elements.
///
/// # Formula
///
/// ```text
/// off = user[prim.AG] × off_prim + user[secd.AG] × off_secd
/// def = target[prim.FD] × def_prim + target[secd.FD] × def_secd
/// raw = off - def
/// ```
///
/// Elements in the action's ignore sets contribute 0 on that side.
pub fn raw_damage(
    user: &Person,
    target: &Person,
    action: &Action,
    primary: Element,
    secondary: Element,
    config: &BattleConfig,
) -> f64 {
    let off = |element: Element| {
        if action.ignore_atk().has(element) {
            0.0
        } else {
            f64::from(user.stat(element.offensive()))
        }
    };
    let def = |element: Element| {
        if action.ignore_def().has(element) {
            0.0
        } else {
            f64::from(target.stat(element.defensive()))
        }
    };

    let offense = off(primary) * config.off_prim_elm_modifier
        + off(secondary) * config.off_secd_elm_modifier;
    let defense = def(primary) * config.def_prim_elm_modifier
        + def(secondary) * config.def_secd_elm_modifier;
    offense - defense
}

/// Fold the action base into the raw value: `raw × base / 100` for
/// percentages, `raw + base` otherwise. A negative VITA alter counts by
/// magnitude.
pub fn apply_base(raw: f64, base: Magnitude) -> f64 {
    match base {
        Magnitude::Percent(p) => raw * f64::from(p.abs()) / 100.0,
        Magnitude::Amount(n) => raw + f64::from(n.abs()),
    }
}

/// Draw `δ ~ uniform[-v, +v]`, `v` resolved against `amount` for percentages.
pub fn roll_variance(amount: f64, variance: Magnitude, rng: &mut dyn BattleRng) -> f64 {
    let span = variance.resolve(amount.abs()).abs().round() as i32;
    if span == 0 {
        return 0.0;
    }
    f64::from(rng.range_i32(-span, span))
}

/// Multiplier from the attacker's and defender's elements.
pub fn elemental_modifier(edge: ElementalEdge, config: &BattleConfig) -> f64 {
    match edge {
        ElementalEdge::DoubleAdvantage => config.double_elm_adv_modifier,
        ElementalEdge::Advantage => config.prim_elm_adv_modifier,
        ElementalEdge::Neutral => 1.0,
        ElementalEdge::Disadvantage => config.prim_elm_dis_modifier,
        ElementalEdge::DoubleDisadvantage => config.double_elm_dis_modifier,
    }
}

/// Critical probability in `[0, 1]`.
///
/// # Formula
///
/// ```text
/// P(crit) = (UNBR / max_unbearability) × base_crit × off_crit / def_crit
/// ```
pub fn crit_chance(unbearability: i32, config: &BattleConfig) -> f64 {
    if config.max_unbearability <= 0 || config.def_crit_modifier <= 0.0 {
        return 0.0;
    }
    let ratio = f64::from(unbearability.max(0)) / f64::from(config.max_unbearability);
    (ratio * config.base_crit_modifier * config.off_crit_modifier / config.def_crit_modifier)
        .clamp(0.0, 1.0)
}

/// Full damage pipeline for one (user, target, action) triple.
///
/// ```text
/// raw → base → variance → elemental edge → critical → defend → clamp
/// ```
///
/// Reflection and void-next-attack are left to the caller.
pub fn roll_damage(
    user: &Person,
    target: &Person,
    action: &Action,
    primary: Element,
    secondary: Element,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> DamageRoll {
    let raw = raw_damage(user, target, action, primary, secondary, config);
    let mut damage = apply_base(raw, action.base());
    damage += roll_variance(damage, action.variance(), rng);

    let edge = ElementalEdge::between(
        user.primary(),
        user.secondary(),
        target.primary(),
        target.secondary(),
    );
    damage *= elemental_modifier(edge, config);

    let critical = rng.unit() < crit_chance(user.stat(Attribute::Unbr), config);
    if critical {
        damage *= config.crit_multiplier;
    }

    if target.has_flag(BattleFlags::DEFENDING) {
        damage *= config.defend_modifier;
    }

    let amount = (damage.round() as i64)
        .clamp(i64::from(config.min_damage), i64::from(config.max_damage)) as i32;
    DamageRoll { amount, critical }
}

/// Magnitude of a non-damage action: `base` resolved against `reference`,
/// then varied.
pub fn roll_amount(action: &Action, reference: i32, rng: &mut dyn BattleRng) -> i32 {
    let amount = action.base().resolve(f64::from(reference));
    let varied = amount + roll_variance(amount, action.variance(), rng);
    varied.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionEffect;
    use crate::env::ScriptedRng;
    use crate::state::person_with;
    use crate::stats::ElementSet;

    fn strike(base: Magnitude, variance: Magnitude) -> Action {
        Action::builder(1, ActionEffect::Damage { attribute: Attribute::Vita })
            .base(base)
            .variance(variance)
            .build()
            .unwrap()
    }

    #[test]
    fn raw_uses_element_slots() {
        let mut user = person_with(&[(Attribute::Vita, 100)]);
        user.assign_attribute(Attribute::Phag, 100);
        let mut target = person_with(&[(Attribute::Vita, 100)]);
        target.assign_attribute(Attribute::Phfd, 40);

        let config = BattleConfig::default();
        let action = strike(Magnitude::ZERO, Magnitude::ZERO);
        // 100 × 1.0 + 100 × 0.5 - (40 × 0.5 + 40 × 0.25)
        let raw = raw_damage(&user, &target, &action, Element::Physical, Element::Physical, &config);
        assert!((raw - 120.0).abs() < 1e-9);

        let blind = Action::builder(2, ActionEffect::Damage { attribute: Attribute::Vita })
            .ignore_atk(ElementSet::ALL)
            .ignore_def(ElementSet::ALL)
            .build()
            .unwrap();
        let raw = raw_damage(&user, &target, &blind, Element::Physical, Element::Physical, &config);
        assert_eq!(raw, 0.0);
    }

    #[test]
    fn base_forms() {
        assert_eq!(apply_base(40.0, Magnitude::Amount(20)), 60.0);
        assert_eq!(apply_base(40.0, Magnitude::Amount(-20)), 60.0);
        assert_eq!(apply_base(40.0, Magnitude::Percent(50)), 20.0);
    }

    #[test]
    fn damage_is_clamped() {
        let config = BattleConfig::default();
        let user = person_with(&[(Attribute::Vita, 100)]);
        let target = person_with(&[(Attribute::Vita, 100)]);
        let mut rng = ScriptedRng::new(vec![0]);

        let weak = strike(Magnitude::Amount(0), Magnitude::ZERO);
        let roll = roll_damage(&user, &target, &weak, Element::Physical, Element::Physical, &config, &mut rng);
        assert_eq!(roll.amount, config.min_damage);
        assert!(!roll.critical);

        let huge = strike(Magnitude::Amount(90_000), Magnitude::ZERO);
        let roll = roll_damage(&user, &target, &huge, Element::Physical, Element::Physical, &config, &mut rng);
        assert_eq!(roll.amount, config.max_damage);
    }

    #[test]
    fn crit_scales_with_unbearability() {
        let config = BattleConfig::default();
        assert_eq!(crit_chance(0, &config), 0.0);
        assert!((crit_chance(1_000, &config) - 0.2).abs() < 1e-9);
        assert!((crit_chance(500, &config) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn defending_halves() {
        let config = BattleConfig::default();
        let user = person_with(&[(Attribute::Vita, 100)]);
        let mut target = person_with(&[(Attribute::Vita, 100)]);
        target.battle_flags_mut().insert(BattleFlags::DEFENDING);
        let mut rng = ScriptedRng::new(vec![0]);
        let action = strike(Magnitude::Amount(60), Magnitude::ZERO);
        let roll = roll_damage(&user, &target, &action, Element::Physical, Element::Physical, &config, &mut rng);
        assert_eq!(roll.amount, 30);
    }

    #[test]
    fn amounts_resolve_percent_of_reference() {
        let mut rng = ScriptedRng::new(vec![0]);
        let revive = Action::builder(3, ActionEffect::Revive)
            .base(Magnitude::Percent(50))
            .build()
            .unwrap();
        assert_eq!(roll_amount(&revive, 200, &mut rng), 100);

        // span 10, draw 0 % 21 = 0 → -10
        let varied = Action::builder(4, ActionEffect::Revive)
            .base(Magnitude::Percent(50))
            .variance(Magnitude::Amount(10))
            .build()
            .unwrap();
        assert_eq!(roll_amount(&varied, 200, &mut rng), 90);
    }
}

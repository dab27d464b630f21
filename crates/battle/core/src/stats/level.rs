//! Experience curve and level-based stat interpolation.
//!
//! The exp threshold of each level is an exponential interpolation between
//! the level 1 threshold and the max level threshold:
//!
//! ```text
//! exp(L) = exp(1) × (exp(max) / exp(1)) ^ ((L - 1) / (max - 1))
//! ```
//!
//! Stats at level L are linear along that curve:
//!
//! ```text
//! fraction(L) = (exp(L) - exp(1)) / (exp(max) - exp(1))
//! stats(L)    = base + (base_max - base) × fraction(L)
//! ```

use crate::config::BattleConfig;

use super::attributes::AttributeSet;

/// Precomputed exp thresholds, indexed by level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpTable {
    thresholds: Vec<u64>,
}

impl ExpTable {
    /// Build the table from the curve bounds in `config`.
    pub fn new(config: &BattleConfig) -> Self {
        let max_level = config.max_level.max(2) as usize;
        let first = config.min_level_exp.max(1) as f64;
        let last = config.max_level_exp.max(config.min_level_exp.max(1)) as f64;
        let ratio = last / first;

        let mut thresholds = Vec::with_capacity(max_level);
        for level in 1..=max_level {
            let t = (level - 1) as f64 / (max_level - 1) as f64;
            thresholds.push((first * ratio.powf(t)).round() as u64);
        }
        // Pin the endpoints exactly; powf rounding must not move them.
        thresholds[0] = config.min_level_exp.max(1);
        thresholds[max_level - 1] = last as u64;

        Self { thresholds }
    }

    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Exp required to reach `level` (clamped to `[1, max_level]`).
    pub fn exp_at(&self, level: u32) -> u64 {
        let idx = level.clamp(1, self.max_level()) as usize - 1;
        self.thresholds[idx]
    }

    /// Exp at the maximum level; total exp never exceeds this.
    pub fn max_exp(&self) -> u64 {
        self.exp_at(self.max_level())
    }

    /// Level reached with `total_exp`. Exp below the level 1 threshold is still level 1.
    pub fn level_for(&self, total_exp: u64) -> u32 {
        let reached = self.thresholds.iter().take_while(|&&t| total_exp >= t).count();
        (reached as u32).max(1)
    }

    /// Interpolation fraction of `level` along the exp curve, in `[0, 1]`.
    pub fn fraction(&self, level: u32) -> f64 {
        let first = self.exp_at(1) as f64;
        let last = self.max_exp() as f64;
        if last <= first {
            return 1.0;
        }
        ((self.exp_at(level) as f64 - first) / (last - first)).clamp(0.0, 1.0)
    }

    /// Stats at `level`, interpolated between `base` and `base_max`.
    pub fn stats_at(&self, level: u32, base: &AttributeSet, base_max: &AttributeSet) -> AttributeSet {
        AttributeSet::lerp(base, base_max, self.fraction(level))
    }
}

impl Default for ExpTable {
    fn default() -> Self {
        Self::new(&BattleConfig::default())
    }
}

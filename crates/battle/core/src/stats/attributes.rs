//! Attribute sets - the 20 named integer stats every battler carries.
//!
//! An [`AttributeSet`] is a fixed ordered vector keyed by [`Attribute`]. Every
//! mutation clamps into `[min, MAX]`, where `min` is 0 for personal sets
//! (belonging to a person) and negative otherwise (equipment, deltas).

use core::ops::{Add, AddAssign, Sub, SubAssign};

use strum::{EnumCount, IntoEnumIterator};

use crate::config::BattleConfig;

/// The 20 battle attributes, in canonical order.
///
/// Elemental attributes come in aggression (`*AG`) / fortitude (`*FD`) pairs.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
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
pub enum Attribute {
    /// Vitality - health.
    Vita,
    /// Quantum drive - the cost pool for skills.
    Qtdr,
    Phag,
    Phfd,
    Thag,
    Thfd,
    Poag,
    Pofd,
    Piag,
    Pifd,
    Chag,
    Chfd,
    Cyag,
    Cyfd,
    Niag,
    Nifd,
    /// Limbertude - dodge.
    Limb,
    /// Momentum - turn order.
    Mmtm,
    /// Unbearability - critical chance.
    Unbr,
    /// Manna - reserved resource.
    Mann,
}

impl Attribute {
    /// Number of attributes in a set.
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    /// Position of this attribute in the canonical order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Iterate all attributes in canonical order.
    pub fn all() -> impl Iterator<Item = Attribute> {
        Self::iter()
    }

    /// True for the `*AG` slots (offensive elemental stats).
    pub const fn is_offensive(self) -> bool {
        matches!(
            self,
            Self::Phag | Self::Thag | Self::Poag | Self::Piag | Self::Chag | Self::Cyag | Self::Niag
        )
    }

    /// True for the `*FD` slots (defensive elemental stats).
    pub const fn is_defensive(self) -> bool {
        matches!(
            self,
            Self::Phfd | Self::Thfd | Self::Pofd | Self::Pifd | Self::Chfd | Self::Cyfd | Self::Nifd
        )
    }

    /// True for the pooled resources (VITA, QTDR) that are bounded by `temp_max`.
    pub const fn is_resource(self) -> bool {
        matches!(self, Self::Vita | Self::Qtdr)
    }
}

/// Fixed-order vector of the 20 attributes with clamp rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeSet {
    values: [i32; Attribute::COUNT],
    personal: bool,
    constant: bool,
}

impl AttributeSet {
    /// Creates a zeroed set.
    pub const fn new(personal: bool) -> Self {
        Self {
            values: [0; Attribute::COUNT],
            personal,
            constant: false,
        }
    }

    /// Creates a zeroed set owned by a person (lower bound 0).
    pub const fn personal() -> Self {
        Self::new(true)
    }

    /// Creates a zeroed non-personal set (negative values allowed).
    pub const fn delta() -> Self {
        Self::new(false)
    }

    /// Creates a set from raw values, clamping each.
    pub fn from_values(values: [i32; Attribute::COUNT], personal: bool) -> Self {
        let mut set = Self::new(personal);
        for attr in Attribute::all() {
            set.values[attr.index()] = set.clamp(i64::from(values[attr.index()]));
        }
        set
    }

    /// Creates a set from `(attribute, value)` pairs; unspecified slots are 0.
    pub fn from_pairs(pairs: &[(Attribute, i32)], personal: bool) -> Self {
        let mut set = Self::new(personal);
        for &(attr, value) in pairs {
            set.set(attr, value);
        }
        set
    }

    /// Marks the set constant; later mutations are rejected.
    #[must_use]
    pub fn into_constant(mut self) -> Self {
        self.constant = true;
        self
    }

    pub const fn is_personal(&self) -> bool {
        self.personal
    }

    pub const fn is_constant(&self) -> bool {
        self.constant
    }

    /// Lower clamp bound of this set.
    pub const fn min(&self) -> i32 {
        if self.personal {
            0
        } else {
            BattleConfig::MIN_ATTRIBUTE
        }
    }

    /// Upper clamp bound of every set.
    pub const fn max(&self) -> i32 {
        BattleConfig::MAX_ATTRIBUTE
    }

    #[inline]
    fn clamp(&self, value: i64) -> i32 {
        value.clamp(i64::from(self.min()), i64::from(self.max())) as i32
    }

    #[inline]
    pub fn get(&self, attr: Attribute) -> i32 {
        self.values[attr.index()]
    }

    /// Sets one attribute, clamped.
    ///
    /// Returns false only when the set is constant.
    pub fn set(&mut self, attr: Attribute, value: i32) -> bool {
        if self.constant {
            return false;
        }
        self.values[attr.index()] = self.clamp(i64::from(value));
        true
    }

    /// Adds `delta` to one attribute, clamped.
    ///
    /// Returns false only when the set is constant.
    pub fn alter(&mut self, attr: Attribute, delta: i32) -> bool {
        if self.constant {
            return false;
        }
        let value = i64::from(self.values[attr.index()]) + i64::from(delta);
        self.values[attr.index()] = self.clamp(value);
        true
    }

    /// Element-wise addition; false when the set is constant.
    pub fn try_add(&mut self, other: &AttributeSet) -> bool {
        if self.constant {
            return false;
        }
        for attr in Attribute::all() {
            let value = i64::from(self.get(attr)) + i64::from(other.get(attr));
            self.values[attr.index()] = self.clamp(value);
        }
        true
    }

    /// Element-wise subtraction; false when the set is constant.
    pub fn try_sub(&mut self, other: &AttributeSet) -> bool {
        if self.constant {
            return false;
        }
        for attr in Attribute::all() {
            let value = i64::from(self.get(attr)) - i64::from(other.get(attr));
            self.values[attr.index()] = self.clamp(value);
        }
        true
    }

    /// Lowers every attribute to at most the matching value in `bounds`.
    pub fn cap_to(&mut self, bounds: &AttributeSet) {
        if self.constant {
            return;
        }
        for attr in Attribute::all() {
            let capped = self.get(attr).min(bounds.get(attr));
            self.values[attr.index()] = self.clamp(i64::from(capped));
        }
    }

    /// Multiplies a single slot by `factor`, rounding to nearest.
    pub fn scale(&mut self, attr: Attribute, factor: f64) -> bool {
        let scaled = (f64::from(self.get(attr)) * factor).round() as i64;
        if self.constant {
            return false;
        }
        self.values[attr.index()] = self.clamp(scaled);
        true
    }

    /// Linear interpolation `from + (to - from) × fraction` per slot.
    pub fn lerp(from: &AttributeSet, to: &AttributeSet, fraction: f64) -> AttributeSet {
        let fraction = fraction.clamp(0.0, 1.0);
        let mut out = AttributeSet::new(from.personal);
        for attr in Attribute::all() {
            let a = f64::from(from.get(attr));
            let b = f64::from(to.get(attr));
            out.values[attr.index()] = out.clamp((a + (b - a) * fraction).round() as i64);
        }
        out
    }

    /// Copy of this set with a different personal flag (re-clamped).
    pub fn with_personal(&self, personal: bool) -> AttributeSet {
        AttributeSet::from_values(self.values, personal)
    }

    /// Iterate `(attribute, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        Attribute::all().map(move |attr| (attr, self.get(attr)))
    }

    pub fn values(&self) -> &[i32; Attribute::COUNT] {
        &self.values
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::personal()
    }
}

impl AddAssign<&AttributeSet> for AttributeSet {
    fn add_assign(&mut self, rhs: &AttributeSet) {
        self.try_add(rhs);
    }
}

impl SubAssign<&AttributeSet> for AttributeSet {
    fn sub_assign(&mut self, rhs: &AttributeSet) {
        self.try_sub(rhs);
    }
}

impl Add<&AttributeSet> for &AttributeSet {
    type Output = AttributeSet;

    fn add(self, rhs: &AttributeSet) -> AttributeSet {
        let mut out = AttributeSet::from_values(self.values, self.personal);
        out += rhs;
        out
    }
}

impl Sub<&AttributeSet> for &AttributeSet {
    type Output = AttributeSet;

    fn sub(self, rhs: &AttributeSet) -> AttributeSet {
        let mut out = AttributeSet::from_values(self.values, self.personal);
        out -= rhs;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_and_names() {
        assert_eq!(Attribute::COUNT, 20);
        assert_eq!(Attribute::Vita.index(), 0);
        assert_eq!(Attribute::Mann.index(), 19);
        assert_eq!(Attribute::Mmtm.to_string(), "MMTM");
        assert_eq!("limb".parse::<Attribute>().unwrap(), Attribute::Limb);
    }

    #[test]
    fn personal_sets_clamp_at_zero() {
        let mut set = AttributeSet::personal();
        set.set(Attribute::Vita, 50);
        set.alter(Attribute::Vita, -80);
        assert_eq!(set.get(Attribute::Vita), 0);

        let mut delta = AttributeSet::delta();
        delta.alter(Attribute::Vita, -80);
        assert_eq!(delta.get(Attribute::Vita), -80);
    }

    #[test]
    fn values_clamp_at_max() {
        let mut set = AttributeSet::personal();
        set.set(Attribute::Phag, BattleConfig::MAX_ATTRIBUTE);
        set.alter(Attribute::Phag, 10);
        assert_eq!(set.get(Attribute::Phag), BattleConfig::MAX_ATTRIBUTE);
    }

    #[test]
    fn constant_sets_reject_mutation() {
        let mut set = AttributeSet::from_pairs(&[(Attribute::Vita, 10)], true).into_constant();
        assert!(!set.set(Attribute::Vita, 99));
        assert!(!set.alter(Attribute::Vita, 1));
        set += &AttributeSet::from_pairs(&[(Attribute::Vita, 5)], false);
        assert_eq!(set.get(Attribute::Vita), 10);
    }

    #[test]
    fn add_then_sub_round_trips_within_clamp() {
        let a = AttributeSet::from_pairs(&[(Attribute::Vita, 120), (Attribute::Thag, 30)], true);
        let b = AttributeSet::from_pairs(&[(Attribute::Vita, 40), (Attribute::Limb, 7)], false);
        let sum = &a + &b;
        assert_eq!(sum.get(Attribute::Vita), 160);
        let back = &sum - &b;
        assert_eq!(back, a);
    }

    #[test]
    fn lerp_interpolates_per_slot() {
        let from = AttributeSet::from_pairs(&[(Attribute::Vita, 100)], true);
        let to = AttributeSet::from_pairs(&[(Attribute::Vita, 300)], true);
        assert_eq!(AttributeSet::lerp(&from, &to, 0.5).get(Attribute::Vita), 200);
        assert_eq!(AttributeSet::lerp(&from, &to, 2.0).get(Attribute::Vita), 300);
    }

    #[test]
    fn cap_to_bounds_each_slot() {
        let mut set = AttributeSet::from_pairs(&[(Attribute::Vita, 90), (Attribute::Qtdr, 5)], true);
        let bounds = AttributeSet::from_pairs(&[(Attribute::Vita, 60), (Attribute::Qtdr, 40)], true);
        set.cap_to(&bounds);
        assert_eq!(set.get(Attribute::Vita), 60);
        assert_eq!(set.get(Attribute::Qtdr), 5);
    }
}

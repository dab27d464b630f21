//! Elements, elemental curves and the advantage cycle.

use bitflags::bitflags;

use super::attributes::Attribute;

/// Battle element.
///
/// Each element owns an offensive (`*AG`) and a defensive (`*FD`) attribute.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    #[default]
    Physical,
    /// Thermal.
    Fire,
    /// Polar.
    Ice,
    /// Primal.
    Forest,
    /// Charged.
    Electric,
    /// Cybernetic.
    Digital,
    Nihil,
}

impl Element {
    /// Offensive attribute slot of this element.
    pub const fn offensive(self) -> Attribute {
        match self {
            Self::Physical => Attribute::Phag,
            Self::Fire => Attribute::Thag,
            Self::Ice => Attribute::Poag,
            Self::Forest => Attribute::Piag,
            Self::Electric => Attribute::Chag,
            Self::Digital => Attribute::Cyag,
            Self::Nihil => Attribute::Niag,
        }
    }

    /// Defensive attribute slot of this element.
    pub const fn defensive(self) -> Attribute {
        match self {
            Self::Physical => Attribute::Phfd,
            Self::Fire => Attribute::Thfd,
            Self::Ice => Attribute::Pofd,
            Self::Forest => Attribute::Pifd,
            Self::Electric => Attribute::Chfd,
            Self::Digital => Attribute::Cyfd,
            Self::Nihil => Attribute::Nifd,
        }
    }

    /// Bit of this element inside an [`ElementSet`].
    pub const fn flag(self) -> ElementSet {
        match self {
            Self::Physical => ElementSet::PHYSICAL,
            Self::Fire => ElementSet::THERMAL,
            Self::Ice => ElementSet::POLAR,
            Self::Forest => ElementSet::PRIMAL,
            Self::Electric => ElementSet::CHARGED,
            Self::Digital => ElementSet::CYBERNETIC,
            Self::Nihil => ElementSet::NIHIL,
        }
    }

    pub const fn is_elemental(self) -> bool {
        !matches!(self, Self::Physical)
    }

    /// The element this one beats in the advantage cycle.
    ///
    /// `Physical > Fire > Forest > Electric > Digital > Nihil > Physical`.
    /// Ice sits outside the cycle.
    pub const fn beats(self) -> Option<Element> {
        match self {
            Self::Physical => Some(Self::Fire),
            Self::Fire => Some(Self::Forest),
            Self::Forest => Some(Self::Electric),
            Self::Electric => Some(Self::Digital),
            Self::Digital => Some(Self::Nihil),
            Self::Nihil => Some(Self::Physical),
            Self::Ice => None,
        }
    }

    /// True when `self` has the advantage over `other`.
    pub fn has_advantage_over(self, other: Element) -> bool {
        self.beats() == Some(other)
    }
}

bitflags! {
    /// Set of elements, used by actions to ignore attack or defense slots.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ElementSet: u8 {
        const PHYSICAL   = 1 << 0;
        const THERMAL    = 1 << 1;
        const POLAR      = 1 << 2;
        const PRIMAL     = 1 << 3;
        const CHARGED    = 1 << 4;
        const CYBERNETIC = 1 << 5;
        const NIHIL      = 1 << 6;

        const ELEMENTAL = Self::THERMAL.bits()
            | Self::POLAR.bits()
            | Self::PRIMAL.bits()
            | Self::CHARGED.bits()
            | Self::CYBERNETIC.bits()
            | Self::NIHIL.bits();
        const ALL = Self::PHYSICAL.bits() | Self::ELEMENTAL.bits();
    }
}

impl ElementSet {
    #[inline]
    pub fn has(&self, element: Element) -> bool {
        self.contains(element.flag())
    }
}

/// Elemental growth grade.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Curve {
    Xs,
    S,
    A,
    B,
    #[default]
    C,
    D,
}

impl Curve {
    /// Multiplier applied to the primary element's stat slots.
    pub const fn primary_multiplier(self) -> f64 {
        match self {
            Self::Xs => 1.425,
            Self::S => 1.400,
            Self::A => 1.375,
            Self::B => 1.350,
            Self::C => 1.325,
            Self::D => 1.300,
        }
    }

    /// Multiplier applied to the secondary element's stat slots.
    pub const fn secondary_multiplier(self) -> f64 {
        match self {
            Self::Xs => 1.375,
            Self::S => 1.300,
            Self::A => 1.250,
            Self::B => 1.225,
            Self::C => 1.200,
            Self::D => 1.175,
        }
    }
}

/// Elemental relation between an attacker's and a defender's elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementalEdge {
    DoubleAdvantage,
    Advantage,
    Neutral,
    Disadvantage,
    DoubleDisadvantage,
}

impl ElementalEdge {
    /// Classify the primary and secondary pairings of attacker vs defender.
    ///
    /// Both pairs aligned in the same direction yield a double edge; a single
    /// primary edge yields a plain one. Conflicting edges cancel.
    pub fn between(
        atk_primary: Element,
        atk_secondary: Element,
        def_primary: Element,
        def_secondary: Element,
    ) -> Self {
        let prim_adv = atk_primary.has_advantage_over(def_primary);
        let prim_dis = def_primary.has_advantage_over(atk_primary);
        let secd_adv = atk_secondary.has_advantage_over(def_secondary);
        let secd_dis = def_secondary.has_advantage_over(atk_secondary);

        match (prim_adv, prim_dis) {
            (true, _) if secd_adv => Self::DoubleAdvantage,
            (true, _) if secd_dis => Self::Neutral,
            (true, _) => Self::Advantage,
            (_, true) if secd_dis => Self::DoubleDisadvantage,
            (_, true) if secd_adv => Self::Neutral,
            (_, true) => Self::Disadvantage,
            _ => Self::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advantage_cycle_closes() {
        let mut current = Element::Physical;
        for _ in 0..6 {
            current = current.beats().unwrap();
        }
        assert_eq!(current, Element::Physical);
        assert!(Element::Ice.beats().is_none());
    }

    #[test]
    fn double_advantage_requires_both_pairs() {
        let edge = ElementalEdge::between(
            Element::Fire,
            Element::Electric,
            Element::Forest,
            Element::Digital,
        );
        assert_eq!(edge, ElementalEdge::DoubleAdvantage);

        let single = ElementalEdge::between(
            Element::Fire,
            Element::Ice,
            Element::Forest,
            Element::Digital,
        );
        assert_eq!(single, ElementalEdge::Advantage);

        let reversed = ElementalEdge::between(
            Element::Forest,
            Element::Digital,
            Element::Fire,
            Element::Electric,
        );
        assert_eq!(reversed, ElementalEdge::DoubleDisadvantage);
    }

    #[test]
    fn element_sets_group_elementals() {
        assert!(ElementSet::ELEMENTAL.has(Element::Nihil));
        assert!(!ElementSet::ELEMENTAL.has(Element::Physical));
        assert!(ElementSet::ALL.has(Element::Physical));
    }

    #[test]
    fn slots_pair_up() {
        assert_eq!(Element::Fire.offensive(), Attribute::Thag);
        assert_eq!(Element::Fire.defensive(), Attribute::Thfd);
        assert!(Element::Digital.offensive().is_offensive());
        assert!(Element::Digital.defensive().is_defensive());
    }
}

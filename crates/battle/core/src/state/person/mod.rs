//! Person - the battler.
//!
//! # Stat layers
//!
//! ```text
//! base      stats at level 1      (class + race, elemental curves applied)
//! base_max  stats at max level    (class + race, elemental curves applied)
//! curr_max  base..base_max interpolated at the current level
//! temp_max  curr_max + equipment
//! curr      live values, VITA and QTDR bounded by temp_max
//! ```
//!
//! Non-resource attributes in `curr` are the effective battle stats; buffs and
//! debuffs move them and are reverted by the ailment that made them.

mod ailments;
mod vitals;

pub use ailments::{InflictError, InflictOutcome};
pub use vitals::PersonError;

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::ai::AiModule;
use crate::config::BattleConfig;
use crate::env::BattleContext;
use crate::skill::{Skill, SkillSet, SkillSetError};
use crate::stats::{Attribute, AttributeSet, Curve, Element, ExpTable};

use super::ailment::Ailment;
use super::category::Category;
use super::equipment::{EquipError, EquipSlot, EquipSlots, Equipment};
use super::flags::{BattleFlags, PersonFlags};
use super::item::Item;
use super::party::PersonIndex;

/// Construction data for a [`Person`].
#[derive(Clone, Debug)]
pub struct PersonSpec {
    pub game_id: u32,
    pub name: String,
    pub battle_class: Arc<Category>,
    pub race_class: Arc<Category>,
    pub primary: Element,
    pub secondary: Element,
    pub primary_curve: Curve,
    pub secondary_curve: Curve,
    pub total_exp: u64,
    pub flags: PersonFlags,
    pub exp_drop: u64,
    pub credit_drop: u64,
    pub item_drops: Vec<(Arc<Item>, u16)>,
    pub ai: Option<AiModule>,
}

impl PersonSpec {
    /// Physical/physical person at level 1 that can gain exp and level up.
    pub fn new(
        game_id: u32,
        name: impl Into<String>,
        battle_class: Arc<Category>,
        race_class: Arc<Category>,
    ) -> Self {
        Self {
            game_id,
            name: name.into(),
            battle_class,
            race_class,
            primary: Element::Physical,
            secondary: Element::Physical,
            primary_curve: Curve::C,
            secondary_curve: Curve::C,
            total_exp: 0,
            flags: PersonFlags::CAN_GAIN_EXP | PersonFlags::CAN_LEVEL_UP,
            exp_drop: 0,
            credit_drop: 0,
            item_drops: Vec::new(),
            ai: None,
        }
    }
}

/// A battler, ally or foe.
#[derive(Clone, Debug)]
pub struct Person {
    game_id: u32,
    my_id: u32,
    name: String,

    battle_class: Arc<Category>,
    race_class: Arc<Category>,
    primary: Element,
    secondary: Element,
    primary_curve: Curve,
    secondary_curve: Curve,

    exp_table: Arc<ExpTable>,
    total_exp: u64,
    level: u32,

    base: AttributeSet,
    base_max: AttributeSet,
    curr: AttributeSet,
    curr_max: AttributeSet,
    temp_max: AttributeSet,

    battle_flags: BattleFlags,
    person_flags: PersonFlags,

    equipment: EquipSlots,
    learned: SkillSet,
    ailments: ArrayVec<Ailment, { BattleConfig::MAX_AILMENTS_PER_PERSON }>,
    /// `(skill id, turns left)`.
    cooldowns: Vec<(u32, u32)>,

    guarding: Option<PersonIndex>,
    guarded_by: Option<PersonIndex>,

    exp_drop: u64,
    credit_drop: u64,
    item_drops: Vec<(Arc<Item>, u16)>,
    ai: Option<AiModule>,
}

impl Person {
    pub fn new(ctx: &mut BattleContext, spec: PersonSpec) -> Self {
        let mut person = Self {
            game_id: spec.game_id,
            my_id: ctx.allocate_id(),
            name: spec.name,
            battle_class: spec.battle_class,
            race_class: spec.race_class,
            primary: spec.primary,
            secondary: spec.secondary,
            primary_curve: spec.primary_curve,
            secondary_curve: spec.secondary_curve,
            exp_table: Arc::clone(ctx.exp_table()),
            total_exp: spec.total_exp,
            level: 1,
            base: AttributeSet::personal(),
            base_max: AttributeSet::personal(),
            curr: AttributeSet::personal(),
            curr_max: AttributeSet::personal(),
            temp_max: AttributeSet::personal(),
            battle_flags: BattleFlags::empty(),
            person_flags: spec.flags,
            equipment: EquipSlots::default(),
            learned: SkillSet::new(),
            ailments: ArrayVec::new(),
            cooldowns: Vec::new(),
            guarding: None,
            guarded_by: None,
            exp_drop: spec.exp_drop,
            credit_drop: spec.credit_drop,
            item_drops: spec.item_drops,
            ai: spec.ai,
        };
        person.total_exp = person.total_exp.min(person.exp_table.max_exp());
        person.recompute_stats();
        person.curr = person.temp_max.clone();
        person
    }

    /// Deep copy of a base person with a fresh `my_id`.
    ///
    /// Equipment is shared with the base only at this point.
    pub fn instantiate(&self, ctx: &mut BattleContext) -> Self {
        let mut copy = self.clone();
        copy.my_id = ctx.allocate_id();
        copy
    }

    // ========================================================================
    // Identity
    // ========================================================================

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    /// Unique id within the [`BattleContext`] that built this person.
    pub fn my_id(&self) -> u32 {
        self.my_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn battle_class(&self) -> &Arc<Category> {
        &self.battle_class
    }

    pub fn race_class(&self) -> &Arc<Category> {
        &self.race_class
    }

    pub fn primary(&self) -> Element {
        self.primary
    }

    pub fn secondary(&self) -> Element {
        self.secondary
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn total_exp(&self) -> u64 {
        self.total_exp
    }

    // ========================================================================
    // Stats
    // ========================================================================

    pub fn base(&self) -> &AttributeSet {
        &self.base
    }

    pub fn base_max(&self) -> &AttributeSet {
        &self.base_max
    }

    pub fn curr(&self) -> &AttributeSet {
        &self.curr
    }

    pub fn curr_max(&self) -> &AttributeSet {
        &self.curr_max
    }

    pub fn temp_max(&self) -> &AttributeSet {
        &self.temp_max
    }

    #[inline]
    pub fn stat(&self, attr: Attribute) -> i32 {
        self.curr.get(attr)
    }

    pub fn vita(&self) -> i32 {
        self.curr.get(Attribute::Vita)
    }

    pub fn qtdr(&self) -> i32 {
        self.curr.get(Attribute::Qtdr)
    }

    pub fn momentum(&self) -> i32 {
        self.curr.get(Attribute::Mmtm)
    }

    /// QTDR as a percentage of its maximum (100 when the maximum is 0).
    pub fn qtdr_percent(&self) -> f64 {
        let max = self.temp_max.get(Attribute::Qtdr);
        if max <= 0 {
            return 100.0;
        }
        f64::from(self.qtdr()) * 100.0 / f64::from(max)
    }

    /// Rebuild every stat layer from class, race, curves, level and equipment.
    pub fn recompute_stats(&mut self) {
        let mut base = self.battle_class.base_stats() + self.race_class.base_stats();
        let mut base_max = self.battle_class.top_stats() + self.race_class.top_stats();
        self.apply_curves(&mut base);
        self.apply_curves(&mut base_max);

        self.level = self.exp_table.level_for(self.total_exp);
        self.person_flags.set(
            PersonFlags::MAX_LVL,
            self.total_exp >= self.exp_table.max_exp(),
        );

        self.curr_max = self.exp_table.stats_at(self.level, &base, &base_max);
        self.temp_max = &self.curr_max + &self.equipment.total_stats();
        self.base = base;
        self.base_max = base_max;
        self.cap_resources();
    }

    fn apply_curves(&self, set: &mut AttributeSet) {
        let primary = self.primary_curve.primary_multiplier();
        let secondary = self.secondary_curve.secondary_multiplier();
        set.scale(self.primary.offensive(), primary);
        set.scale(self.primary.defensive(), primary);
        if self.secondary != self.primary {
            set.scale(self.secondary.offensive(), secondary);
            set.scale(self.secondary.defensive(), secondary);
        }
    }

    /// Keep VITA and QTDR within `temp_max`.
    fn cap_resources(&mut self) {
        for attr in [Attribute::Vita, Attribute::Qtdr] {
            let cap = self.temp_max.get(attr);
            if self.curr.get(attr) > cap {
                self.curr.set(attr, cap);
            }
        }
    }

    // ========================================================================
    // Flags
    // ========================================================================

    pub fn battle_flags(&self) -> BattleFlags {
        self.battle_flags
    }

    pub fn battle_flags_mut(&mut self) -> &mut BattleFlags {
        &mut self.battle_flags
    }

    pub fn person_flags(&self) -> PersonFlags {
        self.person_flags
    }

    pub fn person_flags_mut(&mut self) -> &mut PersonFlags {
        &mut self.person_flags
    }

    #[inline]
    pub fn has_flag(&self, flag: BattleFlags) -> bool {
        self.battle_flags.has(flag)
    }

    pub fn is_alive(&self) -> bool {
        self.battle_flags.has(BattleFlags::ALIVE)
    }

    pub fn is_boss_tier(&self) -> bool {
        self.person_flags.intersects(PersonFlags::BOSS_TIER)
    }

    /// Enter a battle: full resources, fresh flags, no leftovers from the
    /// last fight.
    pub fn battle_prep(&mut self) {
        self.clear_ailments();
        self.recompute_stats();
        self.curr = self.temp_max.clone();

        let permissions = self.battle_class.permissions() & self.race_class.permissions();
        self.battle_flags = BattleFlags::IN_BATTLE | permissions;
        if self.vita() > 0 {
            self.battle_flags.insert(BattleFlags::ALIVE);
        }
        if !self.is_boss_tier() {
            self.battle_flags.insert(BattleFlags::REVIVABLE);
        }

        self.cooldowns.clear();
        self.guarding = None;
        self.guarded_by = None;
    }

    /// Leave a battle; ailments and stances do not persist.
    pub fn battle_end(&mut self) {
        self.clear_ailments();
        self.battle_flags.clear(BattleFlags::IN_BATTLE | BattleFlags::TRANSIENT | BattleFlags::STANCES);
        self.cooldowns.clear();
        self.guarding = None;
        self.guarded_by = None;
    }

    // ========================================================================
    // Skills
    // ========================================================================

    /// Teach a skill unlocked at `level_required`.
    pub fn learn_skill(&mut self, skill: Arc<Skill>, level_required: u32) -> Result<(), SkillSetError> {
        self.learned.add(skill, level_required)
    }

    pub fn learned_skills(&self) -> &SkillSet {
        &self.learned
    }

    /// Class ∪ race ∪ learned ∪ equipment skills, unlocked and enabled at the
    /// current level. Silence is not applied.
    pub fn known_skills(&self) -> Vec<Arc<Skill>> {
        let mut all = self.battle_class.skills().clone();
        all += self.race_class.skills();
        all += &self.learned;
        for piece in self.equipment.pieces() {
            all += piece.skills();
        }
        all.usable(self.level).cloned().collect()
    }

    /// Skills usable right now: known skills, or none while silenced.
    pub fn current_skills(&self) -> Vec<Arc<Skill>> {
        if self.is_silenced() {
            return Vec::new();
        }
        self.known_skills()
    }

    /// QTDR a skill costs this person: halved by HALF_COST, doubled by BOND.
    pub fn effective_cost(&self, skill: &Skill) -> u32 {
        let mut cost = skill.cost();
        if self.has_flag(BattleFlags::HALF_COST) {
            cost /= 2;
        }
        if self.has_flag(BattleFlags::BOND) {
            cost = cost.saturating_mul(2);
        }
        cost
    }

    pub fn can_afford(&self, skill: &Skill) -> bool {
        i64::from(self.qtdr()) >= i64::from(self.effective_cost(skill))
    }

    // ========================================================================
    // Cooldowns
    // ========================================================================

    /// Turns left before `skill_id` can be selected again.
    pub fn cooldown(&self, skill_id: u32) -> u32 {
        self.cooldowns
            .iter()
            .find(|(id, _)| *id == skill_id)
            .map_or(0, |(_, turns)| *turns)
    }

    /// Lock `skill_id` for the next `turns` turns.
    pub fn start_cooldown(&mut self, skill_id: u32, turns: u32) {
        if turns == 0 {
            return;
        }
        // The next upkeep ticks once before selection.
        let turns = turns + 1;
        match self.cooldowns.iter_mut().find(|(id, _)| *id == skill_id) {
            Some(entry) => entry.1 = entry.1.max(turns),
            None => self.cooldowns.push((skill_id, turns)),
        }
    }

    pub fn tick_cooldowns(&mut self) {
        for (_, turns) in &mut self.cooldowns {
            *turns = turns.saturating_sub(1);
        }
        self.cooldowns.retain(|(_, turns)| *turns > 0);
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    pub fn equipment(&self, slot: EquipSlot) -> Option<&Arc<Equipment>> {
        self.equipment.get(slot)
    }

    /// Equip a piece and rebuild the stat layers.
    pub fn set_equip(&mut self, slot: EquipSlot, equipment: Arc<Equipment>) -> Result<(), EquipError> {
        self.equipment.equip(slot, equipment)?;
        self.recompute_stats();
        Ok(())
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<Arc<Equipment>, EquipError> {
        let piece = self.equipment.unequip(slot)?;
        self.recompute_stats();
        Ok(piece)
    }

    // ========================================================================
    // Stances
    // ========================================================================

    /// The ally this person is guarding.
    pub fn guarding(&self) -> Option<PersonIndex> {
        self.guarding
    }

    /// The guardian protecting this person.
    pub fn guarded_by(&self) -> Option<PersonIndex> {
        self.guarded_by
    }

    pub(crate) fn begin_guard(&mut self, ward: PersonIndex) {
        self.guarding = Some(ward);
        self.battle_flags.insert(BattleFlags::GUARDING);
    }

    pub(crate) fn end_guard(&mut self) -> Option<PersonIndex> {
        self.battle_flags.clear(BattleFlags::GUARDING);
        self.guarding.take()
    }

    pub(crate) fn set_guarded_by(&mut self, guardian: Option<PersonIndex>) {
        self.guarded_by = guardian;
        self.battle_flags.set(BattleFlags::GUARDED, guardian.is_some());
    }

    // ========================================================================
    // Rewards and AI
    // ========================================================================

    pub fn exp_drop(&self) -> u64 {
        self.exp_drop
    }

    pub fn credit_drop(&self) -> u64 {
        self.credit_drop
    }

    pub fn item_drops(&self) -> &[(Arc<Item>, u16)] {
        &self.item_drops
    }

    pub fn ai(&self) -> Option<&AiModule> {
        self.ai.as_ref()
    }

    pub fn set_ai(&mut self, ai: AiModule) {
        self.ai = Some(ai);
    }
}

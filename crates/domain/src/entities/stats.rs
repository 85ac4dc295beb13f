//! Combat statistics and stat-point allocation
//!
//! Derived values are a pure function of the primary attributes and class
//! ([`derive_profile`]), so recomputing them any number of times is stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CharacterId;
use crate::value_objects::{ClassType, Discipline, PrimaryStat};

/// The six spendable attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAttributes {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub constitution: i32,
    pub charisma: i32,
}

impl PrimaryAttributes {
    pub const BASE: PrimaryAttributes = PrimaryAttributes {
        strength: 10,
        dexterity: 10,
        intelligence: 10,
        wisdom: 10,
        constitution: 10,
        charisma: 10,
    };

    /// Starting attributes for a class
    pub fn for_class(class: ClassType) -> Self {
        let (strength, constitution, dexterity, intelligence, wisdom, charisma) = match class {
            ClassType::Warrior => (15, 13, 8, 6, 6, 8),
            ClassType::Mage => (6, 8, 8, 15, 10, 8),
            ClassType::Rogue => (8, 8, 15, 8, 8, 10),
            ClassType::Priest => (6, 8, 8, 10, 15, 10),
            ClassType::Ranger => (10, 10, 13, 8, 10, 8),
            ClassType::Paladin => (13, 12, 8, 8, 10, 10),
            ClassType::Warlock => (6, 8, 8, 13, 8, 13),
            ClassType::Druid => (8, 10, 8, 10, 13, 8),
        };
        Self {
            strength,
            dexterity,
            intelligence,
            wisdom,
            constitution,
            charisma,
        }
    }

    pub fn get(&self, stat: PrimaryStat) -> i32 {
        match stat {
            PrimaryStat::Strength => self.strength,
            PrimaryStat::Dexterity => self.dexterity,
            PrimaryStat::Intelligence => self.intelligence,
            PrimaryStat::Wisdom => self.wisdom,
            PrimaryStat::Constitution => self.constitution,
            PrimaryStat::Charisma => self.charisma,
        }
    }

    fn get_mut(&mut self, stat: PrimaryStat) -> &mut i32 {
        match stat {
            PrimaryStat::Strength => &mut self.strength,
            PrimaryStat::Dexterity => &mut self.dexterity,
            PrimaryStat::Intelligence => &mut self.intelligence,
            PrimaryStat::Wisdom => &mut self.wisdom,
            PrimaryStat::Constitution => &mut self.constitution,
            PrimaryStat::Charisma => &mut self.charisma,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub current: i32,
    pub max: i32,
}

impl ResourcePool {
    pub const fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    fn set_max(&mut self, max: i32) {
        self.max = max;
        self.current = self.current.min(max);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub attack_power: i32,
    pub spell_power: i32,
    pub defense: i32,
    pub critical_chance: f32,
    pub critical_damage: f32,
    pub dodge_chance: f32,
    pub block_chance: f32,
    pub movement_speed: f32,
    pub attack_speed: f32,
    pub cast_speed: f32,
    pub health_regen: f32,
    pub mana_regen: f32,
    pub stamina_regen: f32,
}

impl DerivedStats {
    const BASE: DerivedStats = DerivedStats {
        attack_power: 0,
        spell_power: 0,
        defense: 0,
        critical_chance: 5.0,
        critical_damage: 150.0,
        dodge_chance: 5.0,
        block_chance: 0.0,
        movement_speed: 100.0,
        attack_speed: 100.0,
        cast_speed: 100.0,
        health_regen: 1.0,
        mana_regen: 1.0,
        stamina_regen: 5.0,
    };
}

/// Everything computed from primaries and class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedProfile {
    pub health_max: i32,
    pub mana_max: i32,
    pub stamina_max: i32,
    pub derived: DerivedStats,
}

/// Compute pool maxima and derived combat values.
pub fn derive_profile(primary: &PrimaryAttributes, class: ClassType) -> DerivedProfile {
    let PrimaryAttributes {
        strength: str_,
        dexterity: dex,
        intelligence: int,
        wisdom: wis,
        constitution: con,
        ..
    } = *primary;

    let health_max = match class.discipline() {
        Discipline::Martial => 100 + con * 10 + str_ * 2,
        Discipline::Agile => 100 + con * 8 + dex * 2,
        Discipline::Arcane => 100 + con * 6 + int,
        Discipline::Divine => 100 + con * 7 + wis * 2,
    };

    let mana_max = match (class.discipline(), class) {
        (Discipline::Arcane, _) => 50 + int * 10 + wis * 2,
        (Discipline::Divine, _) => 50 + wis * 10 + int * 2,
        (_, ClassType::Paladin) => 50 + wis * 5,
        _ => 50 + int * 2,
    };

    let stamina_max = 100 + con * 5 + str_ * 2;

    let attack_power = match class.discipline() {
        Discipline::Martial => str_ * 2 + dex,
        Discipline::Agile => dex * 2 + str_,
        _ => str_ + dex,
    };

    let spell_power = match (class.discipline(), class) {
        (Discipline::Arcane, _) => int * 3,
        (Discipline::Divine, _) => wis * 3,
        (_, ClassType::Paladin) => (wis * 2 + int) / 2,
        _ => 0,
    };

    let mana_regen = if class.is_caster() {
        1.0 + wis as f32 * 0.2
    } else {
        1.0 + wis as f32 * 0.05
    };

    DerivedProfile {
        health_max,
        mana_max,
        stamina_max,
        derived: DerivedStats {
            attack_power,
            spell_power,
            defense: con * 2 + (str_ + dex) / 2,
            critical_chance: 5.0 + dex as f32 * 0.1,
            dodge_chance: 5.0 + dex as f32 * 0.2,
            health_regen: 1.0 + con as f32 * 0.1,
            mana_regen,
            stamina_regen: 5.0 + con as f32 * 0.2,
            ..DerivedStats::BASE
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub character_id: CharacterId,
    pub primary: PrimaryAttributes,
    pub health: ResourcePool,
    pub mana: ResourcePool,
    pub stamina: ResourcePool,
    pub derived: DerivedStats,
    pub stat_points_available: u32,
    pub skill_points_available: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stats {
    /// Base attributes with no class applied.
    pub fn new(character_id: CharacterId, now: DateTime<Utc>) -> Self {
        Self {
            character_id,
            primary: PrimaryAttributes::BASE,
            health: ResourcePool::full(100),
            mana: ResourcePool::full(50),
            stamina: ResourcePool::full(100),
            derived: DerivedStats::BASE,
            stat_points_available: 0,
            skill_points_available: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Starting stats for a new character: class primaries, derived values, full pools.
    pub fn for_class(character_id: CharacterId, class: ClassType, now: DateTime<Utc>) -> Self {
        let mut stats = Self::new(character_id, now);
        stats.primary = PrimaryAttributes::for_class(class);
        stats.recalculate(class);
        stats.full_restore();
        stats
    }

    /// Recompute derived values and pool maxima; current pools are clamped to the new maxima.
    pub fn recalculate(&mut self, class: ClassType) {
        let profile = derive_profile(&self.primary, class);
        self.health.set_max(profile.health_max);
        self.mana.set_max(profile.mana_max);
        self.stamina.set_max(profile.stamina_max);
        self.derived = profile.derived;
    }

    pub fn full_restore(&mut self) {
        self.health.current = self.health.max;
        self.mana.current = self.mana.max;
        self.stamina.current = self.stamina.max;
    }

    /// Spend one stat point. Derived values are not touched; call
    /// [`Stats::recalculate`] afterwards.
    pub fn allocate_stat_point(
        &mut self,
        stat: PrimaryStat,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.stat_points_available == 0 {
            return Err(DomainError::NoStatPointsAvailable);
        }
        *self.primary.get_mut(stat) += 1;
        self.stat_points_available -= 1;
        self.updated_at = now;
        Ok(())
    }

    pub fn add_stat_points(&mut self, points: u32, now: DateTime<Utc>) {
        self.stat_points_available += points;
        self.updated_at = now;
    }

    pub fn add_skill_points(&mut self, points: u32, now: DateTime<Utc>) {
        self.skill_points_available += points;
        self.updated_at = now;
    }
}

//! Playable classes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// The eight playable classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Warrior,
    Mage,
    Rogue,
    Priest,
    Ranger,
    Paladin,
    Warlock,
    Druid,
}

impl ClassType {
    pub const ALL: [ClassType; 8] = [
        ClassType::Warrior,
        ClassType::Mage,
        ClassType::Rogue,
        ClassType::Priest,
        ClassType::Ranger,
        ClassType::Paladin,
        ClassType::Warlock,
        ClassType::Druid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Warrior => "warrior",
            ClassType::Mage => "mage",
            ClassType::Rogue => "rogue",
            ClassType::Priest => "priest",
            ClassType::Ranger => "ranger",
            ClassType::Paladin => "paladin",
            ClassType::Warlock => "warlock",
            ClassType::Druid => "druid",
        }
    }

    /// Which scaling family the class draws its derived stats from.
    pub fn discipline(&self) -> Discipline {
        match self {
            ClassType::Warrior | ClassType::Paladin => Discipline::Martial,
            ClassType::Rogue | ClassType::Ranger => Discipline::Agile,
            ClassType::Mage | ClassType::Warlock => Discipline::Arcane,
            ClassType::Priest | ClassType::Druid => Discipline::Divine,
        }
    }

    /// Casters regenerate mana from wisdom at the full rate.
    pub fn is_caster(&self) -> bool {
        matches!(self.discipline(), Discipline::Arcane | Discipline::Divine)
    }
}

/// Class families sharing a derived-stat formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Warrior, Paladin
    Martial,
    /// Rogue, Ranger
    Agile,
    /// Mage, Warlock
    Arcane,
    /// Priest, Druid
    Divine,
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClassType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warrior" => Ok(ClassType::Warrior),
            "mage" => Ok(ClassType::Mage),
            "rogue" => Ok(ClassType::Rogue),
            "priest" => Ok(ClassType::Priest),
            "ranger" => Ok(ClassType::Ranger),
            "paladin" => Ok(ClassType::Paladin),
            "warlock" => Ok(ClassType::Warlock),
            "druid" => Ok(ClassType::Druid),
            _ => Err(DomainError::parse(format!("Unknown class: {}", s))),
        }
    }
}

//! Primary attributes a player can spend stat points on

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryStat {
    Strength,
    Dexterity,
    Intelligence,
    Wisdom,
    Constitution,
    Charisma,
}

impl PrimaryStat {
    pub const ALL: [PrimaryStat; 6] = [
        PrimaryStat::Strength,
        PrimaryStat::Dexterity,
        PrimaryStat::Intelligence,
        PrimaryStat::Wisdom,
        PrimaryStat::Constitution,
        PrimaryStat::Charisma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryStat::Strength => "strength",
            PrimaryStat::Dexterity => "dexterity",
            PrimaryStat::Intelligence => "intelligence",
            PrimaryStat::Wisdom => "wisdom",
            PrimaryStat::Constitution => "constitution",
            PrimaryStat::Charisma => "charisma",
        }
    }
}

impl fmt::Display for PrimaryStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrimaryStat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strength" => Ok(PrimaryStat::Strength),
            "dexterity" => Ok(PrimaryStat::Dexterity),
            "intelligence" => Ok(PrimaryStat::Intelligence),
            "wisdom" => Ok(PrimaryStat::Wisdom),
            "constitution" => Ok(PrimaryStat::Constitution),
            "charisma" => Ok(PrimaryStat::Charisma),
            _ => Err(DomainError::validation(format!("Invalid stat type: {}", s))),
        }
    }
}

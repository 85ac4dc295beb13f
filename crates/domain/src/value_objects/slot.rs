use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

pub const MIN_SLOT: i32 = 1;
pub const MAX_SLOT: i32 = 100;

/// Roster position of a character within its owner's list (1..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotNumber(u8);

impl SlotNumber {
    pub fn new(slot: i32) -> Result<Self, DomainError> {
        if !(MIN_SLOT..=MAX_SLOT).contains(&slot) {
            return Err(DomainError::validation(format!(
                "Slot must be between {} and {}",
                MIN_SLOT, MAX_SLOT
            )));
        }
        // Range checked above
        Ok(Self(slot as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Payloads for the nine character event kinds
//!
//! The variant tag doubles as the publish subject, so subscribers can route
//! on either.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Position, PrimaryAttributes};
use crate::value_objects::{ClassType, Gender, PrimaryStat, Race};

pub const SUBJECT_CREATED: &str = "character.created";
pub const SUBJECT_DELETED: &str = "character.deleted";
pub const SUBJECT_RESTORED: &str = "character.restored";
pub const SUBJECT_SELECTED: &str = "character.selected";
pub const SUBJECT_ONLINE: &str = "character.online";
pub const SUBJECT_POSITION_UPDATED: &str = "character.position.updated";
pub const SUBJECT_STATS_UPDATED: &str = "character.stats.updated";
pub const SUBJECT_APPEARANCE_UPDATED: &str = "character.appearance.updated";
pub const SUBJECT_LEVEL_UP: &str = "character.levelup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Walk,
    Teleport,
    InstanceEnter,
    InstanceLeave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsUpdateType {
    StatAllocation,
    LevelUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum CharacterEvent {
    #[serde(rename = "character.created")]
    Created {
        name: String,
        class_type: ClassType,
        race: Race,
        gender: Gender,
        level: u32,
        slot_number: u8,
    },

    #[serde(rename = "character.deleted")]
    Deleted {
        name: String,
        soft_delete: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delete_reason: Option<String>,
    },

    #[serde(rename = "character.restored")]
    Restored {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        restore_reason: Option<String>,
    },

    #[serde(rename = "character.selected")]
    Selected {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },

    #[serde(rename = "character.online")]
    Online {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        world_id: String,
        zone_id: String,
    },

    #[serde(rename = "character.position.updated")]
    PositionUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_position: Option<Position>,
        new_position: Position,
        movement_type: MovementType,
    },

    #[serde(rename = "character.stats.updated")]
    StatsUpdated {
        update_type: StatsUpdateType,
        previous_stats: PrimaryAttributes,
        new_stats: PrimaryAttributes,
        changes: BTreeMap<PrimaryStat, i32>,
    },

    #[serde(rename = "character.appearance.updated")]
    AppearanceUpdated {
        changed_fields: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    #[serde(rename = "character.levelup")]
    LevelUp {
        name: String,
        previous_level: u32,
        new_level: u32,
        experience: u64,
        stat_points_gained: u32,
        skill_points_gained: u32,
    },
}

impl CharacterEvent {
    /// Subject this event is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            CharacterEvent::Created { .. } => SUBJECT_CREATED,
            CharacterEvent::Deleted { .. } => SUBJECT_DELETED,
            CharacterEvent::Restored { .. } => SUBJECT_RESTORED,
            CharacterEvent::Selected { .. } => SUBJECT_SELECTED,
            CharacterEvent::Online { .. } => SUBJECT_ONLINE,
            CharacterEvent::PositionUpdated { .. } => SUBJECT_POSITION_UPDATED,
            CharacterEvent::StatsUpdated { .. } => SUBJECT_STATS_UPDATED,
            CharacterEvent::AppearanceUpdated { .. } => SUBJECT_APPEARANCE_UPDATED,
            CharacterEvent::LevelUp { .. } => SUBJECT_LEVEL_UP,
        }
    }

    /// Build a stats event, computing the per-attribute diff.
    pub fn stats_updated(
        update_type: StatsUpdateType,
        previous_stats: PrimaryAttributes,
        new_stats: PrimaryAttributes,
    ) -> Self {
        let changes = PrimaryStat::ALL
            .into_iter()
            .filter_map(|stat| {
                let delta = new_stats.get(stat) - previous_stats.get(stat);
                (delta != 0).then_some((stat, delta))
            })
            .collect();
        CharacterEvent::StatsUpdated {
            update_type,
            previous_stats,
            new_stats,
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_diff_only_lists_changed_attributes() {
        let previous = PrimaryAttributes::for_class(ClassType::Warrior);
        let mut next = previous;
        next.strength += 1;

        let event =
            CharacterEvent::stats_updated(StatsUpdateType::StatAllocation, previous, next);
        match event {
            CharacterEvent::StatsUpdated { changes, .. } => {
                assert_eq!(changes.len(), 1);
                assert_eq!(changes.get(&PrimaryStat::Strength), Some(&1));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn tag_matches_subject() {
        let event = CharacterEvent::Restored {
            name: "Thane".to_string(),
            restore_reason: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], event.subject());
        assert!(json.get("restore_reason").is_none());
    }
}

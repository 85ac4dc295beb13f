//! Where a character is in the world

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CharacterId, InstanceId};
use crate::value_objects::{ClassType, Rotation, Vec3, Velocity};

pub const STARTER_WORLD: &str = "starter_zone";
pub const DEFAULT_ZONE: &str = "tutorial_area";
pub const DEFAULT_MAP: &str = "main";

const HORIZONTAL_LIMIT: f64 = 1_000_000.0;
const MIN_ALTITUDE: f64 = -10_000.0;
const MAX_ALTITUDE: f64 = 50_000.0;

/// An instanced copy of a zone the character is currently inside
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceBinding {
    pub instance_id: InstanceId,
    pub instance_type: String,
}

/// Respawn anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafePosition {
    pub world_id: String,
    pub zone_id: String,
    pub location: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub character_id: CharacterId,
    pub world_id: String,
    pub zone_id: String,
    pub map_id: String,
    pub location: Vec3,
    pub rotation: Rotation,
    pub velocity: Velocity,
    pub instance: Option<InstanceBinding>,
    pub safe: SafePosition,
    pub last_movement: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial movement update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionPatch {
    pub world_id: Option<String>,
    pub zone_id: Option<String>,
    pub map_id: Option<String>,
    pub location: Option<Vec3>,
    pub rotation: Option<Rotation>,
    pub velocity: Option<Velocity>,
}

impl Position {
    /// Tutorial-area position with the safe point set to it.
    pub fn new(character_id: CharacterId, now: DateTime<Utc>) -> Self {
        let location = Vec3::new(0.0, 0.0, 100.0);
        Self {
            character_id,
            world_id: STARTER_WORLD.to_string(),
            zone_id: DEFAULT_ZONE.to_string(),
            map_id: DEFAULT_MAP.to_string(),
            location,
            rotation: Rotation::default(),
            velocity: Velocity::ZERO,
            instance: None,
            safe: SafePosition {
                world_id: STARTER_WORLD.to_string(),
                zone_id: DEFAULT_ZONE.to_string(),
                location,
            },
            last_movement: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Class starting area; the spawn point becomes the safe position.
    pub fn spawn_for_class(character_id: CharacterId, class: ClassType, now: DateTime<Utc>) -> Self {
        let mut position = Self::new(character_id, now);
        let (zone, location) = match class {
            ClassType::Warrior | ClassType::Paladin => {
                ("warrior_training_grounds", Vec3::new(100.0, 50.0, 100.0))
            }
            ClassType::Mage | ClassType::Warlock => ("arcane_academy", Vec3::new(-100.0, -50.0, 150.0)),
            ClassType::Rogue => ("shadow_alley", Vec3::new(200.0, -100.0, 80.0)),
            ClassType::Priest | ClassType::Druid => ("sacred_grove", Vec3::new(-200.0, 100.0, 120.0)),
            ClassType::Ranger => ("hunters_lodge", Vec3::new(150.0, 150.0, 110.0)),
        };
        position.world_id = STARTER_WORLD.to_string();
        position.zone_id = zone.to_string();
        position.location = location;
        position.save_safe_position(now);
        position
    }

    pub fn apply(&mut self, patch: PositionPatch, now: DateTime<Utc>) {
        if let Some(world_id) = patch.world_id {
            self.world_id = world_id;
        }
        if let Some(zone_id) = patch.zone_id {
            self.zone_id = zone_id;
        }
        if let Some(map_id) = patch.map_id {
            self.map_id = map_id;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(velocity) = patch.velocity {
            self.velocity = velocity;
        }
        self.last_movement = now;
        self.updated_at = now;
    }

    pub fn save_safe_position(&mut self, now: DateTime<Utc>) {
        self.safe = SafePosition {
            world_id: self.world_id.clone(),
            zone_id: self.zone_id.clone(),
            location: self.location,
        };
        self.updated_at = now;
    }

    /// Move back to the safe point, stop, and drop out of any instance.
    pub fn teleport_to_safe_position(&mut self, now: DateTime<Utc>) {
        self.location = self.safe.location;
        self.world_id = self.safe.world_id.clone();
        self.zone_id = self.safe.zone_id.clone();
        self.velocity = Velocity::ZERO;
        self.instance = None;
        self.last_movement = now;
        self.updated_at = now;
    }

    pub fn enter_instance(&mut self, binding: InstanceBinding, now: DateTime<Utc>) {
        self.instance = Some(binding);
        self.updated_at = now;
    }

    pub fn leave_instance(&mut self, now: DateTime<Utc>) {
        self.instance = None;
        self.updated_at = now;
    }

    pub fn is_in_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// Straight-line distance, or `None` when the two are not in the same world, zone and instance.
    pub fn distance_to(&self, other: &Position) -> Option<f64> {
        if self.world_id != other.world_id
            || self.zone_id != other.zone_id
            || self.instance.as_ref().map(|i| i.instance_id)
                != other.instance.as_ref().map(|i| i.instance_id)
        {
            return None;
        }
        let dx = self.location.x - other.location.x;
        let dy = self.location.y - other.location.y;
        let dz = self.location.z - other.location.z;
        Some((dx * dx + dy * dy + dz * dz).sqrt())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.world_id.trim().is_empty() {
            return Err(DomainError::validation("Invalid world id"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(DomainError::validation("Invalid zone id"));
        }

        let Rotation { pitch, yaw, roll } = self.rotation;
        if !(-90.0..=90.0).contains(&pitch)
            || !(-180.0..=180.0).contains(&yaw)
            || !(-180.0..=180.0).contains(&roll)
        {
            return Err(DomainError::validation("Invalid rotation"));
        }

        let Vec3 { x, y, z } = self.location;
        if !(-HORIZONTAL_LIMIT..=HORIZONTAL_LIMIT).contains(&x)
            || !(-HORIZONTAL_LIMIT..=HORIZONTAL_LIMIT).contains(&y)
            || !(MIN_ALTITUDE..=MAX_ALTITUDE).contains(&z)
        {
            return Err(DomainError::validation("Position out of bounds"));
        }

        Ok(())
    }
}

//! Visual customisation of a character

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CharacterId;
use crate::value_objects::{Gender, Race};

pub const FACE_TYPE_RANGE: std::ops::RangeInclusive<i32> = 1..=20;
pub const HAIR_STYLE_RANGE: std::ops::RangeInclusive<i32> = 0..=50;
pub const FACIAL_HAIR_STYLE_RANGE: std::ops::RangeInclusive<i32> = 0..=20;
pub const HEIGHT_RANGE: std::ops::RangeInclusive<f32> = 0.8..=1.2;

const DEFAULT_SKIN_COLOR: &str = "#FFD4B2";
const DEFAULT_EYE_COLOR: &str = "#4B8BF5";
const DEFAULT_HAIR_COLOR: &str = "#3B2F2F";

/// Body builds, numbered 1..=5 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Athletic,
    Muscular,
    Slim,
    Average,
    Heavy,
}

impl BodyType {
    pub fn code(self) -> i32 {
        match self {
            BodyType::Athletic => 1,
            BodyType::Muscular => 2,
            BodyType::Slim => 3,
            BodyType::Average => 4,
            BodyType::Heavy => 5,
        }
    }
}

impl TryFrom<i32> for BodyType {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(BodyType::Athletic),
            2 => Ok(BodyType::Muscular),
            3 => Ok(BodyType::Slim),
            4 => Ok(BodyType::Average),
            5 => Ok(BodyType::Heavy),
            _ => Err(DomainError::validation(format!("Invalid body type: {}", code))),
        }
    }
}

/// Relative body proportion multipliers, 1.0 is neutral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProportions {
    pub shoulder_width: f32,
    pub chest_size: f32,
    pub waist_size: f32,
    pub hip_size: f32,
    pub arm_length: f32,
    pub leg_length: f32,
    pub neck_length: f32,
}

impl Default for BodyProportions {
    fn default() -> Self {
        Self {
            shoulder_width: 1.0,
            chest_size: 1.0,
            waist_size: 1.0,
            hip_size: 1.0,
            arm_length: 1.0,
            leg_length: 1.0,
            neck_length: 1.0,
        }
    }
}

/// Whether `color` is `#` followed by exactly six hex digits.
pub fn is_valid_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub character_id: CharacterId,
    pub face_type: i32,
    pub skin_color: String,
    pub eye_color: String,
    pub hair_style: i32,
    pub hair_color: String,
    pub facial_hair_style: i32,
    pub facial_hair_color: String,
    pub body_type: BodyType,
    pub height: f32,
    pub body_proportions: BodyProportions,
    pub scars: Vec<i32>,
    pub tattoos: Vec<i32>,
    pub accessories: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial appearance change; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppearancePatch {
    pub face_type: Option<i32>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
    pub hair_style: Option<i32>,
    pub hair_color: Option<String>,
    pub facial_hair_style: Option<i32>,
    pub facial_hair_color: Option<String>,
    pub body_type: Option<BodyType>,
    pub height: Option<f32>,
    pub body_proportions: Option<BodyProportions>,
    pub scars: Option<Vec<i32>>,
    pub tattoos: Option<Vec<i32>>,
    pub accessories: Option<Vec<i32>>,
}

impl AppearancePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Appearance {
    /// Neutral appearance with no race or gender applied.
    pub fn new(character_id: CharacterId, now: DateTime<Utc>) -> Self {
        Self {
            character_id,
            face_type: 1,
            skin_color: DEFAULT_SKIN_COLOR.to_string(),
            eye_color: DEFAULT_EYE_COLOR.to_string(),
            hair_style: 1,
            hair_color: DEFAULT_HAIR_COLOR.to_string(),
            facial_hair_style: 0,
            facial_hair_color: DEFAULT_HAIR_COLOR.to_string(),
            body_type: BodyType::Athletic,
            height: 1.0,
            body_proportions: BodyProportions::default(),
            scars: Vec::new(),
            tattoos: Vec::new(),
            accessories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Starting appearance for a new character: defaults, then race, then gender.
    pub fn for_character(
        character_id: CharacterId,
        race: Race,
        gender: Gender,
        now: DateTime<Utc>,
    ) -> Self {
        let mut appearance = Self::new(character_id, now);
        appearance.apply_race_defaults(race);
        appearance.apply_gender_defaults(gender);
        appearance
    }

    pub fn apply_race_defaults(&mut self, race: Race) {
        let (skin, height, body) = match race {
            Race::Human => ("#FFD4B2", 1.0, None),
            Race::Elf => ("#FFF0E0", 1.05, Some(BodyType::Slim)),
            Race::Dwarf => ("#F4C2A1", 0.85, Some(BodyType::Muscular)),
            Race::Orc => ("#8FBC8F", 1.1, Some(BodyType::Muscular)),
            Race::Gnome => ("#FFE4C4", 0.8, Some(BodyType::Slim)),
            Race::Troll => ("#87CEEB", 1.15, Some(BodyType::Athletic)),
            Race::Undead => ("#C0C0C0", 1.0, Some(BodyType::Slim)),
        };
        self.skin_color = skin.to_string();
        self.height = height;
        if let Some(body) = body {
            self.body_type = body;
        }
    }

    pub fn apply_gender_defaults(&mut self, gender: Gender) {
        let defaults = BodyProportions::default();
        self.body_proportions = match gender {
            Gender::Male => BodyProportions {
                shoulder_width: 1.1,
                chest_size: 1.0,
                waist_size: 0.95,
                hip_size: 0.9,
                ..defaults
            },
            Gender::Female => BodyProportions {
                shoulder_width: 0.9,
                chest_size: 1.0,
                waist_size: 0.85,
                hip_size: 1.1,
                ..defaults
            },
            Gender::Other => defaults,
        };
    }

    /// Apply every present field and return the names of the fields that were supplied.
    pub fn apply(&mut self, patch: AppearancePatch) -> Vec<&'static str> {
        let mut changed = Vec::new();

        macro_rules! take {
            ($field:ident) => {
                if let Some(value) = patch.$field {
                    self.$field = value;
                    changed.push(stringify!($field));
                }
            };
        }

        take!(face_type);
        take!(skin_color);
        take!(eye_color);
        take!(hair_style);
        take!(hair_color);
        take!(facial_hair_style);
        take!(facial_hair_color);
        take!(body_type);
        take!(height);
        take!(body_proportions);
        take!(scars);
        take!(tattoos);
        take!(accessories);

        changed
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !FACE_TYPE_RANGE.contains(&self.face_type) {
            return Err(DomainError::validation("Invalid face type"));
        }
        if !is_valid_hex_color(&self.skin_color) {
            return Err(DomainError::validation("Invalid skin color"));
        }
        if !is_valid_hex_color(&self.eye_color) {
            return Err(DomainError::validation("Invalid eye color"));
        }
        if !HAIR_STYLE_RANGE.contains(&self.hair_style) {
            return Err(DomainError::validation("Invalid hair style"));
        }
        if !is_valid_hex_color(&self.hair_color) {
            return Err(DomainError::validation("Invalid hair color"));
        }
        if !FACIAL_HAIR_STYLE_RANGE.contains(&self.facial_hair_style) {
            return Err(DomainError::validation("Invalid facial hair style"));
        }
        // Facial hair color only matters when facial hair is present
        if self.facial_hair_style > 0 && !is_valid_hex_color(&self.facial_hair_color) {
            return Err(DomainError::validation("Invalid facial hair color"));
        }
        if !HEIGHT_RANGE.contains(&self.height) {
            return Err(DomainError::validation("Invalid height"));
        }
        Ok(())
    }
}

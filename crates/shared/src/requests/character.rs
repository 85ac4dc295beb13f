use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// New character submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCharacterRequest {
    pub owner_id: Uuid,
    pub name: String,
    pub slot_number: i32,
    pub class_type: String,
    pub race: String,
    pub gender: String,
    #[serde(default)]
    pub appearance: Option<AppearanceOptions>,
}

/// Appearance choices offered at creation time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceOptions {
    pub face_type: Option<i32>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
    pub hair_style: Option<i32>,
    pub hair_color: Option<String>,
    pub facial_hair_style: Option<i32>,
    pub facial_hair_color: Option<String>,
    pub body_type: Option<i32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProportionsData {
    pub shoulder_width: f32,
    pub chest_size: f32,
    pub waist_size: f32,
    pub hip_size: f32,
    pub arm_length: f32,
    pub leg_length: f32,
    pub neck_length: f32,
}

/// Partial appearance update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAppearanceRequest {
    #[serde(flatten)]
    pub options: AppearanceOptions,
    #[serde(default)]
    pub body_proportions: Option<BodyProportionsData>,
    #[serde(default)]
    pub scars: Option<Vec<i32>>,
    #[serde(default)]
    pub tattoos: Option<Vec<i32>>,
    #[serde(default)]
    pub accessories: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3Data {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationData {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Movement update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePositionRequest {
    #[serde(default)]
    pub world_id: Option<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub map_id: Option<String>,
    #[serde(default)]
    pub position: Option<Vector3Data>,
    #[serde(default)]
    pub rotation: Option<RotationData>,
    #[serde(default)]
    pub velocity: Option<VelocityData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocateStatPointRequest {
    pub stat: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterInstanceRequest {
    pub instance_id: Uuid,
    pub instance_type: String,
}

//! Request DTOs to domain inputs.
//!
//! DTOs carry raw strings and numbers; anything that does not parse is a
//! validation error before any store is touched.

use roster_domain::entities::{BodyProportions, BodyType, InstanceBinding};
use roster_domain::value_objects::{ClassType, Gender, PrimaryStat, Race, Rotation, Vec3, Velocity};
use roster_domain::{AppearancePatch, InstanceId, OwnerId, PositionPatch};
use roster_shared::{
    AllocateStatPointRequest, AppearanceOptions, BodyProportionsData, CreateCharacterRequest,
    EnterInstanceRequest, UpdateAppearanceRequest, UpdatePositionRequest,
};

use super::CharacterError;

/// Parsed creation input. Name and slot stay raw; the saga validates them
/// against policy.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCharacter {
    pub owner_id: OwnerId,
    pub name: String,
    pub slot: i32,
    pub class: ClassType,
    pub race: Race,
    pub gender: Gender,
    pub appearance: AppearancePatch,
}

impl TryFrom<CreateCharacterRequest> for NewCharacter {
    type Error = CharacterError;

    fn try_from(request: CreateCharacterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            owner_id: OwnerId::from_uuid(request.owner_id),
            class: request.class_type.parse()?,
            race: request.race.parse()?,
            gender: request.gender.parse()?,
            appearance: match request.appearance {
                Some(options) => appearance_options(options)?,
                None => AppearancePatch::default(),
            },
            name: request.name,
            slot: request.slot_number,
        })
    }
}

fn appearance_options(options: AppearanceOptions) -> Result<AppearancePatch, CharacterError> {
    Ok(AppearancePatch {
        face_type: options.face_type,
        skin_color: options.skin_color,
        eye_color: options.eye_color,
        hair_style: options.hair_style,
        hair_color: options.hair_color,
        facial_hair_style: options.facial_hair_style,
        facial_hair_color: options.facial_hair_color,
        body_type: options.body_type.map(BodyType::try_from).transpose()?,
        height: options.height,
        ..AppearancePatch::default()
    })
}

fn body_proportions(data: BodyProportionsData) -> BodyProportions {
    BodyProportions {
        shoulder_width: data.shoulder_width,
        chest_size: data.chest_size,
        waist_size: data.waist_size,
        hip_size: data.hip_size,
        arm_length: data.arm_length,
        leg_length: data.leg_length,
        neck_length: data.neck_length,
    }
}

pub fn appearance_patch(request: UpdateAppearanceRequest) -> Result<AppearancePatch, CharacterError> {
    Ok(AppearancePatch {
        body_proportions: request.body_proportions.map(body_proportions),
        scars: request.scars,
        tattoos: request.tattoos,
        accessories: request.accessories,
        ..appearance_options(request.options)?
    })
}

pub fn position_patch(request: UpdatePositionRequest) -> PositionPatch {
    PositionPatch {
        world_id: request.world_id,
        zone_id: request.zone_id,
        map_id: request.map_id,
        location: request.position.map(|p| Vec3::new(p.x, p.y, p.z)),
        rotation: request.rotation.map(|r| Rotation {
            pitch: r.pitch,
            yaw: r.yaw,
            roll: r.roll,
        }),
        velocity: request.velocity.map(|v| Velocity {
            x: v.x,
            y: v.y,
            z: v.z,
        }),
    }
}

pub fn stat_choice(request: &AllocateStatPointRequest) -> Result<PrimaryStat, CharacterError> {
    Ok(request.stat.parse()?)
}

/// Id and type must both be present and non-empty.
pub fn instance_binding(request: EnterInstanceRequest) -> Result<InstanceBinding, CharacterError> {
    if request.instance_id.is_nil() || request.instance_type.trim().is_empty() {
        return Err(CharacterError::Validation(
            "Instance id and type are required together".to_string(),
        ));
    }
    Ok(InstanceBinding {
        instance_id: InstanceId::from_uuid(request.instance_id),
        instance_type: request.instance_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_shared::Vector3Data;
    use uuid::Uuid;

    fn create_request() -> CreateCharacterRequest {
        CreateCharacterRequest {
            owner_id: Uuid::new_v4(),
            name: "Thane".to_string(),
            slot_number: 1,
            class_type: "warrior".to_string(),
            race: "dwarf".to_string(),
            gender: "male".to_string(),
            appearance: None,
        }
    }

    #[test]
    fn create_request_parses_enumerations() {
        let input = NewCharacter::try_from(create_request()).unwrap();
        assert_eq!(input.class, ClassType::Warrior);
        assert_eq!(input.race, Race::Dwarf);
        assert_eq!(input.gender, Gender::Male);
        assert!(input.appearance.is_empty());
    }

    #[test]
    fn unknown_class_is_a_validation_error() {
        let request = CreateCharacterRequest {
            class_type: "bard".to_string(),
            ..create_request()
        };
        let err = NewCharacter::try_from(request).unwrap_err();
        assert_eq!(err.code(), "validation");
    }

    #[test]
    fn body_type_codes_are_checked() {
        let request = CreateCharacterRequest {
            appearance: Some(AppearanceOptions {
                body_type: Some(9),
                ..AppearanceOptions::default()
            }),
            ..create_request()
        };
        assert!(NewCharacter::try_from(request).is_err());
    }

    #[test]
    fn appearance_update_keeps_list_fields() {
        let patch = appearance_patch(UpdateAppearanceRequest {
            options: AppearanceOptions {
                body_type: Some(2),
                ..AppearanceOptions::default()
            },
            scars: Some(vec![3]),
            ..UpdateAppearanceRequest::default()
        })
        .unwrap();
        assert_eq!(patch.body_type, Some(BodyType::Muscular));
        assert_eq!(patch.scars, Some(vec![3]));
        assert_eq!(patch.tattoos, None);
    }

    #[test]
    fn position_update_maps_vectors() {
        let patch = position_patch(UpdatePositionRequest {
            position: Some(Vector3Data {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            }),
            ..UpdatePositionRequest::default()
        });
        assert_eq!(patch.location, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(patch.rotation, None);
    }

    #[test]
    fn instance_binding_is_all_or_nothing() {
        assert!(instance_binding(EnterInstanceRequest {
            instance_id: Uuid::new_v4(),
            instance_type: " ".to_string(),
        })
        .is_err());
        assert!(instance_binding(EnterInstanceRequest {
            instance_id: Uuid::nil(),
            instance_type: "dungeon".to_string(),
        })
        .is_err());
        assert!(instance_binding(EnterInstanceRequest {
            instance_id: Uuid::new_v4(),
            instance_type: "dungeon".to_string(),
        })
        .is_ok());
    }

    #[test]
    fn stat_names_are_parsed() {
        let request = AllocateStatPointRequest {
            stat: "strength".to_string(),
        };
        assert_eq!(stat_choice(&request).unwrap(), PrimaryStat::Strength);
        let request = AllocateStatPointRequest {
            stat: "luck".to_string(),
        };
        assert_eq!(stat_choice(&request).unwrap_err().code(), "validation");
    }
}

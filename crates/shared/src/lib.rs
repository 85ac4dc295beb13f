//! Roster Protocol - Shared request and response types
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and uuid
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - use raw `uuid::Uuid` and strings in DTOs; the engine
//!    parses and validates them

pub mod requests;
pub mod responses;

pub use requests::{
    AllocateStatPointRequest, AppearanceOptions, BodyProportionsData, CreateCharacterRequest,
    EnterInstanceRequest, RotationData, UpdateAppearanceRequest, UpdatePositionRequest,
    Vector3Data, VelocityData,
};
pub use responses::ErrorResponse;

//! Per-character records stored alongside the identity

pub mod appearance;
pub mod position;
pub mod stats;

pub use appearance::{is_valid_hex_color, Appearance, AppearancePatch, BodyProportions, BodyType};
pub use position::{InstanceBinding, Position, PositionPatch, SafePosition};
pub use stats::{
    derive_profile, DerivedProfile, DerivedStats, PrimaryAttributes, ResourcePool, Stats,
};

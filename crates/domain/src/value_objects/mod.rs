mod class_type;
mod lineage;
mod names;
mod slot;
mod spatial;
mod stat;

pub use class_type::{ClassType, Discipline};
pub use lineage::{Gender, Race};
pub use names::{CharacterName, NamePolicy, DEFAULT_NAME_MAX_LENGTH, DEFAULT_NAME_MIN_LENGTH};
pub use slot::{SlotNumber, MAX_SLOT, MIN_SLOT};
pub use spatial::{Rotation, Vec3, Velocity};
pub use stat::PrimaryStat;

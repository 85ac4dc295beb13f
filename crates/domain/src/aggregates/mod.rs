//! Aggregates with encapsulated state

pub mod character;

pub use character::{
    experience_for_level, level_for_experience, Character, LevelProgress, MAX_LEVEL,
    RESTORE_WINDOW_DAYS, SKILL_POINTS_PER_LEVEL, STAT_POINTS_PER_LEVEL,
};

//! Engine configuration from the environment.
//!
//! Every value has a default. A variable that is set but does not parse is
//! logged and replaced by its default rather than aborting startup.

use std::str::FromStr;
use std::time::Duration;

use roster_domain::value_objects::{NamePolicy, DEFAULT_NAME_MAX_LENGTH, DEFAULT_NAME_MIN_LENGTH};

use crate::infrastructure::character_cache::{CacheTtl, DEFAULT_CACHE_PREFIX};
use crate::infrastructure::event_publisher::PublishConfig;

pub const DEFAULT_DB_PATH: &str = "./data/characters.db";
pub const DEFAULT_MAX_PER_OWNER: u32 = 5;
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub db_path: String,
    pub max_per_owner: u32,
    pub name_policy: NamePolicy,
    pub cache_enabled: bool,
    pub cache_prefix: String,
    pub cache_ttl: CacheTtl,
    pub cache_sweep_interval: Duration,
    /// How long a selection counts as current. Follows the selected-character TTL unless set.
    pub selection_window: Duration,
    pub publish: PublishConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            max_per_owner: DEFAULT_MAX_PER_OWNER,
            name_policy: NamePolicy::default(),
            cache_enabled: true,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            cache_ttl: CacheTtl::default(),
            cache_sweep_interval: DEFAULT_SWEEP_INTERVAL,
            selection_window: CacheTtl::default().selected_character,
            publish: PublishConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let ttl = defaults.cache_ttl;
        let secs = |key: &str, default: Duration| {
            Duration::from_secs(parse_or(&lookup, key, default.as_secs()))
        };

        let selected_character =
            secs("CHARACTER_CACHE_TTL_SELECTED_SECS", ttl.selected_character);

        let name_policy = NamePolicy {
            min_length: parse_or(&lookup, "CHARACTER_NAME_MIN", DEFAULT_NAME_MIN_LENGTH),
            max_length: parse_or(&lookup, "CHARACTER_NAME_MAX", DEFAULT_NAME_MAX_LENGTH),
        };
        let name_policy = if name_policy.min_length > name_policy.max_length {
            tracing::warn!(
                min = name_policy.min_length,
                max = name_policy.max_length,
                "Name length bounds are inverted, using defaults"
            );
            NamePolicy::default()
        } else {
            name_policy
        };

        Self {
            db_path: lookup("CHARACTER_DB").unwrap_or(defaults.db_path),
            max_per_owner: parse_or(&lookup, "CHARACTER_MAX_PER_OWNER", defaults.max_per_owner),
            name_policy,
            cache_enabled: parse_or(&lookup, "CHARACTER_CACHE_ENABLED", defaults.cache_enabled),
            cache_prefix: lookup("CHARACTER_CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            cache_ttl: CacheTtl {
                character: secs("CHARACTER_CACHE_TTL_CHARACTER_SECS", ttl.character),
                character_list: secs("CHARACTER_CACHE_TTL_LIST_SECS", ttl.character_list),
                character_count: secs("CHARACTER_CACHE_TTL_COUNT_SECS", ttl.character_count),
                selected_character,
                appearance: secs("CHARACTER_CACHE_TTL_APPEARANCE_SECS", ttl.appearance),
                stats: secs("CHARACTER_CACHE_TTL_STATS_SECS", ttl.stats),
                position: secs("CHARACTER_CACHE_TTL_POSITION_SECS", ttl.position),
            },
            cache_sweep_interval: secs("CHARACTER_CACHE_SWEEP_SECS", defaults.cache_sweep_interval)
                .max(Duration::from_secs(1)),
            selection_window: secs("CHARACTER_SELECTION_WINDOW_SECS", selected_character),
            publish: PublishConfig {
                max_attempts: parse_or(
                    &lookup,
                    "CHARACTER_PUBLISH_MAX_ATTEMPTS",
                    defaults.publish.max_attempts,
                )
                .max(1),
                backoff_unit: Duration::from_millis(parse_or(
                    &lookup,
                    "CHARACTER_PUBLISH_BACKOFF_MS",
                    defaults.publish.backoff_unit.as_millis() as u64,
                )),
            },
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, ?default, "Invalid config value, using default");
                default
            }
        },
        None => default,
    }
}

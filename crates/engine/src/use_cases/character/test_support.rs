//! Mock wiring shared by the character use case tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use roster_domain::value_objects::{CharacterName, ClassType, Gender, NamePolicy, Race, SlotNumber};
use roster_domain::{Character, OwnerId};

use super::{CharacterDeps, CharacterPolicy, CharacterStores};
use crate::infrastructure::background::BackgroundPublisher;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::{
    MockAppearanceRepo, MockCharacterCache, MockCharacterRepo, MockEventPublisherPort,
    MockPositionRepo, MockStatsRepo, CacheKey,
};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub(super) fn thane(owner_id: OwnerId) -> Character {
    Character::new(
        owner_id,
        CharacterName::parse("Thane", &NamePolicy::default()).unwrap(),
        SlotNumber::new(1).unwrap(),
        ClassType::Warrior,
        Race::Dwarf,
        Gender::Male,
        fixed_now(),
    )
}

/// Unconfigured mocks; set expectations, then call [`Mocks::into_deps`].
pub(super) struct Mocks {
    pub characters: MockCharacterRepo,
    pub appearance: MockAppearanceRepo,
    pub stats: MockStatsRepo,
    pub positions: MockPositionRepo,
    pub cache: MockCharacterCache,
    pub publisher: MockEventPublisherPort,
    /// Every key the cold cache was asked to invalidate, in call order.
    pub invalidated: Arc<Mutex<Vec<CacheKey>>>,
}

impl Mocks {
    pub fn new() -> Self {
        Self {
            characters: MockCharacterRepo::new(),
            appearance: MockAppearanceRepo::new(),
            stats: MockStatsRepo::new(),
            positions: MockPositionRepo::new(),
            cache: MockCharacterCache::new(),
            publisher: MockEventPublisherPort::new(),
            invalidated: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Cache that misses on every read and accepts every write and invalidation.
    pub fn with_cold_cache(mut self) -> Self {
        self.cache.expect_get_character().returning(|_| Ok(None));
        self.cache.expect_set_character().returning(|_| Ok(()));
        self.cache.expect_get_character_list().returning(|_| Ok(None));
        self.cache.expect_set_character_list().returning(|_, _| Ok(()));
        self.cache.expect_get_character_count().returning(|_| Ok(None));
        self.cache.expect_set_character_count().returning(|_, _| Ok(()));
        self.cache.expect_get_selected_character().returning(|_| Ok(None));
        self.cache.expect_set_selected_character().returning(|_, _| Ok(()));
        self.cache.expect_get_appearance().returning(|_| Ok(None));
        self.cache.expect_set_appearance().returning(|_| Ok(()));
        self.cache.expect_get_stats().returning(|_| Ok(None));
        self.cache.expect_set_stats().returning(|_| Ok(()));
        self.cache.expect_get_position().returning(|_| Ok(None));
        self.cache.expect_set_position().returning(|_| Ok(()));
        let invalidated = self.invalidated.clone();
        self.cache.expect_invalidate().returning(move |keys| {
            invalidated.lock().unwrap().extend_from_slice(keys);
            Ok(())
        });
        self
    }

    pub fn into_deps(self) -> CharacterDeps {
        let publisher = Arc::new(self.publisher);
        CharacterDeps {
            stores: CharacterStores {
                characters: Arc::new(self.characters),
                appearance: Arc::new(self.appearance),
                stats: Arc::new(self.stats),
                positions: Arc::new(self.positions),
            },
            cache: Arc::new(self.cache),
            publisher: publisher.clone(),
            background: BackgroundPublisher::new(publisher),
            clock: Arc::new(FixedClock(fixed_now())),
            policy: CharacterPolicy::default(),
        }
    }
}

//! Appearance customization.

use roster_domain::{Appearance, CharacterEvent, CharacterId};
use roster_shared::UpdateAppearanceRequest;

use super::conversions::appearance_patch;
use super::{CharacterDeps, CharacterError};
use crate::infrastructure::ports::CacheKey;

pub struct AppearanceOps {
    deps: CharacterDeps,
}

impl AppearanceOps {
    pub fn new(deps: CharacterDeps) -> Self {
        Self { deps }
    }

    /// Apply the fields present in `request`. An empty request returns the
    /// current appearance without writing.
    pub async fn update(
        &self,
        id: CharacterId,
        request: UpdateAppearanceRequest,
    ) -> Result<Appearance, CharacterError> {
        let patch = appearance_patch(request)?;
        let character = self.deps.load_active(id).await?;
        let mut appearance = self
            .deps
            .stores
            .appearance
            .get(id)
            .await?
            .ok_or(CharacterError::RecordNotFound {
                kind: "Appearance",
                id,
            })?;

        if patch.is_empty() {
            return Ok(appearance);
        }

        let changed = appearance.apply(patch);
        appearance.validate()?;
        appearance.updated_at = self.deps.clock.now();
        self.deps.stores.appearance.update(&appearance).await?;

        tracing::debug!(character_id = %id, changed = ?changed, "Appearance updated");

        self.deps.invalidate(&[CacheKey::Appearance(id)]).await;
        self.deps
            .publish(
                &character,
                CharacterEvent::AppearanceUpdated {
                    changed_fields: changed.into_iter().map(str::to_string).collect(),
                    reason: None,
                },
            )
            .await;
        Ok(appearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::character::test_support::{fixed_now, thane, Mocks};
    use roster_domain::value_objects::{Gender, Race};
    use roster_domain::{EventId, OwnerId};
    use roster_shared::AppearanceOptions;

    fn with_character(mocks: &mut Mocks) -> CharacterId {
        let character = thane(OwnerId::new());
        let id = character.id();
        mocks
            .characters
            .expect_get()
            .returning(move |_| Ok(Some(character.clone())));
        mocks.appearance.expect_get().returning(|id| {
            Ok(Some(Appearance::for_character(
                id,
                Race::Dwarf,
                Gender::Male,
                fixed_now(),
            )))
        });
        id
    }

    #[tokio::test]
    async fn changed_fields_are_written_and_announced() {
        let mut mocks = Mocks::new().with_cold_cache();
        let id = with_character(&mut mocks);
        mocks
            .appearance
            .expect_update()
            .withf(|a| a.hair_style == 12)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| {
                matches!(event, CharacterEvent::AppearanceUpdated { changed_fields, .. }
                    if changed_fields == &vec!["hair_style".to_string()])
            })
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));
        let invalidated = mocks.invalidated.clone();

        let ops = AppearanceOps::new(mocks.into_deps());
        let request = UpdateAppearanceRequest {
            options: AppearanceOptions {
                hair_style: Some(12),
                ..AppearanceOptions::default()
            },
            ..UpdateAppearanceRequest::default()
        };
        let appearance = ops.update(id, request).await.unwrap();

        assert_eq!(appearance.hair_style, 12);
        assert_eq!(*invalidated.lock().unwrap(), vec![CacheKey::Appearance(id)]);
    }

    #[tokio::test]
    async fn empty_request_writes_nothing() {
        let mut mocks = Mocks::new();
        let id = with_character(&mut mocks);
        mocks.appearance.expect_update().never();
        mocks.cache.expect_invalidate().never();
        mocks.publisher.expect_publish().never();

        let ops = AppearanceOps::new(mocks.into_deps());
        let appearance = ops
            .update(id, UpdateAppearanceRequest::default())
            .await
            .unwrap();
        assert_eq!(appearance.character_id, id);
    }

    #[tokio::test]
    async fn invalid_color_is_rejected_before_writing() {
        let mut mocks = Mocks::new();
        let id = with_character(&mut mocks);
        mocks.appearance.expect_update().never();

        let ops = AppearanceOps::new(mocks.into_deps());
        let request = UpdateAppearanceRequest {
            options: AppearanceOptions {
                skin_color: Some("beige".to_string()),
                ..AppearanceOptions::default()
            },
            ..UpdateAppearanceRequest::default()
        };
        let err = ops.update(id, request).await.unwrap_err();
        assert_eq!(err.code(), "validation");
    }
}

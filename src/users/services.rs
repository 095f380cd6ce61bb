use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::ProfileUpdate;
use crate::{
    api::{
        upload::UploadedFile,
        validation::{check, single},
    },
    auth::{
        repo::UserStore,
        repo_types::{User, UserPatch},
    },
    images::services::store_profile_image,
    state::AppState,
    store::{fetch_required, update_owned, Repository, ResourceError},
};

pub async fn list(st: &AppState) -> Result<Vec<User>, ResourceError> {
    Ok(st.users.fetch_all().await?)
}

pub async fn get(st: &AppState, id: Uuid) -> Result<User, ResourceError> {
    fetch_required::<User, _>(st.users.as_ref(), id).await
}

pub async fn search(st: &AppState, query: &str) -> Result<Vec<User>, ResourceError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ResourceError::Validation(single("query", "is required")));
    }
    Ok(st.users.search(query).await?)
}

/// Applies the fields that were sent and keeps the rest. A new image is
/// uploaded before the row is touched.
#[instrument(skip(st, update, image))]
pub async fn update_profile(
    st: &AppState,
    user_id: Uuid,
    update: ProfileUpdate,
    image: Option<UploadedFile>,
) -> Result<User, ResourceError> {
    let update = ProfileUpdate {
        username: update.username.map(|u| u.trim().to_string()),
        bio: update.bio,
    };
    check(&update).map_err(|errors| {
        warn!(?errors, "invalid profile update");
        ResourceError::Validation(errors)
    })?;

    let image_url = match image {
        Some(file) => Some(store_profile_image(st.storage.as_ref(), user_id, file).await?),
        None => None,
    };
    let patch = UserPatch {
        username: update.username,
        bio: update.bio,
        image_url,
    };
    let user = update_owned::<User, _>(st.users.as_ref(), user_id, user_id, patch).await?;
    info!(user_id = %user.id, "profile updated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::fake_state;
    use bytes::Bytes;

    async fn seed_user(st: &AppState) -> User {
        let mut user = User::new("alice".into(), "alice@x.com".into(), "hash".into());
        user.bio = Some("old bio".into());
        st.users.create(user).await.unwrap()
    }

    #[tokio::test]
    async fn absent_fields_keep_previous_values() {
        let (st, _) = fake_state();
        let user = seed_user(&st).await;
        let updated = update_profile(
            &st,
            user.id,
            ProfileUpdate {
                username: Some("  alice2 ".into()),
                bio: None,
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.bio.as_deref(), Some("old bio"));
        assert_eq!(updated.image_url, None);
    }

    #[tokio::test]
    async fn empty_bio_clears_it() {
        let (st, _) = fake_state();
        let user = seed_user(&st).await;
        let updated = update_profile(
            &st,
            user.id,
            ProfileUpdate {
                username: None,
                bio: Some(String::new()),
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(updated.bio.as_deref(), Some(""));
        assert_eq!(updated.username, "alice");
    }

    #[tokio::test]
    async fn image_is_stored_under_user_prefix() {
        let (st, fakes) = fake_state();
        let user = seed_user(&st).await;
        let image = UploadedFile {
            file_name: "me.png".into(),
            content_type: "image/png".into(),
            body: Bytes::from_static(b"png"),
        };
        let updated = update_profile(&st, user.id, ProfileUpdate::default(), Some(image))
            .await
            .unwrap();
        let key = format!("profile/{}/me.png", user.id);
        assert_eq!(fakes.storage.keys(), vec![key.clone()]);
        assert_eq!(updated.image_url, Some(format!("https://fake.local/{key}")));
    }

    #[tokio::test]
    async fn short_username_is_rejected_before_upload() {
        let (st, fakes) = fake_state();
        let user = seed_user(&st).await;
        let image = UploadedFile {
            file_name: "me.png".into(),
            content_type: "image/png".into(),
            body: Bytes::from_static(b"png"),
        };
        let err = update_profile(
            &st,
            user.id,
            ProfileUpdate {
                username: Some("ab".into()),
                bio: None,
            },
            Some(image),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResourceError::Validation(e) if e.contains_key("username")));
        assert!(fakes.storage.keys().is_empty());
    }

    #[tokio::test]
    async fn search_requires_query() {
        let (st, _) = fake_state();
        seed_user(&st).await;
        assert!(matches!(search(&st, "").await, Err(ResourceError::Validation(_))));
        assert_eq!(search(&st, "ALI").await.unwrap().len(), 1);
    }
}

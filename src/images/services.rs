use anyhow::Context;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    api::{upload::UploadedFile, validation::single},
    storage::StorageClient,
    store::ResourceError,
};

/// Stores a profile picture under `profile/{user_id}/` and returns its URL.
#[instrument(skip(storage, file), fields(file_name = %file.file_name))]
pub async fn store_profile_image(
    storage: &dyn StorageClient,
    user_id: Uuid,
    file: UploadedFile,
) -> Result<String, ResourceError> {
    let key = format!("profile/{}/{}", user_id, file.file_name);
    store(storage, key, file).await
}

/// Stores a post image; the random prefix keeps repeated names apart.
#[instrument(skip(storage, file), fields(file_name = %file.file_name))]
pub async fn store_post_image(
    storage: &dyn StorageClient,
    user_id: Uuid,
    file: UploadedFile,
) -> Result<String, ResourceError> {
    let key = format!("posts/{}/{}-{}", user_id, Uuid::new_v4(), file.file_name);
    store(storage, key, file).await
}

async fn store(
    storage: &dyn StorageClient,
    key: String,
    file: UploadedFile,
) -> Result<String, ResourceError> {
    if ext_from_mime(&file.content_type).is_none() {
        warn!(content_type = %file.content_type, "rejected non-image upload");
        return Err(ResourceError::Validation(single("image", "must be an image")));
    }
    storage
        .put_object(&key, file.body, &file.content_type)
        .await
        .with_context(|| format!("put_object {key}"))?;
    info!(key = %key, "image stored");
    Ok(storage.object_url(&key))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

#[cfg(test)]
mod image_tests {
    use super::*;
    use crate::state::tests::FakeStorage;
    use bytes::Bytes;

    fn file(name: &str, content_type: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.into(),
            content_type: content_type.into(),
            body: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("image/gif"), Some("gif"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime("whatever/else"), None);
    }

    #[tokio::test]
    async fn profile_image_is_scoped_to_user() {
        let storage = FakeStorage::default();
        let user_id = Uuid::new_v4();
        let url = store_profile_image(&storage, user_id, file("me.png", "image/png"))
            .await
            .unwrap();
        assert_eq!(url, format!("https://fake.local/profile/{user_id}/me.png"));
        assert_eq!(storage.keys(), vec![format!("profile/{user_id}/me.png")]);
    }

    #[tokio::test]
    async fn post_images_get_unique_keys() {
        let storage = FakeStorage::default();
        let user_id = Uuid::new_v4();
        let a = store_post_image(&storage, user_id, file("pic.jpg", "image/jpeg")).await.unwrap();
        let b = store_post_image(&storage, user_id, file("pic.jpg", "image/jpeg")).await.unwrap();
        assert_ne!(a, b);
        assert!(a.contains(&format!("posts/{user_id}/")));
        assert!(a.ends_with("-pic.jpg"));
    }

    #[tokio::test]
    async fn rejects_non_images_without_storing() {
        let storage = FakeStorage::default();
        let err = store_profile_image(&storage, Uuid::new_v4(), file("x.txt", "text/plain"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Validation(_)));
        assert!(storage.keys().is_empty());
    }
}

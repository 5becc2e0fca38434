//! # Object storage for recipe images
//!
//! [`upload_image`] validates a picked file, names it uniquely and hands it to an
//! [`ObjectStorage`] backend. Objects in the default bucket are publicly
//! readable, so the returned URL can be stored in `recipe_images` as-is.
//!
//! | Backend | Target |
//! |---------|--------|
//! | [`RestStorage`] | `/storage/v1/object/<bucket>/<path>` on the hosted backend |
//! | [`MemoryStorage`] | in-process map, for tests |

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use store::models::ImageRef;

use crate::config::BackendConfig;
use crate::error::{error_message, ApiError, ApiResult};
use crate::gateway::AccessToken;
use crate::token::{random_string, LOWER_ALNUM};

pub const DEFAULT_BUCKET: &str = "recipe-images";
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const RANDOM_NAME_LEN: usize = 11;

pub trait ObjectStorage {
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl std::future::Future<Output = ApiResult<()>>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub storage_path: String,
}

impl From<UploadedImage> for ImageRef {
    fn from(image: UploadedImage) -> Self {
        ImageRef {
            url: image.url,
            storage_path: image.storage_path,
        }
    }
}

fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// MIME type for a file name, from its extension.
pub fn guess_content_type(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Validate and upload an image, returning its public URL and storage path.
pub async fn upload_image(
    storage: &impl ObjectStorage,
    bucket: &str,
    file_name: &str,
    bytes: Vec<u8>,
) -> ApiResult<UploadedImage> {
    let content_type = guess_content_type(file_name);
    if !content_type.starts_with("image/") {
        return Err(ApiError::Validation("Please upload an image file".into()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::Validation("Image must be less than 5MB".into()));
    }

    let ext = extension(file_name).unwrap_or_default();
    let storage_path = format!(
        "{}_{}.{ext}",
        random_string(LOWER_ALNUM, RANDOM_NAME_LEN),
        store::current_millis()
    );
    storage.upload(bucket, &storage_path, bytes, content_type).await?;
    tracing::info!(%bucket, path = %storage_path, "uploaded image");

    Ok(UploadedImage {
        url: storage.public_url(bucket, &storage_path),
        storage_path,
    })
}

/// Hosted storage API client. Uploads are authorised with the signed-in
/// user's token.
#[derive(Clone, Debug)]
pub struct RestStorage {
    client: reqwest::Client,
    config: BackendConfig,
    token: AccessToken,
}

impl RestStorage {
    pub fn new(config: BackendConfig, token: AccessToken) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token,
        }
    }
}

impl ObjectStorage for RestStorage {
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> ApiResult<()> {
        let bearer = self
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .unwrap_or_else(|| self.config.anon_key.clone());
        let resp = self
            .client
            .post(self.config.endpoint(&format!("storage/v1/object/{bucket}/{path}")))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.config
            .endpoint(&format!("storage/v1/object/public/{bucket}/{path}"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process storage keyed by `bucket/path`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.objects().get(&format!("{bucket}/{path}")).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStorage for MemoryStorage {
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> ApiResult<()> {
        let key = format!("{bucket}/{path}");
        let mut objects = self.objects();
        if objects.contains_key(&key) {
            return Err(ApiError::Status {
                status: 409,
                message: "The resource already exists".into(),
            });
        }
        objects.insert(
            key,
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_image() {
        let storage = MemoryStorage::new();
        let uploaded = upload_image(&storage, DEFAULT_BUCKET, "Pancakes.JPG", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(uploaded.storage_path.ends_with(".jpg"));
        let (random, rest) = uploaded.storage_path.split_once('_').unwrap();
        assert_eq!(random.len(), RANDOM_NAME_LEN);
        assert!(rest.trim_end_matches(".jpg").parse::<i64>().is_ok());
        assert_eq!(
            uploaded.url,
            format!("memory://{DEFAULT_BUCKET}/{}", uploaded.storage_path)
        );

        let object = storage.object(DEFAULT_BUCKET, &uploaded.storage_path).unwrap();
        assert_eq!(object.content_type, "image/jpeg");
        assert_eq!(object.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_images_and_large_files() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            upload_image(&storage, DEFAULT_BUCKET, "notes.txt", vec![0]).await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            upload_image(&storage, DEFAULT_BUCKET, "huge.png", vec![0; MAX_IMAGE_BYTES + 1]).await,
            Err(ApiError::Validation(_))
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_content_types_and_public_url() {
        assert_eq!(guess_content_type("a.webp"), "image/webp");
        assert_eq!(guess_content_type("noext"), "application/octet-stream");
        let rest = RestStorage::new(
            BackendConfig::new("https://abc.supabase.co", "anon"),
            AccessToken::default(),
        );
        assert_eq!(
            rest.public_url(DEFAULT_BUCKET, "x.png"),
            "https://abc.supabase.co/storage/v1/object/public/recipe-images/x.png"
        );
    }
}

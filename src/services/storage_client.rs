// src/services/storage_client.rs
// DOCUMENTATION: Object storage client for the managed backend
// PURPOSE: Store uploaded images in a bucket and hand back their public URLs

use crate::errors::HotspotError;
use async_trait::async_trait;
use reqwest::Client;

/// A bucket of binary blobs addressed by path
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `path` and return the durable public URL
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, HotspotError>;
}

/// Storage API client
/// DOCUMENTATION: Talks to the backend's `/storage/v1` REST API with the service key
pub struct StorageClient {
    /// HTTP client for making requests
    client: Client,
    /// Backend base URL, without trailing slash
    base_url: String,
    /// Service key, sent both as `apikey` and as bearer token
    api_key: String,
    /// Bucket receiving every upload
    bucket: String,
}

impl StorageClient {
    pub fn new(base_url: String, api_key: String, bucket: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
        }
    }

    /// Endpoint that accepts writes for `path`
    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    /// Public URL under which a stored object can be fetched
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, HotspotError> {
        let size = data.len();
        log::debug!(
            "Uploading {} bytes to {}/{} ({})",
            size,
            self.bucket,
            path,
            content_type
        );

        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| {
                log::error!("Storage upload request failed: {}", e);
                HotspotError::StorageError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Storage upload error {}: {}", status, body);
            return Err(HotspotError::StorageError(format!(
                "Upload error {}: {}",
                status, body
            )));
        }

        log::info!("Stored {} ({} bytes) in bucket {}", path, size, self.bucket);
        Ok(self.public_url(path))
    }
}

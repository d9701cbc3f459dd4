use reqwest::Client;
use tracing::{debug, error};
use url::Url;

use crate::dto::upload_dto::Blob;
use crate::error::{Error, Result};
use crate::services::endpoint;

/// Object storage half of the data service: blob upload and public URLs.
#[derive(Clone)]
pub struct StorageService {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl StorageService {
    pub fn new(client: Client, base_url: Url, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub fn public_url(&self, bucket: &str, name: &str) -> Result<Url> {
        endpoint(
            &self.base_url,
            &["storage", "v1", "object", "public", bucket, name],
        )
    }

    /// Stores `blob` as `bucket/name` and returns its public URL.
    pub async fn upload(&self, token: &str, bucket: &str, name: &str, blob: &Blob) -> Result<Url> {
        let url = endpoint(&self.base_url, &["storage", "v1", "object", bucket, name])?;
        debug!(bucket, name, bytes = blob.data.len(), "uploading object");

        let resp = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .header("Content-Type", &blob.content_type)
            .body(blob.data.clone())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(bucket, name, status = status.as_u16(), "object upload failed");
            return Err(Error::RemoteOperationFailed(format!(
                "upload to {} failed with status {}: {}",
                bucket,
                status.as_u16(),
                body
            )));
        }

        self.public_url(bucket, name)
    }
}

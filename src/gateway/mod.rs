//! Edge-detection API client
//!
//! Thin typed wrapper over the two submission endpoints plus the variant URL
//! builder. Holds no state between calls beyond the connection pool.

use crate::archive::Archive;
use crate::error::{EdgeClientError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use xray_edge_common::endpoint::{
    endpoint_url, resolve_variant_url, BATCH_EDGE_DETECT_PATH, EDGE_DETECT_PATH, UPLOAD_FIELD,
};
use xray_edge_common::{BatchResponse, ProcessingResult, SelectedFile, Variant, VariantUrlResolver};

pub const SINGLE_FAILURE_MESSAGE: &str = "Failed to process image";
pub const BATCH_FAILURE_MESSAGE: &str = "Batch processing failed";

/// Submission operations the upload controller depends on.
#[async_trait]
pub trait EdgeDetectApi: Send + Sync {
    async fn submit_single(&self, file: &SelectedFile) -> Result<ProcessingResult>;

    async fn submit_batch(&self, archive: &Archive) -> Result<BatchResponse>;
}

#[derive(Debug, Clone)]
pub struct EdgeApiClient {
    http: Client,
    base_url: String,
}

impl EdgeApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the rendered bytes of one variant.
    pub async fn fetch_variant(&self, image_id: &str, variant: Variant) -> Result<Vec<u8>> {
        let url = self.variant_url(image_id, variant);
        tracing::debug!(%url, "fetching variant");
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn post_upload<T: DeserializeOwned>(
        &self,
        path: &str,
        part: Part,
        message_key: &str,
        fallback: &str,
    ) -> Result<T> {
        let url = endpoint_url(&self.base_url, path);
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::info!(%url, "submitting");
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "transport failure");
                EdgeClientError::Request(format!("{}: {}", fallback, e))
            })?;

        let status = response.status();
        tracing::info!(%url, %status, "response received");

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(EdgeClientError::Request(failure_message(&body, message_key, fallback)));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| EdgeClientError::MalformedResponse(e.to_string()))
    }
}

/// Server-supplied message under `key`, or `fallback`.
pub fn failure_message(body: &[u8], key: &str, fallback: &str) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get(key))
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
impl EdgeDetectApi for EdgeApiClient {
    async fn submit_single(&self, file: &SelectedFile) -> Result<ProcessingResult> {
        let part = Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        self.post_upload(EDGE_DETECT_PATH, part, "detail", SINGLE_FAILURE_MESSAGE)
            .await
    }

    async fn submit_batch(&self, archive: &Archive) -> Result<BatchResponse> {
        let part = Part::bytes(archive.bytes.clone())
            .file_name(archive.name.clone())
            .mime_str(&archive.media_type)?;
        self.post_upload(BATCH_EDGE_DETECT_PATH, part, "error", BATCH_FAILURE_MESSAGE)
            .await
    }
}

impl VariantUrlResolver for EdgeApiClient {
    fn variant_url(&self, image_id: &str, variant: Variant) -> String {
        resolve_variant_url(&self.base_url, image_id, variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_from_detail() {
        let body = br#"{"detail": "Invalid image file"}"#;
        assert_eq!(failure_message(body, "detail", SINGLE_FAILURE_MESSAGE), "Invalid image file");
    }

    #[test]
    fn test_failure_message_wrong_key_falls_back() {
        let body = br#"{"error": "Only ZIP files supported"}"#;
        assert_eq!(failure_message(body, "detail", SINGLE_FAILURE_MESSAGE), SINGLE_FAILURE_MESSAGE);
        assert_eq!(failure_message(body, "error", BATCH_FAILURE_MESSAGE), "Only ZIP files supported");
    }

    #[test]
    fn test_failure_message_non_string_or_garbage() {
        // validation errors carry a list under "detail"
        let body = br#"{"detail": [{"msg": "field required"}]}"#;
        assert_eq!(failure_message(body, "detail", SINGLE_FAILURE_MESSAGE), SINGLE_FAILURE_MESSAGE);
        assert_eq!(failure_message(b"<html>502</html>", "error", BATCH_FAILURE_MESSAGE), BATCH_FAILURE_MESSAGE);
        assert_eq!(failure_message(b"", "detail", SINGLE_FAILURE_MESSAGE), SINGLE_FAILURE_MESSAGE);
    }

    #[test]
    fn test_variant_url_uses_injected_base() {
        let client = EdgeApiClient::with_client(Client::new(), "http://fixture:9000/");
        assert_eq!(client.base_url(), "http://fixture:9000");
        assert_eq!(client.variant_url("abc", Variant::Fuzzy), "http://fixture:9000/image/abc/fuzzy");
    }
}

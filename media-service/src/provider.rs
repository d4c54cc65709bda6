use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Credentials;
use crate::models::{DeleteMediaResponse, MediaAsset, ResourceType};
use crate::signing::{sign_params, Params};

/// Page size for folder listings.
pub const LIST_MAX_RESULTS: u32 = 30;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("media host request failed: {0}")]
    Http(String),

    #[error("media host responded with {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("could not decode media host response: {0}")]
    Decode(String),
}

/// The calls the proxy forwards to the media host on the caller's behalf.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn destroy(
        &self,
        credentials: &Credentials,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<DeleteMediaResponse, ProviderError>;

    async fn list(
        &self,
        credentials: &Credentials,
        folder: &str,
        resource_type: ResourceType,
    ) -> Result<Vec<MediaAsset>, ProviderError>;
}

/// Cloudinary REST client.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct ListResourcesBody {
    #[serde(default)]
    resources: Vec<MediaAsset>,
}

impl CloudinaryClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, cloud_name: &str, path: &str) -> String {
        format!("{}/v1_1/{}/{}", self.api_base, cloud_name, path)
    }
}

#[async_trait]
impl MediaProvider for CloudinaryClient {
    async fn destroy(
        &self,
        credentials: &Credentials,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<DeleteMediaResponse, ProviderError> {
        let mut params = Params::new();
        params.insert("public_id".to_string(), public_id.to_string());
        params.insert("timestamp".to_string(), Utc::now().timestamp().to_string());
        let signature = sign_params(&params, &credentials.api_secret);
        params.insert("api_key".to_string(), credentials.api_key.clone());
        params.insert("signature".to_string(), signature);

        let url = self.url(
            &credentials.cloud_name,
            &format!("{}/destroy", resource_type.as_str()),
        );
        info!("Destroying asset public_id={} ({})", public_id, resource_type);

        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        read_json(response).await
    }

    async fn list(
        &self,
        credentials: &Credentials,
        folder: &str,
        resource_type: ResourceType,
    ) -> Result<Vec<MediaAsset>, ProviderError> {
        let url = self.url(
            &credentials.cloud_name,
            &format!("resources/{}/upload", resource_type.as_str()),
        );
        // Trailing slash keeps "weddings/ana" from matching "weddings/anabel"
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        let max_results = LIST_MAX_RESULTS.to_string();
        debug!("Listing {} assets under prefix={}", resource_type, prefix);

        let response = self
            .http
            .get(&url)
            .basic_auth(&credentials.api_key, Some(&credentials.api_secret))
            .query(&[
                ("prefix", prefix.as_str()),
                ("max_results", max_results.as_str()),
                ("tags", "true"),
                ("context", "true"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let body: ListResourcesBody = read_json(response).await?;
        info!("Listed {} asset(s) under {}", body.resources.len(), prefix);
        Ok(body.resources)
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ProviderError::Rejected {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

/// The host reports failures as `{"error": {"message": ...}}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

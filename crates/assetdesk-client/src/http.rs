//! HTTP client for the asset registry REST endpoints.

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use assetdesk_core::{Asset, AssetDraft, AssetId};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP client for REST API endpoints.
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client for the configured backend.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base_url)
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the backend is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "Checking health");

        let response = self.inner.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// `GET /assets/`
    pub async fn list_assets(&self) -> Result<Vec<Asset>, ClientError> {
        self.get_json("/assets/", "Failed to fetch assets").await
    }

    /// `GET /assets/{id}`
    pub async fn get_asset(&self, id: &AssetId) -> Result<Asset, ClientError> {
        self.get_json(&format!("/assets/{}", id), "Failed to fetch asset")
            .await
    }

    /// `POST /assets/`
    pub async fn create_asset(&self, draft: &AssetDraft) -> Result<Asset, ClientError> {
        self.send_json(Method::POST, "/assets/", draft, "Failed to create asset")
            .await
    }

    /// `PUT /assets/{id}`
    pub async fn update_asset(
        &self,
        id: &AssetId,
        draft: &AssetDraft,
    ) -> Result<Asset, ClientError> {
        self.send_json(
            Method::PUT,
            &format!("/assets/{}", id),
            draft,
            "Failed to update asset",
        )
        .await
    }

    /// `DELETE /assets/{id}`
    pub async fn delete_asset(&self, id: &AssetId) -> Result<(), ClientError> {
        let path = format!("/assets/{}", id);
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "DELETE request");

        let response = self.inner.delete(&url).send().await?;
        check_status(response, &path, "Failed to delete asset")?;
        Ok(())
    }

    /// Get JSON from an endpoint.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET request");

        let response = self.inner.get(&url).send().await?;
        decode(check_status(response, path, context)?).await
    }

    /// Send a JSON body and decode the JSON reply.
    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, method = %method, "JSON request");

        let response = self.inner.request(method, &url).json(body).send().await?;
        decode(check_status(response, path, context)?).await
    }
}

fn check_status(response: Response, path: &str, context: &str) -> Result<Response, ClientError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(path.to_string())),
        status => Err(ClientError::Status {
            status,
            context: context.to_string(),
        }),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Serialization(e.to_string()))
}

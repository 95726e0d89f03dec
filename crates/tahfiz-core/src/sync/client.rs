//! HTTP client for the remote snapshot store.
//!
//! The server is a dumb snapshot holder: pull returns the latest uploaded
//! snapshot, push replaces it. All merging happens client-side.

use log::debug;
use reqwest::StatusCode;
use url::Url;

use crate::sync::types::{ProgressSnapshot, PullResponse, SyncError};

/// Header carrying the pushing device's identity.
const DEVICE_HEADER: &str = "x-tahfiz-device";

/// Async client for the sync endpoints.
pub struct SyncClient {
    http: reqwest::Client,
    endpoint: Url,
    auth_token: String,
    device_id: Option<String>,
}

impl SyncClient {
    /// Build a client for `<server_url>/v1/progress`.
    pub fn new(server_url: &str, auth_token: impl Into<String>) -> Result<Self, SyncError> {
        let base = Url::parse(server_url).map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
        let endpoint = base
            .join("v1/progress")
            .map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            auth_token: auth_token.into(),
            device_id: None,
        })
    }

    /// Attach a device id, sent with every request for provenance.
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Fetch the remote snapshot.
    pub async fn pull(&self) -> Result<PullResponse, SyncError> {
        debug!("pulling snapshot from {}", self.endpoint);
        let mut request = self
            .http
            .get(self.endpoint.clone())
            .bearer_auth(&self.auth_token);
        if let Some(device_id) = &self.device_id {
            request = request.header(DEVICE_HEADER, device_id);
        }
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SyncError::Unauthorized),
            status => Err(SyncError::Http(status.as_u16())),
        }
    }

    /// Upload a full snapshot as the new remote state. The payload is
    /// always complete, so a retried push is naturally idempotent.
    pub async fn push(&self, snapshot: &ProgressSnapshot) -> Result<(), SyncError> {
        debug!(
            "pushing snapshot ({} items) to {}",
            snapshot.items.len(),
            self.endpoint
        );
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.auth_token)
            .json(snapshot);
        if let Some(device_id) = &self.device_id {
            request = request.header(DEVICE_HEADER, device_id);
        }
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SyncError::Unauthorized),
            status => Err(SyncError::Http(status.as_u16())),
        }
    }
}

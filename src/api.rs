use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{
    BackupsPayload, Client as BackupClient, ClientBackups, GenerateInstallerPayload,
    UsedSpacePayload,
};

pub const DEFAULT_API_URL: &str = "http://storage.symplissime.fr:55417";

/// Matches the read timeout configured on the service side.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport failure taxonomy. Every remote call resolves to a value of
/// this type; nothing past this boundary panics or throws.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Erreur réseau")]
    Network,
    #[error("Délai d'attente dépassé")]
    Timeout,
    #[error("Erreur serveur ({status})")]
    Http { status: u16, detail: Option<String> },
    #[error("Réponse invalide du serveur")]
    Malformed,
    /// Server-reported error, e.g. the `error` field of a backups payload.
    #[error("{0}")]
    Application(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Malformed
        } else {
            ApiError::Network
        }
    }
}

#[mockall::automock]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<BackupClient>, ApiError>;
    async fn used_space(&self, client_id: &str) -> Result<Option<u64>, ApiError>;
    async fn client_backups(&self, client_id: &str) -> Result<ClientBackups, ApiError>;
    async fn generate_installer(
        &self,
        client_name: &str,
        group: &str,
    ) -> Result<String, ApiError>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                detail: None,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ApiClientTrait for ApiClient {
    async fn list_clients(&self) -> Result<Vec<BackupClient>, ApiError> {
        self.get_json("/clients").await
    }

    async fn used_space(&self, client_id: &str) -> Result<Option<u64>, ApiError> {
        let payload: UsedSpacePayload = self
            .get_json(&format!("/client/{}/used_space", client_id))
            .await?;
        Ok(payload.used_bytes)
    }

    async fn client_backups(&self, client_id: &str) -> Result<ClientBackups, ApiError> {
        let payload: BackupsPayload = self.get_json(&format!("/backups/{}", client_id)).await?;

        if let Some(message) = payload.error {
            return Err(ApiError::Application(message));
        }

        Ok(ClientBackups {
            file_backups: payload.file_backups.unwrap_or_default(),
            image_backups: payload.image_backups.unwrap_or_default(),
        })
    }

    async fn generate_installer(
        &self,
        client_name: &str,
        group: &str,
    ) -> Result<String, ApiError> {
        let form = [("client_name", client_name), ("group", group)];
        let response = self
            .client
            .post(self.url("/generate_installer"))
            .timeout(REQUEST_TIMEOUT)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<GenerateInstallerPayload>()
                .await
                .ok()
                .and_then(|p| p.detail);
            return Err(ApiError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let payload: GenerateInstallerPayload = response.json().await?;
        payload.download_url.ok_or(ApiError::Malformed)
    }
}

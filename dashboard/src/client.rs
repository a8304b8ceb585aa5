//! Catalog API client
//!
//! Thin wrapper over the developer endpoints of the catalog server. Every
//! call is a single request/response pair; failures are reported once and
//! never retried.

use nebula_shared::{
    ApiErrorBody, App, AppSubmission, Developer, PromoteRequest, PromoteResponse, Stat,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;

#[derive(Error, Debug)]
pub enum ClientError {
    /// No response reached us (connection, TLS, timeout, truncated body).
    #[error("Сетевая ошибка: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("Ошибка: {status} {status_text}{}", server_suffix(.server_message))]
    Fetch {
        status: u16,
        status_text: String,
        server_message: Option<String>,
    },
    /// A 2xx body that is not the JSON we expected.
    #[error("Некорректный ответ сервера: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

fn server_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(" - {}", message),
        _ => String::new(),
    }
}

impl ClientError {
    fn from_status(status: StatusCode, body: &str) -> Self {
        let server_message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .map(|body| body.error);
        ClientError::Fetch {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            server_message,
        }
    }

    /// HTTP status for `Fetch` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for `/api/developer/...`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base: Url,
}

impl CatalogClient {
    /// Build a client for the configured server.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|_| ClientError::InvalidBaseUrl(config.base_url.clone()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { http, base })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/api/developer/{user_id}/{rest...}` with each segment escaped.
    fn endpoint(&self, user_id: &str, rest: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidBaseUrl(self.base.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["api", "developer", user_id])
                .extend(rest);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_status(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        tracing::debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    /// `GET /{userId}`
    pub async fn get_developer(&self, user_id: &str) -> Result<Developer, ClientError> {
        let url = self.endpoint(user_id, &[])?;
        self.send(self.request(Method::GET, url)).await
    }

    /// `GET /{userId}/stats`
    pub async fn get_stats(&self, user_id: &str) -> Result<Vec<Stat>, ClientError> {
        let url = self.endpoint(user_id, &["stats"])?;
        self.send(self.request(Method::GET, url)).await
    }

    /// `POST /{userId}/apps`
    pub async fn create_app(
        &self,
        user_id: &str,
        submission: &AppSubmission,
    ) -> Result<App, ClientError> {
        let url = self.endpoint(user_id, &["apps"])?;
        self.send(self.request(Method::POST, url).json(submission))
            .await
    }

    /// `PATCH /{userId}/apps/{appId}`
    pub async fn update_app(
        &self,
        user_id: &str,
        app_id: &str,
        submission: &AppSubmission,
    ) -> Result<App, ClientError> {
        let url = self.endpoint(user_id, &["apps", app_id])?;
        self.send(self.request(Method::PATCH, url).json(submission))
            .await
    }

    /// `POST /{userId}/promote`
    pub async fn promote(
        &self,
        user_id: &str,
        request: &PromoteRequest,
    ) -> Result<PromoteResponse, ClientError> {
        let url = self.endpoint(user_id, &["promote"])?;
        self.send(self.request(Method::POST, url).json(request)).await
    }
}

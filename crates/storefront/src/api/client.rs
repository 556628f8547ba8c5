//! HTTP client wrapper for the storefront REST API.
//!
//! One thin layer over `reqwest`: joins endpoint paths onto the configured
//! base URL, attaches the bearer token when the session store holds one, and
//! normalizes every failed response to a single human-readable message,
//! preferring server-supplied text. No retries; one fixed request timeout.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::session::TokenStore;

use super::decode::{self, DecodeError};
use super::ApiError;

/// Message used when a failed response carries no usable text.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Client for the storefront REST API.
///
/// Cheaply cloneable via `Arc`; every domain service holds a clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tidemark/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                // Normalize so path joining never doubles or drops a slash.
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
                tokens,
            }),
        })
    }

    /// Full URL for an endpoint path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// `GET` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// non-JSON body.
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.inner.http.get(self.endpoint(path))).await
    }

    /// `POST` a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// non-JSON body.
    pub async fn post(&self, path: &str, body: &impl Serialize) -> Result<Value, ApiError> {
        self.send(self.inner.http.post(self.endpoint(path)).json(body))
            .await
    }

    /// `PUT` a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// non-JSON body.
    pub async fn put(&self, path: &str, body: &impl Serialize) -> Result<Value, ApiError> {
        self.send(self.inner.http.put(self.endpoint(path)).json(body))
            .await
    }

    /// `POST` a multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// non-JSON body.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, ApiError> {
        self.send(self.inner.http.post(self.endpoint(path)).multipart(form))
            .await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let request = match self.inner.tokens.token() {
            Some(token) if !token.expose_secret().is_empty() => {
                request.bearer_auth(token.expose_secret())
            }
            _ => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(decode::error_message)
                .unwrap_or_else(|| GENERIC_ERROR.to_owned());
            tracing::warn!(%status, %message, "api request rejected");
            return Err(ApiError::Backend { status, message });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|source| {
            ApiError::Decode(DecodeError::Json {
                context: "response body".to_owned(),
                source,
            })
        })
    }
}

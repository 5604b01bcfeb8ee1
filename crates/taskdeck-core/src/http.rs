//! HTTP adapter for the tracking API.
//!
//! One network call per invocation: attach the bearer token from the
//! injected [`IdentityStore`], perform the request, and normalize any
//! failure into a single message with this precedence: server-provided
//! `message` field → transport error text → HTTP status text.
//!
//! The identity-clearing side effect lives here and nowhere else: a 401
//! or 403 on any call clears the stored session, as does a 404 on a
//! single-resource fetch. Slices never touch the store on the error path.

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::identity::IdentityStore;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Whether a 404 response clears the stored identity. Only
/// single-resource fetches carry that rule; list fetches and mutations
/// report 404 as an ordinary server error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Single,
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    identity: Arc<dyn IdentityStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, identity: Arc<dyn IdentityStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            identity,
        })
    }

    /// The injected identity collaborator, shared with the auth slice.
    pub fn identity(&self) -> &Arc<dyn IdentityStore> {
        &self.identity
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Typed request surface
    // -----------------------------------------------------------------------

    /// Fetch a list resource. A 404 here does not clear identity.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, None, Lookup::Other).await
    }

    /// Fetch a single resource; 404 clears the stored identity.
    pub async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, None, Lookup::Single).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, Some(body), Lookup::Other)
            .await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::PUT, path, Some(body), Lookup::Other)
            .await
    }

    /// DELETE with no response body expected.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.send(Method::DELETE, path, None).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.error_from_response(status, response, Lookup::Other).await)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        lookup: Lookup,
    ) -> Result<T> {
        let response = self.send(method, path, body).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?);
        }
        Err(self.error_from_response(status, response, lookup).await)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "dispatching request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = self.identity.load().and_then(|s| s.token) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn error_from_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        lookup: Lookup,
    ) -> ApiError {
        let message = match response.text().await {
            Ok(text) => serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| fallback_message(status)),
            Err(e) => e.to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.identity.clear();
                ApiError::Auth {
                    status: status.as_u16(),
                    message,
                }
            }
            StatusCode::NOT_FOUND if lookup == Lookup::Single => {
                self.identity.clear();
                ApiError::Server {
                    status: status.as_u16(),
                    message,
                }
            }
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

fn fallback_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("request failed: {} {}", status.as_u16(), reason),
        None => format!("request failed: {}", status.as_u16()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

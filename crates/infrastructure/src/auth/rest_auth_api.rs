//! REST auth endpoint client.
//!
//! Implements the `AuthApi` port against `POST /auth/refresh-token` and
//! `POST /auth/logout`. Runs on its own bare reqwest client, never through
//! the intercepted session transport, so a 401 from the refresh endpoint
//! itself cannot recurse into the refresh protocol.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use lumen_application::SessionConfig;
use lumen_application::ports::{AuthApi, AuthApiError};
use lumen_domain::TokenGrant;

/// Refresh/logout request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    refresh_token: &'a str,
}

/// Successful grant response from the refresh endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrantResponse {
    token: String,
    refresh_token: String,
    expires_in: u64,
}

/// Error response body shape.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// REST implementation of the auth endpoints.
pub struct RestAuthApi {
    client: Client,
    refresh_url: Url,
    logout_url: Url,
}

impl RestAuthApi {
    /// Creates an auth endpoint client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new(config: &SessionConfig) -> Result<Self, AuthApiError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            refresh_url: config.endpoint_url(&config.refresh_path),
            logout_url: config.endpoint_url(&config.logout_path),
        })
    }

    /// Creates an auth endpoint client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client, config: &SessionConfig) -> Self {
        Self {
            client,
            refresh_url: config.endpoint_url(&config.refresh_path),
            logout_url: config.endpoint_url(&config.logout_path),
        }
    }

    /// Extracts a message from an error body, falling back to the raw text.
    fn error_message(body: String) -> String {
        serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or(body)
    }
}

#[async_trait]
impl AuthApi for RestAuthApi {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthApiError> {
        tracing::debug!("exchanging refresh token");

        let response = self
            .client
            .post(self.refresh_url.clone())
            .json(&TokenRequest { refresh_token })
            .send()
            .await
            .map_err(|e| AuthApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthApiError::Rejected {
                status: status.as_u16(),
                message: Self::error_message(body),
            });
        }

        let grant: GrantResponse = response
            .json()
            .await
            .map_err(|e| AuthApiError::MalformedResponse(e.to_string()))?;

        Ok(TokenGrant {
            token: grant.token,
            refresh_token: grant.refresh_token,
            expires_in_secs: grant.expires_in,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthApiError> {
        tracing::debug!("invalidating refresh token server-side");

        let response = self
            .client
            .post(self.logout_url.clone())
            .json(&TokenRequest { refresh_token })
            .send()
            .await
            .map_err(|e| AuthApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthApiError::Rejected {
                status: status.as_u16(),
                message: Self::error_message(body),
            });
        }
        Ok(())
    }
}

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::model::TokenResponse;

/// Token acquisition failures. Any of these aborts the run.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Authentication failed: token endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Authentication failed: malformed token response: {0}")]
    MalformedResponse(String),
}

/// OAuth2 client-credentials token provider.
#[derive(Clone)]
pub struct TokenProvider {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl TokenProvider {
    pub fn new(
        client: Client,
        token_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            client,
            token_url,
            client_id,
            client_secret,
        }
    }

    /// Exchange the client id/secret for a bearer token. No retry.
    #[instrument(skip(self), fields(url = %self.token_url, client_id = %self.client_id))]
    pub async fn fetch_token(&self) -> Result<String, AuthError> {
        debug!("Requesting client-credentials token");
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!("Token endpoint responded with status: {}", status);
        if !status.is_success() {
            return Err(AuthError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(AuthError::MalformedResponse(
                "access_token is empty".to_string(),
            ));
        }

        info!("Access token obtained");
        Ok(token.access_token)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

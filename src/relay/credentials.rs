use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::RelayError;

/// Source of bearer credentials for outbound provider calls. Resolved once at
/// startup from configuration and injected into the relay. Tokens themselves
/// are re-acquired per call; the expected load is occasional admin actions,
/// not sustained traffic, so no token cache is kept.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn bearer_token(&self) -> Result<String, RelayError>;
}

/// Server-to-server OAuth: exchanges account credentials at the provider
/// token endpoint for a short-lived access token (about an hour).
pub struct AccountCredentials {
    http: reqwest::Client,
    token_url: String,
    account_id: String,
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl AccountCredentials {
    pub fn new(
        token_url: impl Into<String>,
        account_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
            account_id: account_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait]
impl CredentialSource for AccountCredentials {
    async fn bearer_token(&self) -> Result<String, RelayError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.account_id.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(RelayError::Provider { status, body });
        }

        let token: TokenResponse = response.json().await?;
        info!("Acquired provider access token");
        Ok(token.access_token)
    }
}

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracker_core::model::{User, UserId};

use super::{RestConfig, remote_error};
use crate::repository::{AuthGateway, AuthSession, StorageError};

/// GoTrue client: password sign-in and logout.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    config: RestConfig,
}

impl SupabaseAuth {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Remote` if the provider rejects the credentials,
    /// or `StorageError::Serialization` if the response is not a session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StorageError> {
        let response = self
            .client
            .post(self.config.endpoint("auth/v1/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", self.config.anon_key())
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let user = User::new(
            body.user.id,
            body.user.email.unwrap_or_default(),
            body.user.user_metadata.full_name,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        tracing::info!(user_id = %user.id(), "signed in");

        Ok(AuthSession {
            user,
            access_token: Some(body.access_token),
        })
    }
}

#[async_trait::async_trait]
impl AuthGateway for SupabaseAuth {
    async fn sign_out(&self, session: &AuthSession) -> Result<(), StorageError> {
        let Some(token) = session.access_token.as_deref() else {
            return Ok(());
        };
        let response = self
            .client
            .post(self.config.endpoint("auth/v1/logout"))
            .header("apikey", self.config.anon_key())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }
        tracing::info!(user_id = %session.user.id(), "signed out");
        Ok(())
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: UserId,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Default, Deserialize)]
struct UserMetadata {
    full_name: Option<String>,
}

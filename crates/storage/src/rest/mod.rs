//! Hosted backend: PostgREST tables plus GoTrue auth.

use std::env;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use thiserror::Error;
use tracker_core::model::{ProgressEntry, Topic, TopicId, UserId};
use url::Url;

use crate::repository::{
    AuthGateway, AuthSession, ProgressRepository, Storage, StorageError, TopicRepository,
};

mod auth;
mod rows;

pub use auth::SupabaseAuth;

use rows::{ErrorBody, ProgressPatch, ProgressRow, TopicRow};

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RestConfigError {
    #[error("invalid backend URL: {0}")]
    InvalidBaseUrl(String),
    #[error("backend anon key is empty")]
    MissingAnonKey,
}

/// Where the hosted backend lives and the public key it expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestConfig {
    base_url: Url,
    anon_key: String,
}

impl RestConfig {
    /// Validate a backend URL and anon key.
    ///
    /// # Errors
    ///
    /// Returns `RestConfigError` if the URL does not parse or the key is blank.
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, RestConfigError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|_| RestConfigError::InvalidBaseUrl(base_url.to_owned()))?;
        let anon_key = anon_key.into().trim().to_owned();
        if anon_key.is_empty() {
            return Err(RestConfigError::MissingAnonKey);
        }
        Ok(Self { base_url, anon_key })
    }

    /// Read `TRACKER_SUPABASE_URL` and `TRACKER_SUPABASE_ANON_KEY`.
    ///
    /// Returns `Ok(None)` when the URL is not set.
    ///
    /// # Errors
    ///
    /// Returns `RestConfigError` if the values are present but invalid.
    pub fn from_env() -> Result<Option<Self>, RestConfigError> {
        let Ok(base_url) = env::var("TRACKER_SUPABASE_URL") else {
            return Ok(None);
        };
        let anon_key = env::var("TRACKER_SUPABASE_ANON_KEY").unwrap_or_default();
        Self::new(&base_url, anon_key).map(Some)
    }

    #[must_use]
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// PostgREST client for the `topics` and `user_progress` tables.
#[derive(Clone)]
pub struct RestGateway {
    client: Client,
    config: RestConfig,
    access_token: Option<String>,
}

impl RestGateway {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            access_token: None,
        }
    }

    /// Authorize requests as the signed-in user instead of the anon role.
    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    fn table(&self, name: &str) -> String {
        self.config.endpoint(&format!("rest/v1/{name}"))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(self.config.anon_key());
        request
            .header("apikey", self.config.anon_key())
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(remote_error(response).await)
        }
    }

    async fn fetch_progress_rows(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<ProgressEntry>, StorageError> {
        let rows: Vec<ProgressRow> = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(rows.into_iter().map(ProgressRow::into_entry).collect())
    }

    /// Writes return the affected rows; exactly one is expected back.
    async fn single_progress_row(
        &self,
        request: RequestBuilder,
    ) -> Result<ProgressEntry, StorageError> {
        self.fetch_progress_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or(StorageError::NotFound)
    }
}

async fn remote_error(response: Response) -> StorageError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.clone()
            }
        });
    tracing::warn!(status = status.as_u16(), %message, "backend request failed");
    if status == StatusCode::CONFLICT {
        return StorageError::Conflict;
    }
    StorageError::Remote {
        status: status.as_u16(),
        message,
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[async_trait::async_trait]
impl TopicRepository for RestGateway {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        tracing::debug!("fetching topic catalog");
        let request = self
            .client
            .get(self.table("topics"))
            .query(&[("select", "*"), ("order", "order_number.asc")]);
        let rows: Vec<TopicRow> = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(rows.into_iter().map(TopicRow::into_topic).collect())
    }
}

#[async_trait::async_trait]
impl ProgressRepository for RestGateway {
    async fn list_progress(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError> {
        tracing::debug!(%user_id, "fetching progress");
        let request = self
            .client
            .get(self.table("user_progress"))
            .query(&[("select", "*".to_owned()), ("user_id", eq(user_id))]);
        self.fetch_progress_rows(request).await
    }

    async fn get_progress(
        &self,
        user_id: UserId,
        topic_id: TopicId,
    ) -> Result<Option<ProgressEntry>, StorageError> {
        let request = self.client.get(self.table("user_progress")).query(&[
            ("select", "*".to_owned()),
            ("user_id", eq(user_id)),
            ("topic_id", eq(topic_id)),
        ]);
        let mut rows = self.fetch_progress_rows(request).await?;
        if rows.len() > 1 {
            return Err(StorageError::Serialization(format!(
                "expected at most one progress row, got {}",
                rows.len()
            )));
        }
        Ok(rows.pop())
    }

    async fn update_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        tracing::debug!(user_id = %entry.user_id, topic_id = %entry.topic_id, "updating progress");
        let request = self
            .client
            .patch(self.table("user_progress"))
            .query(&[("user_id", eq(entry.user_id)), ("topic_id", eq(entry.topic_id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&ProgressPatch::from_entry(entry));
        self.single_progress_row(request).await
    }

    async fn insert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        tracing::debug!(user_id = %entry.user_id, topic_id = %entry.topic_id, "inserting progress");
        let request = self
            .client
            .post(self.table("user_progress"))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&ProgressRow::from_entry(entry));
        self.single_progress_row(request).await
    }

    async fn upsert_progress(&self, entry: &ProgressEntry) -> Result<ProgressEntry, StorageError> {
        tracing::debug!(user_id = %entry.user_id, topic_id = %entry.topic_id, "upserting progress");
        let request = self
            .client
            .post(self.table("user_progress"))
            .query(&[("on_conflict", "user_id,topic_id")])
            .header("Prefer", MERGE_DUPLICATES)
            .json(&ProgressRow::from_entry(entry));
        self.single_progress_row(request).await
    }
}

impl Storage {
    /// Build a `Storage` against the hosted backend, acting as `session`.
    #[must_use]
    pub fn remote(config: RestConfig, session: &AuthSession) -> Self {
        let gateway =
            RestGateway::new(config.clone()).with_access_token(session.access_token.clone());
        let topics: Arc<dyn TopicRepository> = Arc::new(gateway.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(gateway);
        let auth: Arc<dyn AuthGateway> = Arc::new(SupabaseAuth::new(config));
        Self {
            topics,
            progress,
            auth,
        }
    }
}

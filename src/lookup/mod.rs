use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::RemoteConfig;
use crate::error::AppError;
use crate::models::{Assessment, User};

/// Lookups against the sibling user and assessment services.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    async fn fetch_user(&self, id: i64) -> Result<User, AppError>;
    async fn fetch_assessment(&self, id: i64) -> Result<Assessment, AppError>;
}

pub struct HttpLookupClient {
    client: Client,
    config: RemoteConfig,
}

impl HttpLookupClient {
    pub fn new(config: RemoteConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let attempts = self.config.retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            match self.get_once(url).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    warn!("GET {} failed (attempt {}/{}): {}", url, attempt, attempts, e);
                    attempt += 1;
                }
                Err(e) => return Err(AppError::Upstream(format!("GET {}: {}", url, e))),
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("status {}: {}", status, truncate(&body)));
        }

        let body_text = response.text().await.map_err(|e| e.to_string())?;
        serde_json::from_str::<T>(&body_text).map_err(|e| format!("unreadable body: {}", e))
    }
}

const MAX_ERROR_BODY_CHARS: usize = 200;

fn truncate(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(MAX_ERROR_BODY_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[async_trait]
impl RemoteLookup for HttpLookupClient {
    async fn fetch_user(&self, id: i64) -> Result<User, AppError> {
        let url = format!("{}/{}", self.config.user_service_url, id);
        self.get_json(&url).await
    }

    async fn fetch_assessment(&self, id: i64) -> Result<Assessment, AppError> {
        let url = format!("{}/{}", self.config.assessment_service_url, id);
        self.get_json(&url).await
    }
}

/// Serves users and assessments from memory. Unknown ids fail the same way an
/// unreachable service would.
#[derive(Default)]
pub struct StaticLookup {
    users: HashMap<i64, User>,
    assessments: HashMap<i64, Assessment>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: i64, username: &str) -> Self {
        self.users.insert(
            id,
            User {
                id: Some(id),
                username: Some(username.to_string()),
            },
        );
        self
    }

    pub fn with_raw_user(mut self, id: i64, user: User) -> Self {
        self.users.insert(id, user);
        self
    }

    pub fn with_assessment(mut self, assessment: Assessment) -> Self {
        if let Some(id) = assessment.assessment_id {
            self.assessments.insert(id, assessment);
        }
        self
    }
}

#[async_trait]
impl RemoteLookup for StaticLookup {
    async fn fetch_user(&self, id: i64) -> Result<User, AppError> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::Upstream(format!("user {} is unknown", id)))
    }

    async fn fetch_assessment(&self, id: i64) -> Result<Assessment, AppError> {
        self.assessments
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::Upstream(format!("assessment {} is unknown", id)))
    }
}

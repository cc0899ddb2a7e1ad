//! External API clients module
use crate::domain::{LaunchRecord, LaunchStatus};
use crate::errors::ClientError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("spacex-launches-sync/1.0")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Launch as published by the SpaceX v4 API (only the fields we keep)
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceXLaunch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub flight_number: Option<i32>,
    #[serde(default)]
    pub date_utc: Option<String>,
    pub success: Option<bool>,
    pub details: Option<String>,
    pub rocket: Option<String>,
    pub launchpad: Option<String>,
    #[serde(default)]
    pub payloads: Vec<String>,
    #[serde(default)]
    pub links: SpaceXLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceXLinks {
    #[serde(default)]
    pub patch: SpaceXPatch,
    pub webcast: Option<String>,
    pub article: Option<String>,
    pub wikipedia: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceXPatch {
    pub small: Option<String>,
    pub large: Option<String>,
}

impl SpaceXLaunch {
    /// Flatten into the stored record shape. Returns `None` when the launch
    /// has no usable id, since the id is the table's partition key.
    pub fn into_record(self) -> Option<LaunchRecord> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;
        let status = LaunchStatus::from_success(self.success);

        Some(LaunchRecord {
            id,
            mission_name: self
                .name
                .unwrap_or_else(|| "Unknown Mission".to_string()),
            flight_number: self.flight_number,
            launch_date_utc: self.date_utc.unwrap_or_default(),
            success: self.success,
            details: self.details,
            rocket_id: self.rocket.unwrap_or_default(),
            launchpad_id: self.launchpad.unwrap_or_default(),
            payloads: self.payloads,
            patch_small_link: self.links.patch.small,
            patch_large_link: self.links.patch.large,
            webcast_link: self.links.webcast,
            article_link: self.links.article,
            wikipedia_link: self.links.wikipedia,
            status: status.as_str().to_string(),
        })
    }
}

/// SpaceX API client
pub struct SpaceXClient {
    http_client: HttpClient,
    url: String,
}

impl SpaceXClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every launch published by the API
    pub async fn fetch_launches(&self) -> Result<Vec<SpaceXLaunch>, ClientError> {
        tracing::debug!(url = %self.url, "Fetching SpaceX launches");

        let resp = self.http_client.get_client().get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::Status {
                status: resp.status().as_u16(),
                url: self.url.clone(),
            });
        }

        let launches: Vec<SpaceXLaunch> = resp.json().await?;
        tracing::debug!(count = launches.len(), "Fetched SpaceX launches");
        Ok(launches)
    }
}

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use super::CredentialSource;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("start time {0:?} is not a valid timestamp")]
    InvalidStartTime(String),
    #[error("meeting id is required")]
    MissingId,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Meeting creation input. Fields default to empty so a missing field is
/// reported as a validation failure, not a deserialization rejection; all
/// checks run before any network I/O.
#[derive(Debug, Deserialize)]
pub struct CreateMeeting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "startTime")]
    pub start_time: String,
    /// Minutes; defaults to 60.
    pub duration: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMeeting {
    pub meeting_id: String,
    pub join_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Provider request body for a scheduled meeting (type 2).
#[derive(Serialize)]
struct MeetingPayload<'a> {
    topic: &'a str,
    #[serde(rename = "type")]
    kind: u8,
    start_time: String,
    duration: u32,
    timezone: &'a str,
    agenda: &'a str,
    settings: MeetingSettings,
}

#[derive(Serialize)]
struct MeetingSettings {
    host_video: bool,
    participant_video: bool,
    join_before_host: bool,
    mute_upon_entry: bool,
    waiting_room: bool,
    auto_recording: &'static str,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            host_video: true,
            participant_video: true,
            join_before_host: true,
            mute_upon_entry: false,
            waiting_room: false,
            auto_recording: "none",
        }
    }
}

#[derive(Deserialize)]
struct ProviderMeeting {
    #[serde(deserialize_with = "flexible_id")]
    id: String,
    join_url: String,
    start_url: Option<String>,
    password: Option<String>,
}

/// The provider types meeting ids as numbers in some responses and strings in
/// others; accept both, like the webhook decoder does.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    super::webhook::id_string(&value)
        .ok_or_else(|| serde::de::Error::custom("meeting id must be a string or a number"))
}

/// Outbound half of the relay: creates and retrieves meetings against the
/// provider API, acquiring a bearer token per call from the injected
/// credential source.
pub struct MeetingRelay {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialSource>,
    api_base: String,
    timezone: String,
}

impl MeetingRelay {
    pub fn new(
        credentials: Arc<dyn CredentialSource>,
        api_base: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            api_base: api_base.into(),
            timezone: timezone.into(),
        }
    }

    /// Schedule a meeting with the provider and return its id and join URL.
    pub async fn create_meeting(
        &self,
        request: CreateMeeting,
    ) -> Result<CreatedMeeting, RelayError> {
        if request.title.trim().is_empty() {
            return Err(RelayError::MissingField("title"));
        }
        if request.start_time.trim().is_empty() {
            return Err(RelayError::MissingField("startTime"));
        }

        // Validated before token acquisition so a bad timestamp never costs a
        // network round trip.
        let start = DateTime::parse_from_rfc3339(&request.start_time)
            .map_err(|_| RelayError::InvalidStartTime(request.start_time.clone()))?;

        let token = self.credentials.bearer_token().await?;

        let payload = MeetingPayload {
            topic: &request.title,
            kind: 2, // scheduled meeting
            start_time: start
                .to_utc()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            duration: request.duration.unwrap_or(60),
            timezone: &self.timezone,
            agenda: &request.description,
            settings: MeetingSettings::default(),
        };

        info!(
            "Creating meeting '{}' starting at {}",
            request.title, payload.start_time
        );

        let response = self
            .http
            .post(format!("{}/users/me/meetings", self.api_base))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            error!("Meeting creation failed with {}: {}", status, body);
            return Err(RelayError::Provider { status, body });
        }

        let meeting: ProviderMeeting = response.json().await?;
        info!("Created meeting {}", meeting.id);

        Ok(CreatedMeeting {
            meeting_id: meeting.id,
            join_url: meeting.join_url,
            start_url: meeting.start_url,
            password: meeting.password,
        })
    }

    /// Fetch the provider's record for a meeting, returned unmodified.
    pub async fn get_meeting(&self, meeting_id: &str) -> Result<Value, RelayError> {
        if meeting_id.trim().is_empty() {
            return Err(RelayError::MissingId);
        }

        let token = self.credentials.bearer_token().await?;

        let response = self
            .http
            .get(format!("{}/meetings/{}", self.api_base, meeting_id))
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            error!("Meeting lookup failed with {}: {}", status, body);
            return Err(RelayError::Provider { status, body });
        }

        Ok(response.json().await?)
    }
}

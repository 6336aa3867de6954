use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{MeetingRecord, MeetingStatus, MeetingStore, StoreError};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("malformed webhook body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("event {event} is missing {field}")]
    MissingField { event: String, field: &'static str },
}

/// Inbound provider notification, decoded once at the boundary into a closed
/// set of variants. Anything the provider may add later lands in `Unknown`
/// and is ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    UrlValidation { plain_token: String },
    MeetingStarted { meeting_id: String },
    MeetingEnded { meeting_id: String },
    ParticipantJoined { meeting_id: String, participant_id: String },
    ParticipantLeft { meeting_id: String, participant_id: String },
    MeetingCreated { meeting_id: String },
    MeetingUpdated { meeting_id: String },
    MeetingDeleted { meeting_id: String },
    Unknown { event: String },
}

#[derive(Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    payload: RawPayload,
}

#[derive(Deserialize, Default)]
struct RawPayload {
    #[serde(rename = "plainToken")]
    plain_token: Option<String>,
    #[serde(default)]
    object: RawObject,
}

#[derive(Deserialize, Default)]
struct RawObject {
    id: Option<Value>,
    participant: Option<RawParticipant>,
}

#[derive(Deserialize)]
struct RawParticipant {
    user_id: Option<Value>,
    id: Option<Value>,
}

/// Provider ids arrive as numbers or strings depending on the event.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn decode_event(body: &[u8]) -> Result<WebhookEvent, WebhookError> {
    let raw: RawEvent = serde_json::from_slice(body)?;

    let meeting_id = |raw: &RawEvent| -> Result<String, WebhookError> {
        raw.payload
            .object
            .id
            .as_ref()
            .and_then(id_string)
            .ok_or_else(|| WebhookError::MissingField {
                event: raw.event.clone(),
                field: "payload.object.id",
            })
    };

    let participant_id = |raw: &RawEvent| -> Result<String, WebhookError> {
        raw.payload
            .object
            .participant
            .as_ref()
            .and_then(|p| p.user_id.as_ref().or(p.id.as_ref()))
            .and_then(id_string)
            .ok_or_else(|| WebhookError::MissingField {
                event: raw.event.clone(),
                field: "payload.object.participant",
            })
    };

    let event = match raw.event.as_str() {
        "endpoint.url_validation" => WebhookEvent::UrlValidation {
            plain_token: raw.payload.plain_token.clone().ok_or_else(|| {
                WebhookError::MissingField {
                    event: raw.event.clone(),
                    field: "payload.plainToken",
                }
            })?,
        },
        "meeting.started" => WebhookEvent::MeetingStarted {
            meeting_id: meeting_id(&raw)?,
        },
        "meeting.ended" => WebhookEvent::MeetingEnded {
            meeting_id: meeting_id(&raw)?,
        },
        "meeting.participant_joined" => WebhookEvent::ParticipantJoined {
            meeting_id: meeting_id(&raw)?,
            participant_id: participant_id(&raw)?,
        },
        "meeting.participant_left" => WebhookEvent::ParticipantLeft {
            meeting_id: meeting_id(&raw)?,
            participant_id: participant_id(&raw)?,
        },
        "meeting.created" => WebhookEvent::MeetingCreated {
            meeting_id: meeting_id(&raw)?,
        },
        "meeting.updated" => WebhookEvent::MeetingUpdated {
            meeting_id: meeting_id(&raw)?,
        },
        "meeting.deleted" => WebhookEvent::MeetingDeleted {
            meeting_id: meeting_id(&raw)?,
        },
        _ => WebhookEvent::Unknown { event: raw.event },
    };

    Ok(event)
}

/// HMAC-SHA256 over `v0:{timestamp}:{body}`, hex-encoded with a `v0=` prefix.
/// This is the signature the provider attaches to each webhook request.
pub fn sign_request(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a provider-supplied signature against the raw body.
pub fn verify_signature(secret: &str, timestamp: &str, body: &[u8], provided: &str) -> bool {
    let Some(hex_sig) = provided.strip_prefix("v0=") else {
        return false;
    };
    let Ok(sig) = hex::decode(hex_sig) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    mac.verify_slice(&sig).is_ok()
}

/// Signed half of the URL-validation handshake: hex HMAC of the plain token.
pub fn sign_challenge(secret: &str, plain_token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(plain_token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Applies one decoded event to the meeting store. Webhooks may be delivered
/// more than once, so every mutation is idempotent: re-setting the current
/// status, re-adding a present participant, and removing an absent one are
/// all no-ops.
pub struct WebhookDispatcher {
    meetings: Arc<dyn MeetingStore>,
}

impl WebhookDispatcher {
    pub fn new(meetings: Arc<dyn MeetingStore>) -> Self {
        Self { meetings }
    }

    /// Register a freshly created meeting as scheduled. Existing records are
    /// left alone so a late create response cannot clobber live status.
    pub async fn track_created(&self, meeting_id: &str) -> Result<(), StoreError> {
        if self.meetings.get_meeting(meeting_id).await?.is_none() {
            self.meetings
                .put_meeting(MeetingRecord::scheduled(meeting_id))
                .await?;
        }
        Ok(())
    }

    pub async fn apply(&self, event: WebhookEvent) -> Result<(), StoreError> {
        match event {
            WebhookEvent::MeetingStarted { meeting_id } => {
                self.set_status(&meeting_id, MeetingStatus::Active).await?;
                info!("Meeting {} started", meeting_id);
            }
            WebhookEvent::MeetingEnded { meeting_id } => {
                self.set_status(&meeting_id, MeetingStatus::Completed)
                    .await?;
                info!("Meeting {} ended", meeting_id);
            }
            WebhookEvent::ParticipantJoined {
                meeting_id,
                participant_id,
            } => {
                let mut record = self.load(&meeting_id).await?;
                if record.participants.insert(participant_id.clone()) {
                    self.meetings.put_meeting(record).await?;
                    info!("Participant {} joined meeting {}", participant_id, meeting_id);
                }
            }
            WebhookEvent::ParticipantLeft {
                meeting_id,
                participant_id,
            } => {
                let mut record = self.load(&meeting_id).await?;
                if record.participants.remove(&participant_id) {
                    self.meetings.put_meeting(record).await?;
                    info!("Participant {} left meeting {}", participant_id, meeting_id);
                }
            }
            // Observability hooks only; no state to carry for these.
            WebhookEvent::MeetingCreated { meeting_id } => {
                info!("Provider reports meeting {} created", meeting_id);
            }
            WebhookEvent::MeetingUpdated { meeting_id } => {
                info!("Provider reports meeting {} updated", meeting_id);
            }
            WebhookEvent::MeetingDeleted { meeting_id } => {
                info!("Provider reports meeting {} deleted", meeting_id);
            }
            WebhookEvent::Unknown { event } => {
                warn!("Unrecognized webhook event: {}", event);
            }
            // Answered at the HTTP boundary; never reaches the store.
            WebhookEvent::UrlValidation { .. } => {}
        }
        Ok(())
    }

    async fn load(&self, meeting_id: &str) -> Result<MeetingRecord, StoreError> {
        Ok(self
            .meetings
            .get_meeting(meeting_id)
            .await?
            .unwrap_or_else(|| MeetingRecord::scheduled(meeting_id)))
    }

    async fn set_status(&self, meeting_id: &str, status: MeetingStatus) -> Result<(), StoreError> {
        let mut record = self.load(meeting_id).await?;
        if record.status != status {
            record.status = status;
            self.meetings.put_meeting(record).await?;
        }
        Ok(())
    }
}

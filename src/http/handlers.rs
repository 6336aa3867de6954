use super::state::AppState;
use crate::error::ApiError;
use crate::relay::{decode_event, sign_challenge, verify_signature, CreateMeeting, WebhookEvent};
use crate::store::EditorialDocument;
use crate::workflow::{Capabilities, DocumentStatus};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChallengeParams {
    pub challenge: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub target: DocumentStatus,
    pub comment: Option<String>,
    #[serde(flatten)]
    pub capabilities: Capabilities,
}

// ============================================================================
// Webhook handlers
// ============================================================================

/// GET /webhook
/// Provider validation handshake: echo the challenge token as plain text.
pub async fn webhook_challenge(Query(params): Query<ChallengeParams>) -> Response {
    match params.challenge {
        Some(challenge) => {
            info!("Answering webhook challenge");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                challenge,
            )
                .into_response()
        }
        None => Json(json!({ "message": "webhook endpoint ready" })).into_response(),
    }
}

/// POST /webhook
/// Provider event notifications. The signature check runs over the raw body
/// before any parsing; the URL-validation handshake is answered inline with
/// nothing but an HMAC computation so it stays inside the provider's
/// response window.
pub async fn webhook_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.webhook_secret {
        let timestamp = header_str(&headers, "x-zm-request-timestamp");
        let signature = header_str(&headers, "x-zm-signature");
        if !verify_signature(secret, timestamp, &body, signature) {
            warn!("Rejecting webhook with bad signature");
            return ApiError::SignatureMismatch.into_response();
        }
    }

    let event = match decode_event(&body) {
        Ok(event) => event,
        Err(err) => {
            error!("Failed to decode webhook body: {}", err);
            return ApiError::Webhook(err).into_response();
        }
    };

    if let WebhookEvent::UrlValidation { plain_token } = &event {
        let secret = state.webhook_secret.as_deref().unwrap_or_default();
        let encrypted_token = sign_challenge(secret, plain_token);
        return Json(json!({
            "plainToken": plain_token,
            "encryptedToken": encrypted_token,
        }))
        .into_response();
    }

    match state.dispatcher.apply(event).await {
        Ok(()) => Json(json!({ "status": "success" })).into_response(),
        Err(err) => {
            // The provider only distinguishes success, rejection, and server
            // error on this endpoint; details go to the log.
            error!("Failed to apply webhook event: {}", err);
            ApiError::Internal(err.into()).into_response()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

// ============================================================================
// Meeting relay handlers
// ============================================================================

/// POST /meetings
/// Schedule a meeting with the provider.
pub async fn create_meeting(
    State(state): State<AppState>,
    Json(request): Json<CreateMeeting>,
) -> Result<Response, ApiError> {
    let created = state.relay.create_meeting(request).await?;

    // Track the meeting locally so inbound webhook events have a record to
    // land on.
    state.dispatcher.track_created(&created.meeting_id).await?;

    Ok(Json(created).into_response())
}

/// GET /meetings/:meeting_id
/// Fetch the provider's meeting record, passed through unmodified.
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let meeting = state.relay.get_meeting(&meeting_id).await?;
    Ok(Json(meeting))
}

// ============================================================================
// Workflow handlers
// ============================================================================

/// POST /documents
/// Create a new editorial document in draft.
pub async fn create_document(
    State(state): State<AppState>,
) -> Result<Json<EditorialDocument>, ApiError> {
    let document = state.workflow.create().await?;
    Ok(Json(document))
}

/// GET /documents/:document_id
pub async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<EditorialDocument>, ApiError> {
    let document = state.workflow.get(&document_id).await?;
    Ok(Json(document))
}

/// POST /documents/:document_id/transition
/// Move a document along one workflow edge.
pub async fn transition_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<EditorialDocument>, ApiError> {
    let document = state
        .workflow
        .transition(
            &document_id,
            request.target,
            request.capabilities,
            request.comment,
        )
        .await?;
    Ok(Json(document))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

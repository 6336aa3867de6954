//! Meeting provider relay
//!
//! Bridges internal meeting bookkeeping to the external video-meeting
//! provider: outbound meeting creation/retrieval against the provider API and
//! inbound webhook ingestion, including the URL-validation handshake and the
//! `v0:{timestamp}:{body}` signature check.
//!
//! Every outbound call is single-attempt: token acquisition and the API
//! request each run once and any non-success response is surfaced verbatim to
//! the caller.

mod credentials;
mod provider;
mod webhook;

pub use credentials::{AccountCredentials, CredentialSource};
pub use provider::{CreateMeeting, CreatedMeeting, MeetingRelay, RelayError};
pub use webhook::{
    decode_event, sign_challenge, sign_request, verify_signature, WebhookDispatcher, WebhookError,
    WebhookEvent,
};

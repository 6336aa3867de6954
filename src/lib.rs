pub mod config;
pub mod error;
pub mod http;
pub mod relay;
pub mod store;
pub mod workflow;

pub use config::Config;
pub use error::ApiError;
pub use http::{create_router, AppState};
pub use relay::{
    decode_event, sign_challenge, sign_request, verify_signature, AccountCredentials,
    CreateMeeting, CreatedMeeting, CredentialSource, MeetingRelay, RelayError, WebhookDispatcher,
    WebhookError, WebhookEvent,
};
pub use store::{
    DocumentStore, EditorialDocument, MeetingRecord, MeetingStatus, MeetingStore, MemoryStore,
    StoreError,
};
pub use workflow::{Capabilities, DocumentStatus, WorkflowEngine, WorkflowError};

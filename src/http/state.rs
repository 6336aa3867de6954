use std::sync::Arc;

use crate::relay::{MeetingRelay, WebhookDispatcher};
use crate::workflow::WorkflowEngine;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<WorkflowEngine>,
    pub relay: Arc<MeetingRelay>,
    pub dispatcher: Arc<WebhookDispatcher>,
    /// Shared secret for inbound webhook authenticity. `None` disables the
    /// signature check (some deployments omit it).
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(
        workflow: Arc<WorkflowEngine>,
        relay: Arc<MeetingRelay>,
        dispatcher: Arc<WebhookDispatcher>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            workflow,
            relay,
            dispatcher,
            webhook_secret,
        }
    }
}

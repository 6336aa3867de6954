use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::relay::{RelayError, WebhookError};
use crate::store::StoreError;
use crate::workflow::WorkflowError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error("webhook signature mismatch")]
    SignatureMismatch,
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Workflow(err) => match err {
                WorkflowError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
                WorkflowError::MissingCapability(_) => StatusCode::FORBIDDEN,
                WorkflowError::Persistence(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
                WorkflowError::Persistence(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Relay(err) => match err {
                RelayError::InvalidStartTime(_)
                | RelayError::MissingId
                | RelayError::MissingField(_) => StatusCode::BAD_REQUEST,
                // Pass the provider's failure status through when it is an
                // error status; anything else reads as a bad upstream.
                RelayError::Provider { status, .. } if *status >= 400 => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                RelayError::Provider { .. } | RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
            // The provider controls the webhook payload shape, so a body we
            // cannot decode is our problem to log, not a client error.
            ApiError::Webhook(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::SignatureMismatch => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

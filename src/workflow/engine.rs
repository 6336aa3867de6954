use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::{Capabilities, DocumentStatus};
use crate::store::{DocumentPatch, DocumentStore, EditorialDocument, StoreError};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("no transition from {from} to {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },
    #[error("actor lacks the {0} capability")]
    MissingCapability(&'static str),
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// The five legal edges of the revision workflow. Cyclic by design: published
/// and rejected documents both route back to draft.
pub(crate) fn is_edge(from: DocumentStatus, to: DocumentStatus) -> bool {
    use DocumentStatus::*;
    matches!(
        (from, to),
        (Draft, Review) | (Review, Published) | (Review, Rejected) | (Published, Draft) | (Rejected, Draft)
    )
}

/// Enforces the legal status transitions for editorial documents and persists
/// them. Each transition is a single-document write; concurrent moderators
/// race last-writer-wins.
pub struct WorkflowEngine {
    store: Arc<dyn DocumentStore>,
}

impl WorkflowEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a fresh document in draft. The store assigns the id.
    pub async fn create(&self) -> Result<EditorialDocument, WorkflowError> {
        let doc = self.store.create_document().await?;
        info!("Created document {} in draft", doc.id);
        Ok(doc)
    }

    pub async fn get(&self, document_id: &str) -> Result<EditorialDocument, WorkflowError> {
        Ok(self.store.get_document(document_id).await?)
    }

    /// Move a document along exactly one workflow edge. The comment, when
    /// present, replaces the stored moderation note; otherwise the previous
    /// note is kept.
    pub async fn transition(
        &self,
        document_id: &str,
        target: DocumentStatus,
        actor: Capabilities,
        comment: Option<String>,
    ) -> Result<EditorialDocument, WorkflowError> {
        let current = self.store.get_document(document_id).await?.status;

        if !is_edge(current, target) {
            return Err(WorkflowError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        match (current, target) {
            (DocumentStatus::Review, DocumentStatus::Published) if !actor.can_approve => {
                return Err(WorkflowError::MissingCapability("canApprove"));
            }
            (DocumentStatus::Review, DocumentStatus::Rejected) if !actor.can_reject => {
                return Err(WorkflowError::MissingCapability("canReject"));
            }
            _ => {}
        }

        let updated = self
            .store
            .update_document(
                document_id,
                DocumentPatch {
                    status: Some(target),
                    last_comment: comment,
                },
            )
            .await?;

        info!("Document {} moved {} -> {}", document_id, current, target);
        Ok(updated)
    }
}

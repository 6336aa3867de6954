use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    DocumentPatch, DocumentStore, EditorialDocument, MeetingRecord, MeetingStore, StoreError,
};
use crate::workflow::DocumentStatus;

/// In-process store with single-record atomic writes. Stands in for the
/// platform's document database behind the same traits.
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, EditorialDocument>>>,
    meetings: Arc<RwLock<HashMap<String, MeetingRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self) -> Result<EditorialDocument, StoreError> {
        let doc = EditorialDocument {
            id: uuid::Uuid::new_v4().to_string(),
            status: DocumentStatus::Draft,
            last_comment: None,
            updated_at: Utc::now(),
        };
        self.documents
            .write()
            .await
            .insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    async fn get_document(&self, id: &str) -> Result<EditorialDocument, StoreError> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_document(
        &self,
        id: &str,
        patch: DocumentPatch,
    ) -> Result<EditorialDocument, StoreError> {
        let mut documents = self.documents.write().await;
        let doc = documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(status) = patch.status {
            doc.status = status;
        }
        if let Some(comment) = patch.last_comment {
            doc.last_comment = Some(comment);
        }
        doc.updated_at = Utc::now();

        Ok(doc.clone())
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn get_meeting(&self, id: &str) -> Result<Option<MeetingRecord>, StoreError> {
        Ok(self.meetings.read().await.get(id).cloned())
    }

    async fn put_meeting(&self, record: MeetingRecord) -> Result<(), StoreError> {
        self.meetings.write().await.insert(record.id.clone(), record);
        Ok(())
    }
}

//! Record shapes and store traits
//!
//! The platform's document database and the meeting bookkeeping sit behind
//! narrow traits: read-by-id and single-record merge writes are the whole
//! contract. No range queries, joins, or multi-record transactions.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::workflow::DocumentStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Editorial content record (e.g. a blog post) subject to the draft/review
/// lifecycle. The status field is only ever written by the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorialDocument {
    pub id: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Fields applied to a document as one merge write. `None` keeps the stored
/// value.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub status: Option<DocumentStatus>,
    pub last_comment: Option<String>,
}

/// Meeting lifecycle as driven by inbound webhook events. `Scheduled` is
/// implicit at creation; the provider never reports it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Active,
    Completed,
}

/// Internal bookkeeping for a provider-hosted meeting. The id is the join key
/// between inbound webhook events and this record, so it is always the
/// provider-issued identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: String,
    pub status: MeetingStatus,
    pub participants: BTreeSet<String>,
}

impl MeetingRecord {
    pub fn scheduled(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: MeetingStatus::Scheduled,
            participants: BTreeSet::new(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a new document in draft; the store assigns id and timestamp.
    async fn create_document(&self) -> Result<EditorialDocument, StoreError>;

    async fn get_document(&self, id: &str) -> Result<EditorialDocument, StoreError>;

    /// Merge-update a single document. `updated_at` is stamped by the store
    /// on every write.
    async fn update_document(
        &self,
        id: &str,
        patch: DocumentPatch,
    ) -> Result<EditorialDocument, StoreError>;
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn get_meeting(&self, id: &str) -> Result<Option<MeetingRecord>, StoreError>;

    /// Insert or replace a single meeting record.
    async fn put_meeting(&self, record: MeetingRecord) -> Result<(), StoreError>;
}

use lingodesk_relay::{
    Capabilities, DocumentStatus, MemoryStore, StoreError, WorkflowEngine, WorkflowError,
};
use std::sync::Arc;

fn engine() -> WorkflowEngine {
    WorkflowEngine::new(Arc::new(MemoryStore::new()))
}

fn moderator() -> Capabilities {
    Capabilities {
        can_approve: true,
        can_reject: true,
    }
}

#[tokio::test]
async fn documents_start_in_draft() {
    let engine = engine();
    let doc = engine.create().await.unwrap();
    assert_eq!(doc.status, DocumentStatus::Draft);
    assert!(doc.last_comment.is_none());
}

#[tokio::test]
async fn full_revision_cycle() {
    let engine = engine();
    let doc = engine.create().await.unwrap();

    // draft -> review -> published -> draft -> review -> rejected -> draft
    let steps = [
        DocumentStatus::Review,
        DocumentStatus::Published,
        DocumentStatus::Draft,
        DocumentStatus::Review,
        DocumentStatus::Rejected,
        DocumentStatus::Draft,
    ];

    for target in steps {
        let updated = engine
            .transition(&doc.id, target, moderator(), None)
            .await
            .unwrap();
        assert_eq!(updated.status, target);
    }

    let doc = engine.get(&doc.id).await.unwrap();
    assert_eq!(doc.status, DocumentStatus::Draft);
}

#[tokio::test]
async fn rejects_edges_not_in_the_table() {
    let engine = engine();
    let doc = engine.create().await.unwrap();

    for target in [
        DocumentStatus::Published,
        DocumentStatus::Rejected,
        DocumentStatus::Draft,
    ] {
        let err = engine
            .transition(&doc.id, target, moderator(), None)
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                WorkflowError::InvalidTransition {
                    from: DocumentStatus::Draft,
                    ..
                }
            ),
            "draft -> {target} should be invalid"
        );
    }

    // A published document can only go back to draft.
    engine
        .transition(&doc.id, DocumentStatus::Review, moderator(), None)
        .await
        .unwrap();
    engine
        .transition(&doc.id, DocumentStatus::Published, moderator(), None)
        .await
        .unwrap();
    for target in [
        DocumentStatus::Review,
        DocumentStatus::Rejected,
        DocumentStatus::Published,
    ] {
        let err = engine
            .transition(&doc.id, target, moderator(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }
}

#[tokio::test]
async fn approval_requires_capability() {
    let engine = engine();
    let doc = engine.create().await.unwrap();
    engine
        .transition(&doc.id, DocumentStatus::Review, Capabilities::default(), None)
        .await
        .unwrap();

    let err = engine
        .transition(
            &doc.id,
            DocumentStatus::Published,
            Capabilities::default(),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingCapability("canApprove")));

    // Still in review; the failed attempt must not have written anything.
    let doc = engine.get(&doc.id).await.unwrap();
    assert_eq!(doc.status, DocumentStatus::Review);

    // A reject-only moderator cannot approve either.
    let reject_only = Capabilities {
        can_approve: false,
        can_reject: true,
    };
    let err = engine
        .transition(&doc.id, DocumentStatus::Published, reject_only, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingCapability("canApprove")));
}

#[tokio::test]
async fn rejection_requires_capability() {
    let engine = engine();
    let doc = engine.create().await.unwrap();
    engine
        .transition(&doc.id, DocumentStatus::Review, Capabilities::default(), None)
        .await
        .unwrap();

    let approve_only = Capabilities {
        can_approve: true,
        can_reject: false,
    };
    let err = engine
        .transition(&doc.id, DocumentStatus::Rejected, approve_only, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingCapability("canReject")));
}

#[tokio::test]
async fn unprivileged_edges_need_no_capability() {
    let engine = engine();
    let doc = engine.create().await.unwrap();
    let none = Capabilities::default();

    engine
        .transition(&doc.id, DocumentStatus::Review, none, None)
        .await
        .unwrap();
    engine
        .transition(&doc.id, DocumentStatus::Rejected, moderator(), None)
        .await
        .unwrap();
    // revise and resubmit
    let doc = engine
        .transition(&doc.id, DocumentStatus::Draft, none, None)
        .await
        .unwrap();
    assert_eq!(doc.status, DocumentStatus::Draft);
}

#[tokio::test]
async fn comment_is_recorded_and_kept() {
    let engine = engine();
    let doc = engine.create().await.unwrap();

    let doc = engine
        .transition(
            &doc.id,
            DocumentStatus::Review,
            moderator(),
            Some("ready for review".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(doc.last_comment.as_deref(), Some("ready for review"));

    // A transition without a comment keeps the previous note.
    let doc = engine
        .transition(&doc.id, DocumentStatus::Published, moderator(), None)
        .await
        .unwrap();
    assert_eq!(doc.last_comment.as_deref(), Some("ready for review"));

    let doc = engine
        .transition(
            &doc.id,
            DocumentStatus::Draft,
            moderator(),
            Some("unpublishing for edits".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(doc.last_comment.as_deref(), Some("unpublishing for edits"));
}

#[tokio::test]
async fn transition_stamps_updated_at() {
    let engine = engine();
    let doc = engine.create().await.unwrap();
    let created_at = doc.updated_at;

    let updated = engine
        .transition(&doc.id, DocumentStatus::Review, moderator(), None)
        .await
        .unwrap();
    assert!(updated.updated_at >= created_at);
}

#[tokio::test]
async fn missing_document_is_a_persistence_error() {
    let engine = engine();
    let err = engine
        .transition("no-such-doc", DocumentStatus::Review, moderator(), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Persistence(StoreError::NotFound(_))
    ));
}

#[test]
fn status_serializes_lowercase() {
    for status in DocumentStatus::ALL {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{status}\""));
        let round: DocumentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(round, status);
    }

    // Nothing outside the closed set deserializes.
    assert!(serde_json::from_str::<DocumentStatus>("\"archived\"").is_err());
}

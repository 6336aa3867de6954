//! HTTP API server
//!
//! This module provides the REST surface for the relay and the editorial
//! workflow:
//! - GET  /webhook - provider challenge handshake
//! - POST /webhook - provider event notifications
//! - POST /meetings - create a scheduled meeting
//! - GET  /meetings/:meeting_id - fetch a meeting from the provider
//! - POST /documents - create a draft document
//! - GET  /documents/:document_id - fetch a document
//! - POST /documents/:document_id/transition - move a document along the workflow
//! - GET  /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

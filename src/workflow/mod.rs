//! Editorial document workflow
//!
//! Blog posts and other editorial content move through a cyclic revision
//! lifecycle: draft → review → published/rejected → draft. The engine in this
//! module is the only code path allowed to write the status field.

mod engine;
mod status;

pub use engine::{WorkflowEngine, WorkflowError};
pub use status::{Capabilities, DocumentStatus};

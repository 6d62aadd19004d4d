//! Shared response body types for API handlers.

use serde::Serialize;

/// `{ "message": ... }` acknowledgement for state-changing endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

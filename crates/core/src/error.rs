use crate::types::DbId;

/// Domain error shared by every workflow.
///
/// The API layer maps each variant onto an HTTP status; nothing in this crate
/// knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The object store rejected a required upload. Raised before anything is
    /// persisted.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Message returned for every request that lacks an authenticated actor.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized action.";

impl CoreError {
    /// Shorthand for the unauthenticated-actor rejection.
    pub fn unauthorized() -> Self {
        CoreError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }
}

//! Translation of sqlx failures into domain errors.

use backoffice_core::error::CoreError;
use backoffice_core::workflows::settings_update::INVALID_INPUT_MESSAGE;

/// PostgreSQL `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Classify a sqlx error as a [`CoreError`].
///
/// A foreign-key violation means the client referenced a missing row (e.g. an
/// unknown default role) and becomes a validation error. Everything else is
/// internal; the driver detail is logged here and never surfaced.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            tracing::debug!(
                constraint = db_err.constraint().unwrap_or("unknown"),
                "Foreign key violation"
            );
            return CoreError::Validation(INVALID_INPUT_MESSAGE.to_string());
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

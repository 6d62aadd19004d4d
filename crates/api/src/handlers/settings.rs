//! Handler for the general settings update.

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use backoffice_core::error::CoreError;
use backoffice_core::settings::{LogoUpload, RawSettingsForm};
use backoffice_core::types::Actor;
use backoffice_core::workflows::settings_update::{self, SETTINGS_UPDATED_MESSAGE};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Multipart field carrying the logo file.
const LOGO_FIELD: &str = "logoFile";

/// POST /api/v1/settings-update
///
/// Accepts `multipart/form-data` with the settings text fields and an optional
/// `logoFile` part.
pub async fn update_settings(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    ClientIp(client_ip): ClientIp,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    // Reject before reading a potentially large body.
    let actor = user.map(Actor::from).ok_or_else(CoreError::unauthorized)?;

    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = read_form(multipart).await?;

    let updated = settings_update::update_settings(
        &state.store,
        state.objects.as_ref(),
        Some(&actor),
        &client_ip,
        form,
    )
    .await?;

    tracing::debug!(user_id = actor.user_id, logo = ?updated.logo, "Settings update handled");

    Ok(Json(MessageResponse {
        message: SETTINGS_UPDATED_MESSAGE,
    }))
}

/// Collect the multipart parts into a raw form. Unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> AppResult<RawSettingsForm> {
    let mut form = RawSettingsForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == LOGO_FIELD {
            form.logo_file = Some(read_file(field).await?);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            form.set_text(&name, value);
        }
    }

    Ok(form)
}

async fn read_file(field: Field<'_>) -> AppResult<LogoUpload> {
    let file_name = field.file_name().unwrap_or(LOGO_FIELD).to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;

    Ok(LogoUpload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

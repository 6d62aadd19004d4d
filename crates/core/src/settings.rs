//! System settings form validation.
//!
//! Turns the raw multipart fields of the general-settings form into a typed
//! [`SettingsSubmission`], or reports every field that failed. Pure logic;
//! no I/O happens here.

use std::sync::LazyLock;

use regex::Regex;
use validator::Validate;

use crate::types::DbId;

/// Well-known key of the system settings singleton row.
pub const SETTINGS_SINGLETON_ID: DbId = 1;

/// Maximum length of the organisation name.
pub const MAX_NAME_LEN: u64 = 100;

/// Maximum length of the postal address.
pub const MAX_ADDRESS_LEN: u64 = 500;

/// Maximum length of the short locale-style fields (language, timezone, ...).
pub const MAX_SHORT_FIELD_LEN: u64 = 50;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+().\- ]+$").expect("phone pattern is valid"));

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern is valid"));

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// A binary logo file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl LogoUpload {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Raw general-settings form, one slot per multipart field.
///
/// Every value is kept exactly as received; interpretation happens in
/// [`validate_settings_form`].
#[derive(Debug, Clone, Default)]
pub struct RawSettingsForm {
    pub name: Option<String>,
    pub logo_action: Option<String>,
    pub active: Option<String>,
    pub address: Option<String>,
    pub website_url: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
    pub currency_format: Option<String>,
    pub default_user_role_id: Option<String>,
    pub logo_file: Option<LogoUpload>,
}

impl RawSettingsForm {
    /// Build a form from `(field name, value)` pairs using the client's field
    /// names (`websiteURL`, `supportEmail`, ...).
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (name, value) in fields {
            form.set_text(name.as_ref(), value.into());
        }
        form
    }

    /// Assign a text field by its client-side name.
    ///
    /// Returns `false` for names the form does not know; those are ignored.
    pub fn set_text(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "logoAction" => &mut self.logo_action,
            "active" => &mut self.active,
            "address" => &mut self.address,
            "websiteURL" => &mut self.website_url,
            "supportEmail" => &mut self.support_email,
            "supportPhone" => &mut self.support_phone,
            "language" => &mut self.language,
            "timezone" => &mut self.timezone,
            "currency" => &mut self.currency,
            "currencyFormat" => &mut self.currency_format,
            "defaultUserRoleId" => &mut self.default_user_role_id,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

// ---------------------------------------------------------------------------
// Validated output
// ---------------------------------------------------------------------------

/// What the client wants done with the stored logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoAction {
    Save,
    Remove,
}

impl LogoAction {
    /// Parse the `logoAction` tag. Blank means "leave the logo alone".
    fn parse(raw: Option<&str>) -> Result<Option<Self>, ()> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some("save") => Ok(Some(Self::Save)),
            Some("remove") => Ok(Some(Self::Remove)),
            Some(_) => Err(()),
        }
    }
}

/// Settings fields that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ValidatedSettings {
    #[validate(length(min = 1, max = MAX_NAME_LEN))]
    pub name: String,
    pub active: bool,
    #[validate(length(max = MAX_ADDRESS_LEN))]
    pub address: Option<String>,
    #[validate(url)]
    pub website_url: Option<String>,
    #[validate(email)]
    pub support_email: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LEN), regex(path = *PHONE_RE))]
    pub support_phone: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LEN))]
    pub language: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LEN))]
    pub timezone: Option<String>,
    #[validate(regex(path = *CURRENCY_RE))]
    pub currency: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LEN))]
    pub currency_format: Option<String>,
    #[validate(range(min = 1))]
    pub default_user_role_id: Option<DbId>,
}

/// A fully validated settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSubmission {
    pub settings: ValidatedSettings,
    pub logo_action: Option<LogoAction>,
    /// Present only when a non-empty file was attached.
    pub logo_file: Option<LogoUpload>,
}

/// Validation failure naming each rejected field by its client-side name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid settings fields: {}", fields.join(", "))]
pub struct SettingsValidationError {
    pub fields: Vec<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw settings form.
///
/// `active` is `true` only for the literal string `"true"`. Blank optional
/// fields become `None`. All failing fields are reported together, sorted by
/// name.
pub fn validate_settings_form(
    form: RawSettingsForm,
) -> Result<SettingsSubmission, SettingsValidationError> {
    let mut invalid: Vec<String> = Vec::new();

    let logo_action = LogoAction::parse(form.logo_action.as_deref()).unwrap_or_else(|()| {
        invalid.push("logoAction".to_string());
        None
    });

    let default_user_role_id = match non_blank(form.default_user_role_id) {
        None => None,
        Some(raw) => match raw.parse::<DbId>() {
            Ok(id) => Some(id),
            Err(_) => {
                invalid.push("defaultUserRoleId".to_string());
                None
            }
        },
    };

    let settings = ValidatedSettings {
        name: form.name.map(|n| n.trim().to_string()).unwrap_or_default(),
        active: form.active.as_deref() == Some("true"),
        address: non_blank(form.address),
        website_url: non_blank(form.website_url),
        support_email: non_blank(form.support_email),
        support_phone: non_blank(form.support_phone),
        language: non_blank(form.language),
        timezone: non_blank(form.timezone),
        currency: non_blank(form.currency),
        currency_format: non_blank(form.currency_format),
        default_user_role_id,
    };

    if let Err(errors) = settings.validate() {
        invalid.extend(
            errors
                .field_errors()
                .keys()
                .map(|field| form_field_name(field).to_string()),
        );
    }

    if !invalid.is_empty() {
        invalid.sort();
        invalid.dedup();
        return Err(SettingsValidationError { fields: invalid });
    }

    Ok(SettingsSubmission {
        settings,
        logo_action,
        logo_file: form.logo_file.filter(|file| !file.is_empty()),
    })
}

/// Trim a value and drop it entirely when nothing is left.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Map a struct field name back to the name the client submitted.
fn form_field_name(field: &str) -> &str {
    match field {
        "website_url" => "websiteURL",
        "support_email" => "supportEmail",
        "support_phone" => "supportPhone",
        "currency_format" => "currencyFormat",
        "default_user_role_id" => "defaultUserRoleId",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! State-changing and read workflows behind the HTTP routes.
//!
//! Each workflow takes the actor explicitly (`None` when the request was not
//! authenticated) and rejects anonymous calls before touching any store.

pub mod activity_logs;
pub mod role_default;
pub mod settings_update;

/// Client address recorded when the request origin is unknown.
pub const UNKNOWN_CLIENT_IP: &str = "unknown";

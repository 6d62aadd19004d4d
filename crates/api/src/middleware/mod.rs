//! Request extractors.
//!
//! - [`auth::AuthUser`] -- The authenticated user from a JWT Bearer token.
//! - [`client_ip::ClientIp`] -- The originating client address.

pub mod auth;
pub mod client_ip;

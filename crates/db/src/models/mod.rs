//! Row structs for each table.
//!
//! Each submodule holds a `FromRow` entity matching the database row.

pub mod system_log;
pub mod system_setting;
pub mod user_role;

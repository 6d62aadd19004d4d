//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept any PostgreSQL executor as the first argument: `&PgPool` for
//! standalone reads, `&mut *tx` inside a transaction.

pub mod system_log_repo;
pub mod system_setting_repo;
pub mod user_role_repo;

pub use system_log_repo::SystemLogRepo;
pub use system_setting_repo::SystemSettingRepo;
pub use user_role_repo::UserRoleRepo;

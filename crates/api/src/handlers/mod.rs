pub mod activity_logs;
pub mod roles;
pub mod settings;

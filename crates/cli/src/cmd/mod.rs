//! CLI command implementations

pub mod config;
pub mod init;
pub mod log;
pub mod reset;
pub mod save;
pub mod set;
pub mod show;

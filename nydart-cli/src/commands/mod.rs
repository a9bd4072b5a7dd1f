//! Subcommand implementations.

pub mod analyze;
pub mod compress;
pub mod delete;
pub mod health;
pub mod history;
pub mod show;

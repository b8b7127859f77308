//! Subcommand implementations.

pub mod auth;
pub mod check;
pub mod health;
pub mod job;
pub mod report;
pub mod targets;

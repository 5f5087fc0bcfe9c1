//! Top-level subcommand orchestration.
pub mod convert;
pub mod version;

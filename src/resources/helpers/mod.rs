//! Shared helpers for artifact rendering.
pub mod fs;

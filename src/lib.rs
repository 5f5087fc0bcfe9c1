//! Configuration channel to Puppet module converter.
//!
//! Reads an exported configuration channel (files, directories, symlinks)
//! and writes a Puppet module: plain files under `files/`, files whose
//! macros were rewritten into Puppet variables under `templates/`, and one
//! resource declaration per artifact spliced into the module manifest.
//!
//! The public API is organised into layers:
//!
//! - **[`tags`]**: macro substitution with a replaceable mapping table
//! - **[`resources`]**: validated artifacts that render to disk and to
//!   resource declarations
//! - **[`store`]** and **[`manifest`]**: collect artifacts and patch the
//!   module manifest
//! - **[`channel`]**, **[`naming`]**, **[`scaffold`]**: inputs and module
//!   preparation
//! - **[`commands`]**: top-level subcommand orchestration (`convert`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod channel;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod manifest;
pub mod naming;
pub mod resources;
pub mod scaffold;
pub mod store;
pub mod tags;

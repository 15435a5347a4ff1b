//! Windows workstation provisioning utilities.
//!
//! A set of small programs that bring a Windows machine to a described
//! state: unpack and create password-protected archives, download and
//! install tools, toggle Explorer and date/time settings, enable SSH,
//! install VS Code extensions, and edit VS Code and Windows Terminal
//! settings. Each program lives in `src/bin/` and is a thin wrapper over a
//! pipeline in [`commands`].
//!
//! The library is layered:
//!
//! - **[`config`]**: parse YAML documents and resolve keys case-insensitively
//! - **[`archive`]**, **[`download`]**, **[`settings`]**, **[`script`]**:
//!   the primitives the pipelines are built from
//! - **[`commands`]**: one pipeline per program
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod download;
pub mod error;
pub mod exec;
pub mod installers;
pub mod logging;
pub mod platform;
pub mod script;
pub mod settings;
pub mod timestamp;

/// Version reported by `--version`: `WORKSTATION_VERSION` at build time,
/// else the package version.
pub const VERSION: &str = match option_env!("WORKSTATION_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

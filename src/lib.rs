//! Zsh environment provisioning engine.
//!
//! Detects the host, installs oh-my-zsh together with the selected plugins,
//! tools and themes, and generates the shell configuration from templates.
//! The user's selection is persisted as a desired-state document and can
//! be recovered from an existing rc file.
//!
//! The public API is organised into layers:
//!
//! - **[`platform`]**, **[`packages`]**: environment detection and package-manager adapters
//! - **[`installer`]**, **[`themes`]**, **[`header`]**: what to install and how
//! - **[`templates`]**, **[`generator`]**, **[`state`]**: configuration output and persistence
//! - **[`tasks`]**: the ordered provisioning steps
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod generator;
pub mod header;
pub mod installer;
pub mod logging;
pub mod packages;
pub mod platform;
pub mod progress;
pub mod state;
pub mod tasks;
pub mod templates;
pub mod themes;

/// Version string, stamped by the build script when available.
#[must_use]
pub fn version() -> &'static str {
    option_env!("OMEGA_ZSH_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

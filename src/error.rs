//! Domain-specific error types for the provisioning engine.
//!
//! Internal modules return typed errors (e.g. [`StateError`],
//! [`TemplateError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! Several components have best-effort contracts (state loading, config
//! generation, package installs). Those catch these errors at their public
//! boundary, log them, and degrade to a default or a `false` result.
//!
//! # Error hierarchy
//!
//! ```text
//! OmegaError
//! ├── Config(ConfigError)     home resolution, settings.toml
//! ├── State(StateError)       state.json read / parse / write
//! ├── Generate(GenerateError) template render + atomic write
//! └── Platform(PlatformError) package-manager family, process spawn
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the provisioning engine.
#[derive(Error, Debug)]
pub enum OmegaError {
    /// Configuration-related error (paths, settings file).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Desired-state persistence error.
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Configuration file generation error.
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    /// Platform-specific operation error.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors that arise while resolving paths and loading `settings.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `--home` nor the `HOME` environment variable is available.
    #[error("cannot determine home directory: HOME is not set")]
    MissingHome,

    /// The settings file exists but could not be read.
    #[error("IO error reading settings file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the expected schema.
    #[error("Invalid settings in {path}: {message}")]
    InvalidSyntax {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Errors that arise while reading or writing the persisted state document.
#[derive(Error, Debug)]
pub enum StateError {
    /// The state document could not be read.
    #[error("failed to read state {path}: {source}")]
    Read {
        /// Path of the state document.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The state document is not a well-formed state record.
    #[error("malformed state document {path}: {source}")]
    Parse {
        /// Path of the state document.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The state document could not be written.
    #[error("failed to write state {path}: {source}")]
    Write {
        /// Path of the state document.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The state record could not be serialized.
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors produced while looking up or rendering a named template.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// No template with this name exists in the override directory or the
    /// embedded set.
    #[error("template '{0}' not found")]
    NotFound(String),

    /// The template references a key the context does not provide.
    #[error("template '{template}' references unknown key '{key}'")]
    MissingKey {
        /// Template name.
        template: String,
        /// Placeholder key.
        key: String,
    },

    /// A `{{` opener has no matching `}}`.
    #[error("template '{template}' has an unterminated placeholder at byte {offset}")]
    Unterminated {
        /// Template name.
        template: String,
        /// Byte offset of the opening braces.
        offset: usize,
    },

    /// An override template file exists but could not be read.
    #[error("template '{name}' could not be read: {message}")]
    Unreadable {
        /// Template name.
        name: String,
        /// I/O error message.
        message: String,
    },
}

/// Errors that arise while generating a configuration file.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Template lookup or rendering failed; nothing was written.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A filesystem step (backup, temp write, rename) failed.
    #[error("{action} {path}: {source}")]
    Io {
        /// What was being attempted (e.g. "backup", "write").
        action: &'static str,
        /// Path involved in the failed step.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from platform-specific operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No adapter exists for the detected package-manager family.
    #[error("no supported package manager detected on {platform}")]
    Unsupported {
        /// Description of the host (distribution id).
        platform: String,
    },

    /// A child process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

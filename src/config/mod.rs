//! Paths layout and optional tool settings.
pub mod paths;
pub mod settings;
pub mod toml_loader;

pub use paths::Paths;
pub use settings::{PersonalDefaults, Settings};

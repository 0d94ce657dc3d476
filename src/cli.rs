//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "omega-zsh",
    about = "Provision zsh with oh-my-zsh, plugins, themes and a generated rc file",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// Short name of the selected subcommand, used to name the log file.
    #[must_use]
    pub const fn command_name(&self) -> &'static str {
        match self.command {
            Command::Provision => "provision",
            Command::Apply => "apply",
            Command::Select(_) => "select",
            Command::Status => "status",
            Command::Themes => "themes",
            Command::Update => "update",
            Command::Completions { .. } => "completions",
            Command::Version => "version",
        }
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Treat this directory as the home directory instead of $HOME
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Override the omega-zsh checkout used by `update`
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save the desired state and run every provisioning step
    Provision,
    /// Regenerate the shell configuration from the desired state
    Apply,
    /// Change the desired state
    #[command(subcommand)]
    Select(SelectCommand),
    /// Show the detected environment and the desired state
    Status,
    /// List available themes
    Themes,
    /// Update the omega-zsh checkout with git
    Update,
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

/// Mutations of the desired state. Each one is saved immediately.
#[derive(Subcommand, Debug, Clone)]
pub enum SelectCommand {
    /// Add plugins to the selection
    Add {
        /// Plugin identifiers
        #[arg(required = true, value_delimiter = ',')]
        plugins: Vec<String>,
    },
    /// Remove plugins from the selection
    Remove {
        /// Plugin identifiers
        #[arg(required = true, value_delimiter = ',')]
        plugins: Vec<String>,
    },
    /// Replace the whole plugin selection
    Plugins {
        /// Plugin identifiers, in activation order
        #[arg(value_delimiter = ',')]
        plugins: Vec<String>,
    },
    /// Set the theme for regular users
    Theme {
        /// Theme identifier
        id: String,
    },
    /// Set the theme for the root user
    RootTheme {
        /// Theme identifier
        id: String,
    },
    /// Set the header shown when a shell starts
    Header {
        /// Header style (fastfetch, figlet_slant, figlet_standard, figlet_custom, cow, none)
        style: String,

        /// Text rendered by figlet styles
        #[arg(long)]
        text: Option<String>,

        /// Figlet font used by figlet_custom
        #[arg(long)]
        font: Option<String>,
    },
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "gnoss-api")]
#[command(about = "Client for the GNOSS platform API")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.gnoss-api)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Inspect and resolve community categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Load and delete resources in bulk
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., api.base_url)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., load.attempts)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Print the category tree of a community
    Tree {
        /// Community short name
        community: String,

        /// Language of multi-valued names (e.g., es)
        #[arg(short, long)]
        lang: Option<String>,

        /// Show category ids
        #[arg(long)]
        ids: bool,
    },

    /// Resolve category text to category ids
    Resolve {
        /// Community short name
        community: String,

        /// Match plain names anywhere instead of Root|Child paths
        #[arg(long)]
        flat: bool,

        /// Category paths (e.g., "Tech|AI") or names with --flat
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ResourceAction {
    /// Load resources from a JSON array of drafts
    Load {
        /// Community short name
        community: String,

        /// JSON file: [{"title": ..., "categories": ["Tech|AI"]}, ...]
        file: PathBuf,

        /// Categories in the file are plain names, not paths
        #[arg(long)]
        flat: bool,
    },

    /// Delete resources by id
    Delete {
        /// Community short name
        community: String,

        /// Resource ids
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
}

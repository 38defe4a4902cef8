//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::OrgId;

/// Multi-tenant folder hierarchies: list, look up, relocate and aggregate folders
#[derive(Parser, Debug)]
#[command(name = "foldertree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// TOML dataset of folder records (default: built-in sample data)
    #[arg(long, global = true, env = "FOLDERTREE_DATA", value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all folders of an organization in pre-order
    List {
        /// Organization id
        org: OrgId,
    },

    /// List a folder and all its descendants
    Children {
        /// Organization id the folder must belong to
        org: OrgId,
        /// Folder name
        name: String,
    },

    /// Locate a folder by name across all organizations
    Find {
        /// Folder name
        name: String,
    },

    /// Move a folder (and its subtree) under a new parent
    Move {
        /// Folder to move
        name: String,
        /// New parent folder
        new_parent: String,
    },

    /// List folders of every organization (collected concurrently)
    All,

    /// Show folder hierarchy as tree
    Tree {
        /// Organization id (default: all organizations)
        org: Option<OrgId>,
    },

    /// Run the reference move sequence on the dataset and list everything
    Demo,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,
    /// Print a template config file
    Template,
    /// Show config file locations
    Path,
}

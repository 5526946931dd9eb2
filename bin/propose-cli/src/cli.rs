//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::draft::DraftField;

/// propose – turn sales-call material into growth proposals.
#[derive(Debug, Parser)]
#[command(name = "propose", version, about = "Generate sales proposals from call recordings, documents or notes")]
pub struct Cli {
    /// Base URL of the propose-server instance
    #[arg(long, global = true, env = "PROPOSE_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Path of the draft file holding the current form state
    #[arg(long, global = true, env = "PROPOSE_DRAFT", default_value = "propose-draft.json")]
    pub draft: PathBuf,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or edit the draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Generate one or two proposals from the draft
    Generate {
        /// Write the proposal here instead of stdout; a second variant goes
        /// next to it with a `-2` suffix
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Revise an existing proposal with a change request
    Revise {
        /// File holding the current proposal
        #[arg(short, long)]
        proposal: PathBuf,

        /// What should change, in plain words
        request: String,

        /// Write the revised proposal here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the models the server offers
    Models,
}

#[derive(Debug, Subcommand)]
pub enum DraftAction {
    /// Create a fresh draft file
    Init {
        /// Overwrite an existing draft
        #[arg(long)]
        force: bool,
    },

    /// Print the draft as JSON
    Show,

    /// Set one field; prefix the value with `@` to read it from a file
    Set {
        field: DraftField,
        value: String,
    },
}

//! Command-line interface definition for the `maconomy` binary.
//!
//! Uses clap's derive API. Dates are taken as plain strings here and parsed
//! by `maconomy_core::parse_date` in the command handlers, so every accepted
//! format is handled in one place.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage Maconomy timesheet entries from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "maconomy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "MACONOMY_CONFIG")]
    pub config: Option<PathBuf>,

    /// RPC endpoint URL, overrides the configuration file
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Log in and store the session id for later commands
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "MACONOMY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the timesheet lines of a period
    Period {
        /// First day (YYYY.MM.DD, YYYY-MM-DD or YYYYMMDD)
        start: String,

        /// Last day, defaults to six days after start
        end: Option<String>,
    },

    /// Record hours on one or more days
    Add {
        /// Project (job) number
        project: String,

        task: String,

        /// Sent to the server exactly as typed, e.g. 7.5
        hours: String,

        /// Days to record the hours on
        #[arg(required = true)]
        dates: Vec<String>,

        /// Entry text of the line
        #[arg(short, long)]
        text: String,

        /// Daily description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Existing line to update instead of creating a new one
        #[arg(short = 'k', long)]
        line_key: Option<String>,
    },

    /// Delete a timesheet line
    Delete {
        line_key: String,

        /// Any day in the line's week
        date: String,
    },

    /// Search recently used projects
    Projects {
        #[arg(default_value = "")]
        query: String,
    },

    /// Search the tasks of a project
    Tasks {
        project: String,

        #[arg(default_value = "")]
        query: String,
    },

    /// List timesheet periods
    Periods,

    /// Show daily totals for a date range
    Totals { from: String, to: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

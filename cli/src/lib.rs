//! Command-line front end for `maconomy-core`.
//!
//! Logs in, persists the session id to a file and maps subcommands onto
//! client operations.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod session;

//! Kickoff CLI library.
//!
//! Argument parsing, configuration and command handlers for the `kickoff`
//! binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod files;

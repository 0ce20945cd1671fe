//! Huddle CLI library
//!
//! Argument parsing and subcommand implementations for the `huddle` binary.

pub mod cli;
pub mod commands;

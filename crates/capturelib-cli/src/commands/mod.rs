//! Subcommand implementations.

pub mod clear;
pub mod config;
pub mod list;
pub mod remove;
pub mod scan;
pub mod status;

//! CLI subcommands

pub mod upload;

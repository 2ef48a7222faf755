//! beam - publish TV/STB apps to an app-store back office
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! The CLI validates an app's `metadata.json`, bundles its source,
//! packages the result as a `.tgz`, and uploads it for publication.
//!
//! # Pipeline
//!
//! ```text
//! validate metadata -> install deps -> bundle -> stage assets
//!                   -> pack .tgz -> size guard -> upload
//! ```
//!
//! Apps with an `externalUrl` skip the install and bundle stages.

pub mod cmd;
pub mod ui;

pub use beam_core::api::DEFAULT_API_URL;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "beam")]
#[command(author, version, about = "beam - package and publish apps to the App Store")]
pub struct Cli {
    /// Print environment diagnostics and verbose stage logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 🚀   Upload the app to the back office to be published in an App Store
    Upload {
        /// Back-office API base URL
        #[arg(long, env = "BEAM_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
    },
}

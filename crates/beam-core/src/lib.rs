//! Core library for beam.
//!
//! Implements the upload pipeline for TV/STB apps: load and validate
//! `metadata.json`, install dependencies and bundle the app, stage the
//! distributable files, pack them into a `.tgz`, enforce the upload size
//! ceiling, and submit the archive to the app-store back office.
//!
//! Execution is strictly sequential; every stage is awaited to completion
//! (success, soft-fail, or fatal error) before the next begins. Nothing is
//! retried. See [`pipeline::run`] for the full sequence.

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod keystore;
pub mod metadata_io;
pub mod paths;
pub mod pipeline;
pub mod reporter;
pub mod stage;
pub mod toolchain;

pub use config::BuildConfig;
pub use error::PipelineError;
pub use reporter::{NullReporter, Reporter};

/// User agent sent on every back-office request.
pub const USER_AGENT: &str = concat!("beam/", env!("CARGO_PKG_VERSION"));

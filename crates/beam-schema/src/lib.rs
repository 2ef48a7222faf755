//! Shared metadata types and validation rules for beam.
//!
//! An app's `metadata.json` is the single source of truth for its identity
//! in the app store. This crate owns the typed [`Metadata`] record and the
//! declarative rule table that gates every upload: a metadata object that
//! fails validation never reaches the packaging or upload stages.

pub mod metadata;
pub mod validate;

pub use metadata::Metadata;
pub use validate::{ValidationError, validate};

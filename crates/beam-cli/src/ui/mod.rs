//! Console output and prompting.

pub mod output;
pub mod prompt;

pub use output::Output;

//! Reporter trait for dependency injection.
//!
//! Lets the pipeline report stage progress without being coupled to a
//! specific terminal implementation.

/// Progress and status sink for pipeline stages.
pub trait Reporter: Send + Sync {
    /// A stage has started (e.g. "Installing app dependencies").
    fn step(&self, msg: &str);

    /// The current stage finished successfully.
    fn succeed(&self);

    /// The current stage failed with a visible reason.
    fn fail(&self, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

/// A no-op reporter for silent operations (e.g. testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn step(&self, _: &str) {}
    fn succeed(&self) {}
    fn fail(&self, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}

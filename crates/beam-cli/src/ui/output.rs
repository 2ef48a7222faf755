//! Console status output.
//!
//! Each pipeline stage announces itself via [`Output::step`] and is closed
//! with either a green check ([`Output::succeed`]) or a red cross plus
//! reason ([`Output::fail`]). The pipeline is strictly sequential, so plain
//! line-by-line printing is enough; no live spinner or redraw machinery.

use beam_core::Reporter;
use crossterm::style::Stylize;
use std::sync::Mutex;

/// A console handle implementing [`Reporter`] for the pipeline.
#[derive(Debug, Default)]
pub struct Output {
    current_step: Mutex<Option<String>>,
}

impl Output {
    /// Create a new output handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a stage. Closed later by `succeed` or `fail`.
    pub fn step(&self, msg: &str) {
        if let Ok(mut current) = self.current_step.lock() {
            *current = Some(msg.to_string());
        }
    }

    /// Close the current stage with a green check.
    pub fn succeed(&self) {
        if let Ok(mut current) = self.current_step.lock() {
            if let Some(msg) = current.take() {
                println!("{} {msg}", "✔".green());
            }
        }
    }

    /// Close the current stage with a red cross and a reason.
    pub fn fail(&self, reason: &str) {
        if let Ok(mut current) = self.current_step.lock() {
            match current.take() {
                Some(msg) => println!("{} {msg}: {}", "✖".red(), reason.red()),
                None => println!("{} {}", "✖".red(), reason.red()),
            }
        }
    }

    /// Plain informational line.
    pub fn info(&self, msg: &str) {
        println!("{msg}");
    }

    /// Success line outside the step cycle.
    pub fn success(&self, msg: &str) {
        println!("{} {}", "✔".green(), msg.green());
    }

    /// Yellow warning line.
    pub fn warning(&self, msg: &str) {
        println!("{}", msg.yellow());
    }

    /// Red error line.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }
}

impl Reporter for Output {
    fn step(&self, msg: &str) {
        self.step(msg);
    }

    fn succeed(&self) {
        self.succeed();
    }

    fn fail(&self, reason: &str) {
        self.fail(reason);
    }

    fn info(&self, msg: &str) {
        self.info(msg);
    }

    fn warning(&self, msg: &str) {
        self.warning(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }
}

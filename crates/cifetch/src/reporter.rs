//! The injected output interface the pipeline writes all user-facing text
//! through. The core never touches a console directly, so a run can be
//! observed (and unit-tested) by swapping the implementation.

use std::sync::Mutex;

pub trait Reporter: Send + Sync {
    /// Progress and informational messages.
    fn write_line(&self, text: &str);

    /// Failure diagnostics.
    fn write_error(&self, text: &str);
}

/// No-op reporter for unit tests.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn write_line(&self, _text: &str) {}
    fn write_error(&self, _text: &str) {}
}

/// Collecting reporter for tests — records every line and error.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("reporter lock poisoned").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("reporter lock poisoned").clone()
    }
}

impl Reporter for RecordingReporter {
    fn write_line(&self, text: &str) {
        self.lines
            .lock()
            .expect("reporter lock poisoned")
            .push(text.to_string());
    }

    fn write_error(&self, text: &str) {
        self.errors
            .lock()
            .expect("reporter lock poisoned")
            .push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_captures_in_order() {
        let reporter = RecordingReporter::new();
        reporter.write_line("first");
        reporter.write_line("second");
        reporter.write_error("boom");

        assert_eq!(reporter.lines(), vec!["first", "second"]);
        assert_eq!(reporter.errors(), vec!["boom"]);
    }

    #[test]
    fn test_null_reporter_accepts_output() {
        let reporter = NullReporter;
        reporter.write_line("ignored");
        reporter.write_error("ignored");
    }
}

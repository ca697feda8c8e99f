//! Status and progress reporting.
//!
//! Components report human-readable progress and transient status messages
//! through a narrow [`StatusSink`] trait, keeping the library free of any
//! rendering surface. The CLI plugs a progress bar in; tests plug a
//! recording sink in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long success and error messages stay visible before self-clearing.
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(5);

/// Severity class of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral progress information; never self-clears.
    Info,
    /// A completed operation.
    Success,
    /// A recoverable failure.
    Error,
}

impl Severity {
    /// Whether messages of this severity self-clear after a delay.
    pub fn is_transient(self) -> bool {
        matches!(self, Severity::Success | Severity::Error)
    }
}

/// Sink for status messages and fractional progress.
pub trait StatusSink {
    /// Surface a human-readable status message.
    fn status(&self, message: &str, severity: Severity);

    /// Report extraction progress as a percentage in `0.0..=100.0`.
    fn progress(&self, _percent: f32, _message: &str) {}
}

/// Sink that discards everything.
pub struct NullSink;

impl StatusSink for NullSink {
    fn status(&self, _message: &str, _severity: Severity) {}
}

/// Sink that records every report, for inspection in tests and batch runs.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(String, Severity)>>,
    progress: Mutex<Vec<(f32, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All status messages reported so far.
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }

    /// All progress reports so far.
    pub fn progress_reports(&self) -> Vec<(f32, String)> {
        self.progress.lock().unwrap().clone()
    }

    /// The most recent status message, if any.
    pub fn last_message(&self) -> Option<(String, Severity)> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl StatusSink for RecordingSink {
    fn status(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }

    fn progress(&self, percent: f32, message: &str) {
        self.progress
            .lock()
            .unwrap()
            .push((percent, message.to_string()));
    }
}

/// The currently displayed status message with transient self-clearing.
///
/// Success and error messages clear themselves after
/// [`STATUS_CLEAR_DELAY`]. The clearer re-checks the displayed severity
/// first so a newer message of a different class is never clobbered by a
/// stale timer.
#[derive(Clone, Default)]
pub struct StatusLine {
    inner: Arc<StatusLineInner>,
}

#[derive(Default)]
struct StatusLineInner {
    current: Mutex<Option<(String, Severity)>>,
    seq: AtomicU64,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message currently displayed, if any.
    pub fn current(&self) -> Option<(String, Severity)> {
        self.inner.current.lock().unwrap().clone()
    }

    /// Display a message, scheduling a self-clear for transient severities.
    pub fn set(&self, message: &str, severity: Severity) {
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.current.lock().unwrap() = Some((message.to_string(), severity));

        if severity.is_transient() {
            let line = self.clone();
            std::thread::spawn(move || {
                std::thread::sleep(STATUS_CLEAR_DELAY);
                line.clear_if_stale(severity, seq);
            });
        }
    }

    /// Remove the displayed message unconditionally.
    pub fn clear(&self) {
        self.inner.seq.fetch_add(1, Ordering::SeqCst);
        *self.inner.current.lock().unwrap() = None;
    }

    /// Clear only if `seq` is still the latest update and the displayed
    /// severity matches the severity the timer was scheduled for.
    fn clear_if_stale(&self, severity: Severity, seq: u64) {
        if self.inner.seq.load(Ordering::SeqCst) != seq {
            return;
        }
        let mut current = self.inner.current.lock().unwrap();
        if matches!(&*current, Some((_, s)) if *s == severity) {
            *current = None;
        }
    }
}

impl StatusSink for StatusLine {
    fn status(&self, message: &str, severity: Severity) {
        self.set(message, severity);
    }
}

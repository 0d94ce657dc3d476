//! One-way progress reporting from long-running operations.
//!
//! A [`ProgressSink`] receives human-readable status lines (one per line of
//! child-process output, or one per milestone). Sinks run synchronously on
//! the producing thread, so implementations only append to a buffer, forward
//! to the logger, or send on a channel.
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::logging::{Log, TaskStatus};

/// Receiver of progress lines.
pub trait ProgressSink: Send + Sync {
    /// Report one line.
    fn line(&self, msg: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn line(&self, msg: &str) {
        self(msg);
    }
}

/// Severity of a forwarded log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Stage header.
    Stage,
    /// Informational.
    Info,
    /// Debug detail.
    Debug,
    /// Warning.
    Warn,
    /// Error.
    Error,
}

/// Event sent from the provisioning worker to the interaction thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A progress line.
    Line(String),
    /// A log message emitted by a step.
    Message(Level, String),
    /// The worker finished all steps.
    Finished,
}

impl ProgressEvent {
    /// Replay this event on `log`. Returns `false` for [`Finished`](Self::Finished).
    pub fn replay(&self, log: &dyn Log) -> bool {
        match self {
            Self::Line(msg) => log.progress(msg),
            Self::Message(Level::Stage, msg) => log.stage(msg),
            Self::Message(Level::Info, msg) => log.info(msg),
            Self::Message(Level::Debug, msg) => log.debug(msg),
            Self::Message(Level::Warn, msg) => log.warn(msg),
            Self::Message(Level::Error, msg) => log.error(msg),
            Self::Finished => return false,
        }
        true
    }
}

/// Sink that forwards every line over an [`mpsc`](std::sync::mpsc) channel.
///
/// Sending never blocks; if the receiver has hung up the line is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<ProgressEvent>,
}

impl ChannelSink {
    /// Wrap the sending half of a progress channel.
    #[must_use]
    pub const fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Signal that the worker is done.
    pub fn finish(&self) {
        self.tx.send(ProgressEvent::Finished).ok();
    }
}

impl ProgressSink for ChannelSink {
    fn line(&self, msg: &str) {
        self.tx.send(ProgressEvent::Line(msg.to_string())).ok();
    }
}

/// [`Log`] for the provisioning worker.
///
/// Messages travel over the same channel as progress lines so the
/// interaction thread prints them in the order they were produced. Task
/// results are recorded directly on the shared logger.
pub struct ChannelLog {
    tx: Sender<ProgressEvent>,
    results: Arc<dyn Log>,
}

impl ChannelLog {
    /// Forward messages over `tx`; record task results on `results`.
    #[must_use]
    pub fn new(tx: Sender<ProgressEvent>, results: Arc<dyn Log>) -> Self {
        Self { tx, results }
    }

    fn send(&self, level: Level, msg: &str) {
        self.tx
            .send(ProgressEvent::Message(level, msg.to_string()))
            .ok();
    }
}

impl std::fmt::Debug for ChannelLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelLog").finish_non_exhaustive()
    }
}

impl Log for ChannelLog {
    fn stage(&self, msg: &str) {
        self.send(Level::Stage, msg);
    }

    fn info(&self, msg: &str) {
        self.send(Level::Info, msg);
    }

    fn progress(&self, msg: &str) {
        self.tx.send(ProgressEvent::Line(msg.to_string())).ok();
    }

    fn debug(&self, msg: &str) {
        self.send(Level::Debug, msg);
    }

    fn warn(&self, msg: &str) {
        self.send(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.send(Level::Error, msg);
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.results.record_task(name, status, message);
    }
}

/// Sink that writes each line to a [`Log`] as progress output.
pub struct LogSink {
    log: Arc<dyn Log>,
}

impl LogSink {
    /// Forward lines to `log`.
    #[must_use]
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self { log }
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink").field("log", &"<dyn Log>").finish()
    }
}

impl ProgressSink for LogSink {
    fn line(&self, msg: &str) {
        self.log.progress(msg);
    }
}

/// Sink adapter that prefixes every line before forwarding it.
pub struct Prefixed<'a> {
    inner: &'a dyn ProgressSink,
    prefix: &'a str,
}

impl<'a> Prefixed<'a> {
    /// Prefix lines sent to `inner` with `prefix`.
    #[must_use]
    pub const fn new(inner: &'a dyn ProgressSink, prefix: &'a str) -> Self {
        Self { inner, prefix }
    }
}

impl std::fmt::Debug for Prefixed<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prefixed")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ProgressSink for Prefixed<'_> {
    fn line(&self, msg: &str) {
        self.inner.line(&format!("{}{msg}", self.prefix));
    }
}

/// Sink that keeps every line in memory.
///
/// Used by tests and by callers that want to inspect output after the fact.
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: std::sync::Mutex<Vec<String>>,
}

impl CollectingSink {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines received so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Whether any received line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl ProgressSink for CollectingSink {
    fn line(&self, msg: &str) {
        if let Ok(mut guard) = self.lines.lock() {
            guard.push(msg.to_string());
        }
    }
}

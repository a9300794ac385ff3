//! Progress reporting.
//!
//! A [`ProgressReporter`] is the only way the pipeline tells its caller it is
//! alive. Reporting is fire-and-forget and must never block.

use leadscan_core::ExtractionResult;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Sink for status messages and counts.
pub trait ProgressReporter: Send + Sync {
    /// Report a human-readable status and the current count.
    fn report(&self, message: &str, count: usize);
}

impl<F> ProgressReporter for F
where
    F: Fn(&str, usize) + Send + Sync,
{
    fn report(&self, message: &str, count: usize) {
        self(message, count);
    }
}

/// Writes every report to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, message: &str, count: usize) {
        tracing::info!(count, "{}", message);
    }
}

/// One progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Human-readable status
    pub message: String,
    /// Current count for the phase
    pub count: usize,
}

/// Forwards reports into an unbounded channel for a streaming transport.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelReporter {
    /// Reporter sending into `tx`.
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Reporter plus the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, message: &str, count: usize) {
        // A gone receiver means nobody is listening any more.
        let _ = self.tx.send(ProgressEvent {
            message: message.to_string(),
            count,
        });
    }
}

/// Event-stream shape of a run: any number of `progress` events followed by
/// exactly one `result` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ExtractionEvent {
    /// A status update
    Progress(ProgressEvent),
    /// The finished result list
    Result(Vec<ExtractionResult>),
    /// The run failed
    Error {
        /// Display form of the error
        error: String,
    },
}

impl From<ProgressEvent> for ExtractionEvent {
    fn from(event: ProgressEvent) -> Self {
        Self::Progress(event)
    }
}

//! Progress reporting over a message channel.
//!
//! The pipeline never touches caller-owned display state. It sends discrete
//! [`ProgressEvent`]s down an unbounded tokio channel and the caller decides
//! how to render them (terminal, JSON lines, a UI log pane).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::transform::pipeline::RunSummary;

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single progress message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested messages)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render for a terminal.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Everything the pipeline task tells its caller.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ProgressEvent {
    /// A human-readable progress line.
    Log(LogEntry),
    /// Terminal success signal.
    Completed(RunSummary),
    /// Terminal failure signal with a descriptive message.
    Failed { message: String },
}

/// Sending half of the progress channel.
///
/// Sends never block. If the receiver is gone the message is dropped.
#[derive(Debug, Clone, Default)]
pub struct ProgressSender {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (ProgressSender, mpsc::UnboundedReceiver<ProgressEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx: Some(tx) }, rx)
}

impl ProgressSender {
    /// A sender that discards everything.
    pub fn silent() -> Self {
        Self { tx: None }
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            // Ignore if the caller stopped listening
            let _ = tx.send(event);
        }
    }

    pub fn log(&self, entry: LogEntry) {
        self.send(ProgressEvent::Log(entry));
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(LogEntry::info(msg));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.log(LogEntry::success(msg));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.log(LogEntry::warning(msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.log(LogEntry::error(msg));
    }

    pub fn info_indent(&self, msg: impl Into<String>, indent: u8) {
        self.log(LogEntry::info(msg).with_indent(indent));
    }

    pub fn completed(&self, summary: RunSummary) {
        self.send(ProgressEvent::Completed(summary));
    }

    pub fn failed(&self, message: impl Into<String>) {
        self.send(ProgressEvent::Failed { message: message.into() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_arrive_in_order() {
        let (progress, mut rx) = channel();
        progress.info("reading");
        progress.warning("LITH curve absent");
        progress.success("done");

        let levels: Vec<LogLevel> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|event| match event {
                ProgressEvent::Log(entry) => entry.level,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warning, LogLevel::Success]);
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (progress, rx) = channel();
        drop(rx);
        progress.info("nobody listens");
        progress.failed("still fine");
    }

    #[test]
    fn test_silent_sender() {
        let progress = ProgressSender::silent();
        progress.error("discarded");
    }

    #[test]
    fn test_render_indent() {
        let entry = LogEntry::success("MUD_LOG_1m.las").with_indent(1);
        assert_eq!(entry.render(), "      ✓ MUD_LOG_1m.las");
    }

    #[test]
    fn test_event_json_shape() {
        let event = ProgressEvent::Log(LogEntry::info("hello"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "log");
        assert_eq!(json["level"], "info");
        assert_eq!(json["message"], "hello");
    }
}

use chrono::{DateTime, Utc};
use escape_core::time::log_stamp;

/// Severity of a terminal log line, which also picks its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Success,
    Error,
}

/// One line of the in-game terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    /// `[HH:MM:SS] message`
    #[must_use]
    pub fn render(&self) -> String {
        format!("[{}] {}", log_stamp(self.at), self.message)
    }
}

/// Append-only terminal shown on the puzzle screen, wiped when a level opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalLog {
    entries: Vec<LogEntry>,
}

impl TerminalLog {
    pub fn push(&mut self, at: DateTime<Utc>, kind: LogKind, message: impl Into<String>) {
        self.entries.push(LogEntry {
            at,
            kind,
            message: message.into(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape_core::time::fixed_now;

    #[test]
    fn render_prefixes_timestamp() {
        let mut log = TerminalLog::default();
        log.push(fixed_now(), LogKind::Error, "ERROR: Connection failed");
        let line = log.last().unwrap().render();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] ERROR: Connection failed"));
    }
}

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Destination for plain-text diagnostic lines
pub trait LogSink: Send + Sync + 'static {
    fn line(&self, line: &str);
}

/// Forwards every line to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn line(&self, line: &str) {
        info!("{}", line);
    }
}

/// Keeps lines in memory
///
/// Clones share the same buffer, so one copy can be handed to a handler
/// while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines recorded so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Lines starting with `prefix`, in recording order
    pub fn lines_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

impl<S: LogSink> LogSink for Arc<S> {
    fn line(&self, line: &str) {
        (**self).line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.line("receive: a");
        sink.line("send: b");
        handle.line("receive: c");

        assert_eq!(handle.len(), 3);
        assert_eq!(sink.lines_with_prefix("receive:"), vec!["receive: a", "receive: c"]);
        assert!(sink.contains("send: b"));
    }
}

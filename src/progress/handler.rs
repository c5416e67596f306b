//! Progress handler trait and events

use std::sync::Mutex;

/// Events emitted while a pipeline runs
///
/// `Finished` and `Failed` are terminal: exactly one of them closes a run and
/// nothing is emitted after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Human-readable log line
    Log { message: String },

    /// Pipeline completed successfully
    Finished,

    /// Pipeline aborted
    Failed { error: String },
}

impl ProgressEvent {
    pub fn log(message: impl Into<String>) -> Self {
        ProgressEvent::Log {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Finished | ProgressEvent::Failed { .. })
    }
}

/// Trait for handling progress events during a pipeline run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);

    /// Shorthand for emitting a log line
    fn log(&self, message: &str) {
        self.on_progress(&ProgressEvent::log(message));
    }
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Handler that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Log lines only, in emission order
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Log { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.log("ignored");
        handler.on_progress(&ProgressEvent::Finished);
    }

    #[test]
    fn test_log_shorthand_counts_as_event() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.log("first");
        handler.log("second");
        handler.on_progress(&ProgressEvent::Finished);

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_recording_handler_keeps_order() {
        let handler = RecordingHandler::new();
        handler.log("one");
        handler.log("two");
        handler.on_progress(&ProgressEvent::Failed {
            error: "boom".to_string(),
        });

        assert_eq!(handler.messages(), vec!["one", "two"]);
        assert!(handler.events().last().unwrap().is_terminal());
        assert!(handler.contains("tw"));
    }
}

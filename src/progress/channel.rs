//! Channel-backed progress handler used by background tasks

use super::{LoggingHandler, ProgressEvent, ProgressHandler};
use tokio::sync::mpsc::UnboundedSender;

/// Forwards every event to an unbounded channel and mirrors it to tracing
///
/// Send errors are ignored: a caller that dropped its receiver no longer
/// cares about the run.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelHandler {
    pub fn new(sender: UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressHandler for ChannelHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        LoggingHandler.on_progress(event);
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_channel_handler_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = ChannelHandler::new(tx);

        handler.log("a");
        handler.log("b");

        assert_eq!(rx.recv().await, Some(ProgressEvent::log("a")));
        assert_eq!(rx.recv().await, Some(ProgressEvent::log("b")));
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelHandler::new(tx).log("nobody listening");
    }
}

//! Progress reporting for pipeline runs

mod channel;
mod handler;
mod logging;

pub use channel::ChannelHandler;
pub use handler::{NoOpHandler, ProgressEvent, ProgressHandler, RecordingHandler};
pub use logging::LoggingHandler;

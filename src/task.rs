//! Background execution of one pipeline at a time
//!
//! [`TaskRunner::spawn`] starts a job on the tokio runtime and hands back a
//! [`TaskHandle`]. The job reports through the [`ProgressHandler`] it is given;
//! every event lands in the handle's channel in emission order, followed by
//! exactly one terminal event (`Finished` or `Failed`).

use crate::error::PipelineError;
use crate::progress::{ChannelHandler, ProgressEvent, ProgressHandler};
use std::any::Any;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Another task is already running")]
    Busy,

    #[error("Task was cancelled")]
    Cancelled,

    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Releases the busy flag when the task ends, however it ends
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Starts jobs, refusing a second one while the first is active
#[derive(Debug, Clone, Default)]
pub struct TaskRunner {
    busy: Arc<AtomicBool>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn spawn<T, F, Fut>(&self, job: F) -> Result<TaskHandle<T>, TaskError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn ProgressHandler>) -> Fut,
        Fut: Future<Output = Result<T, PipelineError>> + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(TaskError::Busy);
        }
        let guard = BusyGuard(self.busy.clone());

        let (events_tx, events) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let reporter = ChannelHandler::new(events_tx);
        let work = tokio::spawn(job(Arc::new(reporter.clone())));

        let join = tokio::spawn(async move {
            let outcome = supervise(work, cancel_rx).await;
            drop(guard);

            let terminal = match &outcome {
                Ok(_) => ProgressEvent::Finished,
                Err(e) => ProgressEvent::Failed {
                    error: e.to_string(),
                },
            };
            reporter.on_progress(&terminal);
            outcome
        });

        Ok(TaskHandle {
            events,
            cancel: Some(cancel_tx),
            join,
        })
    }
}

async fn supervise<T>(
    mut work: JoinHandle<Result<T, PipelineError>>,
    cancel_rx: oneshot::Receiver<()>,
) -> Result<T, TaskError> {
    let cancelled = async {
        // A dropped handle closes the channel without cancelling.
        if cancel_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        joined = &mut work => match joined {
            Ok(result) => result.map_err(TaskError::from),
            Err(e) => Err(join_error(e)),
        },
        _ = cancelled => {
            debug!("Cancelling background task");
            work.abort();
            // Wait until the job is dropped so no event can follow the terminal one.
            let _ = work.await;
            Err(TaskError::Cancelled)
        }
    }
}

fn join_error(error: JoinError) -> TaskError {
    if error.is_cancelled() {
        return TaskError::Cancelled;
    }
    TaskError::Panicked(panic_message(error.into_panic()))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle to a running job
pub struct TaskHandle<T> {
    events: UnboundedReceiver<ProgressEvent>,
    cancel: Option<oneshot::Sender<()>>,
    join: JoinHandle<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Next event; `None` once the terminal event has been received and the job is gone
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Stops the job at its next await point
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the job and returns its result
    pub async fn wait(self) -> Result<T, TaskError> {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => Err(join_error(e)),
        }
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("finished", &self.join.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandError;

    async fn drain<T>(handle: &mut TaskHandle<T>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_events_then_finished() {
        let runner = TaskRunner::new();
        let mut handle = runner
            .spawn(|progress| async move {
                progress.log("one");
                tokio::task::yield_now().await;
                progress.log("two");
                Ok(42)
            })
            .unwrap();

        let events = drain(&mut handle).await;

        assert_eq!(
            events,
            vec![
                ProgressEvent::log("one"),
                ProgressEvent::log("two"),
                ProgressEvent::Finished,
            ]
        );
        assert_eq!(handle.wait().await.unwrap(), 42);
        assert!(!runner.is_busy());
    }

    #[tokio::test]
    async fn test_failure_is_terminal_event() {
        let runner = TaskRunner::new();
        let mut handle = runner
            .spawn(|_| async move {
                Err::<(), _>(PipelineError::Command(CommandError::Failed {
                    exit_code: 1,
                    command: "git push".to_string(),
                    stderr: String::new(),
                }))
            })
            .unwrap();

        let events = drain(&mut handle).await;

        assert_eq!(
            events,
            vec![ProgressEvent::Failed {
                error: "Command failed with exit code 1: git push".to_string()
            }]
        );
        assert!(matches!(handle.wait().await, Err(TaskError::Pipeline(_))));
    }

    #[tokio::test]
    async fn test_second_task_is_refused_while_busy() {
        let runner = TaskRunner::new();
        let (gate_tx, gate_rx) = oneshot::channel::<()>();
        let first = runner
            .spawn(|_| async move {
                let _ = gate_rx.await;
                Ok(())
            })
            .unwrap();

        assert!(runner.is_busy());
        assert!(matches!(
            runner.spawn(|_| async { Ok(()) }),
            Err(TaskError::Busy)
        ));

        gate_tx.send(()).unwrap();
        first.wait().await.unwrap();

        let second = runner.spawn(|_| async { Ok(()) }).unwrap();
        second.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel() {
        let runner = TaskRunner::new();
        let mut handle = runner
            .spawn(|progress| async move {
                progress.log("started");
                std::future::pending::<()>().await;
                Ok(())
            })
            .unwrap();

        assert_eq!(handle.next_event().await, Some(ProgressEvent::log("started")));
        handle.cancel();

        let events = drain(&mut handle).await;
        assert_eq!(
            events,
            vec![ProgressEvent::Failed {
                error: "Task was cancelled".to_string()
            }]
        );
        assert!(matches!(handle.wait().await, Err(TaskError::Cancelled)));
        assert!(!runner.is_busy());
    }

    #[tokio::test]
    async fn test_panic_is_reported() {
        let runner = TaskRunner::new();
        let mut handle = runner
            .spawn(|_| async move {
                if true {
                    panic!("boom");
                }
                Ok(())
            })
            .unwrap();

        let events = drain(&mut handle).await;

        assert!(matches!(
            events.last(),
            Some(ProgressEvent::Failed { error }) if error.contains("boom")
        ));
        assert!(matches!(handle.wait().await, Err(TaskError::Panicked(_))));
    }
}

//! Cancellable recurring work on the tokio runtime.

use std::{future::Future, time::Duration};

use tokio::{
    spawn,
    sync::oneshot,
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};

/// Owns a spawned task and the stop channel it listens on.
///
/// Dropping the handle stops the task, so no callback outlives its owner.
pub struct TaskHandle {
    stop: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Spawn `task`, handing it the receiver that fires on [`TaskHandle::cancel`].
    pub fn spawn<F, Fut>(task: F) -> Self
    where
        F: FnOnce(oneshot::Receiver<()>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();
        Self {
            stop: Some(stop_tx),
            join: Some(spawn(task(stop_rx))),
        }
    }

    /// Ask the task to stop. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(stop) = self.stop.take() {
            // the task may already be gone
            let _ = stop.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |join| join.is_finished())
    }

    /// Wait for the task to end on its own.
    pub async fn join(mut self) {
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                tracing::warn!("scheduled task aborted: {}", e);
            }
        }
    }

    /// Cancel, then wait for the task to wind down.
    pub async fn shutdown(mut self) {
        self.cancel();
        self.join().await;
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Interval whose first tick lands one full `period` after arming.
///
/// Late ticks are pushed back rather than fired in a burst.
pub fn every(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

//! Gravity timer.
//!
//! [`DropScheduler`] owns at most one periodic task. Each task posts [`Tick`]s tagged
//! with the epoch it was started under into the session queue. Restarting or
//! cancelling aborts the task and bumps the epoch, so ticks already sitting in the
//! queue are recognised as stale by [`DropScheduler::is_current`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// One gravity step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub epoch: u64,
}

#[derive(Debug)]
pub struct DropScheduler<M> {
    /// Weak so the timer never keeps the session queue open on its own.
    queue: mpsc::WeakSender<M>,
    task: Option<JoinHandle<()>>,
    epoch: u64,
    interval_ms: Option<u32>,
}

impl<M> DropScheduler<M>
where
    M: From<Tick> + Send + 'static,
{
    pub fn new(queue: &mpsc::Sender<M>) -> Self {
        Self {
            queue: queue.downgrade(),
            task: None,
            epoch: 0,
            interval_ms: None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Interval of the running timer, `None` when cancelled.
    pub fn interval_ms(&self) -> Option<u32> {
        self.interval_ms
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// (Re)start ticking every `interval_ms`. The first tick fires one full
    /// interval from now. Must be called inside a tokio runtime.
    pub fn start(&mut self, interval_ms: u32) {
        self.cancel();

        let epoch = self.epoch;
        let queue = self.queue.clone();
        let period = Duration::from_millis(u64::from(interval_ms.max(1)));
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(queue) = queue.upgrade() else {
                    break;
                };
                if queue.send(M::from(Tick { epoch })).await.is_err() {
                    break;
                }
            }
        }));
        self.interval_ms = Some(interval_ms);
        debug!(epoch, interval_ms, "drop scheduler started");
    }

    /// Stop ticking. Ticks already queued become stale.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(epoch = self.epoch, "drop scheduler cancelled");
        }
        self.interval_ms = None;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Whether `tick` came from the timer that is running right now.
    pub fn is_current(&self, tick: Tick) -> bool {
        self.task.is_some() && tick.epoch == self.epoch
    }
}

impl<M> Drop for DropScheduler<M> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

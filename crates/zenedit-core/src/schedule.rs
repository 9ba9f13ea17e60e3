//! Cancellable repeating tasks (autosave, text blink).
//!
//! ## Learning: Handles own the work
//!
//! The spawned task runs until its handle says otherwise. Dropping the
//! `ScheduledTask` aborts it, so replacing a timer is just assigning a new
//! one over the old.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Shortest period a task may run at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A repeating callback on the tokio runtime.
///
/// The callback runs on a runtime worker, so it should only post a message
/// to the owner of the editor state, never touch that state itself.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
    period: Duration,
}

impl ScheduledTask {
    /// Calls `tick` every `period`, first after one full period.
    ///
    /// The task stops on its own when `tick` returns false.
    pub fn repeating<F>(runtime: &Handle, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let handle = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !tick() {
                    tracing::debug!("Scheduled task stopped by its callback");
                    break;
                }
            }
        });
        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stops the task. No tick runs after this returns.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() -> bool + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
            true
        })
    }

    #[tokio::test]
    async fn test_ticks_repeat() {
        let (count, tick) = counter();
        let task = ScheduledTask::repeating(&Handle::current(), Duration::from_millis(10), tick);

        time::sleep(Duration::from_millis(100)).await;
        assert!(count.load(Ordering::SeqCst) >= 2);
        assert_eq!(task.period(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_first_tick_waits_one_period() {
        let (count, tick) = counter();
        let _task = ScheduledTask::repeating(&Handle::current(), Duration::from_secs(60), tick);

        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_stops_ticks() {
        let (count, tick) = counter();
        let task = ScheduledTask::repeating(&Handle::current(), Duration::from_millis(10), tick);

        time::sleep(Duration::from_millis(50)).await;
        task.cancel();
        time::sleep(Duration::from_millis(5)).await;
        let seen = count.load(Ordering::SeqCst);

        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn test_drop_stops_ticks() {
        let (count, tick) = counter();
        let task = ScheduledTask::repeating(&Handle::current(), Duration::from_millis(10), tick);
        drop(task);
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_callback_can_stop() {
        let task = ScheduledTask::repeating(&Handle::current(), Duration::from_millis(5), || false);
        time::sleep(Duration::from_millis(40)).await;
        assert!(task.is_finished());
    }
}

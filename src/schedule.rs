//! Periodic refresh scheduling.
//!
//! A [`RefreshSchedule`] describes when a refresh fires. On native targets a
//! [`RefreshTask`] runs one on tokio; the browser app drives the same
//! schedules with its own timers. Either way the task belongs to the view that
//! started it and stops when that view drops it.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    /// Wait before the first tick.
    pub initial_delay: Duration,
    pub period: Duration,
}

impl RefreshSchedule {
    /// Every solution on the page.
    pub const PAGE: RefreshSchedule = RefreshSchedule {
        initial_delay: Duration::from_secs(20),
        period: Duration::from_secs(120),
    };

    /// The expanded solution only.
    pub const ACTIVE_SOLUTION: RefreshSchedule = RefreshSchedule {
        initial_delay: Duration::from_secs(5),
        period: Duration::from_secs(5),
    };

    pub const fn new(initial_delay: Duration, period: Duration) -> Self {
        Self {
            initial_delay,
            period,
        }
    }

    /// Instant of the `n`th tick (zero-based), measured from the start.
    pub fn tick_offset(&self, n: u32) -> Duration {
        self.initial_delay + self.period * n
    }
}

#[cfg(feature = "native")]
pub use native::RefreshTask;

#[cfg(feature = "native")]
mod native {
    use super::RefreshSchedule;
    use tokio::task::JoinHandle;
    use tokio::time::{self, MissedTickBehavior};

    /// A running refresh loop. Dropping it cancels the loop.
    #[derive(Debug)]
    pub struct RefreshTask {
        handle: JoinHandle<()>,
    }

    impl RefreshTask {
        /// Start calling `tick` on `schedule`. Must be called inside a tokio
        /// runtime.
        pub fn spawn<F>(schedule: RefreshSchedule, mut tick: F) -> Self
        where
            F: FnMut() + Send + 'static,
        {
            let handle = tokio::spawn(async move {
                time::sleep(schedule.initial_delay).await;
                let mut interval = time::interval(schedule.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    // The first tick completes immediately.
                    interval.tick().await;
                    tick();
                }
            });
            Self { handle }
        }

        pub fn cancel(self) {
            drop(self);
        }
    }

    impl Drop for RefreshTask {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }
}

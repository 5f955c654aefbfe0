//! Refresh timers for the browser

use biblio::RefreshSchedule;
use gloo_timers::callback::{Interval, Timeout};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Runs `tick` on a schedule until dropped.
pub struct RefreshTimer {
    _start: Timeout,
    _interval: Rc<RefCell<Option<Interval>>>,
}

impl RefreshTimer {
    pub fn start<F>(schedule: RefreshSchedule, tick: F) -> Self
    where
        F: Fn() + 'static,
    {
        let tick = Rc::new(tick);
        let interval = Rc::new(RefCell::new(None));
        let slot = interval.clone();
        let period = millis(schedule.period);

        let start = Timeout::new(millis(schedule.initial_delay), move || {
            tick();
            *slot.borrow_mut() = Some(Interval::new(period, move || tick()));
        });

        Self {
            _start: start,
            _interval: interval,
        }
    }
}

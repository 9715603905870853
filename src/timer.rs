use std::time::{Duration, Instant};

use crate::ports::Scheduler;

/// Fixed-period schedule polled by the event loop. Missed periods are skipped.
#[derive(Debug, Default)]
pub struct IntervalTimer {
    period: Option<Duration>,
    next: Option<Instant>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_from(&mut self, period: Duration, now: Instant) {
        self.period = Some(period);
        self.next = Some(now + period);
    }
}

impl Scheduler for IntervalTimer {
    fn schedule(&mut self, period: Duration) {
        // Replaces whatever was scheduled before.
        self.schedule_from(period, Instant::now());
    }

    fn cancel(&mut self) {
        self.period = None;
        self.next = None;
    }

    fn is_scheduled(&self) -> bool {
        self.period.is_some()
    }

    fn poll(&mut self, now: Instant) -> bool {
        let (Some(period), Some(next)) = (self.period, self.next) else {
            return false;
        };

        if now < next {
            return false;
        }

        let mut following = next + period;
        if following <= now {
            following = now + period;
        }
        self.next = Some(following);
        true
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.next
    }
}

//! Tick scheduler - gravity timer for one session
//!
//! A thin wrapper over `tokio::time::Interval`. The first tick fires one
//! full period after (re)arming. Missed ticks are delayed, not bursted, so a
//! slow client never sees several gravity steps land at once.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct TickScheduler {
    interval: Interval,
    period: Duration,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick (cancel-safe)
    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }

    /// Restart with a new period; the next tick is one period from now
    pub fn rearm(&mut self, period: Duration) {
        *self = Self::new(period);
    }

    /// Switch period only if it differs; returns true when rearmed
    pub fn rearm_if_changed(&mut self, period: Duration) -> bool {
        if period == self.period {
            return false;
        }
        self.rearm(period);
        true
    }
}

//! Sliding-window admission control for model calls.
//!
//! One log of admission instants is shared by every caller. An admission is
//! counted until it is a full window old, so capacity returns one slot per
//! expired entry rather than refilling at a constant rate.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    log: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let max_requests = max_requests.max(1) as usize;
        Self {
            max_requests,
            window,
            log: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit one call now, recording it, or deny without recording.
    pub fn admit(&self) -> bool {
        self.admit_at(Instant::now())
    }

    pub fn admit_at(&self, now: Instant) -> bool {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut log, now);

        if log.len() >= self.max_requests {
            return false;
        }

        log.push_back(now);
        true
    }

    pub fn in_window(&self) -> usize {
        self.in_window_at(Instant::now())
    }

    /// Admissions still counted at `now`.
    pub fn in_window_at(&self, now: Instant) -> usize {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut log, now);
        log.len()
    }

    /// Time until the next slot frees up; zero when one is free already.
    pub fn retry_after(&self) -> Duration {
        self.retry_after_at(Instant::now())
    }

    pub fn retry_after_at(&self, now: Instant) -> Duration {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut log, now);

        if log.len() < self.max_requests {
            return Duration::ZERO;
        }

        log.front()
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or(Duration::ZERO)
    }

    fn prune(&self, log: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = log.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                log.pop_front();
            } else {
                break;
            }
        }
    }
}

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crosscheck_recon::config::ThrottleConfig;

/// Time source, injectable so throttle behavior is testable without real
/// sleeps.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

struct ThrottleState {
    used: u32,
    window_start: Instant,
}

/// Fixed-window write budget. Reserving past the quota blocks until the
/// window rolls over, then starts a fresh one.
///
/// Windows are fixed, not sliding: a burst at the end of one window plus a
/// burst right after the reset can place up to twice the quota inside a
/// rolling span of the same length. Callers needing a hard rolling bound
/// must halve the quota.
pub struct WriteThrottle {
    quota: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<ThrottleState>,
}

impl WriteThrottle {
    pub fn new(quota: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        let window_start = clock.now();
        Self {
            quota,
            window,
            clock,
            state: Mutex::new(ThrottleState { used: 0, window_start }),
        }
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(
            config.quota,
            Duration::from_secs(config.window_secs),
            Arc::new(SystemClock),
        )
    }

    /// Reserve `n` writes, sleeping out the rest of the window first if the
    /// reservation would exceed the quota.
    pub fn reserve(&self, n: u32) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();

        let elapsed = now.duration_since(state.window_start);
        if elapsed >= self.window {
            state.used = 0;
            state.window_start = now;
        } else if state.used + n > self.quota {
            let wait = self.window - elapsed;
            tracing::info!(wait_secs = wait.as_secs_f64(), "write quota exhausted, waiting");
            self.clock.sleep(wait);
            state.used = 0;
            state.window_start = self.clock.now();
        }

        state.used += n;
    }
}

impl Default for WriteThrottle {
    fn default() -> Self {
        Self::from_config(&ThrottleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock that advances only when slept on, recording each sleep.
    struct FakeClock {
        base: Instant,
        state: Mutex<FakeState>,
    }

    struct FakeState {
        offset: Duration,
        sleeps: Vec<Duration>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                state: Mutex::new(FakeState { offset: Duration::ZERO, sleeps: Vec::new() }),
            }
        }

        fn advance(&self, duration: Duration) {
            self.state.lock().unwrap().offset += duration;
        }

        fn sleeps(&self) -> Vec<Duration> {
            self.state.lock().unwrap().sleeps.clone()
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.base + self.state.lock().unwrap().offset
        }

        fn sleep(&self, duration: Duration) {
            let mut state = self.state.lock().unwrap();
            state.offset += duration;
            state.sleeps.push(duration);
        }
    }

    #[test]
    fn within_quota_never_sleeps() {
        let clock = Arc::new(FakeClock::new());
        let throttle = WriteThrottle::new(3, Duration::from_secs(60), clock.clone());
        throttle.reserve(1);
        throttle.reserve(1);
        throttle.reserve(1);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn exceeding_quota_sleeps_out_the_window_remainder() {
        let clock = Arc::new(FakeClock::new());
        let throttle = WriteThrottle::new(2, Duration::from_secs(60), clock.clone());
        throttle.reserve(2);
        clock.advance(Duration::from_secs(10));
        throttle.reserve(1);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(50)]);
    }

    #[test]
    fn expired_window_resets_without_sleeping() {
        let clock = Arc::new(FakeClock::new());
        let throttle = WriteThrottle::new(2, Duration::from_secs(60), clock.clone());
        throttle.reserve(2);
        clock.advance(Duration::from_secs(61));
        throttle.reserve(2);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn budget_is_fresh_after_a_forced_wait() {
        let clock = Arc::new(FakeClock::new());
        let throttle = WriteThrottle::new(2, Duration::from_secs(60), clock.clone());
        throttle.reserve(2);
        throttle.reserve(2);
        // second reservation slept, then consumed from the new window
        assert_eq!(clock.sleeps().len(), 1);
        throttle.reserve(1);
        assert_eq!(clock.sleeps().len(), 2);
    }
}

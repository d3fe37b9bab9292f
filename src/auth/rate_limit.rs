use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Fixed-window request counter, keyed by caller identity.
///
/// Injected into the handlers that need it; a multi-instance deployment
/// swaps in a shared counter behind the same interface.
#[derive(Clone)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    attempts: Arc<Mutex<HashMap<String, WindowState>>>,
}

struct WindowState {
    count: u32,
    reset_at: Instant,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Signup policy: 5 attempts per source per 15 minutes.
    pub fn for_signup() -> Self {
        Self::new(5, Duration::from_secs(15 * 60))
    }

    /// Records an attempt for `key` and reports whether it is allowed.
    pub fn check(&self, key: &str) -> bool {
        let mut attempts = match self.attempts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        let state = attempts.entry(key.to_string()).or_insert(WindowState {
            count: 0,
            reset_at: now + self.window,
        });

        if now > state.reset_at {
            state.count = 0;
            state.reset_at = now + self.window;
        }

        if state.count >= self.max_attempts {
            return false;
        }

        state.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max_attempts() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(limiter.check("5.6.7.8"));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));

        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));

        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.check("1.2.3.4"));
    }
}

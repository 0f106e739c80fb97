use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_REQUESTS: u32 = 15;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// 超過此數量的客戶端時清掉閒置的紀錄
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the oldest counted request leaves the window.
    pub reset_after: Duration,
    pub window: Duration,
}

impl RateDecision {
    pub fn reset_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// `RateLimit-*` response headers (IETF draft fields).
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (
                "RateLimit-Policy",
                format!("{};w={}", self.limit, self.window.as_secs()),
            ),
            ("RateLimit-Limit", self.limit.to_string()),
            ("RateLimit-Remaining", self.remaining.to_string()),
            ("RateLimit-Reset", self.reset_secs().to_string()),
        ];
        if !self.allowed {
            headers.push(("Retry-After", self.reset_secs().to_string()));
        }
        headers
    }
}

/// Sliding-window log limiter keyed by client address.
///
/// Only accepted requests are recorded, so a client that keeps hammering
/// after being limited is let back in once its oldest accepted request ages
/// out of the window.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut hits = match self.hits.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if hits.len() > PRUNE_THRESHOLD {
            hits.retain(|_, log| {
                evict_expired(log, now, self.window);
                !log.is_empty()
            });
        }

        let log = hits.entry(key.to_string()).or_default();
        evict_expired(log, now, self.window);

        let allowed = (log.len() as u32) < self.max_requests;
        if allowed {
            log.push_back(now);
        }

        let reset_after = log
            .front()
            .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
            .unwrap_or(self.window);

        RateDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(log.len() as u32),
            reset_after,
            window: self.window,
        }
    }

    pub fn tracked_clients(&self) -> usize {
        match self.hits.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

fn evict_expired(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = log.front() {
        if now.saturating_duration_since(*oldest) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteenth_request_in_a_minute_is_limited() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for i in 0..15 {
            let decision = limiter.check_at("203.0.113.1", start + Duration::from_secs(i));
            assert!(decision.allowed, "request {} should pass", i + 1);
            assert_eq!(decision.remaining, 14 - i as u32);
        }

        let decision = limiter.check_at("203.0.113.1", start + Duration::from_secs(20));
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        // 最舊的請求在 start，60 秒後才離開視窗
        assert_eq!(decision.reset_secs(), 40);
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("c", start).allowed);
        assert!(limiter.check_at("c", start + Duration::from_secs(30)).allowed);
        assert!(!limiter.check_at("c", start + Duration::from_secs(59)).allowed);

        let decision = limiter.check_at("c", start + Duration::from_secs(60));
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_headers() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        let ok = limiter.check_at("a", now).headers();
        assert!(ok.contains(&("RateLimit-Policy", "1;w=60".to_string())));
        assert!(ok.contains(&("RateLimit-Remaining", "0".to_string())));
        assert!(!ok.iter().any(|(name, _)| *name == "Retry-After"));

        let limited = limiter
            .check_at("a", now + Duration::from_millis(500))
            .headers();
        assert!(limited.contains(&("Retry-After", "60".to_string())));
    }

    #[test]
    fn test_idle_clients_are_pruned() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1));
        let start = Instant::now();

        for i in 0..=PRUNE_THRESHOLD {
            limiter.check_at(&format!("client-{}", i), start);
        }
        assert_eq!(limiter.tracked_clients(), PRUNE_THRESHOLD + 1);

        limiter.check_at("late", start + Duration::from_secs(5));
        assert_eq!(limiter.tracked_clients(), 1);
    }
}

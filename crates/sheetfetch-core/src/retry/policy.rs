use std::time::Duration;

/// What follows a failed attempt. Either way the delay is slept first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Pause, then make another attempt.
    RetryAfter(Duration),
    /// Pause, then give up.
    StopAfter(Duration),
}

impl RetryDecision {
    pub fn delay(&self) -> Duration {
        match self {
            RetryDecision::RetryAfter(d) | RetryDecision::StopAfter(d) => *d,
        }
    }
}

/// Bounded attempts with a fixed pause after each failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). At least 1.
    pub max_attempts: u32,
    /// Pause after every failed attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Attempts still allowed after `attempt` (1-based) has failed.
    pub fn attempts_left(&self, attempt: u32) -> u32 {
        self.max_attempts.saturating_sub(attempt)
    }

    /// Decision after the failed `attempt` (1-based).
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if self.attempts_left(attempt) > 0 {
            RetryDecision::RetryAfter(self.delay)
        } else {
            RetryDecision::StopAfter(self.delay)
        }
    }
}

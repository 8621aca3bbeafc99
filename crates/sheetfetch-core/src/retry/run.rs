//! Retry loop: run a closure until success or the attempts run out.

use super::policy::{RetryDecision, RetryPolicy};
use super::sleep::Sleeper;

/// Every attempt failed; carries the error of the last one.
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempt(s): {last}")]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last: E,
}

/// Runs `f` (given the 1-based attempt number) until it returns `Ok` or
/// `policy.max_attempts` attempts have failed.
///
/// After each failure `on_failure` is told about it and the sleeper pauses
/// for `policy.delay`, including after the final failure.
pub fn run_with_retry<T, E, F, R>(
    policy: &RetryPolicy,
    sleeper: &mut dyn Sleeper,
    mut on_failure: R,
    mut f: F,
) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Result<T, E>,
    R: FnMut(u32, &E),
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                on_failure(attempt, &e);
                let decision = policy.decide(attempt);
                sleeper.sleep(decision.delay());
                if let RetryDecision::StopAfter(_) = decision {
                    return Err(Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
                attempt += 1;
            }
        }
    }
}

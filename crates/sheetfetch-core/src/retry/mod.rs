//! Retry policy and loop.
//!
//! Failed attempts are retried up to a fixed count with a fixed delay after
//! every failure. There is no error classification and no adaptive backoff:
//! every failure of an attempt is treated as transient.

mod policy;
mod run;
mod sleep;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Exhausted};
pub use sleep::{Sleeper, ThreadSleeper};

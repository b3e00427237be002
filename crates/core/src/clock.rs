//! Clock abstraction
//!
//! Time-based policies (the debounce gate, history timestamps) take a clock
//! by injection so the exact window boundary is testable.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in unix milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System time before UNIX epoch")
            .as_millis() as u64
    }
}

//! Time adapters.
//!
//! Code crash if there is a physical inconsistency (unrecoverable
//! state).

use std::sync::atomic::{AtomicU64, Ordering};

use application::ports::outbound::Clock;

/// System clock using the OS time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_secs()
    }
}

/// Clock pinned to a settable instant, for temporal tests.
pub struct FixedClock {
    timestamp: AtomicU64,
}

impl FixedClock {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp: AtomicU64::new(timestamp),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, seconds: u64) {
        self.timestamp.fetch_add(seconds, Ordering::Relaxed);
    }

    /// Pin the clock to a new instant.
    pub fn set(&self, timestamp: u64) {
        self.timestamp.store(timestamp, Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.timestamp.load(Ordering::Relaxed)
    }
}

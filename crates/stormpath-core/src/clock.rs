//! Injectable time source.
//!
//! Request signing and token lifetime validation both depend on "now".
//! Production code uses [`SystemClock`]; tests use [`FixedClock`] so that
//! signatures and expiry checks are deterministic. Nothing outside
//! [`SystemClock`] calls `Utc::now()` directly.

use std::fmt;

use chrono::{DateTime, Utc};

/// A source of the current UTC instant.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Return the current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation of [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A [`Clock`] frozen at a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Create a clock frozen at the given instant.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

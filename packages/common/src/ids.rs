//! # Identity generation
//!
//! Elements and pages are identified as `{prefix}-{millis}`. Plain wall-clock
//! stamps collide when two ids are minted inside the same millisecond, so the
//! generator never hands out a stamp lower than or equal to the last one it
//! produced, and callers can additionally reject ids that are already taken.

/// Millisecond clock used to stamp ids
pub type Clock = fn() -> u64;

/// Wall clock in milliseconds since the Unix epoch
pub fn system_clock() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Monotonic `{prefix}-{millis}` id generator
#[derive(Debug, Clone)]
pub struct IdGenerator {
    clock: Clock,
    last: u64,
}

impl IdGenerator {
    /// Generator backed by the system clock
    pub fn new() -> Self {
        Self::with_clock(system_clock)
    }

    /// Generator backed by a custom clock (tests, replay)
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock, last: 0 }
    }

    /// Next stamp, strictly greater than every stamp handed out before
    pub fn next_stamp(&mut self) -> u64 {
        let now = (self.clock)();
        let stamp = if now > self.last { now } else { self.last + 1 };
        self.last = stamp;
        stamp
    }

    /// Next id for `prefix`
    pub fn next_id(&mut self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_stamp())
    }

    /// Next id for `prefix` that `is_taken` does not reject
    ///
    /// Needed when a layout was loaded from storage and already carries ids
    /// minted by another generator.
    pub fn next_unique_id<F>(&mut self, prefix: &str, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let id = self.next_id(prefix);
            if !is_taken(&id) {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

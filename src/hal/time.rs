/// Free-running millisecond counter.
///
/// The counter wraps at `u32::MAX` (about 49.7 days); all arithmetic here is
/// wrapping, so intervals shorter than that are measured correctly across a
/// wrap.
pub trait Clock {
    /// Milliseconds since boot
    fn millis(&self) -> u32;

    /// Milliseconds elapsed since an earlier `millis()` reading
    fn elapsed_since(&self, start: u32) -> u32 {
        self.millis().wrapping_sub(start)
    }
}

/// A deadline measured against a [`Clock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    start: u32,
    duration_ms: u32,
}

impl Timeout {
    /// Start a timeout that expires `duration_ms` from now
    pub fn start<C: Clock + ?Sized>(clock: &C, duration_ms: u32) -> Self {
        Self {
            start: clock.millis(),
            duration_ms,
        }
    }

    pub fn expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        clock.elapsed_since(self.start) >= self.duration_ms
    }

    /// Milliseconds left, zero once expired
    pub fn remaining<C: Clock + ?Sized>(&self, clock: &C) -> u32 {
        self.duration_ms.saturating_sub(clock.elapsed_since(self.start))
    }

    /// Restart from the current time with the same duration
    pub fn restart<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.start = clock.millis();
    }
}

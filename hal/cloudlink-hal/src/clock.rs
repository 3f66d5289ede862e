//! Monotonic clock abstraction
//!
//! The link engine only needs elapsed milliseconds to bound its polling
//! loops. Readings wrap at `u32::MAX`; callers compare with
//! `wrapping_sub`.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_millis(&self) -> u32;

    /// Milliseconds elapsed since an earlier reading
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now_millis().wrapping_sub(start)
    }
}

// Blanket implementation so a plain closure can serve as the clock
impl<F: Fn() -> u32> Clock for F {
    fn now_millis(&self) -> u32 {
        self()
    }
}

/// Clock backed by the embassy-time driver
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_millis(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}

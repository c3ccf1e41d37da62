//! Monotonic tick source
//!
//! The cooperative core never owns a clock. It samples one through
//! [`TickSource`] whenever it needs to know how much time has passed.

/// One unit of the monotonic time base (1 ms on the reference board).
///
/// The counter is 32 bits wide and wraps after `2^32` ticks. All elapsed-time
/// math must use wrapping subtraction.
pub type Tick = u32;

/// Monotonic, non-decreasing tick counter
///
/// Implementations are advanced by something outside the application
/// (SysTick, an RTC, a test harness). Readers never mutate it.
pub trait TickSource {
    /// Current tick count
    fn now(&self) -> Tick;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// Ticks elapsed from `start` to `now`, correct across one counter wrap
#[inline]
pub fn elapsed(start: Tick, now: Tick) -> Tick {
    now.wrapping_sub(start)
}

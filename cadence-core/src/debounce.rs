//! Button debounce state machine
//!
//! Turns a bouncing raw input into settled press/release edges. A raw
//! change is only accepted once the input still reads the same level after
//! the settle window has elapsed.
//!
//! ```text
//!        pressed                 settled & pressed
//!   Up ──────────▶ Falling ────────────────────────▶ Down
//!   ▲               │ settled & released              │ released
//!   │◀──────────────┘                                 ▼
//!   │            settled & released                Rising
//!   └◀────────────────────────────────────────────────┤
//!                                  settled & pressed  │──▶ Down
//! ```
//!
//! Edge naming follows the active-low button convention: pressing produces
//! the falling edge, releasing the rising edge. Each edge is latched in a
//! one-shot flag that the consumer reads and clears.

use cadence_hal::gpio::InputPin;
use cadence_hal::time::{Tick, TickSource};

use crate::config::DEBOUNCE_DELAY;
use crate::delay::{ConfigError, Delay};

/// Debounce states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// Released and settled
    Up,
    /// Input asserted, waiting for the settle window
    Falling,
    /// Pressed and settled
    Down,
    /// Input released, waiting for the settle window
    Rising,
    /// State byte outside the defined set
    Corrupted(u8),
}

impl DebounceState {
    /// Raw encoding used by [`Debouncer::load_raw_state`]
    pub fn to_raw(self) -> u8 {
        match self {
            DebounceState::Up => 0,
            DebounceState::Falling => 1,
            DebounceState::Down => 2,
            DebounceState::Rising => 3,
            DebounceState::Corrupted(raw) => raw,
        }
    }

    /// Whether the settled level is "pressed"
    pub fn is_pressed(self) -> bool {
        matches!(self, DebounceState::Down | DebounceState::Rising)
    }
}

impl From<u8> for DebounceState {
    fn from(raw: u8) -> Self {
        match raw {
            0 => DebounceState::Up,
            1 => DebounceState::Falling,
            2 => DebounceState::Down,
            3 => DebounceState::Rising,
            other => DebounceState::Corrupted(other),
        }
    }
}

/// Debounced button
///
/// Owns the raw input and the settle timer. Call [`update`](Self::update)
/// once per superloop iteration, then consume edges with the `read_*`
/// accessors.
#[derive(Debug)]
pub struct Debouncer<P> {
    pin: P,
    state: DebounceState,
    timer: Delay,
    falling_edge: bool,
    rising_edge: bool,
    key_pressed: bool,
    recoveries: u32,
}

impl<P: InputPin> Debouncer<P> {
    /// Create a debouncer with an explicit settle window
    pub fn new(pin: P, settle: Tick) -> Result<Self, ConfigError> {
        Ok(Self::with_timer(pin, Delay::new(settle)?))
    }

    /// Create a debouncer with the default settle window
    pub fn with_default_settle(pin: P) -> Self {
        Self::with_timer(pin, DEFAULT_TIMER)
    }

    fn with_timer(pin: P, timer: Delay) -> Self {
        Self {
            pin,
            state: DebounceState::Up,
            timer,
            falling_edge: false,
            rising_edge: false,
            key_pressed: false,
            recoveries: 0,
        }
    }

    /// Advance the state machine by one step
    pub fn update<C: TickSource + ?Sized>(&mut self, clock: &C) {
        let pressed = self.pin.is_high();

        match self.state {
            DebounceState::Up => {
                if pressed {
                    self.state = DebounceState::Falling;
                    self.timer.poll(clock);
                }
            }
            DebounceState::Falling => {
                if self.timer.poll(clock) {
                    if pressed {
                        self.falling_edge = true;
                        self.key_pressed = true;
                        self.state = DebounceState::Down;
                    } else {
                        self.state = DebounceState::Up;
                    }
                }
            }
            DebounceState::Down => {
                if !pressed {
                    self.state = DebounceState::Rising;
                    self.timer.poll(clock);
                }
            }
            DebounceState::Rising => {
                if self.timer.poll(clock) {
                    if !pressed {
                        self.rising_edge = true;
                        self.state = DebounceState::Up;
                    } else {
                        self.state = DebounceState::Down;
                    }
                }
            }
            DebounceState::Corrupted(_) => {
                self.recoveries = self.recoveries.wrapping_add(1);
                self.reinitialize();
            }
        }
    }

    /// Back to `Up` with an idle settle timer
    ///
    /// Pending edges are kept; only the consumer clears them.
    pub fn reinitialize(&mut self) {
        self.state = DebounceState::Up;
        self.timer.reset();
    }

    /// Consume a pending press (falling) edge
    pub fn read_falling_edge(&mut self) -> bool {
        core::mem::take(&mut self.falling_edge)
    }

    /// Consume a pending release (rising) edge
    pub fn read_rising_edge(&mut self) -> bool {
        core::mem::take(&mut self.rising_edge)
    }

    /// Consume a pending key press
    ///
    /// Raised together with the falling edge but latched separately, so a
    /// press-only consumer does not steal edges from an edge consumer.
    pub fn read_key_pressed(&mut self) -> bool {
        core::mem::take(&mut self.key_pressed)
    }

    /// Load a raw state byte (retained RAM, fault injection)
    ///
    /// Unknown values land in [`DebounceState::Corrupted`] and are repaired
    /// by the next [`update`](Self::update).
    pub fn load_raw_state(&mut self, raw: u8) {
        self.state = DebounceState::from(raw);
    }
}

impl<P> Debouncer<P> {
    /// Current state
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Settled level
    pub fn is_pressed(&self) -> bool {
        self.state.is_pressed()
    }

    /// Settle window in ticks
    pub fn settle(&self) -> Tick {
        self.timer.duration()
    }

    /// Number of corrupted-state recoveries since construction
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    /// Raw input
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Raw input, mutably
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Give the raw input back
    pub fn release(self) -> P {
        self.pin
    }
}

const DEFAULT_TIMER: Delay = match Delay::new(DEBOUNCE_DELAY) {
    Ok(delay) => delay,
    Err(_) => panic!("DEBOUNCE_DELAY out of range"),
};

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use proptest::prelude::*;

    struct MockClock(Cell<Tick>);

    impl TickSource for MockClock {
        fn now(&self) -> Tick {
            self.0.get()
        }
    }

    struct MockButton<'a>(&'a Cell<bool>);

    impl InputPin for MockButton<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    /// Run one update per tick from `from` to `to` inclusive
    fn run<P: InputPin>(deb: &mut Debouncer<P>, clock: &MockClock, from: Tick, to: Tick) {
        for t in from..=to {
            clock.0.set(t);
            deb.update(clock);
        }
    }

    #[test]
    fn test_starts_up() {
        let level = Cell::new(false);
        let deb = Debouncer::with_default_settle(MockButton(&level));
        assert_eq!(deb.state(), DebounceState::Up);
        assert_eq!(deb.settle(), DEBOUNCE_DELAY);
        assert!(!deb.is_pressed());
    }

    #[test]
    fn test_invalid_settle() {
        let level = Cell::new(false);
        assert!(matches!(
            Debouncer::new(MockButton(&level), 0),
            Err(ConfigError::ZeroDuration)
        ));
    }

    #[test]
    fn test_press_and_release() {
        let level = Cell::new(false);
        let clock = MockClock(Cell::new(0));
        let mut deb = Debouncer::new(MockButton(&level), 40).unwrap();

        level.set(true);
        run(&mut deb, &clock, 0, 0);
        assert_eq!(deb.state(), DebounceState::Falling);

        run(&mut deb, &clock, 1, 39);
        assert_eq!(deb.state(), DebounceState::Falling);
        assert!(!deb.read_falling_edge());

        run(&mut deb, &clock, 40, 40);
        assert_eq!(deb.state(), DebounceState::Down);
        assert!(deb.read_falling_edge());
        assert!(!deb.read_falling_edge());
        assert!(!deb.read_rising_edge());

        level.set(false);
        run(&mut deb, &clock, 100, 100);
        assert_eq!(deb.state(), DebounceState::Rising);

        run(&mut deb, &clock, 101, 140);
        assert_eq!(deb.state(), DebounceState::Up);
        assert!(deb.read_rising_edge());
        assert!(!deb.read_rising_edge());
        assert!(!deb.read_falling_edge());
    }

    #[test]
    fn test_short_glitch_returns_up() {
        let level = Cell::new(false);
        let clock = MockClock(Cell::new(0));
        let mut deb = Debouncer::new(MockButton(&level), 40).unwrap();

        level.set(true);
        run(&mut deb, &clock, 0, 5);
        level.set(false);
        run(&mut deb, &clock, 6, 60);

        assert_eq!(deb.state(), DebounceState::Up);
        assert!(!deb.read_falling_edge());
        assert!(!deb.read_key_pressed());
    }

    #[test]
    fn test_release_glitch_returns_down() {
        let level = Cell::new(true);
        let clock = MockClock(Cell::new(0));
        let mut deb = Debouncer::new(MockButton(&level), 40).unwrap();
        run(&mut deb, &clock, 0, 40);
        assert!(deb.read_falling_edge());

        level.set(false);
        run(&mut deb, &clock, 41, 45);
        level.set(true);
        run(&mut deb, &clock, 46, 100);

        assert_eq!(deb.state(), DebounceState::Down);
        assert!(!deb.read_rising_edge());
    }

    #[test]
    fn test_key_pressed_latched_separately() {
        let level = Cell::new(true);
        let clock = MockClock(Cell::new(0));
        let mut deb = Debouncer::new(MockButton(&level), 10).unwrap();
        run(&mut deb, &clock, 0, 10);

        assert!(deb.read_falling_edge());
        assert!(deb.read_key_pressed());
        assert!(!deb.read_key_pressed());
    }

    #[test]
    fn test_single_pending_edge_per_kind() {
        let level = Cell::new(false);
        let clock = MockClock(Cell::new(0));
        let mut deb = Debouncer::new(MockButton(&level), 10).unwrap();

        // Two full presses without reading in between
        for base in [0u32, 100] {
            level.set(true);
            run(&mut deb, &clock, base, base + 10);
            level.set(false);
            run(&mut deb, &clock, base + 50, base + 60);
        }

        assert!(deb.read_falling_edge());
        assert!(!deb.read_falling_edge());
        assert!(deb.read_rising_edge());
        assert!(!deb.read_rising_edge());
    }

    #[test]
    fn test_corrupted_state_recovers() {
        let level = Cell::new(false);
        let clock = MockClock(Cell::new(0));
        let mut deb = Debouncer::new(MockButton(&level), 40).unwrap();

        level.set(true);
        run(&mut deb, &clock, 0, 0);
        deb.load_raw_state(0xA5);
        assert_eq!(deb.state(), DebounceState::Corrupted(0xA5));

        run(&mut deb, &clock, 1, 1);
        assert_eq!(deb.state(), DebounceState::Up);
        assert_eq!(deb.recoveries(), 1);

        // Settle window restarts from scratch
        run(&mut deb, &clock, 2, 2);
        assert_eq!(deb.state(), DebounceState::Falling);
        run(&mut deb, &clock, 3, 41);
        assert_eq!(deb.state(), DebounceState::Falling);
        run(&mut deb, &clock, 42, 42);
        assert_eq!(deb.state(), DebounceState::Down);
    }

    #[test]
    fn test_recovery_keeps_pending_edges() {
        let level = Cell::new(true);
        let clock = MockClock(Cell::new(0));
        let mut deb = Debouncer::new(MockButton(&level), 40).unwrap();

        run(&mut deb, &clock, 0, 40);
        assert_eq!(deb.state(), DebounceState::Down);

        deb.load_raw_state(0xA5);
        run(&mut deb, &clock, 41, 41);
        assert_eq!(deb.state(), DebounceState::Up);
        assert_eq!(deb.recoveries(), 1);

        assert!(deb.read_falling_edge());
        assert!(deb.read_key_pressed());
        assert!(!deb.read_falling_edge());
    }

    #[test]
    fn test_raw_state_roundtrip_for_known_states() {
        for state in [
            DebounceState::Up,
            DebounceState::Falling,
            DebounceState::Down,
            DebounceState::Rising,
        ] {
            assert_eq!(DebounceState::from(state.to_raw()), state);
        }
    }

    #[test]
    fn test_settle_across_tick_wrap() {
        let level = Cell::new(true);
        let clock = MockClock(Cell::new(u32::MAX - 10));
        let mut deb = Debouncer::new(MockButton(&level), 40).unwrap();

        deb.update(&clock);
        clock.0.set(28);
        deb.update(&clock);
        assert_eq!(deb.state(), DebounceState::Falling);
        clock.0.set(29);
        deb.update(&clock);
        assert_eq!(deb.state(), DebounceState::Down);
        assert!(deb.read_falling_edge());
    }

    proptest! {
        #[test]
        fn prop_held_press_gives_one_edge(settle in 1u32..200, hold_extra in 0u32..200) {
            let level = Cell::new(true);
            let clock = MockClock(Cell::new(0));
            let mut deb = Debouncer::new(MockButton(&level), settle).unwrap();

            run(&mut deb, &clock, 0, settle + hold_extra);
            prop_assert_eq!(deb.state(), DebounceState::Down);
            prop_assert!(deb.read_falling_edge());
            prop_assert!(!deb.read_falling_edge());

            let release = settle + hold_extra + 1;
            level.set(false);
            run(&mut deb, &clock, release, release + settle);
            prop_assert_eq!(deb.state(), DebounceState::Up);
            prop_assert!(deb.read_rising_edge());
            prop_assert!(!deb.read_rising_edge());
        }

        #[test]
        fn prop_fast_bounce_gives_no_edge(settle in 4u32..100, cycles in 1usize..20) {
            let level = Cell::new(false);
            let clock = MockClock(Cell::new(0));
            let mut deb = Debouncer::new(MockButton(&level), settle).unwrap();

            // Each half period is shorter than the settle window, and every
            // settle check lands on a released sample
            let half = settle / 2;
            let mut t = 0;
            for _ in 0..cycles {
                level.set(true);
                run(&mut deb, &clock, t, t + half - 1);
                t += half;
                level.set(false);
                run(&mut deb, &clock, t, t + settle);
                t += settle + 1;
            }

            prop_assert_eq!(deb.state(), DebounceState::Up);
            prop_assert!(!deb.read_falling_edge());
            prop_assert!(!deb.read_rising_edge());
        }
    }
}

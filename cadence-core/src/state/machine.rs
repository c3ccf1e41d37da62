//! Measurement menu state machine
//!
//! Which sensor channel is being streamed is a function of the current
//! mode and the last user event.

use super::events::Event;

/// Sensor channels of the IMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Angular rate (°/s)
    Gyro,
    /// Acceleration (g)
    Accel,
    /// Die temperature (°C)
    Temp,
}

impl Channel {
    /// All channels in menu order
    pub const ALL: [Channel; 3] = [Channel::Gyro, Channel::Accel, Channel::Temp];

    /// Menu key that selects this channel
    pub fn menu_key(self) -> u8 {
        match self {
            Channel::Gyro => b'1',
            Channel::Accel => b'2',
            Channel::Temp => b'3',
        }
    }
}

/// Menu modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Menu shown, nothing streaming yet
    #[default]
    Start,
    /// Streaming gyroscope readings
    Gyro,
    /// Streaming accelerometer readings
    Accel,
    /// Streaming temperature readings
    Temp,
}

/// Which of the three board LEDs are lit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorPattern {
    pub led1: bool,
    pub led2: bool,
    pub led3: bool,
}

impl IndicatorPattern {
    /// Everything off
    pub const OFF: Self = Self {
        led1: false,
        led2: false,
        led3: false,
    };

    /// Fatal fault: LED2 alone
    pub const FAULT: Self = Self {
        led1: false,
        led2: true,
        led3: false,
    };
}

impl Mode {
    /// Mode that streams the given channel
    pub fn streaming(channel: Channel) -> Self {
        match channel {
            Channel::Gyro => Mode::Gyro,
            Channel::Accel => Mode::Accel,
            Channel::Temp => Mode::Temp,
        }
    }

    /// Channel sampled in this mode
    pub fn channel(self) -> Option<Channel> {
        match self {
            Mode::Start => None,
            Mode::Gyro => Some(Channel::Gyro),
            Mode::Accel => Some(Channel::Accel),
            Mode::Temp => Some(Channel::Temp),
        }
    }

    /// LED pattern shown in this mode (one LED per channel)
    pub fn indicator(self) -> IndicatorPattern {
        match self {
            Mode::Start => IndicatorPattern::OFF,
            Mode::Gyro => IndicatorPattern {
                led1: true,
                ..IndicatorPattern::OFF
            },
            Mode::Accel => IndicatorPattern {
                led2: true,
                ..IndicatorPattern::OFF
            },
            Mode::Temp => IndicatorPattern {
                led3: true,
                ..IndicatorPattern::OFF
            },
        }
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Mode::*;

        match (self, event) {
            // Button cycles through the channels, Start only enters the loop
            (Start, KeyPressed) => Gyro,
            (Gyro, KeyPressed) => Accel,
            (Accel, KeyPressed) => Temp,
            (Temp, KeyPressed) => Gyro,

            // Console keys jump straight to a channel
            (_, Select(channel)) => Mode::streaming(channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_to_gyro() {
        assert_eq!(Mode::Start.transition(Event::KeyPressed), Mode::Gyro);
    }

    #[test]
    fn test_button_cycle() {
        let mut mode = Mode::Gyro;
        let mut seen = [Mode::Start; 4];
        for slot in seen.iter_mut() {
            mode = mode.transition(Event::KeyPressed);
            *slot = mode;
        }
        assert_eq!(seen, [Mode::Accel, Mode::Temp, Mode::Gyro, Mode::Accel]);
    }

    #[test]
    fn test_select_from_any_mode() {
        for mode in [Mode::Start, Mode::Gyro, Mode::Accel, Mode::Temp] {
            assert_eq!(mode.transition(Event::Select(Channel::Temp)), Mode::Temp);
        }
    }

    #[test]
    fn test_start_streams_nothing() {
        assert_eq!(Mode::Start.channel(), None);
        assert_eq!(Mode::Start.indicator(), IndicatorPattern::OFF);
    }

    #[test]
    fn test_one_led_per_channel() {
        for channel in Channel::ALL {
            let pattern = Mode::streaming(channel).indicator();
            let lit = [pattern.led1, pattern.led2, pattern.led3]
                .iter()
                .filter(|on| **on)
                .count();
            assert_eq!(lit, 1);
            assert_eq!(Mode::streaming(channel).channel(), Some(channel));
        }
    }

    #[test]
    fn test_fault_pattern_is_led2() {
        assert!(IndicatorPattern::FAULT.led2);
        assert!(!IndicatorPattern::FAULT.led1);
        assert!(!IndicatorPattern::FAULT.led3);
    }
}

//! Text console over a serial port
//!
//! Line-oriented output for a terminal emulator: VT100 screen clearing,
//! startup banner, measurement menu and formatted readings. Every line ends
//! with `"\n\r"` as terminals on the other end expect.

use core::fmt::{self, Write};

use cadence_core::traits::Axes;
use cadence_hal::uart::{UartConfig, UartRx, UartTx};
use heapless::String;

/// VT100 "erase entire screen"
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// VT100 "cursor home"
pub const CURSOR_HOME: &str = "\x1b[H";

/// Capacity of a single formatted line
pub const LINE_CAPACITY: usize = 96;

/// One formatted console line
pub type Line = String<LINE_CAPACITY>;

/// Menu entries, in key order
pub const MENU: [&str; 3] = [
    "1 - Gyroscope readings.\n\r",
    "2 - Accelerometer readings.\n\r",
    "3 - Temperature readings.\n\r",
];

/// Console errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError<E> {
    /// Zero-length transfer requested
    EmptyBuffer,
    /// Formatted text did not fit in a [`Line`]
    Overflow,
    /// Underlying UART failure
    Uart(E),
}

/// Console on a UART
pub struct Console<U> {
    uart: U,
}

impl<U> Console<U> {
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Release the UART
    pub fn release(self) -> U {
        self.uart
    }
}

impl<U: UartTx> Console<U> {
    /// Clear the terminal and home the cursor
    pub fn clear_screen(&mut self) -> Result<(), ConsoleError<U::Error>> {
        self.send_str(CLEAR_SCREEN)?;
        self.send_str(CURSOR_HOME)
    }

    /// Send a string
    pub fn send_str(&mut self, text: &str) -> Result<(), ConsoleError<U::Error>> {
        self.send_sized(text.as_bytes())
    }

    /// Send an exact byte slice, rejecting empty input
    pub fn send_sized(&mut self, data: &[u8]) -> Result<(), ConsoleError<U::Error>> {
        if data.is_empty() {
            return Err(ConsoleError::EmptyBuffer);
        }
        self.uart.write_blocking(data).map_err(ConsoleError::Uart)
    }

    /// Format into a [`Line`] and send it
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), ConsoleError<U::Error>> {
        let mut line = Line::new();
        line.write_fmt(args).map_err(|_| ConsoleError::Overflow)?;
        self.send_str(&line)
    }

    /// Report the serial parameters the port was opened with
    pub fn print_banner(
        &mut self,
        instance: u8,
        config: &UartConfig,
    ) -> Result<(), ConsoleError<U::Error>> {
        self.send_str("USART initialized correctly with the following parameters:\n\r")?;
        write!(self, "USART instance: {} \n\r", instance)?;
        write!(self, "Baud Rate: {} \n\r", config.baudrate)?;
        write!(self, "Word Length: {} \n\r", config.data_bits.count())?;
        write!(self, "Stop bits: {} \n\r", config.stop_bits.count())?;
        write!(self, "Parity: {} \n\r", config.parity.name())?;
        self.send_str("Hardware Control: None \n\r")?;
        self.send_str("Mode: Tx and Rx \n\r")?;
        self.send_str("Over Sampling: 16 \n\r")
    }

    /// Clear the screen and list the measurement options
    pub fn print_menu(&mut self) -> Result<(), ConsoleError<U::Error>> {
        self.clear_screen()?;
        for entry in MENU {
            self.send_str(entry)?;
        }
        Ok(())
    }

    /// Replace the screen contents with a single line
    pub fn show_line(&mut self, line: &str) -> Result<(), ConsoleError<U::Error>> {
        self.clear_screen()?;
        self.send_str(line)
    }

    /// Wait for queued bytes to leave the port
    pub fn flush(&mut self) -> Result<(), ConsoleError<U::Error>> {
        self.uart.flush().map_err(ConsoleError::Uart)
    }
}

impl<U: UartRx> Console<U> {
    /// Fill `buf` from the port, rejecting empty input
    pub fn receive_sized(&mut self, buf: &mut [u8]) -> Result<usize, ConsoleError<U::Error>> {
        if buf.is_empty() {
            return Err(ConsoleError::EmptyBuffer);
        }
        self.uart.read_blocking(buf).map_err(ConsoleError::Uart)
    }

    /// Pending key press, if any
    pub fn poll_key(&mut self) -> Result<Option<u8>, ConsoleError<U::Error>> {
        self.uart.try_read_byte().map_err(ConsoleError::Uart)
    }
}

/// `Gyro  X: 1.000 d/s\tY: ... d/s\tZ: ... d/s\n\r`
pub fn format_gyro(rate: &Axes) -> Result<Line, fmt::Error> {
    let mut line = Line::new();
    write!(
        line,
        "Gyro  X: {:.3} d/s\tY: {:.3} d/s\tZ: {:.3} d/s\n\r",
        rate.x, rate.y, rate.z
    )?;
    Ok(line)
}

/// `Accel X: 1.000 g/s\tY: ... g/s\tZ: ... g/s\n\r`
pub fn format_accel(accel: &Axes) -> Result<Line, fmt::Error> {
    let mut line = Line::new();
    write!(
        line,
        "Accel X: {:.3} g/s\tY: {:.3} g/s\tZ: {:.3} g/s\n\r",
        accel.x, accel.y, accel.z
    )?;
    Ok(line)
}

/// `Temp: 36.530 C\n\r`
pub fn format_temperature(celsius: f32) -> Result<Line, fmt::Error> {
    let mut line = Line::new();
    write!(line, "Temp: {:.3} C\n\r", celsius)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Broken;

    #[derive(Default)]
    struct MockUart {
        sent: std::string::String,
        inbox: Vec<u8>,
        broken: bool,
    }

    impl UartTx for MockUart {
        type Error = Broken;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Broken> {
            if self.broken {
                return Err(Broken);
            }
            self.sent.push_str(core::str::from_utf8(data).unwrap());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Broken> {
            Ok(())
        }
    }

    impl UartRx for MockUart {
        type Error = Broken;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Broken> {
            if self.inbox.len() < buf.len() {
                return Err(Broken);
            }
            for slot in buf.iter_mut() {
                *slot = self.inbox.remove(0);
            }
            Ok(buf.len())
        }

        fn try_read_byte(&mut self) -> Result<Option<u8>, Broken> {
            if self.inbox.is_empty() {
                Ok(None)
            } else {
                Ok(Some(self.inbox.remove(0)))
            }
        }
    }

    #[test]
    fn test_clear_screen_sequence() {
        let mut console = Console::new(MockUart::default());
        console.clear_screen().unwrap();
        assert_eq!(console.release().sent, "\x1b[2J\x1b[H");
    }

    #[test]
    fn test_send_sized_rejects_empty() {
        let mut console = Console::new(MockUart::default());
        assert_eq!(console.send_sized(&[]), Err(ConsoleError::EmptyBuffer));
        assert_eq!(console.send_str(""), Err(ConsoleError::EmptyBuffer));
        let mut buf = [0u8; 0];
        assert_eq!(console.receive_sized(&mut buf), Err(ConsoleError::EmptyBuffer));
    }

    #[test]
    fn test_uart_error_propagates() {
        let mut console = Console::new(MockUart {
            broken: true,
            ..MockUart::default()
        });
        assert_eq!(console.send_str("x"), Err(ConsoleError::Uart(Broken)));
    }

    #[test]
    fn test_banner_reports_config() {
        let mut console = Console::new(MockUart::default());
        console.print_banner(3, &UartConfig::default()).unwrap();
        let sent = console.release().sent;
        assert!(sent.starts_with("USART initialized correctly"));
        assert!(sent.contains("USART instance: 3 \n\r"));
        assert!(sent.contains("Baud Rate: 9600 \n\r"));
        assert!(sent.contains("Word Length: 8 \n\r"));
        assert!(sent.contains("Stop bits: 1 \n\r"));
        assert!(sent.contains("Parity: Odd \n\r"));
    }

    #[test]
    fn test_menu_clears_first() {
        let mut console = Console::new(MockUart::default());
        console.print_menu().unwrap();
        let sent = console.release().sent;
        assert!(sent.starts_with("\x1b[2J\x1b[H1 - "));
        assert_eq!(sent.matches("\n\r").count(), 3);
    }

    #[test]
    fn test_receive_and_poll() {
        let mut console = Console::new(MockUart {
            inbox: b"ab2".to_vec(),
            ..MockUart::default()
        });
        let mut buf = [0u8; 2];
        assert_eq!(console.receive_sized(&mut buf), Ok(2));
        assert_eq!(&buf, b"ab");
        assert_eq!(console.poll_key(), Ok(Some(b'2')));
        assert_eq!(console.poll_key(), Ok(None));
    }

    #[test]
    fn test_format_lines() {
        let gyro = format_gyro(&Axes::new(1.0, -0.5, 250.0)).unwrap();
        assert_eq!(
            gyro.as_str(),
            "Gyro  X: 1.000 d/s\tY: -0.500 d/s\tZ: 250.000 d/s\n\r"
        );

        let accel = format_accel(&Axes::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(
            accel.as_str(),
            "Accel X: 0.000 g/s\tY: 0.000 g/s\tZ: 1.000 g/s\n\r"
        );

        let temp = format_temperature(36.53).unwrap();
        assert_eq!(temp.as_str(), "Temp: 36.530 C\n\r");
    }

    #[test]
    fn test_extreme_readings_fit() {
        let big = Axes::new(-2000.0, -2000.0, -2000.0);
        assert!(format_gyro(&big).is_ok());
        assert!(format_accel(&Axes::new(-16.0, -16.0, -16.0)).is_ok());
    }

    #[test]
    fn test_oversized_reading_is_an_error() {
        let huge = Axes::new(f32::MAX, f32::MAX, f32::MAX);
        assert_eq!(format_gyro(&huge), Err(fmt::Error));
        assert_eq!(format_accel(&huge), Err(fmt::Error));

        let mut console = Console::new(MockUart::default());
        assert_eq!(
            console.write_fmt(format_args!("{:.3}{:.3}{:.3}", f32::MAX, f32::MAX, f32::MAX)),
            Err(ConsoleError::Overflow)
        );
        assert_eq!(console.release().sent, "");
    }

    #[test]
    fn test_show_line() {
        let mut console = Console::new(MockUart::default());
        console.show_line("Temp: 1.000 C\n\r").unwrap();
        assert_eq!(console.release().sent, "\x1b[2J\x1b[HTemp: 1.000 C\n\r");
    }
}

//! UART driver for STM32F4
//!
//! Blocking console port. Receives are bounded by the configured timeout.

use cadence_hal::uart::{DataBits, Parity, StopBits, UartConfig, UartRx, UartTx};
use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::{self, Error as UsartError, Uart};
use embassy_time::{Duration, Instant};

/// Convert board settings to the embassy peripheral config
///
/// Data bits exclude the parity bit; embassy widens the frame itself when
/// parity is enabled.
pub fn to_embassy_config(config: &UartConfig) -> usart::Config {
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = config.baudrate;
    uart_config.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    uart_config.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    uart_config.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    uart_config
}

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// No byte within the receive timeout
    Timeout,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

/// Blocking UART with a receive timeout
pub struct BlockingUart<'d> {
    uart: Uart<'d, Blocking>,
    timeout: Duration,
}

impl<'d> BlockingUart<'d> {
    /// Wrap a peripheral created with `Uart::new_blocking`
    pub fn new(uart: Uart<'d, Blocking>, config: &UartConfig) -> Self {
        Self {
            uart,
            timeout: Duration::from_millis(config.timeout_ms as u64),
        }
    }
}

impl UartTx for BlockingUart<'_> {
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.uart.blocking_write(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.blocking_flush()?;
        Ok(())
    }
}

impl UartRx for BlockingUart<'_> {
    type Error = UartBusError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let deadline = Instant::now() + self.timeout;
        for slot in buf.iter_mut() {
            loop {
                match self.uart.nb_read() {
                    Ok(byte) => {
                        *slot = byte;
                        break;
                    }
                    Err(nb::Error::WouldBlock) if Instant::now() >= deadline => {
                        return Err(UartBusError::Timeout);
                    }
                    Err(nb::Error::WouldBlock) => {}
                    Err(nb::Error::Other(e)) => return Err(e.into()),
                }
            }
        }
        Ok(buf.len())
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        match self.uart.nb_read() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(e.into()),
        }
    }
}

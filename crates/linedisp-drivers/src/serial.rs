/*!
 * Serial port driver.
 *
 * Opens a local serial port with settings taken from the driver options and
 * wraps it as the display's channel.
 *
 * | option      | type                 | default |
 * |-------------|----------------------|---------|
 * | `port`      | string               | required |
 * | `baud`      | integer              | 9600    |
 * | `size`      | data bits, 5-8       | 8       |
 * | `stop_bits` | 1 or 2               | 1       |
 * | `parity`    | `none`/`odd`/`even` or `N`/`O`/`E` byte | none |
 * | `timeout_ms`| integer              | 1000    |
 */
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, StopBits};
use tracing::debug;

use linedisp_core::logging::display_span;
use linedisp_core::types::{DriverConfig, OptionError, Value};

use crate::display::{Display, RawChannel};
use crate::driver::Driver;
use crate::error::{DisplayError, Result};
use crate::protocol::Protocol;

/// Name the serial driver registers under
pub const NAME: &str = "serial";

/// Port path or name, e.g. `/dev/ttyUSB0` or `COM3`
pub const OPTION_PORT: &str = "port";
/// Baud rate
pub const OPTION_BAUD: &str = "baud";
/// Data bits per frame
pub const OPTION_SIZE: &str = "size";
/// Stop bits
pub const OPTION_STOP_BITS: &str = "stop_bits";
/// Parity
pub const OPTION_PARITY: &str = "parity";
/// Read/write timeout of the port in milliseconds
pub const OPTION_TIMEOUT_MS: &str = "timeout_ms";

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;
/// Default port timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Resolved serial port settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Port path or name
    pub port: String,
    /// Baud rate
    pub baud: u32,
    /// Data bits
    pub data_bits: DataBits,
    /// Stop bits
    pub stop_bits: StopBits,
    /// Parity
    pub parity: Parity,
    /// Port timeout
    pub timeout: Duration,
}

impl SerialSettings {
    /// Settings for `port` with every other option at its default
    pub fn new<S: Into<String>>(port: S) -> Self {
        Self {
            port: port.into(),
            baud: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolve settings from driver options, defaulting each one
    /// independently
    pub fn from_config(config: &DriverConfig) -> Result<Self> {
        let port = config
            .get_string(OPTION_PORT)?
            .ok_or(DisplayError::MissingOption(OPTION_PORT))?;
        let mut settings = Self::new(port);

        if let Some(baud) = config.get_integer(OPTION_BAUD)? {
            settings.baud = u32::try_from(baud)
                .ok()
                .filter(|b| *b > 0)
                .ok_or_else(|| invalid(config, OPTION_BAUD, "a positive baud rate"))?;
        }

        if let Some(size) = config.get_byte(OPTION_SIZE)? {
            settings.data_bits = match size {
                5 => DataBits::Five,
                6 => DataBits::Six,
                7 => DataBits::Seven,
                8 => DataBits::Eight,
                _ => return Err(invalid(config, OPTION_SIZE, "5, 6, 7 or 8 data bits")),
            };
        }

        if let Some(stop_bits) = config.get_byte(OPTION_STOP_BITS)? {
            settings.stop_bits = match stop_bits {
                1 => StopBits::One,
                2 => StopBits::Two,
                _ => return Err(invalid(config, OPTION_STOP_BITS, "1 or 2 stop bits")),
            };
        }

        if let Some(value) = config.get(OPTION_PARITY) {
            settings.parity =
                parse_parity(value).ok_or_else(|| invalid(config, OPTION_PARITY, "none, odd or even"))?;
        }

        if let Some(ms) = config.get_integer(OPTION_TIMEOUT_MS)? {
            let ms = u64::try_from(ms)
                .map_err(|_| invalid(config, OPTION_TIMEOUT_MS, "a non-negative number of milliseconds"))?;
            settings.timeout = Duration::from_millis(ms);
        }

        Ok(settings)
    }

    /// Open the port
    pub fn open(&self) -> Result<Box<dyn SerialPort>> {
        let port = serialport::new(&self.port, self.baud)
            .data_bits(self.data_bits)
            .stop_bits(self.stop_bits)
            .parity(self.parity)
            .timeout(self.timeout)
            .open()?;
        Ok(port)
    }
}

fn parse_parity(value: &Value) -> Option<Parity> {
    let code = match value {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "none" | "n" => b'N',
            "odd" | "o" => b'O',
            "even" | "e" => b'E',
            _ => return None,
        },
        other => other.as_byte()?.to_ascii_uppercase(),
    };
    match code {
        b'N' => Some(Parity::None),
        b'O' => Some(Parity::Odd),
        b'E' => Some(Parity::Even),
        _ => None,
    }
}

fn invalid(config: &DriverConfig, name: &str, expected: &'static str) -> DisplayError {
    let found = config
        .get(name)
        .map(|v| format!("{} {}", v.type_name(), v))
        .unwrap_or_default();
    DisplayError::InvalidOption(OptionError {
        name: name.to_string(),
        expected,
        found,
    })
}

/// A serial port used as a display channel
#[derive(Debug)]
pub struct SerialChannel<P = Box<dyn SerialPort>> {
    port: Option<P>,
}

impl<P: Read + Write + Send> SerialChannel<P> {
    /// Wrap an open port
    pub fn new(port: P) -> Self {
        Self { port: Some(port) }
    }

    fn port(&mut self) -> io::Result<&mut P> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port already closed"))
    }
}

impl<P: Read + Write + Send> RawChannel for SerialChannel<P> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.port()?.write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port()?.read(buf)
    }

    // Flush pending output, then drop the port to release the device.
    fn close(&mut self) -> io::Result<()> {
        self.port()?.flush()?;
        self.port = None;
        Ok(())
    }
}

/// Driver for displays on a local serial port
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialDriver;

impl SerialDriver {
    /// Create a new serial driver
    pub fn new() -> Self {
        Self
    }
}

impl Driver for SerialDriver {
    fn get_display(&self, protocol: Arc<dyn Protocol>, config: &DriverConfig) -> Result<Display> {
        let _span = display_span(NAME, protocol.name()).entered();
        let settings = SerialSettings::from_config(config)?;
        let port = settings.open()?;
        debug!(port = %settings.port, baud = settings.baud, "Serial port opened");
        Ok(Display::new(protocol).attach(SerialChannel::new(port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::protocols::FirichProtocol;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::new().with_option(OPTION_PORT, "/dev/ttyUSB0");
        let settings = SerialSettings::from_config(&config).unwrap();
        assert_eq!(settings, SerialSettings::new("/dev/ttyUSB0"));
        assert_eq!(settings.baud, 9600);
        assert_eq!(settings.data_bits, DataBits::Eight);
        assert_eq!(settings.stop_bits, StopBits::One);
        assert_eq!(settings.parity, Parity::None);
    }

    #[test]
    fn test_explicit_settings() {
        let config = DriverConfig::new()
            .with_option(OPTION_PORT, "COM3")
            .with_option(OPTION_BAUD, 19200)
            .with_option(OPTION_SIZE, 7u8)
            .with_option(OPTION_STOP_BITS, 2)
            .with_option(OPTION_PARITY, b'E')
            .with_option(OPTION_TIMEOUT_MS, 250);
        let settings = SerialSettings::from_config(&config).unwrap();
        assert_eq!(settings.port, "COM3");
        assert_eq!(settings.baud, 19200);
        assert_eq!(settings.data_bits, DataBits::Seven);
        assert_eq!(settings.stop_bits, StopBits::Two);
        assert_eq!(settings.parity, Parity::Even);
        assert_eq!(settings.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_parity_names() {
        for (value, parity) in [("odd", Parity::Odd), ("EVEN", Parity::Even), ("n", Parity::None)] {
            let config = DriverConfig::new()
                .with_option(OPTION_PORT, "p")
                .with_option(OPTION_PARITY, value);
            assert_eq!(SerialSettings::from_config(&config).unwrap().parity, parity);
        }
    }

    #[test]
    fn test_missing_port() {
        let err = SerialSettings::from_config(&DriverConfig::new()).unwrap_err();
        assert!(matches!(err, DisplayError::MissingOption("port")));
    }

    #[test]
    fn test_invalid_options() {
        let base = DriverConfig::new().with_option(OPTION_PORT, "p");
        let cases = [
            (OPTION_BAUD, Value::from("fast")),
            (OPTION_BAUD, Value::from(-1)),
            (OPTION_SIZE, Value::from(9)),
            (OPTION_STOP_BITS, Value::from(3)),
            (OPTION_PARITY, Value::from("mark")),
            (OPTION_TIMEOUT_MS, Value::from(-5)),
        ];
        for (name, value) in cases {
            let config = base.clone().with_option(name, value.clone());
            match SerialSettings::from_config(&config) {
                Err(DisplayError::InvalidOption(e)) => assert_eq!(e.name, name),
                other => panic!("{} = {} should be rejected, got {:?}", name, value, other),
            }
        }
    }

    #[test]
    fn test_get_display_without_port() {
        let err = SerialDriver::new()
            .get_display(Arc::new(FirichProtocol), &DriverConfig::new())
            .unwrap_err();
        assert!(matches!(err, DisplayError::MissingOption(OPTION_PORT)));
    }

    #[test]
    fn test_get_display_open_failure() {
        let config = DriverConfig::new().with_option(OPTION_PORT, "/dev/linedisp-no-such-port");
        let err = SerialDriver::new()
            .get_display(Arc::new(FirichProtocol), &config)
            .unwrap_err();
        assert!(matches!(err, DisplayError::Serial(_)), "got {:?}", err);
    }

    /// In-memory stand-in for a port
    #[derive(Debug, Default, Clone)]
    struct Loopback {
        written: Arc<Mutex<Vec<u8>>>,
        flushed: Arc<Mutex<bool>>,
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let mut written = self.written.lock().unwrap();
            let n = buf.len().min(written.len());
            buf[..n].copy_from_slice(&written[..n]);
            written.drain(..n);
            Ok(n)
        }
    }

    impl Write for Loopback {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.written.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            *self.flushed.lock().unwrap() = true;
            Ok(())
        }
    }

    #[test]
    fn test_serial_channel_through_display() {
        let port = Loopback::default();
        let display = Display::new(Arc::new(FirichProtocol)).attach(SerialChannel::new(port.clone()));

        display.clear().unwrap();
        display.send(&[0xAA, 0xBB]).unwrap();

        let mut buf = [0u8; 3];
        assert_eq!(display.receive(&mut buf).unwrap(), 3);
        assert_eq!(buf, [0x0C, 0xAA, 0xBB]);

        display.close().unwrap();
        assert!(*port.flushed.lock().unwrap());
    }

    #[test]
    fn test_serial_channel_after_close() {
        let mut channel = SerialChannel::new(Loopback::default());
        channel.close().unwrap();
        let err = RawChannel::write(&mut channel, &[1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert_eq!(channel.close().unwrap_err().kind(), io::ErrorKind::NotConnected);
    }
}

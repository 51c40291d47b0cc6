//! Serial connection configuration.

use std::time::Duration;

/// Baud rate the Forth console runs at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Per-read timeout of the reader loop.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Serial connection configuration.
///
/// Framing is fixed at 8 data bits, no parity, one stop bit and no flow
/// control.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device path or name (e.g. `/dev/ttyACM0`, `COM3`).
    pub port: String,

    /// Line speed.
    pub baud_rate: u32,

    /// How long a single read blocks before giving up.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// Create a configuration for `port` with the default line settings.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

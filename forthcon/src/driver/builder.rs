//! Builder for creating console drivers.

use std::time::Duration;

use super::console::{ConsoleDriver, DEFAULT_PACING};
use super::policy::WaitPolicy;
use crate::channel::{ConsoleChannel, Prompt, Transcript};
use crate::config::SessionConfig;
use crate::error::{DriverError, Result};
use crate::transport::config::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
use crate::transport::{SerialConfig, SerialTransport, Transport};

/// Default number of trailing bytes searched for the prompt.
pub const DEFAULT_SEARCH_DEPTH: usize = 256;

/// Builder for constructing console drivers.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use forthcon::{DriverBuilder, WaitPolicy};
///
/// # async fn example() -> Result<(), forthcon::Error> {
/// let mut driver = DriverBuilder::new("/dev/ttyACM0")
///     .wait_policy(WaitPolicy::patient())
///     .pacing(Duration::from_millis(5))
///     .build()?;
///
/// driver.replay([": sq dup * ;", "7 sq ."]).await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    port: String,
    baud_rate: u32,
    read_timeout: Duration,
    pacing: Duration,
    policy: WaitPolicy,
    prompt_regex: Option<String>,
    search_depth: usize,
    transcript: Option<Transcript>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified serial port.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            pacing: DEFAULT_PACING,
            policy: WaitPolicy::default(),
            prompt_regex: None,
            search_depth: DEFAULT_SEARCH_DEPTH,
            transcript: None,
        }
    }

    /// Start from a session file's settings.
    pub fn from_config(port: impl Into<String>, config: &SessionConfig) -> Result<Self> {
        let mut builder = Self::new(port)
            .baud_rate(config.baud_rate)
            .read_timeout(Duration::from_millis(config.read_timeout_ms))
            .pacing(Duration::from_millis(config.pacing_ms))
            .search_depth(config.search_depth)
            .wait_policy(config.wait_policy()?);

        if let Some(pattern) = &config.prompt_regex {
            builder = builder.prompt_regex(pattern.clone());
        }
        Ok(builder)
    }

    /// Set the line speed (default: 115200).
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the per-read timeout (default: 100 ms).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the delay before each transmitted character (default: 10 ms).
    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Set the prompt wait policy (default: deadline).
    pub fn wait_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Match the prompt with a regex instead of the policy's marker.
    pub fn prompt_regex(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_regex = Some(pattern.into());
        self
    }

    /// Set how many trailing bytes are searched for the prompt.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    /// Echo the session somewhere other than stdout.
    pub fn transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Open the serial port and build the driver.
    ///
    /// Fails with `DeviceUnavailable` when the port cannot be opened.
    pub fn build(self) -> Result<ConsoleDriver<SerialTransport>> {
        self.validate()?;
        let transport = SerialTransport::open(SerialConfig {
            port: self.port.clone(),
            baud_rate: self.baud_rate,
            read_timeout: self.read_timeout,
        })?;
        self.build_with_transport(transport)
    }

    /// Build the driver on top of an already open transport.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<ConsoleDriver<T>> {
        self.validate()?;

        let policy = match &self.prompt_regex {
            Some(pattern) => self.policy.with_prompt(Prompt::pattern(pattern)?),
            None => self.policy,
        };

        let channel = ConsoleChannel::new(
            transport,
            self.search_depth,
            self.read_timeout,
            self.transcript.unwrap_or_default(),
        );

        Ok(ConsoleDriver::new(channel, policy, self.pacing))
    }

    fn validate(&self) -> Result<()> {
        if self.port.is_empty() {
            return Err(invalid("serial port must not be empty"));
        }
        if self.read_timeout.is_zero() {
            return Err(invalid("read timeout must be positive"));
        }
        if self.search_depth == 0 {
            return Err(invalid("search depth must be positive"));
        }
        if let Prompt::Literal(marker) = self.policy.prompt() {
            if marker.is_empty() {
                return Err(invalid("prompt marker must not be empty"));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> crate::Error {
    DriverError::InvalidConfig {
        message: message.to_string(),
    }
    .into()
}

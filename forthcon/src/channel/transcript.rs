//! Operator transcript.
//!
//! Everything the device prints and every character sent to it is echoed
//! here as it happens. This is the tool's only diagnostic surface on
//! stdout; logs go to stderr.

use std::fmt;
use std::io::{self, Write};

use crate::error::ChannelError;

/// Marker printed after each replayed command.
pub const SEPARATOR: &str = "\n==> ";

/// Echo sink for the console exchange.
pub struct Transcript {
    out: Box<dyn Write + Send>,
}

impl Transcript {
    /// Echo to any writer.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Echo to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Discard the transcript.
    pub fn sink() -> Self {
        Self::new(io::sink())
    }

    /// Echo raw bytes and flush.
    pub fn echo(&mut self, data: &[u8]) -> Result<(), ChannelError> {
        self.out
            .write_all(data)
            .and_then(|()| self.out.flush())
            .map_err(ChannelError::Transcript)
    }

    /// Echo a single transmitted character.
    pub fn echo_char(&mut self, c: char) -> Result<(), ChannelError> {
        let mut utf8 = [0u8; 4];
        self.echo(c.encode_utf8(&mut utf8).as_bytes())
    }

    /// Mark the end of one replayed command.
    pub fn separator(&mut self) -> Result<(), ChannelError> {
        self.echo(SEPARATOR.as_bytes())
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript").finish_non_exhaustive()
    }
}

//! Serial transport layer wrapping the `serialport` crate.
//!
//! This module owns the device handle and moves raw bytes in both
//! directions. Prompt detection lives one layer up, in [`crate::channel`].

pub mod config;
#[cfg(test)]
pub(crate) mod mock;
mod serial;

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;

pub use config::SerialConfig;
pub use serial::SerialTransport;

/// Byte-level duplex link to a device console.
pub trait Transport: Send {
    /// Write all bytes to the device and flush.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `timeout` for the next chunk of device output.
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    fn read_chunk(&mut self, timeout: Duration)
    -> impl Future<Output = Result<Option<Bytes>>> + Send;
}

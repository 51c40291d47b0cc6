//! Serial transport implementation using serialport.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bytes::Bytes;
use log::{debug, info, warn};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tokio::sync::mpsc;

use super::Transport;
use super::config::SerialConfig;
use crate::error::{Result, TransportError};

const READ_CHUNK_SIZE: usize = 256;

/// Serial port transport.
///
/// Reads happen on a dedicated thread that blocks on the port with the
/// configured per-read timeout and forwards every chunk over a channel, so
/// the async side never blocks on the device.
pub struct SerialTransport {
    /// Write half of the port.
    port: Box<dyn SerialPort>,

    /// Chunks produced by the reader thread.
    rx: mpsc::UnboundedReceiver<io::Result<Bytes>>,

    /// Tells the reader thread to stop.
    shutdown: Arc<AtomicBool>,

    reader: Option<JoinHandle<()>>,

    /// Configuration used for this connection.
    config: SerialConfig,
}

impl SerialTransport {
    /// Open the serial device and start the reader thread.
    pub fn open(config: SerialConfig) -> Result<Self> {
        let unavailable = |source| TransportError::DeviceUnavailable {
            port: config.port.clone(),
            source,
        };

        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(unavailable)?;

        let reader_port = port.try_clone().map_err(unavailable)?;

        info!("Opened serial port {} at {} baud", config.port, config.baud_rate);

        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let reader = thread::Builder::new()
            .name("forthcon-reader".into())
            .spawn({
                let shutdown = shutdown.clone();
                move || read_loop(reader_port, tx, shutdown)
            })
            .map_err(TransportError::Io)?;

        Ok(Self {
            port,
            rx,
            shutdown,
            reader: Some(reader),
            config,
        })
    }

    /// Stop the reader thread and release the port.
    pub fn close(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                warn!("Serial reader thread for {} panicked", self.config.port);
            }
        }
        debug!("Closed serial port {}", self.config.port);
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        // The reader notices within one read timeout.
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Transport for SerialTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        // Blocks the runtime thread. Writes are one paced character or the
        // reset directive, and a session is a single task.
        self.port.write_all(data).map_err(TransportError::Io)?;
        self.port.flush().map_err(TransportError::Io)?;
        Ok(())
    }

    async fn read_chunk(&mut self, timeout: Duration) -> Result<Option<Bytes>> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Err(_) => Ok(None),
            Ok(Some(Ok(chunk))) => Ok(Some(chunk)),
            Ok(Some(Err(e))) => Err(TransportError::Io(e).into()),
            Ok(None) => Err(TransportError::Disconnected.into()),
        }
    }
}

/// Blocking reader loop run on the reader thread.
fn read_loop(
    mut port: Box<dyn SerialPort>,
    tx: mpsc::UnboundedSender<io::Result<Bytes>>,
    shutdown: Arc<AtomicBool>,
) {
    let mut buf = [0u8; READ_CHUNK_SIZE];

    while !shutdown.load(Ordering::Relaxed) {
        match port.read(&mut buf) {
            Ok(0) => continue,
            Ok(n) => {
                if tx.send(Ok(Bytes::copy_from_slice(&buf[..n]))).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Serial read failed: {}", e);
                let _ = tx.send(Err(e));
                break;
            }
        }
    }

    debug!("Serial reader thread exiting");
}

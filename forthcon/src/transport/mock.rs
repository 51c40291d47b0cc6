//! Scripted in-memory device used by the driver tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;

use super::Transport;
use crate::error::Result;

/// Something that crossed the wire, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Sent(Vec<u8>),
    Received(Vec<u8>),
}

/// A fake Forth console.
///
/// Every carriage return it receives is answered with `reply` (unless the
/// device is silent). Output is handed out in one chunk per read.
pub(crate) struct MockTransport {
    reply: Option<Vec<u8>>,
    pending: VecDeque<u8>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl MockTransport {
    /// A device that answers each `\r` with `reply`.
    pub(crate) fn responding(reply: &[u8]) -> Self {
        Self {
            reply: Some(reply.to_vec()),
            pending: VecDeque::new(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A device that never says anything.
    pub(crate) fn silent() -> Self {
        Self {
            reply: None,
            pending: VecDeque::new(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue output that is available before anything is written.
    pub(crate) fn with_output(mut self, output: &[u8]) -> Self {
        self.pending.extend(output);
        self
    }

    /// Shared handle on the wire log.
    pub(crate) fn events(&self) -> Arc<Mutex<Vec<Event>>> {
        self.events.clone()
    }
}

impl Transport for MockTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(Event::Sent(data.to_vec()));
        if let Some(reply) = &self.reply {
            for _ in data.iter().filter(|&&b| b == b'\r') {
                self.pending.extend(reply.iter().copied());
            }
        }
        Ok(())
    }

    async fn read_chunk(&mut self, timeout: Duration) -> Result<Option<Bytes>> {
        if self.pending.is_empty() {
            tokio::time::sleep(timeout).await;
            return Ok(None);
        }
        let chunk: Vec<u8> = self.pending.drain(..).collect();
        self.events
            .lock()
            .unwrap()
            .push(Event::Received(chunk.clone()));
        Ok(Some(Bytes::from(chunk)))
    }
}

/// Concatenate everything written to the device.
pub(crate) fn sent_bytes(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Sent(data) => Some(data.as_slice()),
            Event::Received(_) => None,
        })
        .flatten()
        .copied()
        .collect()
}

//! Console channel: paced transmission and prompt-gated reads.

use std::ops::Range;
use std::time::Duration;

use log::trace;
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use super::patterns::PromptMatcher;
use super::transcript::Transcript;
use crate::error::{ChannelError, Result};
use crate::transport::Transport;

/// Interactive channel to a device console.
///
/// Owns the transport, the response buffer and the transcript. All reads
/// and writes are echoed to the transcript.
pub struct ConsoleChannel<T> {
    transport: T,

    buffer: PatternBuffer,

    transcript: Transcript,

    /// Upper bound on a single transport read.
    read_timeout: Duration,
}

impl<T: Transport> ConsoleChannel<T> {
    pub fn new(
        transport: T,
        search_depth: usize,
        read_timeout: Duration,
        transcript: Transcript,
    ) -> Self {
        Self {
            transport,
            buffer: PatternBuffer::new(search_depth),
            transcript,
            read_timeout,
        }
    }

    /// Write bytes as-is, without pacing or echo.
    pub async fn send_raw(&mut self, data: &[u8]) -> Result<()> {
        trace!("send_raw: {:?}", String::from_utf8_lossy(data));
        self.transport.write(data).await
    }

    /// Send `line` one character at a time, then a carriage return.
    ///
    /// Each character is preceded by a `pacing` delay and echoed after it
    /// is written. The terminating `\r` is not echoed.
    pub async fn send_paced(&mut self, line: &str, pacing: Duration) -> Result<()> {
        let mut utf8 = [0u8; 4];
        for c in line.chars() {
            tokio::time::sleep(pacing).await;
            self.transport
                .write(c.encode_utf8(&mut utf8).as_bytes())
                .await?;
            self.transcript.echo_char(c)?;
        }
        self.transport.write(b"\r").await
    }

    /// Read until `matcher` hits the buffer tail.
    ///
    /// The buffer starts empty on every call. With `idle_timeout` set, the
    /// wait fails once that long passes without any byte arriving; without
    /// it the wait never ends on its own.
    pub async fn read_until(
        &mut self,
        matcher: &dyn PromptMatcher,
        idle_timeout: Option<Duration>,
    ) -> Result<ReadResult> {
        self.buffer.clear();
        let mut deadline = idle_timeout.map(|t| Instant::now() + t);

        loop {
            let wait = match (deadline, idle_timeout) {
                (Some(deadline), Some(idle)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(ChannelError::PromptTimeout(idle).into());
                    }
                    (deadline - now).min(self.read_timeout)
                }
                _ => self.read_timeout,
            };

            let Some(chunk) = self.transport.read_chunk(wait).await? else {
                continue;
            };

            self.transcript.echo(&chunk)?;
            self.buffer.extend(&chunk);
            trace!(
                "read chunk: {} bytes, buffer: {} bytes",
                chunk.len(),
                self.buffer.len()
            );

            if let Some(idle) = idle_timeout {
                deadline = Some(Instant::now() + idle);
            }

            if let Some(prompt) = self.buffer.search_tail(matcher) {
                return Ok(ReadResult {
                    data: self.buffer.take(),
                    prompt,
                });
            }
        }
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Give back the transport, dropping the buffer and transcript.
    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

/// Output collected by one prompt wait.
#[derive(Debug)]
pub struct ReadResult {
    /// Everything read, prompt included.
    pub data: Vec<u8>,

    /// Where the prompt sits inside `data`.
    pub prompt: Range<usize>,
}

impl ReadResult {
    /// Output before the prompt (lossy UTF-8).
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.data[..self.prompt.start]).into_owned()
    }

    /// The matched prompt text (lossy UTF-8).
    pub fn prompt(&self) -> String {
        String::from_utf8_lossy(&self.data[self.prompt.clone()]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::LiteralPrompt;
    use crate::channel::transcript::capture::Capture;
    use crate::transport::mock::{Event, MockTransport, sent_bytes};

    fn channel(transport: MockTransport, capture: &Capture) -> ConsoleChannel<MockTransport> {
        ConsoleChannel::new(
            transport,
            256,
            Duration::from_millis(100),
            Transcript::new(capture.clone()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_until_prompt() {
        let capture = Capture::default();
        let device = MockTransport::silent().with_output(b" ok\r\n> ");
        let mut channel = channel(device, &capture);

        let prompt = LiteralPrompt::new("> ");
        let result = channel.read_until(&prompt, None).await.unwrap();

        assert_eq!(result.output(), " ok\r\n");
        assert_eq!(result.prompt(), "> ");
        assert_eq!(capture.contents(), " ok\r\n> ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_early_in_long_chunk() {
        let capture = Capture::default();
        let mut output = b" ok\r\n> ".to_vec();
        output.extend_from_slice(&[b'x'; 300]);
        let device = MockTransport::silent().with_output(&output);
        let mut channel = channel(device, &capture);

        let prompt = LiteralPrompt::new("> ");
        let result = channel
            .read_until(&prompt, Some(Duration::from_secs(1)))
            .await
            .unwrap();

        assert_eq!(result.output(), " ok\r\n");
        assert_eq!(result.prompt(), "> ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timeout() {
        let capture = Capture::default();
        let device = MockTransport::silent().with_output(b"garbage");
        let mut channel = channel(device, &capture);

        let start = Instant::now();
        let prompt = LiteralPrompt::new("> ");
        let err = channel
            .read_until(&prompt, Some(Duration::from_secs(1)))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(1));
        assert!(waited < Duration::from_millis(1200));
        assert_eq!(capture.contents(), "garbage");
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_paced() {
        let capture = Capture::default();
        let device = MockTransport::silent();
        let events = device.events();
        let mut channel = channel(device, &capture);

        let start = Instant::now();
        channel
            .send_paced("2 .", Duration::from_millis(10))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                Event::Sent(b"2".to_vec()),
                Event::Sent(b" ".to_vec()),
                Event::Sent(b".".to_vec()),
                Event::Sent(b"\r".to_vec()),
            ]
        );
        assert_eq!(sent_bytes(&events), b"2 .\r");
        assert_eq!(capture.contents(), "2 .");
    }
}

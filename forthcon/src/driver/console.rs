//! Console driver: reset, prompt-gated commands, final drain.

use std::time::Duration;

use log::{debug, info};
use tokio::time::Instant;

use super::policy::WaitPolicy;
use super::response::{ReplayResult, Response};
use crate::channel::{ConsoleChannel, PromptMatcher};
use crate::error::Result;
use crate::transport::Transport;

/// Bytes that return the console to an idle prompt.
pub const RESET_DIRECTIVE: &[u8] = b"\rreset\r";

/// Default delay before each transmitted character.
pub const DEFAULT_PACING: Duration = Duration::from_millis(10);

/// Drives a Forth console one command at a time.
///
/// Every command is sent only after the device has printed its prompt,
/// as defined by the [`WaitPolicy`].
pub struct ConsoleDriver<T> {
    channel: ConsoleChannel<T>,

    policy: WaitPolicy,

    /// Compiled from the policy's prompt.
    matcher: Box<dyn PromptMatcher>,

    /// Delay before each transmitted character.
    pacing: Duration,

    commands_sent: usize,
}

impl<T: Transport> ConsoleDriver<T> {
    pub fn new(channel: ConsoleChannel<T>, policy: WaitPolicy, pacing: Duration) -> Self {
        let matcher = policy.prompt().matcher();
        Self {
            channel,
            policy,
            matcher,
            pacing,
            commands_sent: 0,
        }
    }

    /// Send the reset directive.
    pub async fn reset(&mut self) -> Result<()> {
        debug!("sending reset directive");
        self.channel.send_raw(RESET_DIRECTIVE).await
    }

    /// Wait for the prompt according to the policy.
    ///
    /// Returns the output preceding the prompt and the prompt itself.
    pub async fn wait_for_prompt(&mut self) -> Result<(String, String)> {
        let read = self
            .channel
            .read_until(self.matcher.as_ref(), self.policy.idle_timeout())
            .await?;

        let settle = self.policy.settle();
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        Ok((read.output(), read.prompt()))
    }

    /// Wait for the prompt, then send `line` with surrounding whitespace
    /// removed.
    pub async fn send_command(&mut self, line: &str) -> Result<Response> {
        let start = Instant::now();
        let (result, prompt) = self.wait_for_prompt().await?;

        let command = line.trim();
        debug!("sending command {:?}", command);
        self.channel.send_paced(command, self.pacing).await?;
        self.commands_sent += 1;

        Ok(Response::new(command, result, prompt, start.elapsed()))
    }

    /// Final wait followed by an empty command, flushing the device's last
    /// answer to the transcript.
    pub async fn drain(&mut self) -> Result<Response> {
        let start = Instant::now();
        let (result, prompt) = self.wait_for_prompt().await?;
        self.channel.send_paced("", self.pacing).await?;
        debug!("drained final response ({} bytes)", result.len());
        Ok(Response::new("", result, prompt, start.elapsed()))
    }

    /// Run a whole session: reset once, every command in order, drain once.
    pub async fn replay<I, S>(&mut self, commands: I) -> Result<ReplayResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = Instant::now();
        info!("replaying with {} wait policy", self.policy.name());

        self.reset().await?;

        let mut steps = Vec::new();
        for line in commands {
            steps.push(self.send_command(line.as_ref()).await?);
            self.channel.transcript_mut().separator()?;
        }

        let drain = self.drain().await?;
        info!("replayed {} commands", steps.len());

        Ok(ReplayResult {
            steps,
            drain,
            elapsed: start.elapsed(),
        })
    }

    /// Number of commands transmitted so far (the drain is not counted).
    pub fn commands_sent(&self) -> usize {
        self.commands_sent
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    pub fn channel(&self) -> &ConsoleChannel<T> {
        &self.channel
    }

    /// Tear the driver down and hand back the transport.
    pub fn into_transport(self) -> T {
        self.channel.into_transport()
    }
}

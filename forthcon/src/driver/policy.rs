//! Prompt wait policies.
//!
//! Two behaviours exist for waiting on the console:
//!
//! - **Deadline**: look for `"> "` anywhere in the output and give up once
//!   the device has been quiet for too long (1 s by default).
//! - **Patient**: look for a line-initial `"\n> "`, wait as long as it
//!   takes, then let the device settle for a moment before sending.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::channel::Prompt;
use crate::error::DriverError;

/// Marker used by the deadline policy.
pub const DEADLINE_MARKER: &str = "> ";

/// Marker used by the patient policy.
pub const PATIENT_MARKER: &str = "\n> ";

/// Quiet period after which the deadline policy fails.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1);

/// Pause after a patient match before returning.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// How the driver waits for the device's prompt.
#[derive(Debug, Clone)]
pub enum WaitPolicy {
    /// Fail once no byte has arrived for `idle_timeout` and the prompt is
    /// still missing.
    Deadline { prompt: Prompt, idle_timeout: Duration },

    /// Block until the prompt appears, then sleep `settle`.
    Patient { prompt: Prompt, settle: Duration },
}

impl WaitPolicy {
    /// Deadline policy with its default marker and timeout.
    pub fn deadline() -> Self {
        WaitPolicy::Deadline {
            prompt: Prompt::Literal(DEADLINE_MARKER.into()),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Patient policy with its default marker and settle delay.
    pub fn patient() -> Self {
        WaitPolicy::Patient {
            prompt: Prompt::Literal(PATIENT_MARKER.into()),
            settle: DEFAULT_SETTLE,
        }
    }

    /// Replace the prompt this policy waits for.
    pub fn with_prompt(mut self, new_prompt: Prompt) -> Self {
        match &mut self {
            WaitPolicy::Deadline { prompt, .. } | WaitPolicy::Patient { prompt, .. } => {
                *prompt = new_prompt
            }
        }
        self
    }

    /// Change the idle timeout. No effect on a patient policy.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        if let WaitPolicy::Deadline { idle_timeout, .. } = &mut self {
            *idle_timeout = timeout;
        }
        self
    }

    /// Change the settle delay. No effect on a deadline policy.
    pub fn with_settle(mut self, delay: Duration) -> Self {
        if let WaitPolicy::Patient { settle, .. } = &mut self {
            *settle = delay;
        }
        self
    }

    pub fn prompt(&self) -> &Prompt {
        match self {
            WaitPolicy::Deadline { prompt, .. } | WaitPolicy::Patient { prompt, .. } => prompt,
        }
    }

    /// The quiet period that aborts a wait, if any.
    pub fn idle_timeout(&self) -> Option<Duration> {
        match self {
            WaitPolicy::Deadline { idle_timeout, .. } => Some(*idle_timeout),
            WaitPolicy::Patient { .. } => None,
        }
    }

    /// The pause after a successful match.
    pub fn settle(&self) -> Duration {
        match self {
            WaitPolicy::Deadline { .. } => Duration::ZERO,
            WaitPolicy::Patient { settle, .. } => *settle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WaitPolicy::Deadline { .. } => "deadline",
            WaitPolicy::Patient { .. } => "patient",
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::deadline()
    }
}

impl FromStr for WaitPolicy {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deadline" | "timeout" => Ok(Self::deadline()),
            "patient" => Ok(Self::patient()),
            other => Err(DriverError::InvalidConfig {
                message: format!("unknown wait policy '{}' (expected deadline or patient)", other),
            }),
        }
    }
}

impl fmt::Display for WaitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitPolicy::Deadline {
                prompt,
                idle_timeout,
            } => write!(f, "deadline {} within {:?}", prompt, idle_timeout),
            WaitPolicy::Patient { prompt, settle } => {
                write!(f, "patient {} then {:?}", prompt, settle)
            }
        }
    }
}

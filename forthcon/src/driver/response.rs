//! Response type for replayed commands.

use std::time::Duration;

/// One command's exchange with the device.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command as transmitted (whitespace stripped).
    pub command: String,

    /// Device output seen while waiting for the prompt that released this
    /// command. For the first command this is the answer to the reset.
    pub result: String,

    /// The prompt text that was matched.
    pub prompt: String,

    /// Time spent waiting and transmitting.
    pub elapsed: Duration,
}

impl Response {
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            prompt: prompt.into(),
            elapsed,
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Outcome of replaying a whole command list.
#[derive(Debug, Clone)]
pub struct ReplayResult {
    /// One entry per replayed command, in order.
    pub steps: Vec<Response>,

    /// The closing wait and empty command.
    pub drain: Response,

    /// Total time for the session.
    pub elapsed: Duration,
}

impl ReplayResult {
    /// Get all device output concatenated, drain included.
    pub fn full_output(&self) -> String {
        self.steps
            .iter()
            .chain(std::iter::once(&self.drain))
            .map(|s| s.result.as_str())
            .collect()
    }

    /// Commands in the order they were sent.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.command.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_result() {
        let steps = vec![
            Response::new("1 2 +", "reset\r\n", "> ", Duration::from_millis(100)),
            Response::new(". cr", "1 2 + ok\r\n", "> ", Duration::from_millis(200)),
        ];
        let drain = Response::new("", ". cr 3\r\n", "> ", Duration::from_millis(50));
        let result = ReplayResult {
            steps,
            drain,
            elapsed: Duration::from_millis(350),
        };

        assert_eq!(result.commands().collect::<Vec<_>>(), ["1 2 +", ". cr"]);
        assert_eq!(result.full_output(), "reset\r\n1 2 + ok\r\n. cr 3\r\n");
        assert!(result.drain.contains("3"));
        assert_eq!(result.steps[1].lines().next(), Some("1 2 + ok"));
    }
}

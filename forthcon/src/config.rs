//! Session file parsing.
//!
//! Settings can be kept in a TOML file instead of repeating flags:
//!
//! ```toml
//! baud_rate = 115200
//! pacing_ms = 10
//! wait_policy = "patient"
//! settle_ms = 150
//! document = "docs/tutorial.md"
//! ```
//!
//! Every field is optional. Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::channel::Prompt;
use crate::driver::{DEFAULT_PACING, DEFAULT_SEARCH_DEPTH, WaitPolicy};
use crate::error::{ConfigError, Result};
use crate::transport::config::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};

/// Documentation file replayed when no input file is given.
pub const DEFAULT_DOCUMENT: &str = "README.md";

/// Session settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub baud_rate: u32,

    /// Per-read timeout of the serial port.
    pub read_timeout_ms: u64,

    /// Delay before each transmitted character.
    pub pacing_ms: u64,

    /// `"deadline"` or `"patient"`.
    pub wait_policy: String,

    /// Literal prompt marker; defaults to the policy's own.
    pub prompt_marker: Option<String>,

    /// Regex prompt; wins over `prompt_marker`.
    pub prompt_regex: Option<String>,

    /// Quiet period before a deadline wait fails.
    pub timeout_ms: Option<u64>,

    /// Pause after a patient match.
    pub settle_ms: Option<u64>,

    /// Trailing bytes searched for the prompt.
    pub search_depth: usize,

    /// Documentation file for README replay.
    pub document: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT.as_millis() as u64,
            pacing_ms: DEFAULT_PACING.as_millis() as u64,
            wait_policy: "deadline".to_string(),
            prompt_marker: None,
            prompt_regex: None,
            timeout_ms: None,
            settle_ms: None,
            search_depth: DEFAULT_SEARCH_DEPTH,
            document: PathBuf::from(DEFAULT_DOCUMENT),
        }
    }
}

impl SessionConfig {
    /// Load a session file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded session file {}", path.display());
        Ok(config)
    }

    /// Parse session settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the wait policy with any marker, timeout and settle overrides.
    ///
    /// A `prompt_regex` is not applied here; it is compiled by the driver
    /// builder.
    pub fn wait_policy(&self) -> Result<WaitPolicy> {
        let mut policy: WaitPolicy = self.wait_policy.parse()?;
        if let Some(marker) = &self.prompt_marker {
            policy = policy.with_prompt(Prompt::Literal(marker.clone()));
        }
        if let Some(ms) = self.timeout_ms {
            policy = policy.with_idle_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.settle_ms {
            policy = policy.with_settle(Duration::from_millis(ms));
        }
        Ok(policy)
    }

    /// Reject values no session can run with.
    ///
    /// Called on load; call again after changing fields by hand.
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "baud_rate",
                message: "must be positive".into(),
            }
            .into());
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "read_timeout_ms",
                message: "must be positive".into(),
            }
            .into());
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                message: "must be positive".into(),
            }
            .into());
        }
        if self.prompt_marker.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue {
                field: "prompt_marker",
                message: "must not be empty".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.pacing_ms, 10);
        assert_eq!(config.document, PathBuf::from("README.md"));
        assert_eq!(config.wait_policy().unwrap().name(), "deadline");
    }

    #[test]
    fn test_policy_overrides() {
        let config = SessionConfig::from_toml_str(
            r#"
            wait_policy = "deadline"
            prompt_marker = "ok> "
            timeout_ms = 2500
            "#,
        )
        .unwrap();

        let policy = config.wait_policy().unwrap();
        assert_eq!(policy.idle_timeout(), Some(Duration::from_millis(2500)));
        assert!(matches!(policy.prompt(), Prompt::Literal(m) if m == "ok> "));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SessionConfig::from_toml_str("baud = 9600").unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let config = SessionConfig::from_toml_str(r#"wait_policy = "eager""#).unwrap();
        assert!(config.wait_policy().is_err());
    }

    #[test]
    fn test_zero_baud_rejected() {
        let err = SessionConfig::from_toml_str("baud_rate = 0").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Config(ConfigError::InvalidValue {
                field: "baud_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SessionConfig::from_toml_file("/nonexistent/forthcon.toml").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Config(ConfigError::Unreadable { .. })
        ));
    }
}

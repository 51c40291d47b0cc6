//! Prompt matching for the device console.

use std::fmt;
use std::ops::Range;

use memchr::memmem;
use regex::bytes::Regex;

use crate::error::ChannelError;

/// Trait for prompt matching - literal markers by default, regex on request.
pub trait PromptMatcher: Send + Sync {
    /// Returns the byte range of the first match, or None.
    fn find_match(&self, data: &[u8]) -> Option<Range<usize>>;

    /// Check if the data contains the prompt.
    fn is_match(&self, data: &[u8]) -> bool {
        self.find_match(data).is_some()
    }
}

impl PromptMatcher for Regex {
    fn find_match(&self, data: &[u8]) -> Option<Range<usize>> {
        self.find(data).map(|m| m.range())
    }
}

/// A fixed substring the device prints when it is ready for input.
#[derive(Clone)]
pub struct LiteralPrompt {
    marker: String,
    finder: memmem::Finder<'static>,
}

impl LiteralPrompt {
    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        let finder = memmem::Finder::new(marker.as_bytes()).into_owned();
        Self { marker, finder }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl fmt::Debug for LiteralPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LiteralPrompt").field(&self.marker).finish()
    }
}

impl PromptMatcher for LiteralPrompt {
    fn find_match(&self, data: &[u8]) -> Option<Range<usize>> {
        self.finder
            .find(data)
            .map(|start| start..start + self.marker.len())
    }
}

/// How the prompt is recognised.
#[derive(Debug, Clone)]
pub enum Prompt {
    /// Substring anywhere in the output.
    Literal(String),

    /// Regular expression over the raw output bytes.
    Pattern(Regex),
}

impl Prompt {
    /// Compile a regex prompt.
    pub fn pattern(pattern: &str) -> Result<Self, ChannelError> {
        Ok(Prompt::Pattern(Regex::new(pattern)?))
    }

    /// Build the matcher used by the channel.
    pub fn matcher(&self) -> Box<dyn PromptMatcher> {
        match self {
            Prompt::Literal(marker) => Box::new(LiteralPrompt::new(marker.as_str())),
            Prompt::Pattern(regex) => Box::new(regex.clone()),
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Literal(marker) => write!(f, "{:?}", marker),
            Prompt::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

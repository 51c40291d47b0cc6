//! Channel layer for prompt matching and paced console I/O.
//!
//! This module handles the interactive side of a session: accumulating
//! device output, spotting the prompt marker and echoing the exchange to
//! the operator.

mod buffer;
mod console;
mod patterns;
pub(crate) mod transcript;

pub use buffer::PatternBuffer;
pub use console::{ConsoleChannel, ReadResult};
pub use patterns::{LiteralPrompt, Prompt, PromptMatcher};
pub use transcript::{SEPARATOR, Transcript};

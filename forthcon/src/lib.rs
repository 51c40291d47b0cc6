//! # forthcon
//!
//! Replay Forth command lines to a microcontroller console over a serial
//! link.
//!
//! The device runs an interactive Forth that echoes its input and prints a
//! prompt when it is ready for the next line. forthcon resets the console,
//! then sends each command only once the prompt is back, one character at
//! a time so a slow-polling receiver keeps up.
//!
//! ## Features
//!
//! - Serial transport via serialport with a background reader thread
//! - Prompt detection by literal marker or regex, tail-searched
//! - Two wait policies: deadline (fail fast) and patient (settle after match)
//! - README replay (indented code blocks) or verbatim file replay
//! - Live transcript of everything sent and received
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forthcon::{CommandSource, DriverBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), forthcon::Error> {
//!     let commands = CommandSource::Document("README.md".into()).load()?;
//!
//!     let mut driver = DriverBuilder::new("/dev/ttyACM0").build()?;
//!     let result = driver.replay(&commands).await?;
//!
//!     eprintln!("sent {} commands", result.steps.len());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod source;
pub mod transport;

// Re-export main types for convenience
pub use channel::{Prompt, Transcript};
pub use config::SessionConfig;
pub use driver::{ConsoleDriver, DriverBuilder, ReplayResult, Response, WaitPolicy};
pub use error::Error;
pub use source::CommandSource;
pub use transport::{SerialConfig, SerialTransport, Transport};

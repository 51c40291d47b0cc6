//! High-level driver for console sessions.
//!
//! The driver layer sequences a session: reset the console, send each
//! command once the prompt is back, and drain the final answer.

mod builder;
mod console;
mod policy;
pub(crate) mod response;

pub use builder::{DEFAULT_SEARCH_DEPTH, DriverBuilder};
pub use console::{ConsoleDriver, DEFAULT_PACING, RESET_DIRECTIVE};
pub use policy::{
    DEADLINE_MARKER, DEFAULT_IDLE_TIMEOUT, DEFAULT_SETTLE, PATIENT_MARKER, WaitPolicy,
};
pub use response::{ReplayResult, Response};

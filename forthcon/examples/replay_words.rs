//! Replay a handful of definitions and print what the device answered.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example replay_words -- /dev/ttyACM0
//! ```
//!
//! Set `RUST_LOG=debug` to watch the session steps on stderr.

use std::env;
use std::time::Duration;

use forthcon::{DriverBuilder, Transcript, WaitPolicy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(port) = env::args().nth(1) else {
        eprintln!("usage: replay_words <serial-port>");
        std::process::exit(1);
    };

    let mut driver = DriverBuilder::new(port)
        .wait_policy(WaitPolicy::patient().with_settle(Duration::from_millis(50)))
        .transcript(Transcript::sink())
        .build()?;

    let result = driver
        .replay([": sq dup * ;", "7 sq .", ": cube dup sq * ;", "3 cube ."])
        .await?;

    for step in result.steps.iter().skip(1) {
        println!("{:<20} -> {}", step.command, step.result.trim());
    }
    println!("{:<20} -> {}", "(last)", result.drain.result.trim());

    Ok(())
}

//! CLI argument parsing

use std::path::PathBuf;

use clap::Parser;
use forthcon::SessionConfig;

#[derive(Parser, Debug)]
#[command(name = "forthcon")]
#[command(version, about = "Replay Forth commands to a microcontroller console", long_about = None)]
pub struct Cli {
    /// Serial port of the device (e.g. /dev/ttyACM0, COM3)
    #[arg(short, long)]
    pub port: String,

    /// Replay every line of this file instead of the documentation's code blocks
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Documentation file whose indented lines are replayed [default: README.md]
    #[arg(long, conflicts_with = "input")]
    pub doc: Option<PathBuf>,

    /// Session file (TOML); flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Line speed
    #[arg(long)]
    pub baud: Option<u32>,

    /// How to wait for the prompt: deadline (fail after a quiet period) or patient
    #[arg(long, value_parser = ["deadline", "patient"])]
    pub policy: Option<String>,

    /// Quiet period in ms before a deadline wait fails
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Pause in ms after a patient prompt match
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Delay in ms before each transmitted character
    #[arg(long)]
    pub pacing_ms: Option<u64>,

    /// Literal prompt marker (defaults to the policy's marker)
    #[arg(long)]
    pub prompt: Option<String>,

    /// Prompt as a regular expression; wins over --prompt
    #[arg(long)]
    pub prompt_regex: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Lay the flags that were given over `config`.
    pub fn apply_to(&self, config: &mut SessionConfig) {
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(policy) = &self.policy {
            config.wait_policy = policy.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = Some(ms);
        }
        if let Some(ms) = self.settle_ms {
            config.settle_ms = Some(ms);
        }
        if let Some(ms) = self.pacing_ms {
            config.pacing_ms = ms;
        }
        if let Some(prompt) = &self.prompt {
            config.prompt_marker = Some(prompt.clone());
        }
        if let Some(pattern) = &self.prompt_regex {
            config.prompt_regex = Some(pattern.clone());
        }
        if let Some(doc) = &self.doc {
            config.document = doc.clone();
        }
    }
}

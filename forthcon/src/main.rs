//! forthcon - replay Forth commands to a microcontroller console
//!
//! Two modes:
//! - `forthcon -p <port>` replays the indented code blocks of a
//!   documentation file (README.md unless told otherwise)
//! - `forthcon -p <port> -i <file>` replays every line of `<file>`
//!
//! The console exchange is echoed to stdout; logs go to stderr.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use forthcon::{CommandSource, DriverBuilder, ReplayResult, SessionConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs share the terminal with the transcript, so stay quiet by default.
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli).await {
        Ok(result) => {
            println!();
            log::info!(
                "Replayed {} commands in {:?}",
                result.steps.len(),
                result.elapsed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!();
            for line in failure_lines(&e) {
                eprintln!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ReplayResult, forthcon::Error> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_toml_file(path)?,
        None => SessionConfig::default(),
    };
    cli.apply_to(&mut config);
    config.validate()?;

    let source = match &cli.input {
        Some(path) => CommandSource::Verbatim(path.clone()),
        None => CommandSource::Document(config.document.clone()),
    };
    let commands = source.load()?;
    log::info!(
        "Loaded {} commands from {}",
        commands.len(),
        source.path().display()
    );

    let mut driver = DriverBuilder::from_config(&cli.port, &config)?.build()?;
    let result = driver.replay(&commands).await?;
    driver.into_transport().close();

    Ok(result)
}

/// Diagnostic printed to stderr when a session fails.
fn failure_lines(e: &forthcon::Error) -> Vec<String> {
    let mut lines = Vec::new();
    if e.is_timeout() {
        lines.push("[x] Timeout waiting for prompt".to_string());
    }
    lines.push(format!("Error: {}", e));
    lines
}

//! Running the command list.
//!
//! Every command runs under `sh -c` through [`run_bounded`]. One report line
//! per finished command goes through a [`BatchScheduler`] so that commands
//! finishing close together are written in a single flush.

use std::io;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use corral_adapters::ProcessError;
use corral_adapters::awaitable;
use corral_core::{BatchDelay, BatchScheduler, run_bounded};
use corral_types::Concurrency;

pub type Reporter = BatchScheduler<String, (), io::Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub concurrency: Option<Concurrency>,
    pub fail_fast: bool,
}

/// A reporter that writes each batch of lines to stdout.
pub fn stdout_reporter(delay: BatchDelay) -> Reporter {
    BatchScheduler::new(|lines: Vec<String>| async move {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(lines.concat().as_bytes()).await?;
        stdout.flush().await
    })
    .with_delay(delay)
}

/// Parse stdin text into commands, dropping blank and `#` lines.
pub fn commands(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn report_line(index: usize, command: &str, outcome: &Result<(), ProcessError>) -> String {
    match outcome {
        Ok(()) => format!("[{index}] ok: {command}\n"),
        Err(err) => format!("[{index}] failed ({err}): {command}\n"),
    }
}

/// Run every command and return per-command success flags in input order.
///
/// With `fail_fast`, the first failure is returned as an error and no further
/// commands are started.
pub async fn run_all(
    commands: Vec<String>,
    options: RunOptions,
    reporter: Arc<Reporter>,
) -> Result<Vec<bool>> {
    let RunOptions {
        concurrency,
        fail_fast,
    } = options;

    run_bounded(
        commands,
        |command, index| {
            let reporter = Arc::clone(&reporter);
            async move {
                let outcome = awaitable::run(
                    Command::new("sh")
                        .arg("-c")
                        .arg(&command)
                        .stdin(Stdio::null()),
                )
                .await;

                if let Err(err) = reporter.schedule(report_line(index, &command, &outcome)).await {
                    tracing::warn!(index, "Failed to write report: {err}");
                }

                match outcome {
                    Ok(()) => Ok(true),
                    Err(err) if fail_fast => {
                        Err(anyhow!(err).context(format!("command {index} failed: {command}")))
                    }
                    Err(_) => Ok(false),
                }
            }
        },
        concurrency,
    )
    .await
}

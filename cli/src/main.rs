//! Corral CLI - run shell commands from stdin with a concurrency cap.
//!
//! ```text
//! stdin lines -> jobs::commands() -> jobs::run_all() -> run_bounded(sh -c ...)
//!                                         |
//!                                         v
//!                           report lines -> BatchScheduler -> stdout
//! ```
//!
//! Exit status is 0 when every command succeeded, 1 when any failed, and 2
//! for usage or IO errors.

mod args;
mod jobs;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use corral_config::CorralConfig;

use crate::args::{Args, USAGE};
use crate::jobs::RunOptions;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Reports own stdout.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("corral: {err:#}");
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        print!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = CorralConfig::load().ok().flatten().unwrap_or_default();
    let options = RunOptions {
        concurrency: args.jobs.or(config.runner.concurrency),
        fail_fast: args.fail_fast,
    };

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read commands from stdin")?;
    let commands = jobs::commands(&input);
    tracing::debug!(
        commands = commands.len(),
        concurrency = ?options.concurrency,
        "Running commands"
    );

    let reporter = Arc::new(jobs::stdout_reporter(config.batch.delay));
    match jobs::run_all(commands, options, reporter).await {
        Ok(flags) if flags.iter().all(|ok| *ok) => Ok(ExitCode::SUCCESS),
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(err) => {
            eprintln!("corral: {err:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

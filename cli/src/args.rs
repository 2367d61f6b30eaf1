//! Command-line flags.

use anyhow::{Context, Result, bail};

use corral_types::Concurrency;

pub const USAGE: &str = "\
usage: corral [-j N | --jobs N] [--fail-fast]

Reads one shell command per line from stdin and runs each with `sh -c`,
at most N at a time. Blank lines and lines starting with `#` are skipped.

options:
  -j, --jobs N    maximum commands in flight (default: [runner] concurrency
                  from ~/.corral/config.toml, otherwise unbounded)
      --fail-fast stop launching commands after the first failure
  -h, --help      print this message
";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Args {
    pub jobs: Option<Concurrency>,
    pub fail_fast: bool,
    pub help: bool,
}

impl Args {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--fail-fast" => parsed.fail_fast = true,
                "-j" | "--jobs" => {
                    let Some(value) = args.next() else {
                        bail!("{arg} requires a value");
                    };
                    parsed.jobs = Some(parse_jobs(&value)?);
                }
                other => {
                    if let Some(value) = other.strip_prefix("--jobs=") {
                        parsed.jobs = Some(parse_jobs(value)?);
                    } else if let Some(value) = other.strip_prefix("-j").filter(|v| !v.is_empty()) {
                        parsed.jobs = Some(parse_jobs(value)?);
                    } else {
                        bail!("unknown argument: {other}");
                    }
                }
            }
        }

        Ok(parsed)
    }
}

fn parse_jobs(value: &str) -> Result<Concurrency> {
    let limit: usize = value
        .parse()
        .with_context(|| format!("invalid job count: {value}"))?;
    Concurrency::new(limit).with_context(|| format!("invalid job count: {value}"))
}

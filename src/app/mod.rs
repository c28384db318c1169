//! The `rask-logger` command: log stdin lines through a [`LogService`].

pub mod diagnostics;

pub use diagnostics::{DiagnosticsError, DiagnosticsSystem};

use crate::config::LogConfig;
use crate::config::cli::Args;
use crate::domain::Payload;
use crate::service::LogService;
use anyhow::Context;
use std::io::BufRead;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub fn run(args: Args) -> anyhow::Result<()> {
    let diagnostics = DiagnosticsSystem::new();
    diagnostics.add_default_directives()?;
    diagnostics.initialize_tracing(&args.diagnostics)?;

    let config = LogConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let service = LogService::new(args.blacklist.iter().map(String::as_str), args.mask.as_str());
    service
        .init(&config)
        .context("Failed to initialize log service")?;

    let stdin = std::io::stdin();
    let lines = log_lines(&service, &args, stdin.lock())?;
    service.flush();

    info!(lines, "Input exhausted");
    wait_for_forwarding(&service, SHUTDOWN_GRACE);
    Ok(())
}

/// Log each non-blank line at the requested severity. Returns the number of
/// lines logged.
pub fn log_lines<R: BufRead>(service: &LogService, args: &Args, input: R) -> anyhow::Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let handle = service.log(args.level, [parse_line(&line)])?;
        if args.force {
            handle.send();
        }
        count += 1;
    }
    Ok(count)
}

/// JSON when the line parses as JSON, otherwise the line itself.
pub fn parse_line(line: &str) -> Payload {
    serde_json::from_str(line).unwrap_or_else(|_| Payload::String(line.to_string()))
}

fn wait_for_forwarding(service: &LogService, grace: Duration) {
    let deadline = Instant::now() + grace;
    while let Some(stats) = service.forward_stats() {
        if stats.pending() == 0 {
            info!(delivered = stats.delivered, failed = stats.failed, "Forwarding settled");
            return;
        }
        if Instant::now() >= deadline {
            warn!(pending = stats.pending(), "Exiting with undelivered forward records");
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

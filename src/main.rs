use reprokit::cli::commands::{CliArgs, Commands};
use reprokit::cli::handlers::{handle_run, handle_sections};
use reprokit::pipeline::StageKind;
use reprokit::util::logging::{self, parse_level};
use reprokit::{NAME, VERSION};

use clap::Parser;
use std::env;
use std::future::{self, Future};
use std::io;
use std::process;
use tracing::{debug, info, warn, Level};

/// Exit status after Ctrl-C
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = tokio::select! {
        code = dispatch(&args) => code,
        () = wait_for_interrupt(tokio::signal::ctrl_c()) => {
            warn!("Interrupted; stopping before the run completed");
            INTERRUPTED_EXIT_CODE
        }
    };

    if exit_code == INTERRUPTED_EXIT_CODE {
        info!("Cleaning up {} run; artifacts written so far are kept", NAME);
    } else {
        debug!("Cleaning up {} run", NAME);
    }

    process::exit(exit_code);
}

/// Resolves once `signal` reports a delivered interrupt. A handler that could
/// not be installed never resolves, so the run continues without Ctrl-C support.
async fn wait_for_interrupt(signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => {}
        Err(e) => {
            warn!("Could not listen for Ctrl-C: {}", e);
            future::pending::<()>().await;
        }
    }
}

async fn dispatch(args: &CliArgs) -> i32 {
    match &args.command {
        Commands::Run(run) => handle_run(run, &StageKind::ALL, args.quiet).await,
        Commands::Plan(run) => handle_run(run, &[StageKind::Planning], args.quiet).await,
        Commands::Analyze(run) => handle_run(run, &[StageKind::Analysis], args.quiet).await,
        Commands::Code(run) => handle_run(run, &[StageKind::Coding], args.quiet).await,
        Commands::Sections(sections) => handle_sections(sections),
    }
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("REPROKIT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    logging::init_with(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_delivered_signal_interrupts() {
        let waited = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for_interrupt(async { Ok(()) }),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_failed_handler_never_interrupts() {
        let waited = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for_interrupt(async { Err(io::Error::other("no signal support")) }),
        )
        .await;
        assert!(waited.is_err());
    }
}

//! exerun CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use exerun::cli::{Cli, CommandDispatcher, EXIT_CONFIG, EXIT_FAILURE};
use exerun::output::{BuildLog, ConsoleLog};
use exerun::shell::CancelToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("exerun=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("exerun=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Cancel the running build on SIGINT/SIGTERM so the step can kill its
/// process and remove its script before exiting.
fn install_abort_handler(cancel: &CancelToken) {
    let cancel = cancel.clone();
    let handler = ctrlc::set_handler(move || {
        tracing::warn!("Build aborted");
        cancel.cancel();
    });
    if let Err(e) = handler {
        tracing::warn!("Failed to install signal handler: {}", e);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("exerun starting with args: {:?}", cli);

    let log = ConsoleLog::new();

    let result = CommandDispatcher::from_cli(&cli).and_then(|dispatcher| {
        install_abort_handler(dispatcher.cancel_token());
        dispatcher.dispatch(&cli.command, &log)
    });

    match result {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            log.error(&e.to_string());
            let code = if e.is_configuration() {
                EXIT_CONFIG
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code as u8)
        }
    }
}

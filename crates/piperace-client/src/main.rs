//! piperace client entry point.
//!
//! Connects to the server's named pipe, validates the streamed protocol,
//! and exits with a code describing the outcome:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | full protocol observed |
//! | 1 | failed to connect |
//! | 2 | missing preamble |
//! | 3 | missing end marker |
//! | 4 | wrong word count |
//! | 5 | read failure mid-session |
//!
//! Usage: `piperace-client [pipe-name] [timeout-ms]`
//! Defaults: `"Test Pipe"` and 10000; a timeout of `-1` waits forever.

use piperace_core::{PipeEndpoint, SessionOutcome, DEFAULT_PIPE_NAME};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_TIMEOUT_MS: i32 = 10_000;

#[tokio::main]
async fn main() {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let name = args
        .next()
        .unwrap_or_else(|| DEFAULT_PIPE_NAME.to_string());
    let timeout_ms = args
        .next()
        .and_then(|raw| raw.parse::<i32>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    let endpoint = PipeEndpoint::local(name);
    let outcome = run_session(&endpoint, timeout_ms).await;

    info!("{endpoint}: {}", outcome.describe());
    std::process::exit(outcome.exit_code());
}

#[cfg(windows)]
async fn run_session(endpoint: &PipeEndpoint, timeout_ms: i32) -> SessionOutcome {
    use piperace_client::application::validate_stream::validate_stream;
    use piperace_client::infrastructure::connect::{connect_with, windows::NamedPipeConnector};
    use piperace_core::StartupTicks;
    use tokio::io::BufReader;
    use tracing::error;

    let mut connector = NamedPipeConnector::new();
    let ticks = StartupTicks::new();

    let channel = match connect_with(endpoint, timeout_ms, &mut connector, &ticks).await {
        Ok(channel) => channel,
        Err(e) => {
            error!("connect failed: {e}");
            return SessionOutcome::FailedToConnect;
        }
    };

    validate_stream(BufReader::new(channel)).await.outcome
}

#[cfg(not(windows))]
async fn run_session(endpoint: &PipeEndpoint, _timeout_ms: i32) -> SessionOutcome {
    tracing::error!(
        "endpoint {endpoint} requires Windows named pipes; this build has no native transport"
    );
    SessionOutcome::FailedToConnect
}

//! piperace server entry point.
//!
//! Listens forever on one named pipe endpoint.  Every accepted client is
//! served by its own worker task: a preamble, ten random words with random
//! pacing, and an end marker, with every line echoed to the shared console.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML file or defaults
//!  └─ Dictionary::from_file()  -- or the built-in list
//!  └─ NamedPipeAcceptor::bind()
//!  └─ run_accept_loop()        -- accept, re-arm, spawn worker, repeat
//! ```
//!
//! The accept loop has no timeout and no shutdown of its own; it runs until
//! the process is terminated (Ctrl-C) or the endpoint itself fails.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use piperace_core::PipeEndpoint;
use piperace_server::application::serve_words::PacingRange;
use piperace_server::infrastructure::console::ConsoleSink;
use piperace_server::infrastructure::endpoint::ServeContext;
use piperace_server::infrastructure::storage::config::{load_config, DEFAULT_CONFIG_FILE};
use piperace_server::infrastructure::storage::dictionary::Dictionary;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let config = load_config(Path::new(&config_path))
        .with_context(|| format!("loading configuration from {config_path}"))?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    info!("piperace server starting");

    let dictionary = match &config.session.words_file {
        Some(path) => Arc::new(Dictionary::from_file(path).context("loading word list")?),
        None => Arc::new(Dictionary::builtin()),
    };
    info!("dictionary holds {} words", dictionary.len());

    let ctx = ServeContext {
        dictionary,
        console: ConsoleSink::stdout(),
        pacing: PacingRange::from_millis(config.session.pacing_min_ms, config.session.pacing_max_ms),
        base_seed: config.session.seed,
    };

    let endpoint = config.pipe_endpoint();
    run_server(endpoint, ctx).await
}

#[cfg(windows)]
async fn run_server(endpoint: PipeEndpoint, ctx: ServeContext) -> anyhow::Result<()> {
    use piperace_server::infrastructure::endpoint::{run_accept_loop, windows::NamedPipeAcceptor};

    let acceptor = NamedPipeAcceptor::bind(&endpoint)
        .with_context(|| format!("creating the first pipe instance at {endpoint}"))?;
    info!("listening on {endpoint}");

    tokio::select! {
        result = run_accept_loop(acceptor, ctx) => {
            result.context("accept loop failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    info!("piperace server stopped");
    Ok(())
}

#[cfg(not(windows))]
async fn run_server(endpoint: PipeEndpoint, _ctx: ServeContext) -> anyhow::Result<()> {
    anyhow::bail!("endpoint {endpoint} requires Windows named pipes; this build has no native transport")
}

//! Named pipe endpoint acceptance for the server.
//!
//! # The accept/re-arm discipline
//!
//! A named pipe server instance accepts exactly one client.  If the next
//! instance were created only after the current client had been fully
//! served, every connecting client in between would find nobody listening
//! and fail its wait with "not found".  The acceptor therefore arms a fresh
//! instance *before* handing the accepted channel to its worker, keeping
//! that gap as small as the OS allows.  There is no bound on concurrent
//! workers here; the platform's maximum simultaneous pipe instances is the
//! only ceiling, and it is configured outside this process.
//!
//! The production implementation is Windows-only; [`mock`] provides a
//! scripted in-memory acceptor so the loop is testable anywhere.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tokio::io::AsyncWrite;
use tracing::info;

use crate::application::serve_words::{PacingRange, ServeWordsWorker, WorkerId};
use crate::infrastructure::console::ConsoleSink;
use crate::infrastructure::storage::dictionary::Dictionary;

pub mod mock;

#[cfg(windows)]
pub mod windows;

/// Accepts successive client connections on one named endpoint.
#[async_trait]
pub trait PipeAcceptor: Send {
    /// The duplex channel handed to a worker, exclusively owned by it.
    type Channel: Send;

    /// Waits for the next client.
    ///
    /// Implementations must arm the endpoint for the following client
    /// before returning the accepted channel.
    async fn accept(&mut self) -> io::Result<Self::Channel>;
}

/// Everything a worker needs besides its channel, shared by the accept loop.
#[derive(Clone)]
pub struct ServeContext {
    pub dictionary: Arc<Dictionary>,
    pub console: ConsoleSink,
    pub pacing: PacingRange,
    /// Base seed for per-worker generators; OS entropy when absent.
    pub base_seed: Option<u64>,
}

impl ServeContext {
    /// Derives the seed for one worker's generator.
    ///
    /// With a configured base seed every worker is reproducible from its id;
    /// without one each worker draws fresh entropy.
    fn worker_seed(&self, id: WorkerId) -> u64 {
        match self.base_seed {
            Some(base) => base.wrapping_add(id.0),
            None => rand::rng().random(),
        }
    }
}

/// Accepts clients forever, spawning one detached worker per channel.
///
/// Worker failures never reach this loop.  An accept-time failure ends it
/// with the error: a server that can no longer listen has nothing left to
/// do.
pub async fn run_accept_loop<A>(mut acceptor: A, ctx: ServeContext) -> io::Result<()>
where
    A: PipeAcceptor,
    A::Channel: AsyncWrite + Unpin + Send + 'static,
{
    let mut next_worker = 1u64;
    loop {
        let channel = acceptor.accept().await?;
        let id = WorkerId(next_worker);
        next_worker += 1;

        info!("accepted a client, starting {id}");
        let worker = ServeWordsWorker::new(
            id,
            Arc::clone(&ctx.dictionary),
            ctx.console.clone(),
            ctx.pacing,
            ctx.worker_seed(id),
        );
        tokio::spawn(worker.run(channel));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

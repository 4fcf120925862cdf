//! ServeWordsWorker: one per connected client, emitting the fixed protocol.
//!
//! The worker owns its channel exclusively.  It writes the preamble, ten
//! word lines with a random pause after each, and the end marker, echoing
//! every line to the shared console sink.  A client that disconnects early
//! is expected behaviour under heavy contention: the worker notes it on the
//! sink and exits cleanly.  No failure in here may reach the accept loop or
//! a sibling worker.
//!
//! Each worker carries its own generator, seeded at spawn time, so a
//! session's word sequence and pacing are reproducible from the seed alone.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use piperace_core::{encode_line, ProtocolLine, WORDS_PER_SESSION};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::infrastructure::console::ConsoleSink;
use crate::infrastructure::storage::dictionary::Dictionary;

/// Identity of one serving worker, carried in the preamble and the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(pub u64);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker {}", self.0)
    }
}

/// Bounds on the pause after each served word: inclusive lower, exclusive
/// upper, mirroring how the serving delay has always been drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingRange {
    min: Duration,
    max: Duration,
}

impl PacingRange {
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
        }
    }

    /// No pause at all; tests use this to keep sessions fast.
    pub fn none() -> Self {
        Self::from_millis(0, 0)
    }

    /// Draws one pause uniformly from the range.
    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        let ms = rng.random_range(self.min.as_millis() as u64..self.max.as_millis() as u64);
        Duration::from_millis(ms)
    }
}

impl Default for PacingRange {
    fn default() -> Self {
        Self::from_millis(250, 2500)
    }
}

/// One protocol session toward one connected client.
pub struct ServeWordsWorker {
    id: WorkerId,
    dictionary: Arc<Dictionary>,
    console: ConsoleSink,
    pacing: PacingRange,
    rng: StdRng,
}

impl ServeWordsWorker {
    /// Builds a worker with its own generator seeded from `seed`.
    pub fn new(
        id: WorkerId,
        dictionary: Arc<Dictionary>,
        console: ConsoleSink,
        pacing: PacingRange,
        seed: u64,
    ) -> Self {
        Self {
            id,
            dictionary,
            console,
            pacing,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Runs the session to completion and releases the channel.
    ///
    /// Never returns an error: a remote disconnect is logged as expected
    /// termination, anything else is contained here.
    pub async fn run<C>(mut self, mut channel: C)
    where
        C: AsyncWrite + Unpin,
    {
        match self.serve(&mut channel).await {
            Ok(()) => debug!("{} finished cleanly", self.id),
            Err(e) if is_disconnect(&e) => self.console.entry(self.id, "DISCONNECTED"),
            Err(e) => warn!("{} write failed: {e}", self.id),
        }
        // The channel drops here on every path, closing the pipe instance.
    }

    async fn serve<C>(&mut self, channel: &mut C) -> io::Result<()>
    where
        C: AsyncWrite + Unpin,
    {
        self.emit(channel, &ProtocolLine::Preamble(self.id.to_string()))
            .await?;

        for _ in 0..WORDS_PER_SESSION {
            let word = self.dictionary.pick(&mut self.rng).to_string();
            self.emit(channel, &ProtocolLine::Word(word)).await?;
            tokio::time::sleep(self.pacing.sample(&mut self.rng)).await;
        }

        self.emit(channel, &ProtocolLine::EndOfStream).await?;
        channel.shutdown().await
    }

    async fn emit<C>(&mut self, channel: &mut C, line: &ProtocolLine) -> io::Result<()>
    where
        C: AsyncWrite + Unpin,
    {
        let text = encode_line(line);
        channel.write_all(text.as_bytes()).await?;
        channel.write_all(b"\n").await?;
        channel.flush().await?;
        self.console.entry(self.id, &text);
        Ok(())
    }
}

/// `true` for the error kinds a remote close surfaces on write.
pub fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::WriteZero
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

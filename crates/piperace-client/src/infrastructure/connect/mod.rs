//! Race-tolerant connection establishment against a named pipe endpoint.
//!
//! # Why a loop at all?
//!
//! Connecting to a named pipe is a two-step operation: wait until the
//! endpoint reports a free instance, then open it.  The two steps are not
//! atomic, and each can fail in a way that only means "try again":
//!
//! 1. The server has not created the endpoint yet: the wait primitive
//!    returns immediately with a not-found error rather than blocking.
//! 2. Between our successful wait and our open, a sibling client takes the
//!    freed instance, and the open fails with a busy error.
//!
//! Both conditions are recovered locally with a short backoff pause and are
//! never surfaced to the caller.  They are different race windows (absence
//! of a listener versus losing to a sibling) and are matched separately
//! below.  Everything else (a wait timeout, any other OS failure) ends the
//! attempt.
//!
//! # Elapsed-time accounting
//!
//! The budget is tracked in 32-bit millisecond ticks, which wrap about every
//! 49.7 days of uptime.  All elapsed-time math goes through
//! [`piperace_core::elapsed_ticks`], which subtracts with wraparound, so an
//! attempt that straddles the wrap point still times out on schedule.

use std::time::Duration;

use async_trait::async_trait;
use piperace_core::{elapsed_ticks, AttemptTimeout, PipeEndpoint, TickSource};
use thiserror::Error;
use tracing::{debug, trace};

pub mod mock;

#[cfg(windows)]
pub mod windows;

/// Failure of one connection attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectError {
    /// The raw timeout was negative and not the infinite sentinel.
    #[error(transparent)]
    InvalidTimeout(#[from] piperace_core::InvalidTimeout),
    /// The timeout budget ran out before the endpoint could be opened.
    #[error("timed out connecting to {path}")]
    Timeout { path: String },
    /// An OS failure that is not one of the recoverable race signals.
    #[error("connecting to {path} failed with OS error {code}")]
    Os { path: String, code: u32 },
}

/// Failure reported by the endpoint wait primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The endpoint does not exist yet: no server is listening.
    NotFound,
    /// The wait exhausted its budget.  Covers both the ordinary expiry and
    /// the OS "success with no wait" report.
    TimedOut,
    /// Any other OS failure.
    Os(u32),
}

/// Failure reported by the open primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenError {
    /// Another client took the instance between our wait and our open.
    Busy,
    /// Any other OS failure.
    Os(u32),
}

/// The two OS-facing primitives the attempt loop drives.
///
/// The production implementation is `windows::NamedPipeConnector`; tests
/// use [`mock::ScriptedConnector`].
#[async_trait]
pub trait PipeConnector {
    /// The duplex channel a successful open yields.
    type Channel;

    /// Blocks until the endpoint has a free instance, up to `budget`.
    async fn wait_available(
        &mut self,
        path: &str,
        budget: AttemptTimeout,
    ) -> Result<(), WaitError>;

    /// Opens the endpoint for duplex read/write use.
    async fn open(&mut self, path: &str) -> Result<Self::Channel, OpenError>;
}

/// Bounded backoff used while waiting out the two race windows.
///
/// Replaces a busy spin: the pauses stop a core being pegged during a race
/// window while staying negligible against any realistic budget.
#[derive(Debug, Clone, Copy)]
pub struct RetryBackoff {
    next: Duration,
}

impl RetryBackoff {
    const FLOOR: Duration = Duration::from_millis(1);
    const CEILING: Duration = Duration::from_millis(16);

    pub fn new() -> Self {
        Self { next: Self::FLOOR }
    }

    /// Sleeps the current delay, then doubles it up to the ceiling.
    pub async fn pause(&mut self) {
        tokio::time::sleep(self.next).await;
        self.next = (self.next * 2).min(Self::CEILING);
    }
}

impl Default for RetryBackoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the attempt state machine until the channel opens, the budget runs
/// out, or a non-recoverable failure occurs.
///
/// `raw_timeout_ms` follows the OS convention: `-1` waits forever; other
/// negative values are rejected before any primitive is called.
///
/// # Errors
///
/// - [`ConnectError::InvalidTimeout`] for a bad raw timeout.
/// - [`ConnectError::Timeout`] when the budget is exhausted, whether the
///   wait primitive reported it or the elapsed-tick check caught it.
/// - [`ConnectError::Os`] for any OS failure that is not a race signal.
pub async fn connect_with<C, T>(
    endpoint: &PipeEndpoint,
    raw_timeout_ms: i32,
    connector: &mut C,
    ticks: &T,
) -> Result<C::Channel, ConnectError>
where
    C: PipeConnector + Send,
    T: TickSource,
{
    let timeout = AttemptTimeout::from_raw_millis(raw_timeout_ms)?;
    let path = endpoint.path();

    let start = ticks.now_ticks();
    let mut elapsed: u32 = 0;
    let mut backoff = RetryBackoff::new();

    loop {
        match connector.wait_available(&path, timeout.remaining(elapsed)).await {
            // The wait saw a free instance, but a sibling can still steal it
            // before our open goes through.
            Ok(()) => match connector.open(&path).await {
                Ok(channel) => {
                    debug!("opened {path}");
                    return Ok(channel);
                }
                Err(OpenError::Busy) => {
                    trace!("lost the open race on {path}, retrying");
                    backoff.pause().await;
                }
                Err(OpenError::Os(code)) => return Err(ConnectError::Os { path, code }),
            },
            Err(WaitError::NotFound) => {
                trace!("{path} has no listener yet, retrying");
                backoff.pause().await;
            }
            Err(WaitError::TimedOut) => return Err(ConnectError::Timeout { path }),
            Err(WaitError::Os(code)) => return Err(ConnectError::Os { path, code }),
        }

        elapsed = elapsed_ticks(start, ticks.now_ticks());
        if timeout.is_expired(elapsed) {
            return Err(ConnectError::Timeout { path });
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Shared console sink serialized across concurrent workers.
//!
//! Every worker echoes each protocol line it emits to one process-wide
//! sink, which is how concurrent sessions are observed interleaving in real
//! time.  The sink is an explicitly injected handle rather than ambient
//! global state, and its mutex guarantees one worker's entry is never
//! interleaved with another's below line granularity.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::application::serve_words::WorkerId;

/// Cloneable handle to the mutually exclusive log sink shared by all workers.
#[derive(Clone)]
pub struct ConsoleSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleSink {
    /// A sink over the process's standard output.
    pub fn stdout() -> Self {
        Self::from_writer(std::io::stdout())
    }

    /// A sink over any writer.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// An in-memory sink plus a handle to read everything written to it;
    /// used by tests that assert on the log.
    pub fn in_memory() -> (Self, Arc<Mutex<Vec<u8>>>) {
        struct Buf(Arc<Mutex<Vec<u8>>>);

        impl Write for Buf {
            fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                let mut guard = match self.0.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                guard.extend_from_slice(data);
                Ok(data.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let shared = Arc::new(Mutex::new(Vec::new()));
        (Self::from_writer(Buf(Arc::clone(&shared))), shared)
    }

    /// Writes one `[worker <n>] <text>` entry atomically.
    ///
    /// Sink failures are swallowed: losing a log line must not take a
    /// worker down with it.
    pub fn entry(&self, worker: WorkerId, text: &str) {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(guard, "[{worker}] {text}");
        let _ = guard.flush();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! # piperace-core
//!
//! Shared library for piperace containing the line protocol framer, endpoint
//! naming, session outcome classification, and wraparound-safe tick
//! arithmetic.
//!
//! This crate is used by both the server and client applications.
//! It has zero dependencies on OS APIs, async runtimes, or pipe handles.
//!
//! # Architecture overview
//!
//! Piperace stress-tests connection establishment over a named pipe: one
//! long-lived server streams a small line protocol to every client that
//! connects, while many short-lived clients race each other for the pipe
//! and validate what they receive.  This crate is the shared foundation:
//!
//! - **`protocol`** – How text travels over the pipe.  A session is a fixed
//!   sequence of newline-terminated lines: a preamble naming the serving
//!   worker, ten word lines, and an end marker.
//!
//! - **`domain`** – Pure logic with no OS dependencies: the canonical
//!   endpoint name shared by both sides, the client outcome enumeration and
//!   its exit-code mapping, and the wrapping 32-bit tick arithmetic the
//!   connection attempt loop budgets its time with.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `piperace_core::PipeEndpoint` instead of the full module path.
pub use domain::endpoint::{PipeEndpoint, DEFAULT_HOST, DEFAULT_PIPE_NAME};
pub use domain::outcome::SessionOutcome;
pub use domain::ticks::{
    elapsed_ticks, AttemptTimeout, InvalidTimeout, ManualTicks, StartupTicks, TickSource,
    INFINITE_TIMEOUT,
};
pub use protocol::line::{
    encode_line, parse_line, ProtocolLine, END_OF_STREAM, PREAMBLE_PREFIX, WORD_PREFIX,
    WORDS_PER_SESSION,
};

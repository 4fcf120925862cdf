//! Pure domain types shared by the server and client.
//!
//! # Sub-modules
//!
//! - **`endpoint`** – The named endpoint both sides must resolve to the same
//!   canonical path for a connection to succeed.
//!
//! - **`outcome`** – The terminal classification a client session produces,
//!   plus its mapping to and from process exit codes.
//!
//! - **`ticks`** – Wrapping 32-bit millisecond tick arithmetic and the
//!   timeout budget type used by the connection attempt loop.

pub mod endpoint;
pub mod outcome;
pub mod ticks;

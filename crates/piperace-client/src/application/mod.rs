//! Application layer use cases for the client.
//!
//! # Sub-modules
//!
//! - **`validate_stream`** – Consumes the connected channel line by line and
//!   classifies the session into a [`piperace_core::SessionOutcome`].

pub mod validate_stream;

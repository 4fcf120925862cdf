//! Application layer use cases for the server.
//!
//! # Sub-modules
//!
//! - **`serve_words`** – Drives one connected client through the fixed
//!   protocol: preamble, ten randomly chosen words with randomized pacing,
//!   end marker.  One worker per connection; a worker's failures stay inside
//!   the worker.

pub mod serve_words;

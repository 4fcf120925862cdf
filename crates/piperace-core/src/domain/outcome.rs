//! Terminal classification of a client session.

/// What a client process observed, encoded in its exit status for the
/// launching orchestrator to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The full protocol was observed: one preamble, ten words, one end marker.
    Connected,
    /// The connection attempt failed before a session ever started.
    FailedToConnect,
    /// The first line was absent or did not carry the preamble prefix.
    MissingPreamble,
    /// The stream ended without the end marker.
    MissingEndOfStream,
    /// The end marker arrived but the word count was not ten.
    WrongWordCount,
    /// An I/O failure other than clean end-of-input interrupted the reads.
    ReadFailure,
}

impl SessionOutcome {
    /// The process exit code reported to the orchestrator.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Connected => 0,
            Self::FailedToConnect => 1,
            Self::MissingPreamble => 2,
            Self::MissingEndOfStream => 3,
            Self::WrongWordCount => 4,
            Self::ReadFailure => 5,
        }
    }

    /// Reverse mapping for an orchestrator collecting child exit codes.
    pub fn from_exit_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Connected),
            1 => Some(Self::FailedToConnect),
            2 => Some(Self::MissingPreamble),
            3 => Some(Self::MissingEndOfStream),
            4 => Some(Self::WrongWordCount),
            5 => Some(Self::ReadFailure),
            _ => None,
        }
    }

    /// The label an orchestrator prints for a collected result.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Connected => "succeeded",
            Self::FailedToConnect => "FAILED TO CONNECT",
            Self::MissingPreamble => "NO PREAMBLE",
            Self::MissingEndOfStream => "NO END OF STREAM",
            Self::WrongWordCount => "WRONG NUMBER OF RECORDS",
            Self::ReadFailure => "EXCEPTION WHILE READING",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

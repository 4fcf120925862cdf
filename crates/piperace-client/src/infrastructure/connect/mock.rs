//! Scripted connector driving the attempt loop in tests.
//!
//! Each call pops the next scripted result, and the recorder keeps what the
//! loop asked for, so tests can assert call counts, retry behaviour, and
//! budget propagation without touching an OS endpoint.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use piperace_core::{AttemptTimeout, ManualTicks};

use super::{OpenError, PipeConnector, WaitError};

/// Channel stand-in handed out by successful scripted opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeChannel(pub u32);

/// Connector that replays scripted wait/open results.
///
/// An exhausted wait script keeps reporting [`WaitError::NotFound`], so a
/// connector with no script at all models an endpoint whose server never
/// starts.  An exhausted open script reports `OpenError::Os(u32::MAX)` to
/// make an over-long test fail loudly instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedConnector {
    wait_script: VecDeque<Result<(), WaitError>>,
    open_script: VecDeque<Result<FakeChannel, OpenError>>,
    clock: Option<(Arc<ManualTicks>, u32)>,
    /// The budget passed to every `wait_available` call, in call order.
    pub wait_budgets: Vec<AttemptTimeout>,
    /// Number of `open` calls made.
    pub opens: usize,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one wait result.
    pub fn then_wait(mut self, result: Result<(), WaitError>) -> Self {
        self.wait_script.push_back(result);
        self
    }

    /// Queues `n` copies of a wait result.
    pub fn then_wait_n(mut self, result: Result<(), WaitError>, n: usize) -> Self {
        for _ in 0..n {
            self.wait_script.push_back(result);
        }
        self
    }

    /// Queues one open result.
    pub fn then_open(mut self, result: Result<FakeChannel, OpenError>) -> Self {
        self.open_script.push_back(result);
        self
    }

    /// Queues `n` copies of an open result.
    pub fn then_open_n(mut self, result: Result<FakeChannel, OpenError>, n: usize) -> Self {
        for _ in 0..n {
            self.open_script.push_back(result);
        }
        self
    }

    /// Couples the connector to a manual clock: every wait advances it by
    /// `wait_cost_ms`, modelling the wall-clock one loop iteration consumes.
    pub fn with_clock(mut self, clock: Arc<ManualTicks>, wait_cost_ms: u32) -> Self {
        self.clock = Some((clock, wait_cost_ms));
        self
    }

    /// Number of `wait_available` calls made.
    pub fn waits(&self) -> usize {
        self.wait_budgets.len()
    }
}

#[async_trait]
impl PipeConnector for ScriptedConnector {
    type Channel = FakeChannel;

    async fn wait_available(
        &mut self,
        _path: &str,
        budget: AttemptTimeout,
    ) -> Result<(), WaitError> {
        self.wait_budgets.push(budget);
        if let Some((clock, cost)) = &self.clock {
            clock.advance(*cost);
        }
        self.wait_script.pop_front().unwrap_or(Err(WaitError::NotFound))
    }

    async fn open(&mut self, _path: &str) -> Result<FakeChannel, OpenError> {
        self.opens += 1;
        self.open_script
            .pop_front()
            .unwrap_or(Err(OpenError::Os(u32::MAX)))
    }
}

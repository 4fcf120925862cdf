//! Integration tests for the connection attempt state machine.
//!
//! The scripted connector stands in for the OS primitives and records every
//! call, so each race/failure condition of the loop can be staged exactly:
//! how often it retried, what budget it passed down, and what it finally
//! returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use piperace_client::infrastructure::connect::mock::{FakeChannel, ScriptedConnector};
use piperace_client::infrastructure::connect::{
    connect_with, ConnectError, OpenError, WaitError,
};
use piperace_core::{
    AttemptTimeout, InvalidTimeout, ManualTicks, PipeEndpoint, StartupTicks, INFINITE_TIMEOUT,
};

fn endpoint() -> PipeEndpoint {
    PipeEndpoint::default()
}

// ── Timeout argument validation ───────────────────────────────────────────────

#[tokio::test]
async fn test_negative_timeout_is_rejected_before_any_os_call() {
    let mut connector = ScriptedConnector::new();
    let ticks = ManualTicks::new(0);

    let result = connect_with(&endpoint(), -5, &mut connector, &ticks).await;

    assert_eq!(
        result,
        Err(ConnectError::InvalidTimeout(InvalidTimeout(-5)))
    );
    assert_eq!(connector.waits(), 0, "no wait may be issued");
    assert_eq!(connector.opens, 0, "no open may be issued");
}

// ── Success paths ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_free_endpoint_connects_on_the_first_try() {
    let mut connector = ScriptedConnector::new()
        .then_wait(Ok(()))
        .then_open(Ok(FakeChannel(1)));
    let ticks = ManualTicks::new(0);

    let channel = connect_with(&endpoint(), 10_000, &mut connector, &ticks)
        .await
        .expect("must connect");

    assert_eq!(channel, FakeChannel(1));
    assert_eq!(connector.waits(), 1);
    assert_eq!(connector.opens, 1);
}

#[tokio::test]
async fn test_busy_open_retries_exactly_until_success() {
    // The wait keeps reporting a free instance, but a sibling client wins
    // the open race three times before we finally get through.
    let mut connector = ScriptedConnector::new()
        .then_wait_n(Ok(()), 4)
        .then_open_n(Err(OpenError::Busy), 3)
        .then_open(Ok(FakeChannel(7)));
    let ticks = ManualTicks::new(0);

    let channel = connect_with(&endpoint(), 10_000, &mut connector, &ticks)
        .await
        .expect("busy races must be ridden out");

    assert_eq!(channel, FakeChannel(7));
    assert_eq!(connector.opens, 4, "three busy retries plus the success");
    assert_eq!(connector.waits(), 4, "each retry restarts from the wait");
}

#[tokio::test]
async fn test_not_found_retries_until_the_server_appears() {
    // The server has not created the endpoint yet; two retries later it has.
    let mut connector = ScriptedConnector::new()
        .then_wait_n(Err(WaitError::NotFound), 2)
        .then_wait(Ok(()))
        .then_open(Ok(FakeChannel(3)));
    let ticks = ManualTicks::new(0);

    let channel = connect_with(&endpoint(), 10_000, &mut connector, &ticks)
        .await
        .expect("late server start must be ridden out");

    assert_eq!(channel, FakeChannel(3));
    assert_eq!(connector.waits(), 3);
    assert_eq!(connector.opens, 1);
}

// ── Terminal failures ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wait_timeout_ends_the_attempt() {
    let mut connector = ScriptedConnector::new().then_wait(Err(WaitError::TimedOut));
    let ticks = ManualTicks::new(0);

    let result = connect_with(&endpoint(), 10_000, &mut connector, &ticks).await;

    assert!(matches!(result, Err(ConnectError::Timeout { .. })));
    assert_eq!(connector.waits(), 1);
    assert_eq!(connector.opens, 0, "a timed-out wait must not be followed by an open");
}

#[tokio::test]
async fn test_unexpected_wait_failure_is_not_retried() {
    let mut connector = ScriptedConnector::new().then_wait(Err(WaitError::Os(5)));
    let ticks = ManualTicks::new(0);

    let result = connect_with(&endpoint(), 10_000, &mut connector, &ticks).await;

    assert!(matches!(result, Err(ConnectError::Os { code: 5, .. })));
    assert_eq!(connector.waits(), 1, "hard failures terminate immediately");
}

#[tokio::test]
async fn test_unexpected_open_failure_is_not_retried() {
    let mut connector = ScriptedConnector::new()
        .then_wait(Ok(()))
        .then_open(Err(OpenError::Os(87)));
    let ticks = ManualTicks::new(0);

    let result = connect_with(&endpoint(), 10_000, &mut connector, &ticks).await;

    assert!(matches!(result, Err(ConnectError::Os { code: 87, .. })));
    assert_eq!(connector.opens, 1);
    assert_eq!(connector.waits(), 1);
}

// ── Budget accounting ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_budget_shrinks_by_exactly_the_elapsed_ticks() {
    // Every wait consumes 30 ticks of wall clock against a 100 tick budget;
    // the endpoint never appears.  The budget handed to each wait must
    // shrink by precisely what has elapsed, nothing more.
    let clock = Arc::new(ManualTicks::new(500));
    let mut connector = ScriptedConnector::new().with_clock(Arc::clone(&clock), 30);

    let result = connect_with(&endpoint(), 100, &mut connector, &*clock).await;

    assert!(matches!(result, Err(ConnectError::Timeout { .. })));
    assert_eq!(
        connector.wait_budgets,
        [
            AttemptTimeout::Millis(100),
            AttemptTimeout::Millis(70),
            AttemptTimeout::Millis(40),
            AttemptTimeout::Millis(10),
        ]
    );
    assert_eq!(connector.opens, 0);
}

#[tokio::test]
async fn test_budget_accounting_survives_tick_wraparound() {
    // Start 40 ticks before the 32-bit counter wraps.  The third and fourth
    // iterations sample a counter that has wrapped past zero; wrapping
    // subtraction must keep the elapsed values honest.
    let clock = Arc::new(ManualTicks::new(u32::MAX - 40));
    let mut connector = ScriptedConnector::new().with_clock(Arc::clone(&clock), 30);

    let result = connect_with(&endpoint(), 100, &mut connector, &*clock).await;

    assert!(matches!(result, Err(ConnectError::Timeout { .. })));
    assert_eq!(
        connector.wait_budgets,
        [
            AttemptTimeout::Millis(100),
            AttemptTimeout::Millis(70),
            AttemptTimeout::Millis(40),
            AttemptTimeout::Millis(10),
        ],
        "wraparound must not distort the budget"
    );
}

#[tokio::test]
async fn test_infinite_timeout_keeps_an_infinite_budget() {
    let mut connector = ScriptedConnector::new()
        .then_wait_n(Err(WaitError::NotFound), 3)
        .then_wait(Ok(()))
        .then_open(Ok(FakeChannel(2)));
    let ticks = ManualTicks::new(0);

    let channel = connect_with(&endpoint(), INFINITE_TIMEOUT, &mut connector, &ticks)
        .await
        .expect("infinite budget cannot time out");

    assert_eq!(channel, FakeChannel(2));
    for budget in &connector.wait_budgets {
        assert_eq!(*budget, AttemptTimeout::Infinite);
    }
}

// ── Wall-clock behaviour ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_never_listening_endpoint_times_out_within_bounded_slack() {
    // Real tick source, endpoint that never appears: the attempt must fail
    // with Timeout no earlier than the budget and without hanging.
    let mut connector = ScriptedConnector::new();
    let ticks = StartupTicks::new();
    let started = Instant::now();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        connect_with(&endpoint(), 60, &mut connector, &ticks),
    )
    .await
    .expect("attempt loop must not hang");

    assert!(matches!(result, Err(ConnectError::Timeout { .. })));
    assert!(
        started.elapsed() >= Duration::from_millis(60),
        "the loop may never give up before its budget"
    );
    assert_eq!(connector.opens, 0);
}

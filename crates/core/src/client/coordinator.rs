//! Single-flight token refresh
//!
//! The coordinator only tracks state: whether a refresh cycle is running, who
//! is waiting for it, and how many cycles have completed. The exchange itself
//! is driven by whichever request was handed the [`CycleGuard`].
//!
//! All state sits behind one mutex that is never held across an `.await`.

use std::collections::VecDeque;

use grabbi_domain::ErrorOutcome;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// What a queued request receives when the cycle ends
pub type RefreshResult = Result<String, ErrorOutcome>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Refreshing,
}

/// How the most recent completed cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Refreshed,
    Expired,
}

/// Result of asking to start a refresh cycle
#[derive(Debug)]
pub enum Ticket<'a> {
    /// The caller runs the exchange and must settle the guard.
    Lead(CycleGuard<'a>),
    /// A cycle is already running; await the new token.
    Wait(oneshot::Receiver<RefreshResult>),
    /// A cycle finished after the caller's request was sent.
    Superseded(CycleOutcome),
}

#[derive(Debug)]
struct RefreshState {
    phase: RefreshPhase,
    waiters: VecDeque<oneshot::Sender<RefreshResult>>,
    generation: u64,
    last_outcome: Option<CycleOutcome>,
}

#[derive(Debug)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState {
                phase: RefreshPhase::Idle,
                waiters: VecDeque::new(),
                generation: 0,
                last_outcome: None,
            }),
        }
    }

    pub fn phase(&self) -> RefreshPhase {
        self.state.lock().phase
    }

    /// Number of completed cycles.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn queued_waiters(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Join or start a refresh cycle for a request sent at `observed_generation`.
    pub fn begin(&self, observed_generation: u64) -> Ticket<'_> {
        let mut state = self.state.lock();

        if state.phase == RefreshPhase::Refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            debug!(queued = state.waiters.len(), "Queued request behind token refresh");
            return Ticket::Wait(rx);
        }

        if observed_generation < state.generation {
            let outcome = state.last_outcome.unwrap_or(CycleOutcome::Expired);
            debug!(?outcome, "Request predates the last token refresh");
            return Ticket::Superseded(outcome);
        }

        state.phase = RefreshPhase::Refreshing;
        Ticket::Lead(CycleGuard { coordinator: self, settled: false })
    }

    fn settle(&self, result: RefreshResult, outcome: Option<CycleOutcome>) -> usize {
        let mut state = self.state.lock();
        let waiters = std::mem::take(&mut state.waiters);
        let released = waiters.len();
        for waiter in waiters {
            // A dropped caller simply misses the result.
            let _ = waiter.send(result.clone());
        }
        state.phase = RefreshPhase::Idle;
        if let Some(outcome) = outcome {
            state.generation += 1;
            state.last_outcome = Some(outcome);
        }
        released
    }
}

/// Ownership of the running refresh cycle.
///
/// Dropping an unsettled guard rejects every waiter and returns the
/// coordinator to `Idle`, so a cancelled leader cannot wedge the client.
#[derive(Debug)]
pub struct CycleGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl CycleGuard<'_> {
    /// Release every waiter with `token`, in arrival order. Returns how many
    /// were released.
    pub fn succeed(mut self, token: &str) -> usize {
        self.settled = true;
        self.coordinator.settle(Ok(token.to_string()), Some(CycleOutcome::Refreshed))
    }

    /// Reject every waiter with `SessionExpired`. Returns how many were
    /// rejected.
    pub fn fail(mut self) -> usize {
        self.settled = true;
        self.coordinator.settle(Err(ErrorOutcome::SessionExpired), Some(CycleOutcome::Expired))
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let rejected = self.coordinator.settle(Err(ErrorOutcome::SessionExpired), None);
        warn!(rejected, "Token refresh abandoned before completion");
    }
}

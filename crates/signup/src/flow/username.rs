//! Debounced username availability checking.
//!
//! Every keystroke in the username field lands here; the checker waits
//! for input to quiesce (600 ms) before spending a network call, keeps at
//! most one probe in flight, and guarantees that a stale probe's result
//! never overwrites the result of a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use spinline_core::Username;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::affiliate::{AffiliateError, UsernameAvailability};

/// How long username input must quiesce before a probe is issued.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(600);

/// Observable state of the username availability check.
///
/// The resolved variants carry the candidate they resolved for, so
/// callers can verify the confirmation still matches the current draft
/// before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameCheckState {
    /// No usable candidate, or the last probe failed. Never allows progress.
    Idle,
    /// A candidate is waiting out the debounce window or in flight.
    Checking,
    /// The candidate was confirmed available upstream.
    Available(Username),
    /// The candidate is already registered upstream.
    Taken(Username),
}

/// Source of availability answers, abstracted for testing.
///
/// Implemented by [`crate::affiliate::AffiliateClient`]; tests substitute
/// deterministic fakes that count issued probes.
pub trait UsernameLookup: Send + Sync + 'static {
    /// Resolve whether `username` is available upstream.
    fn availability(
        &self,
        username: Username,
    ) -> impl Future<Output = Result<UsernameAvailability, AffiliateError>> + Send;
}

/// Debounced, cancel-safe username availability checker.
///
/// All mutation happens through [`submit`](Self::submit); observers watch
/// the state channel. Dropping the checker aborts any pending probe.
pub struct UsernameChecker<L> {
    lookup: Arc<L>,
    state_tx: watch::Sender<UsernameCheckState>,
    generation: Arc<AtomicU64>,
    pending: std::sync::Mutex<Option<JoinHandle<()>>>,
    debounce: Duration,
}

impl<L: UsernameLookup> UsernameChecker<L> {
    /// Create a checker with the standard debounce window.
    #[must_use]
    pub fn new(lookup: Arc<L>) -> Self {
        Self::with_debounce(lookup, DEBOUNCE_WINDOW)
    }

    /// Create a checker with a custom debounce window.
    #[must_use]
    pub fn with_debounce(lookup: Arc<L>, debounce: Duration) -> Self {
        let (state_tx, _) = watch::channel(UsernameCheckState::Idle);
        Self {
            lookup,
            state_tx,
            generation: Arc::new(AtomicU64::new(0)),
            pending: std::sync::Mutex::new(None),
            debounce,
        }
    }

    /// Feed the current username input.
    ///
    /// Any pending probe is cancelled. Candidates that do not parse as a
    /// [`Username`] (in particular, anything under four characters) force
    /// the state to `Idle` without issuing a probe; valid candidates move
    /// the state to `Checking` and schedule a probe for after the
    /// debounce window.
    pub fn submit(&self, candidate: &str) {
        // Bumping the generation first invalidates any in-flight probe
        // even if its task is past an abort point.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_pending();

        let Ok(username) = Username::parse(candidate) else {
            self.state_tx.send_replace(UsernameCheckState::Idle);
            return;
        };

        self.state_tx.send_replace(UsernameCheckState::Checking);

        let lookup = Arc::clone(&self.lookup);
        let state_tx = self.state_tx.clone();
        let generation_counter = Arc::clone(&self.generation);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if generation_counter.load(Ordering::SeqCst) != generation {
                return;
            }

            let result = lookup.availability(username.clone()).await;

            // A newer submission may have arrived while the probe was in
            // flight; its result, not ours, is authoritative.
            if generation_counter.load(Ordering::SeqCst) != generation {
                return;
            }

            let next = match result {
                Ok(UsernameAvailability::Available) => UsernameCheckState::Available(username),
                Ok(UsernameAvailability::Taken) => UsernameCheckState::Taken(username),
                Err(e) => {
                    // Fail closed: Idle blocks progress, Available would not.
                    tracing::warn!(error = %e, "username availability probe failed");
                    UsernameCheckState::Idle
                }
            };
            state_tx.send_replace(next);
        });

        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(handle);
        }
    }

    /// Current check state.
    #[must_use]
    pub fn state(&self) -> UsernameCheckState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UsernameCheckState> {
        self.state_tx.subscribe()
    }

    /// Abort the pending probe task, if any.
    fn abort_pending(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(handle) = pending.take()
        {
            handle.abort();
        }
    }
}

impl<L> Drop for UsernameChecker<L> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(handle) = pending.take()
        {
            handle.abort();
        }
    }
}

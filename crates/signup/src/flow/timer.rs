//! OTP resend countdown timer.
//!
//! The OTP validity window is enforced purely client-side: after a
//! successful dispatch the timer counts down from 70 seconds, and only at
//! zero does the resend action unlock.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Seconds a freshly-dispatched OTP remains valid for.
pub const RESEND_BUDGET_SECS: u32 = 70;

/// Single-shot decrementing countdown driving resend eligibility.
///
/// `start` (re)arms the countdown; the remaining seconds are observable
/// via a watch channel. The ticking task is aborted on re-arm, on
/// [`cancel`](Self::cancel), and on drop, so no recurring work outlives
/// the flow that owns the timer.
pub struct ResendTimer {
    remaining_tx: watch::Sender<u32>,
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl ResendTimer {
    /// Create an expired timer (resend nominally unlocked, but the flow
    /// only consults the timer once an OTP has been dispatched).
    #[must_use]
    pub fn new() -> Self {
        let (remaining_tx, _) = watch::channel(0);
        Self {
            remaining_tx,
            task: std::sync::Mutex::new(None),
        }
    }

    /// (Re)arm the countdown at the full budget.
    pub fn start(&self) {
        self.cancel();
        self.remaining_tx.send_replace(RESEND_BUDGET_SECS);

        let remaining_tx = self.remaining_tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately; the countdown starts
            // one second after arming.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut expired = false;
                remaining_tx.send_modify(|remaining| {
                    *remaining = remaining.saturating_sub(1);
                    expired = *remaining == 0;
                });
                if expired {
                    break;
                }
            }
        });

        if let Ok(mut task) = self.task.lock() {
            *task = Some(handle);
        }
    }

    /// Stop ticking without resetting the remaining count.
    pub fn cancel(&self) {
        if let Ok(mut task) = self.task.lock()
            && let Some(handle) = task.take()
        {
            handle.abort();
        }
    }

    /// Seconds remaining until resend unlocks.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        *self.remaining_tx.borrow()
    }

    /// Whether the countdown has reached zero.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining() == 0
    }

    /// Subscribe to remaining-seconds updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining_tx.subscribe()
    }
}

impl Default for ResendTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResendTimer {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock()
            && let Some(handle) = task.take()
        {
            handle.abort();
        }
    }
}

//! Single-shot cancellable timers
//!
//! Each `DeferredTask` owns at most one pending timer. Scheduling replaces
//! the pending one; dropping the task cancels it. A firing carries the
//! generation it was scheduled with so one that raced its own cancellation
//! can be recognised and dropped.

use crate::state_machine::TimerKind;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A timer firing, delivered back to the owning runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub timer: TimerKind,
    pub generation: u64,
}

#[derive(Debug)]
struct Pending {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Debug)]
pub struct DeferredTask {
    timer: TimerKind,
    generation: u64,
    pending: Option<Pending>,
}

impl DeferredTask {
    pub fn new(timer: TimerKind) -> Self {
        Self {
            timer,
            generation: 0,
            pending: None,
        }
    }

    /// Arm the timer, cancelling any pending one
    pub fn schedule(&mut self, delay: Duration, fired_tx: mpsc::Sender<TimerFired>) {
        self.cancel();
        self.generation += 1;

        let fired = TimerFired {
            timer: self.timer,
            generation: self.generation,
        };
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let _ = fired_tx.send(fired).await;
                }
            }
        });

        self.pending = Some(Pending {
            generation: fired.generation,
            cancel,
        });
    }

    /// Disarm the timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Accept a firing. Only the currently pending generation is accepted,
    /// and accepting it leaves nothing pending.
    pub fn claim(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for DeferredTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Trait abstractions for runtime output
//!
//! The listener seam lets hosts and tests observe notifications
//! synchronously, in the order they are produced.

use crate::state_machine::SlideEvent;
use std::sync::{Arc, Mutex};

/// Receives every notification at the moment it is produced
pub trait SlideListener: Send + 'static {
    fn on_slide(&mut self, event: &SlideEvent);
}

impl<F> SlideListener for F
where
    F: FnMut(&SlideEvent) + Send + 'static,
{
    fn on_slide(&mut self, event: &SlideEvent) {
        self(event);
    }
}

/// Listener used when the host registers no callback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl SlideListener for NoopListener {
    fn on_slide(&mut self, _event: &SlideEvent) {}
}

/// Listener that appends every notification to a shared log
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<SlideEvent>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<SlideEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl SlideListener for RecordingListener {
    fn on_slide(&mut self, event: &SlideEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(*event);
        }
    }
}

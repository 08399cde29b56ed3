//! Effects produced by state transitions

use crate::state_machine::state::Direction;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Change notification delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlideEvent {
    Slide {
        current_index: usize,
        previous_index: usize,
        direction: Direction,
    },
    Pause {
        current_index: usize,
    },
    Resume {
        current_index: usize,
    },
    Reset {
        current_index: usize,
    },
}

impl SlideEvent {
    pub fn current_index(&self) -> usize {
        match *self {
            SlideEvent::Slide { current_index, .. }
            | SlideEvent::Pause { current_index }
            | SlideEvent::Resume { current_index }
            | SlideEvent::Reset { current_index } => current_index,
        }
    }

    pub fn previous_index(&self) -> Option<usize> {
        match *self {
            SlideEvent::Slide { previous_index, .. } => Some(previous_index),
            _ => None,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match *self {
            SlideEvent::Slide { direction, .. } => Some(direction),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SlideEvent::Slide { .. } => "slide",
            SlideEvent::Pause { .. } => "pause",
            SlideEvent::Resume { .. } => "resume",
            SlideEvent::Reset { .. } => "reset",
        }
    }
}

/// Timers the controller owns; at most one of each is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    AutoAdvance,
    TransitionEnd,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a change notification to listeners
    Notify(SlideEvent),

    /// Arm a single-shot timer, replacing any pending one of the same kind
    Schedule { timer: TimerKind, delay: Duration },

    /// Disarm a timer if pending
    Cancel { timer: TimerKind },
}

impl Effect {
    pub fn schedule_auto_advance(delay: Duration) -> Self {
        Effect::Schedule {
            timer: TimerKind::AutoAdvance,
            delay,
        }
    }

    pub fn schedule_transition_end(delay: Duration) -> Self {
        Effect::Schedule {
            timer: TimerKind::TransitionEnd,
            delay,
        }
    }

    pub fn cancel_auto_advance() -> Self {
        Effect::Cancel {
            timer: TimerKind::AutoAdvance,
        }
    }

    pub fn cancel_transition_end() -> Self {
        Effect::Cancel {
            timer: TimerKind::TransitionEnd,
        }
    }
}
